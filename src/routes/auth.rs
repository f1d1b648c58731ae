use crate::{
    auth::{AuthResponse, LoginRequest, PasswordHasher, RegisterRequest, TokenService},
    error::AppError,
    models::{NewUser, Role, UserResponse},
    repository::Repositories,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new account
///
/// Creates a `User` account and returns it without the password hash. A `role` in the
/// body is ignored.
///
/// ## Responses:
/// - `201 Created`: the new `UserResponse`.
/// - `400 Bad Request`: invalid payload or the email is already registered.
#[post("/register")]
pub async fn register(
    repos: web::Data<Repositories>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    log::info!("Registration attempt for {}", register_data.email);
    register_data.validate()?;

    if repos
        .users
        .find_by_email(&register_data.email)
        .await?
        .is_some()
    {
        log::warn!("Registration rejected, {} already exists", register_data.email);
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let request = register_data.into_inner();
    let user = repos
        .users
        .add(NewUser {
            password_hash: hasher.hash(&request.password)?,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::User,
        })
        .await?;

    log::info!("Registered {} as {}", user.email, user.role.as_str());
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login
///
/// Verifies the credentials and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: an `AuthResponse`.
/// - `400 Bad Request`: malformed payload.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/login")]
pub async fn login(
    repos: web::Data<Repositories>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    log::info!("Login attempt for {}", login_data.email);
    login_data.validate()?;

    let user = match repos.users.find_by_email(&login_data.email).await? {
        Some(user) if hasher.verify(&login_data.password, &user.password_hash)? => user,
        _ => {
            log::warn!("Login failed for {}", login_data.email);
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    let token = tokens.generate_token(&user)?;
    log::info!("{} logged in", user.email);
    Ok(HttpResponse::Ok().json(AuthResponse {
        user_id: user.id,
        token,
        email: user.email,
    }))
}
