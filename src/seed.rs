use crate::auth::PasswordHasher;
use crate::error::AppError;
use crate::models::{NewUser, Role, User};
use crate::repository::UserRepository;

/// Makes sure an Administrator account with `email` exists.
///
/// An existing account is left untouched, whatever its role or password.
/// Returns the account that was created, if any.
pub async fn ensure_admin(
    users: &dyn UserRepository,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    if users.find_by_email(email).await?.is_some() {
        log::info!("Administrator account {} already exists", email);
        return Ok(None);
    }

    let admin = users
        .add(NewUser {
            email: email.to_string(),
            password_hash: hasher.hash(password)?,
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            role: Role::Administrator,
        })
        .await?;
    log::info!("Seeded administrator account {}", admin.email);
    Ok(Some(admin))
}
