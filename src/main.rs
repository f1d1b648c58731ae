use actix_web::{middleware::Logger, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use bookstore::app::{self, AppState};
use bookstore::config::{Config, StorageBackend};
use bookstore::error::AppError;
use bookstore::repository::Repositories;
use bookstore::seed;

async fn connect_repositories(config: &Config) -> Result<Repositories, AppError> {
    match (config.storage_backend, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            log::info!("Connected to Postgres and applied migrations");
            Ok(Repositories::postgres(pool))
        }
        (StorageBackend::Postgres, None) => Err(AppError::Configuration(
            "DATABASE_URL must be set when STORAGE_BACKEND is 'postgres'".into(),
        )),
        (StorageBackend::Memory, _) => {
            log::warn!("Using the in-memory store; all data is lost on shutdown");
            Ok(Repositories::in_memory())
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let state = AppState::new(connect_repositories(&config).await?, &config);

    if let Some((email, password)) = &config.admin_account {
        seed::ensure_admin(&*state.repositories.users, &state.hasher, email, password).await?;
    }

    log::info!("Starting bookstore API at {}", config.server_url());
    let cors_origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(app::cors(&cors_origins))
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    log::info!("Bookstore API stopped");
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run().await.map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })
}
