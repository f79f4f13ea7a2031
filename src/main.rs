use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use blog_api::auth::TokenVerifier;
use blog_api::configuration::get_configuration;
use blog_api::startup::{build_authenticator, run};
use blog_api::store::PgCredentialStore;
use blog_api::telemetry::init_telemetry;

fn startup_error(kind: std::io::ErrorKind, message: &str) -> std::io::Error {
    std::io::Error::new(kind, message.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(startup_error(std::io::ErrorKind::InvalidInput, "Configuration error"));
        }
    };
    if let Err(e) = configuration.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(startup_error(std::io::ErrorKind::InvalidInput, "Configuration error"));
    }
    tracing::info!("Configuration loaded successfully");

    tracing::info!("Attempting to connect to database");
    let pool = PgPoolOptions::new()
        .max_connections(configuration.database.max_connections)
        .connect(&configuration.database.connection_string())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            startup_error(std::io::ErrorKind::ConnectionRefused, "Database connection error")
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {}", e);
        startup_error(std::io::ErrorKind::Other, "Migration error")
    })?;
    tracing::info!("Database ready");

    let credentials = Arc::new(PgCredentialStore::new(pool.clone()));
    let authenticator = build_authenticator(credentials, &configuration.auth);

    if let Some(admin) = &configuration.admin {
        match authenticator.provision_admin(&admin.username, &admin.password).await {
            Ok(true) => {}
            Ok(false) => tracing::info!("Administrator already present, seed skipped"),
            Err(e) => {
                tracing::error!("Failed to provision administrator: {}", e);
                return Err(startup_error(std::io::ErrorKind::Other, "Provisioning error"));
            }
        }
    }

    let verifier = TokenVerifier::new(&configuration.auth.jwt_secret);

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, pool, authenticator, verifier)?.await
}
