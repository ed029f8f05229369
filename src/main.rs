use std::process::ExitCode;

use pankki_api::config::Config;
use pankki_api::db;
use pankki_api::routes::{router, AppState};
use pankki_api::security::{AuthorizationPolicy, Gate, TokenVerifier};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pankki_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let pg_pool = db::connect(&config).await?;
    let gate = Gate::new(
        AuthorizationPolicy::bank()?,
        TokenVerifier::new(config.jwt_secret.as_bytes()),
    );

    let app = router(AppState {
        pool: pg_pool,
        gate,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "server running");

    axum::serve(listener, app).await?;

    Ok(())
}
