//! KYC Identity API server entry point.

use std::sync::Arc;

use kyc_identity_api::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use kyc_identity_api::config::AppConfig;
use kyc_identity_api::error::AppError;
use kyc_identity_api::kyc::AutoApproveKycVerifier;
use kyc_identity_api::state::AppState;
use kyc_identity_api::{build_router, telemetry};
use kyc_identity_core::bus::EventBus;
use kyc_identity_core::clock::SystemClock;
use kyc_identity_store::{InMemoryUserStore, PgUserStore};
use kyc_identity_users::application::event_handlers::register_user_event_handlers;
use kyc_identity_users::domain::events::UserEvent;
use kyc_identity_users::domain::repository::{UserRepository, UserStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

async fn user_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryUserStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    let store = PgUserStore::new(pool);
    store
        .ensure_schema()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("connected to PostgreSQL user store");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!(?config, "starting KYC Identity API server");

    let bus: Arc<EventBus<UserEvent>> = Arc::new(EventBus::new());
    register_user_event_handlers(&bus);

    let app_state = AppState::new(
        Arc::new(SystemClock),
        UserRepository::new(user_store(&config).await?, bus),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenIssuer::new(
            config.jwt_secret.as_bytes(),
            config.jwt_ttl_hours,
        )),
        Arc::new(AutoApproveKycVerifier),
    );
    let app = build_router(app_state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}
