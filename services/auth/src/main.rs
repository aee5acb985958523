use anyhow::Context;
use tracing::{info, warn};

use formerr_auth::config::AuthConfig;
use formerr_auth::infra::mailer::Notifier;
use formerr_auth::infra::memory::InMemoryAuthCodeStore;
use formerr_auth::infra::sweeper::spawn_sweeper;
use formerr_auth::router::build_router;
use formerr_auth::state::AppState;
use formerr_core::tracing::init_tracing;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = AuthConfig::from_env()?;

    if config.mail_relay.is_none() {
        warn!("MAIL_RELAY_URL not set; auth codes will be logged instead of emailed");
    }
    let notifier = Notifier::from_config(config.mail_relay)?;

    let state = AppState::new(InMemoryAuthCodeStore::new(), notifier, config.jwt_secret);
    let sweeper = spawn_sweeper(state.auth_codes.clone(), config.sweep_interval);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.abort();
    Ok(())
}
