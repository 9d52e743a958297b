mod config;
mod sweeper;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::info;

use recipebox_api::AppStateInner;
use recipebox_api::session::SessionStore;
use recipebox_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox=debug,recipebox_api=debug,recipebox_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    let sessions = SessionStore::new(chrono::Duration::hours(config.session_ttl_hours));
    let state = AppStateInner::new(db, sessions, config.cookie_secure)?;

    tokio::spawn(sweeper::run_session_sweeper(
        state.clone(),
        config.session_sweep_secs,
    ));

    let app = recipebox_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Recipebox listening on {}", addr);
    info!("Sessions expire after {} hours", config.session_ttl_hours);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
