use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

use service::jobs::schedule::SchedulePolicy;
use service::AppServices;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Connect storage, wire services and routes.
async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        models::db::migrate(&db).await?;
    }

    let policy = SchedulePolicy::from_config(&cfg.scheduling);
    info!(
        event = "scheduling_policy",
        utc_offset = %policy.zone,
        upcoming_default_days = policy.upcoming_default_days,
        enforce_status_transitions = policy.enforce_status_transitions,
        "scheduling configured"
    );
    let state = ServerState::new(AppServices::seaorm(db, policy));

    // 静态目录不存在时只告警，不挂载
    let static_dir = match cfg.server.static_dir.as_deref() {
        Some(dir) if common::env::check_static_dir(dir).await => Some(dir),
        _ => None,
    };

    Ok(routes::build_router(state, routes::build_cors(&cfg.server.cors_origins), static_dir))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(event = "signal_error", error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(event = "signal_error", error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(service = "server", event = "shutdown_signal", "shutting down, draining in-flight requests");
}

/// Public entry: build the app and serve until a shutdown signal arrives
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind(cfg.server.bind_addr())
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {}: {e}", cfg.server.bind_addr())))?;
    info!(service = "server", event = "listening", addr = %listener.local_addr()?, "http server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(service = "server", event = "stopped", "http server stopped");
    Ok(())
}
