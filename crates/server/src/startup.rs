use std::{net::SocketAddr, time::Duration};

use configs::AppConfig;
use service::{auth::TokenService, runtime::Repositories};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c handler unavailable");
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
                warn!(error = %e, "SIGTERM handler unavailable");
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
    info!(event = "shutdown_signal", "shutdown requested, draining in-flight requests");
}

/// Public entry: open the store, build the app and serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let tokens = TokenService::from_config(&cfg.auth).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let repos = Repositories::open(&cfg.database)
        .await
        .map_err(|e| StartupError::Store(format!("{e:#}")))?;
    let state = ServerState::new(tokens, &repos);

    let app = routes::build_router(state, build_cors(), Duration::from_secs(cfg.server.request_timeout_secs));

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, backend = ?cfg.database.backend, "listening");

    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    // 先停止接收请求，再释放数据库连接
    repos.close().await;
    info!(event = "store_closed", "document store released");
    served.map_err(anyhow::Error::from)?;
    Ok(())
}
