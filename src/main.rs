mod config;
mod routes;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::HostConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toraxview=info,tower_http=info")),
        )
        .init();

    let config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    let app = match routes::leptos_app() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to build router");
            return ExitCode::FAILURE;
        }
    };

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, port = %config.port, "toraxview listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
