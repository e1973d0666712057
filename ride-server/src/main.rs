use std::sync::Arc;

use ride_server::clock::SystemClock;
use ride_server::config::AppConfig;
use ride_server::namma_yatri::NammaYatriClient;
use ride_server::session::SessionRegistry;
use ride_server::web::{AppState, create_router};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on bad configuration
    let config = AppConfig::from_env().expect("Invalid configuration");

    let upstream =
        NammaYatriClient::new(config.upstream.clone()).expect("Failed to create Namma Yatri client");
    info!(base_url = upstream.base_url(), "using Namma Yatri API");

    let sessions = SessionRegistry::new(&config.sessions, upstream, Arc::new(SystemClock));
    let app = create_router(AppState::new(sessions));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    info!("Ride booking proxy listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
