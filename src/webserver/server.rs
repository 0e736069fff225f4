/// Axum webserver lifecycle: bind, serve, graceful shutdown
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

use crate::{
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// Serve until `shutdown` holds `true`
pub async fn start_server(
    state: Arc<AppState>,
    host: &str,
    port: u16,
    shutdown: watch::Receiver<bool>,
) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", host, port, e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => format!(
            "Failed to bind to {}: Address already in use\n\
             Another tokenwatch instance (or another service) is listening on port {}.\n\
             Use --port or PORT to pick a different one.",
            addr, port
        ),
        std::io::ErrorKind::PermissionDenied => format!(
            "Failed to bind to {}: Permission denied\n\
             Port {} requires elevated privileges on this system.",
            addr, port
        ),
        _ => format!("Failed to bind to {}: {}", addr, e),
    })?;

    logger::info(
        LogTag::Webserver,
        &format!(
            "Server running on http://{} in {} mode",
            addr, state.config.environment
        ),
    );

    serve_on(listener, build_app(state), shutdown).await?;

    logger::info(LogTag::Webserver, "Webserver stopped gracefully");
    Ok(())
}

/// Serve `app` on an already bound listener until `shutdown` holds `true`
pub async fn serve_on(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), String> {
    let shutdown_signal = async move {
        let _ = shutdown.wait_for(|stop| *stop).await;
        logger::info(
            LogTag::Webserver,
            "Received shutdown signal, stopping webserver...",
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Router plus cross-cutting layers
pub fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_returns_when_stop_was_requested_before_start() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send_replace(true);

        let served = tokio::time::timeout(
            Duration::from_secs(5),
            serve_on(listener, Router::new(), rx),
        )
        .await;
        assert!(matches!(served, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_serve_stops_on_later_request() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = watch::channel(false);

        let server = tokio::spawn(serve_on(listener, Router::new(), rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send_replace(true);

        let served = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(matches!(served, Ok(Ok(Ok(())))));
    }
}
