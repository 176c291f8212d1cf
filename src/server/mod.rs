use crate::access_log::{format_line, ACCESS_LOG_TARGET};
use crate::config::Config;
use anyhow::{Context, Result};
use asciimation_movie::Movie;
use axum::{
    extract::{ConnectInfo, Request},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{services::ServeFile, trace::TraceLayer};

pub mod routes_sse;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// The movie, loaded once before the listener binds
    pub movie: Arc<Movie>,
    pub config: Arc<Config>,
    /// Cancelled when the server starts shutting down
    pub shutdown: CancellationToken,
}

impl AppContext {
    pub fn new(config: Config, movie: Movie) -> Self {
        Self {
            movie: Arc::new(movie),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Create the Axum router with all routes
///
/// The index page answers `/` and every path without a route of its own.
pub fn create_router(ctx: AppContext) -> Router {
    let index = ServeFile::new(&ctx.config.server.index);

    Router::new()
        .merge(routes_sse::sse_routes())
        .fallback_service(index)
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Log one line per plain request. Event streams log themselves when they end.
async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = next.run(request).await;

    if !is_event_stream(&response) {
        let line = format_line(
            response.status().as_u16(),
            method.as_str(),
            &path,
            remote,
            started.elapsed(),
            false,
        );
        tracing::info!(target: ACCESS_LOG_TARGET, "{}", line);
    }

    response
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/event-stream"))
}

/// Start the HTTP server
pub async fn start_server(config: Config, movie: Movie) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting server on {}", addr);

    serve(listener, AppContext::new(config, movie), shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Serve `ctx` on an already bound listener until `signal` resolves.
///
/// Running replays are interrupted once the signal fires, so graceful
/// shutdown does not wait for every movie to end.
pub async fn serve<F>(listener: TcpListener, ctx: AppContext, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = ctx.shutdown.clone();
    let app = create_router(ctx);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        signal.await;
        shutdown.cancel();
    })
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, StatusCode};

    #[test]
    fn test_is_event_stream() {
        let sse = http::Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(Body::empty())
            .unwrap();
        assert!(is_event_stream(&sse));

        let html = http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html")
            .body(Body::empty())
            .unwrap();
        assert!(!is_event_stream(&html));

        let bare = Response::new(Body::empty());
        assert!(!is_event_stream(&bare));
    }

    #[test]
    fn test_router_creation() {
        let ctx = AppContext::new(Config::default(), Movie::default());
        let _router: Router = create_router(ctx);
    }
}
