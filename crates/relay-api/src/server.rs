//! Router assembly and the listening loop.
//!
//! Every request passes through two layers before reaching its handler:
//! the request id layer, which tags the response with `X-Request-Id`, and
//! the tower-http trace layer, which logs the request and its outcome.
//!
//! There is no inbound timeout. A request lasts as long as its single
//! publish round trip.
//!
//! On SIGTERM or CTRL+C the listener closes and in-flight requests are
//! allowed to finish.

use std::net::SocketAddr;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::{handlers, AppState};

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-scoped id, available to handlers as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Builds the relay router over `state`.
///
/// # Example
///
/// ```no_run
/// use relay_api::{create_router, AppState, RelayConfig};
///
/// let state = AppState::new(RelayConfig::load()?)?;
/// let app = create_router(state);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/debug", get(handlers::debug_info))
        .route("/saweria-webhook", post(handlers::saweria_webhook))
        .route("/socialbuzz-webhook", post(handlers::socialbuzz_webhook))
        .route("/test", post(handlers::test_publish))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(tag_request_id))
        .with_state(state)
}

async fn tag_request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&id);
    req.extensions_mut().insert(RequestId(id));

    let mut response = next.run(req).await;
    if let Ok(header) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    response
}

/// Binds `addr` and serves the relay until a shutdown signal arrives.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound or serving
/// fails.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;

    info!(addr = %bound, "Donation relay listening");
    for path in ["/saweria-webhook", "/socialbuzz-webhook", "/test", "/debug"] {
        info!("  http://{bound}{path}");
    }

    axum::serve(listener, create_router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Donation relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "CTRL+C",
        () = terminate => "SIGTERM",
    };

    info!(signal, "Shutting down, draining in-flight requests");
}
