//! Request middleware
//!
//! - `log_requests`: method, path, status and elapsed time once per
//!   request. The line is emitted from a drop guard so requests abandoned
//!   by the client or cut off at shutdown are recorded too.
//! - `cut_off_when_forced`: drops the handler once the shutdown grace
//!   period has run out.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::watch;

struct RequestLog {
    method: Method,
    path: String,
    started: Instant,
    status: Option<u16>,
}

impl Drop for RequestLog {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        match self.status {
            Some(status) => tracing::info!(
                method = %self.method,
                path = %self.path,
                status,
                elapsed_ms,
                "request"
            ),
            None => tracing::info!(
                method = %self.method,
                path = %self.path,
                elapsed_ms,
                "request aborted"
            ),
        }
    }
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let mut log = RequestLog {
        method: request.method().clone(),
        path: request.uri().path().to_owned(),
        started: Instant::now(),
        status: None,
    };

    let response = next.run(request).await;
    log.status = Some(response.status().as_u16());
    response
}

/// Race the request against the shutdown cut-off.
///
/// Once `forced` turns true the handler future is dropped, along with any
/// store call it was awaiting, and the client gets a 503.
pub async fn cut_off_when_forced(
    State(mut forced): State<watch::Receiver<bool>>,
    request: Request,
    next: Next,
) -> Response {
    tokio::select! {
        response = next.run(request) => response,
        _ = wait_until_forced(&mut forced) => {
            (StatusCode::SERVICE_UNAVAILABLE, "server shutting down").into_response()
        }
    }
}

async fn wait_until_forced(forced: &mut watch::Receiver<bool>) {
    let sender_gone = forced.wait_for(|cut| *cut).await.is_err();
    if sender_gone {
        // Server already returned; nothing will ever force this request
        std::future::pending::<()>().await;
    }
}
