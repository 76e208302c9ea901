pub mod attendance;
pub mod fee;
pub mod profile;
pub mod test_score;

use crate::gateway::RemoteError;
use actix_web::error::ErrorBadGateway;

/// Any failed portal call becomes a 502 with a fixed message. The session
/// is left as it is; only local expiry logs a parent out.
pub(crate) fn remote_failure(e: RemoteError, message: &'static str) -> actix_web::Error {
    match &e {
        RemoteError::Status { status, .. } => {
            tracing::warn!(status = *status, error = %e, "{message}")
        }
        _ => tracing::error!(error = %e, "{message}"),
    }
    ErrorBadGateway(message)
}
