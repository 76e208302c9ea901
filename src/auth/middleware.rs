use crate::auth::auth::ActiveSession;
use crate::auth::session::SessionStore;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Rejects requests without a live session. An expired session is cleared
/// by the read itself, so the client is simply sent back to login.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let store = req
        .app_data::<Data<SessionStore>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Session store missing"))?;

    let session = match store.get_session() {
        Some(session) => session,
        None => {
            tracing::debug!(path = %req.path(), "No live session");
            let resp = HttpResponse::Unauthorized().json(json!({
                "error": "Session expired or missing",
                "redirect": "/login"
            }));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(ActiveSession(session));

    next.call(req).await
}
