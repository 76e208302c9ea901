use crate::{
    auth::{
        login_flow::{LoginFlow, LoginFlowError},
        session::SessionStore,
    },
    gateway::{PortalApi, RemoteError},
    models::{SendOtpReqDto, VerifyOtpReqDto},
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument};
// login flow end points

fn lock(flow: &Mutex<LoginFlow>) -> MutexGuard<'_, LoginFlow> {
    flow.lock().unwrap_or_else(|e| e.into_inner())
}

fn flow_error(e: LoginFlowError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "message": e.to_string() }))
}

/// Request an OTP for a parent's phone number
#[utoipa::path(
    post,
    path = "/auth/send-otp",
    request_body(
        content = SendOtpReqDto,
        description = "Parent phone number, any formatting",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "OTP sent", body = Object, example = json!({
            "message": "OTP sent successfully",
            "jobId": "job-7",
            "step": {"step": "awaitingOtp", "phoneNumber": "9876543210"}
        })),
        (status = 400, description = "Phone number is not 10 digits or was refused"),
        (status = 429, description = "Too many OTP requests"),
        (status = 502, description = "Portal API unavailable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_send_otp", skip(payload, api, flow))]
pub async fn send_otp(
    payload: web::Json<SendOtpReqDto>,
    api: web::Data<dyn PortalApi>,
    flow: web::Data<Mutex<LoginFlow>>,
) -> impl Responder {
    let phone = match lock(&flow).submit_phone(&payload.mobile_number) {
        Ok(p) => p,
        Err(e) => {
            info!(error = %e, "Validation failed: phone number");
            return flow_error(e);
        }
    };

    debug!(phone = %phone, "Requesting OTP from portal");

    let sent = match api.send_otp(&phone).await {
        Ok(sent) => sent,
        Err(e) => {
            error!(error = %e, "Failed to send OTP");
            return HttpResponse::BadGateway().json(json!({ "message": "Failed to send OTP" }));
        }
    };

    if !sent.success {
        info!(message = %sent.message, "Portal refused OTP request");
        return HttpResponse::BadRequest().json(json!({ "message": sent.message }));
    }

    let mut flow = lock(&flow);
    flow.otp_sent(phone);

    HttpResponse::Ok().json(json!({
        "message": sent.message,
        "jobId": sent.job_id,
        "step": flow.step()
    }))
}

/// Verify the OTP and start a session for the first linked student
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    request_body(
        content = VerifyOtpReqDto,
        description = "Six digit OTP",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Verified, session started", body = Object, example = json!({
            "message": "Login successful",
            "session": {"isLoggedIn": true, "expiresAt": "2026-01-02T09:30:00Z", "studentName": "Aarav Kumar"}
        })),
        (status = 400, description = "Malformed OTP or no OTP requested"),
        (status = 401, description = "OTP rejected by the portal"),
        (status = 404, description = "No student linked to this phone number"),
        (status = 502, description = "Portal API unavailable")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_verify_otp", skip(payload, api, flow, store))]
pub async fn verify_otp(
    payload: web::Json<VerifyOtpReqDto>,
    api: web::Data<dyn PortalApi>,
    flow: web::Data<Mutex<LoginFlow>>,
    store: web::Data<SessionStore>,
) -> impl Responder {
    let code = payload.code.trim();
    let phone = match lock(&flow).submit_otp(code) {
        Ok(p) => p,
        Err(e) => {
            info!(error = %e, "Validation failed: OTP");
            return flow_error(e);
        }
    };

    let verified = match api.verify_otp(&phone, code).await {
        Ok(v) => v,
        Err(RemoteError::Status { status, .. }) if (400..500).contains(&status) => {
            info!(status, "Portal rejected OTP");
            return HttpResponse::Unauthorized().json(json!({ "message": "Invalid or expired OTP" }));
        }
        Err(e) => {
            error!(error = %e, "Failed to verify OTP");
            return HttpResponse::BadGateway().json(json!({ "message": "Failed to verify OTP" }));
        }
    };

    if verified.token.trim().is_empty() {
        error!("Portal verification response carried no token");
        return HttpResponse::BadGateway().json(json!({ "message": "Failed to verify OTP" }));
    }

    // Only one child per session: the first linked student
    let student = match verified.data.into_iter().next() {
        Some(s) => s,
        None => {
            info!("No student linked to phone number");
            return HttpResponse::NotFound()
                .json(json!({ "message": "No student linked to this phone number" }));
        }
    };

    store.save_session(&phone, &verified.token, student);

    {
        let mut flow = lock(&flow);
        if let Err(e) = flow.verified() {
            // another request restarted the flow while we awaited the portal
            debug!(error = %e, "Login flow moved on during verification");
        }
        flow.reset();
    }

    info!("Login successful");

    HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "session": store.session_info()
    }))
}

/// Go back from the OTP step to phone entry
#[utoipa::path(
    post,
    path = "/auth/back",
    responses(
        (status = 200, description = "Current login step", body = Object, example = json!({
            "step": {"step": "awaitingPhone"}
        }))
    ),
    tag = "Auth"
)]
pub async fn back(flow: web::Data<Mutex<LoginFlow>>) -> impl Responder {
    let mut flow = lock(&flow);
    flow.back();
    HttpResponse::Ok().json(json!({ "step": flow.step() }))
}

/// Clear the session (idempotent)
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    tag = "Auth"
)]
pub async fn logout(
    store: web::Data<SessionStore>,
    flow: web::Data<Mutex<LoginFlow>>,
) -> impl Responder {
    store.clear_session();
    lock(&flow).reset();
    HttpResponse::NoContent().finish()
}

/// Whether a live session exists, and the login step otherwise
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session state", body = Object, example = json!({
            "session": {"isLoggedIn": false},
            "step": {"step": "awaitingPhone"}
        }))
    ),
    tag = "Auth"
)]
pub async fn session(
    store: web::Data<SessionStore>,
    flow: web::Data<Mutex<LoginFlow>>,
) -> impl Responder {
    let info = store.session_info();
    let flow = lock(&flow);
    HttpResponse::Ok().json(json!({ "session": info, "step": flow.step() }))
}
