use crate::auth::auth::ActiveSession;
use crate::model::session::SessionInfo;
use crate::model::student::{ParentInfo, StudentRecord};
use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub student: StudentRecord,
    pub parent: Option<ParentInfo>,
    #[schema(example = "9876543210")]
    pub phone_number: String,
    pub session: SessionInfo,
}

/// Student and parent details captured at login
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the logged-in student", body = ProfileResponse),
        (status = 401, description = "Session expired or missing")
    ),
    tag = "Dashboard"
)]
pub async fn get_profile(session: ActiveSession) -> impl Responder {
    let ActiveSession(session) = session;
    let info = SessionInfo::from(&session);

    HttpResponse::Ok().json(ProfileResponse {
        parent: session.parent().cloned(),
        student: session.student_data,
        phone_number: session.phone_number,
        session: info,
    })
}
