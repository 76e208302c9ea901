use crate::api::remote_failure;
use crate::auth::auth::ActiveSession;
use crate::filter::{self, RecordFilter};
use crate::gateway::PortalApi;
use crate::model::attendance::AttendanceRecord;
use crate::models::AttendanceQuery;
use crate::transform::{self, AttendanceStanding, AttendanceSummary};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecord>,
    /// Counts over `records` after filtering
    pub summary: AttendanceSummary,
    pub standing: AttendanceStanding,
    #[schema(example = "Good attendance record.")]
    pub message: String,
}

/// Daily attendance of the logged-in student
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Filtered attendance with summary", body = AttendanceListResponse),
        (status = 400, description = "Invalid date or no roll number"),
        (status = 401, description = "Session expired or missing"),
        (status = 502, description = "Failed to load attendance data")
    ),
    tag = "Dashboard"
)]
pub async fn list_attendance(
    session: ActiveSession,
    api: web::Data<dyn PortalApi>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let range = query.date_range().to_filter()?;
    let roll_number = session.require_roll_number()?;

    let response = api
        .fetch_attendance(session.token(), &roll_number)
        .await
        .map_err(|e| remote_failure(e, "Failed to load attendance data"))?;

    let filter = RecordFilter::by_date(range).status(query.status.clone());
    let records = filter::apply(&response.data, &filter);

    let summary = transform::derive_attendance_summary(&records);
    let standing = AttendanceStanding::for_percentage(summary.percentage);

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        records,
        summary,
        standing,
        message: standing.message().to_string(),
    }))
}
