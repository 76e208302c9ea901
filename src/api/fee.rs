use crate::api::remote_failure;
use crate::auth::auth::ActiveSession;
use crate::filter;
use crate::gateway::PortalApi;
use crate::model::fee::FeeSubmission;
use crate::models::DateRangeQuery;
use crate::transform::{self, FeeSummary};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeResponse {
    #[schema(example = "Aarav Kumar")]
    pub student_name: Option<String>,
    /// `null` when the portal has no fee record for the student
    pub summary: Option<FeeSummary>,
    /// Receipts in range, newest first
    pub submissions: Vec<FeeSubmission>,
    /// Sum of `submissions[].amount`
    pub submitted_total: f64,
}

/// Fee position and payment history of the logged-in student
#[utoipa::path(
    get,
    path = "/api/fees",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Fee summary and filtered submissions", body = FeeResponse),
        (status = 400, description = "Invalid date or no roll number"),
        (status = 401, description = "Session expired or missing"),
        (status = 502, description = "Failed to load fees data")
    ),
    tag = "Dashboard"
)]
pub async fn get_fees(
    session: ActiveSession,
    api: web::Data<dyn PortalApi>,
    query: web::Query<DateRangeQuery>,
) -> actix_web::Result<impl Responder> {
    let range = query.to_filter()?;
    let roll_number = session.require_roll_number()?;

    let response = api
        .fetch_fees(session.token(), &roll_number)
        .await
        .map_err(|e| remote_failure(e, "Failed to load fees data"))?;

    let (summary, submissions) = match transform::primary_fee(&response.fees) {
        Some(fee) => (
            Some(FeeSummary::from(fee)),
            filter::filter_submissions(&fee.submissions, range),
        ),
        None => (None, Vec::new()),
    };

    let submitted_total = submissions.iter().map(|s| s.amount).sum();

    Ok(HttpResponse::Ok().json(FeeResponse {
        student_name: response
            .student_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(session.0.student_data.name.clone())),
        summary,
        submissions,
        submitted_total,
    }))
}
