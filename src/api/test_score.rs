use crate::api::remote_failure;
use crate::auth::auth::ActiveSession;
use crate::filter::{self, RecordFilter};
use crate::gateway::PortalApi;
use crate::model::test_score::TestScoreEntry;
use crate::models::TestScoreQuery;
use crate::transform::{self, TestOverview, TestScoreStats};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestScoreListResponse {
    /// Entries passing the filter, newest test first
    pub entries: Vec<TestScoreEntry>,
    /// Computed over `entries` only
    pub stats: TestScoreStats,
    /// Every subject seen, filtered or not
    pub subjects: Vec<String>,
    pub overview: TestOverview,
}

/// Test scores of the logged-in student, one row per test and subject
#[utoipa::path(
    get,
    path = "/api/test-scores",
    params(TestScoreQuery),
    responses(
        (status = 200, description = "Filtered test scores", body = TestScoreListResponse),
        (status = 400, description = "Invalid date or no roll number"),
        (status = 401, description = "Session expired or missing"),
        (status = 502, description = "Failed to load test scores")
    ),
    tag = "Dashboard"
)]
#[instrument(name = "list_test_scores", skip_all)]
pub async fn list_test_scores(
    session: ActiveSession,
    api: web::Data<dyn PortalApi>,
    query: web::Query<TestScoreQuery>,
) -> actix_web::Result<impl Responder> {
    let range = query.date_range().to_filter()?;
    let roll_number = session.require_roll_number()?;

    let records = api
        .fetch_test_scores(session.token(), &roll_number)
        .await
        .map_err(|e| remote_failure(e, "Failed to load test scores"))?;

    let all = transform::transform_test_scores(&records);
    let filter = RecordFilter::by_date(range).subject(query.subject.clone());
    let entries = filter::filter_test_scores(&all, &filter);

    tracing::debug!(
        roll_number = %roll_number,
        total = all.len(),
        shown = entries.len(),
        "Test scores loaded"
    );

    Ok(HttpResponse::Ok().json(TestScoreListResponse {
        stats: TestScoreStats::from_entries(&entries),
        subjects: transform::distinct_subjects(&all),
        overview: transform::summarize_tests(&records),
        entries,
    }))
}
