use crate::api::attendance::AttendanceListResponse;
use crate::api::fee::FeeResponse;
use crate::api::profile::ProfileResponse;
use crate::api::test_score::TestScoreListResponse;
use crate::model::attendance::AttendanceRecord;
use crate::model::fee::FeeSubmission;
use crate::model::session::SessionInfo;
use crate::model::student::{ImageRef, ParentInfo, StudentRecord};
use crate::model::test_score::TestScoreEntry;
use crate::models::{
    AttendanceQuery, DateRangeQuery, SendOtpReqDto, TestScoreQuery, VerifyOtpReqDto,
};
use crate::transform::{
    AttendanceStanding, AttendanceSummary, FeeSummary, Grade, TestOverview, TestScoreStats,
    TestSitting,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parent Portal API",
        version = "0.1.0",
        description = r#"
## Parent Portal

Local shell in front of the school portal API. A parent logs in with a
phone number and a one-time code; the session then unlocks the dashboard
of the first student linked to that number.

### Login
- `POST /auth/send-otp` with the phone number (10 digits after cleanup)
- `POST /auth/verify-otp` with the 6 digit code
- `POST /auth/back` returns to phone entry, `POST /auth/logout` ends the session

### Dashboard
- Profile, test scores, attendance and fees of the logged-in student
- Every list takes inclusive `start_date` / `end_date` bounds (`YYYY-MM-DD`)
- Aggregates are computed over the filtered rows only

### Session
One session per device, valid for 24 hours from login. An expired or
rejected session answers `401` and must log in again.
"#,
    ),
    paths(
        crate::auth::handlers::send_otp,
        crate::auth::handlers::verify_otp,
        crate::auth::handlers::back,
        crate::auth::handlers::logout,
        crate::auth::handlers::session,

        crate::api::profile::get_profile,
        crate::api::test_score::list_test_scores,
        crate::api::attendance::list_attendance,
        crate::api::fee::get_fees
    ),
    components(
        schemas(
            SendOtpReqDto,
            VerifyOtpReqDto,
            DateRangeQuery,
            TestScoreQuery,
            AttendanceQuery,
            SessionInfo,
            StudentRecord,
            ParentInfo,
            ImageRef,
            ProfileResponse,
            TestScoreEntry,
            TestScoreStats,
            Grade,
            TestSitting,
            TestOverview,
            TestScoreListResponse,
            AttendanceRecord,
            AttendanceSummary,
            AttendanceStanding,
            AttendanceListResponse,
            FeeSubmission,
            FeeSummary,
            FeeResponse
        )
    ),
    tags(
        (name = "Auth", description = "Phone and OTP login"),
        (name = "Dashboard", description = "Student data of the logged-in parent"),
    )
)]
pub struct ApiDoc;
