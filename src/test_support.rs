//! In-process portal and app wiring for handler tests.

use crate::auth::login_flow::LoginFlow;
use crate::auth::session::SessionStore;
use crate::auth::session::tests::{ManualClock, sample_student};
use crate::config::Config;
use crate::gateway::{
    AttendanceResponse, FeesResponse, PortalApi, RemoteError, Result, SendOtpResponse,
    VerifyOtpResponse,
};
use crate::model::test_score::ApiTestScore;
use crate::routes;
use crate::utils::kv_store::MemoryKvStore;
use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web::Data,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};

pub(crate) const VALID_OTP: &str = "123456";
pub(crate) const VALID_TOKEN: &str = "tok-1";

/// Canned portal. Accepts [`VALID_OTP`] and [`VALID_TOKEN`] only; when
/// `down` every call fails with a 500.
pub(crate) struct FakePortal {
    down: bool,
}

impl FakePortal {
    fn check(&self, token: &str) -> Result<()> {
        if self.down {
            return Err(RemoteError::Status {
                status: 500,
                body: "upstream down".into(),
            });
        }
        if token != VALID_TOKEN {
            return Err(RemoteError::Status {
                status: 401,
                body: "invalid token".into(),
            });
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn send_otp(&self, _phone_number: &str) -> Result<SendOtpResponse> {
        self.check(VALID_TOKEN)?;
        Ok(SendOtpResponse {
            success: true,
            message: "OTP sent successfully".into(),
            job_id: Some("job-7".into()),
            message_id: None,
        })
    }

    async fn verify_otp(&self, _phone_number: &str, code: &str) -> Result<VerifyOtpResponse> {
        self.check(VALID_TOKEN)?;
        if code != VALID_OTP {
            return Err(RemoteError::Status {
                status: 400,
                body: "Invalid OTP".into(),
            });
        }
        Ok(VerifyOtpResponse {
            message: "Verified".into(),
            data: vec![sample_student()],
            token: VALID_TOKEN.into(),
        })
    }

    async fn fetch_test_scores(&self, token: &str, _roll_number: &str) -> Result<Vec<ApiTestScore>> {
        self.check(token)?;
        decode(json!([
            {
                "_id": "t4",
                "name": "Weekly Test 4",
                "date": "2024-01-01",
                "rank": 3,
                "batch": "n/a",
                "subjects": [
                    {"name": "mathematics", "marks": 72},
                    {"name": "physics", "marks": 90}
                ]
            },
            {
                "_id": "t5",
                "name": "Weekly Test 5",
                "date": "2024-02-10",
                "rank": 2,
                "subjects": [{"name": "physics", "marks": 162}]
            }
        ]))
    }

    async fn fetch_attendance(&self, token: &str, _roll_number: &str) -> Result<AttendanceResponse> {
        self.check(token)?;
        decode(json!({
            "status": true,
            "data": [
                {"date": "2024-09-01", "presentStatus": "P", "inTime": "08:55"},
                {"date": "2024-09-02", "presentStatus": "A"},
                {"date": "2024-09-03", "presentStatus": "P", "inTime": "09:10", "lateArrival": "10m"},
                {"date": "2024-09-04", "presentStatus": "p", "inTime": "08:50"}
            ]
        }))
    }

    async fn fetch_fees(&self, token: &str, _roll_number: &str) -> Result<FeesResponse> {
        self.check(token)?;
        decode(json!({
            "studentName": "",
            "fees": [{
                "totalFees": 50000,
                "finalFees": 45000,
                "paidAmount": 25000,
                "pendingAmount": 20000,
                "discount": 5000,
                "status": "PARTIAL",
                "dueDate": "2024-12-31",
                "submissions": [
                    {"_id": "r1", "amount": 15000, "mode": "UPI", "dateOfReceipt": "2024-07-15"},
                    {"_id": "r2", "amount": 10000, "mode": "Cash", "dateOfReceipt": "2024-10-05"}
                ]
            }]
        }))
    }
}

/// Shared handles of one test app.
pub(crate) struct TestState {
    pub store: Data<SessionStore>,
    pub api: Arc<FakePortal>,
    pub flow: Data<Mutex<LoginFlow>>,
    pub clock: ManualClock,
    pub config: Config,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_portal(FakePortal { down: false })
    }

    pub fn failing() -> Self {
        Self::with_portal(FakePortal { down: true })
    }

    fn with_portal(portal: FakePortal) -> Self {
        let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap());
        let store = SessionStore::with_clock(Box::new(MemoryKvStore::new()), Box::new(clock.clone()));
        Self {
            store: Data::new(store),
            api: Arc::new(portal),
            flow: Data::new(Mutex::new(LoginFlow::default())),
            clock,
            config: Config {
                rate_otp_per_min: 0,
                ..Config::default()
            },
        }
    }

    pub fn login(&self) {
        self.login_with_token(VALID_TOKEN);
    }

    pub fn login_with_token(&self, token: &str) {
        self.store.save_session("9876543210", token, sample_student());
    }
}

pub(crate) fn portal_app(
    state: &TestState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    let config = state.config.clone();
    let api: Arc<dyn PortalApi> = state.api.clone();

    App::new()
        .app_data(state.store.clone())
        .app_data(Data::from(api))
        .app_data(state.flow.clone())
        .configure(move |cfg| routes::configure(cfg, config))
}
