//! Client for the remote portal API.
//!
//! Every call is a single request: no retries, no backoff and no client-side
//! timeout. Failures surface as [`RemoteError`] to the immediate caller.

use crate::model::attendance::AttendanceRecord;
use crate::model::fee::FeeRecord;
use crate::model::nullable;
use crate::model::student::StudentRecord;
use crate::model::test_score::ApiTestScore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal answered with a non-success status.
    #[error("portal API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOtpResponse {
    #[serde(deserialize_with = "nullable")]
    pub success: bool,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOtpResponse {
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub data: Vec<StudentRecord>,
    #[serde(deserialize_with = "nullable")]
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceResponse {
    #[serde(deserialize_with = "nullable")]
    pub data: Vec<AttendanceRecord>,
    pub status: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeesResponse {
    #[serde(deserialize_with = "nullable")]
    pub fees: Vec<FeeRecord>,
    pub student_name: Option<String>,
}

/// The search endpoint has answered both with a bare list and with a
/// `{ "data": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum TestScoresBody {
    List(Vec<ApiTestScore>),
    Envelope {
        #[serde(default)]
        data: Vec<ApiTestScore>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpRequest<'a> {
    mobile_number: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpRequest<'a> {
    mobile_number: &'a str,
    code: &'a str,
}

/// Operations the portal shell needs from the remote API.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn send_otp(&self, phone_number: &str) -> Result<SendOtpResponse>;

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<VerifyOtpResponse>;

    async fn fetch_test_scores(&self, token: &str, roll_number: &str) -> Result<Vec<ApiTestScore>>;

    async fn fetch_attendance(&self, token: &str, roll_number: &str) -> Result<AttendanceResponse>;

    async fn fetch_fees(&self, token: &str, roll_number: &str) -> Result<FeesResponse>;
}

#[derive(Clone)]
pub struct ApiGateway {
    base_url: String,
    client: Client,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PortalApi for ApiGateway {
    #[instrument(name = "portal_send_otp", skip(self))]
    async fn send_otp(&self, phone_number: &str) -> Result<SendOtpResponse> {
        debug!("Requesting OTP");
        let request = self
            .client
            .post(self.url("/auth/parent-login"))
            .json(&SendOtpRequest {
                mobile_number: phone_number,
            });
        Self::execute(request).await.inspect_err(|e| {
            error!(error = %e, "Error sending OTP");
        })
    }

    #[instrument(name = "portal_verify_otp", skip(self, code))]
    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<VerifyOtpResponse> {
        debug!("Verifying OTP");
        let request = self
            .client
            .post(self.url("/auth/verify-login-otp"))
            .json(&VerifyOtpRequest {
                mobile_number: phone_number,
                code,
            });
        Self::execute(request).await.inspect_err(|e| {
            error!(error = %e, "Error verifying OTP");
        })
    }

    #[instrument(name = "portal_test_scores", skip(self, token))]
    async fn fetch_test_scores(&self, token: &str, roll_number: &str) -> Result<Vec<ApiTestScore>> {
        let request = self
            .client
            .get(self.url("/test-score/search-test-scores"))
            .query(&[("query", roll_number)])
            .bearer_auth(token);
        let body: TestScoresBody = Self::execute(request).await.inspect_err(|e| {
            error!(error = %e, "Error fetching test scores");
        })?;

        Ok(match body {
            TestScoresBody::List(records) => records,
            TestScoresBody::Envelope { data } => data,
        })
    }

    #[instrument(name = "portal_attendance", skip(self, token))]
    async fn fetch_attendance(&self, token: &str, roll_number: &str) -> Result<AttendanceResponse> {
        let request = self
            .client
            .get(self.url(&format!(
                "/student/get-attendence-by-rollnumber/{}",
                roll_number
            )))
            .bearer_auth(token);
        Self::execute(request).await.inspect_err(|e| {
            error!(error = %e, "Error fetching attendance");
        })
    }

    #[instrument(name = "portal_fees", skip(self, token))]
    async fn fetch_fees(&self, token: &str, roll_number: &str) -> Result<FeesResponse> {
        let request = self
            .client
            .get(self.url(&format!("/fee/get-by-roll-number/{}", roll_number)))
            .bearer_auth(token);
        Self::execute(request).await.inspect_err(|e| {
            error!(error = %e, "Error fetching fees");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::json;

    /// Serves canned portal responses on an ephemeral local port.
    async fn fake_portal() -> ApiGateway {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/api/auth/parent-login",
                    web::post().to(|body: web::Json<serde_json::Value>| async move {
                        if body["mobileNumber"] == "9876543210" {
                            HttpResponse::Ok().json(json!({
                                "success": true,
                                "message": "OTP sent",
                                "jobId": "job-7"
                            }))
                        } else {
                            HttpResponse::NotFound().json(json!({"message": "Parent not found"}))
                        }
                    }),
                )
                .route(
                    "/api/auth/verify-login-otp",
                    web::post().to(|body: web::Json<serde_json::Value>| async move {
                        assert_eq!(body["code"], "123456");
                        HttpResponse::Ok().json(json!({
                            "message": "Verified",
                            "token": "tok-1",
                            "data": [{"_id": "s1", "name": "Aarav", "rollNo": 1042}]
                        }))
                    }),
                )
                .route(
                    "/api/test-score/search-test-scores",
                    web::get().to(|req: HttpRequest| async move {
                        let auth = req
                            .headers()
                            .get("Authorization")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        if auth != "Bearer tok-1" {
                            return HttpResponse::Unauthorized().finish();
                        }
                        if req.query_string() == "query=1042" {
                            HttpResponse::Ok().json(json!([{
                                "name": "Weekly Test",
                                "date": "2024-01-01",
                                "subjects": [{"name": "physics", "marks": 90}]
                            }]))
                        } else {
                            HttpResponse::Ok().json(json!({"data": []}))
                        }
                    }),
                )
                .route(
                    "/api/student/get-attendence-by-rollnumber/{roll}",
                    web::get().to(|path: web::Path<String>| async move {
                        HttpResponse::Ok().json(json!({
                            "status": true,
                            "data": [{"date": "2024-09-02", "presentStatus": "P", "rollNo": path.into_inner()}]
                        }))
                    }),
                )
                .route(
                    "/api/fee/get-by-roll-number/{roll}",
                    web::get().to(|| async { HttpResponse::Ok().body("<html>oops</html>") }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        ApiGateway::new(format!("http://{}/api/", addr))
    }

    #[actix_web::test]
    async fn send_otp_posts_mobile_number() {
        let gateway = fake_portal().await;

        let accepted = gateway.send_otp("9876543210").await.unwrap();
        assert!(accepted.success);
        assert_eq!(accepted.job_id.as_deref(), Some("job-7"));

        let err = gateway.send_otp("9000000000").await.unwrap_err();
        match err {
            RemoteError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Parent not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    async fn verify_otp_returns_students_and_token() {
        let gateway = fake_portal().await;
        let verified = gateway.verify_otp("9876543210", "123456").await.unwrap();
        assert_eq!(verified.token, "tok-1");
        assert_eq!(verified.data.len(), 1);
        assert_eq!(verified.data[0].roll_number().as_deref(), Some("1042"));
    }

    #[test]
    fn login_bodies_tolerate_null_fields() {
        let verified: VerifyOtpResponse = serde_json::from_value(json!({
            "message": null,
            "token": "tok-1",
            "data": [{"_id": "s1", "name": "Aarav", "rollNo": 1042, "email": null}]
        }))
        .unwrap();
        assert_eq!(verified.token, "tok-1");
        assert_eq!(verified.message, "");
        assert_eq!(verified.data[0].email, "");

        let sent: SendOtpResponse =
            serde_json::from_value(json!({"success": true, "message": null})).unwrap();
        assert!(sent.success);
        assert_eq!(sent.message, "");

        let empty: VerifyOtpResponse =
            serde_json::from_value(json!({"token": null, "data": null})).unwrap();
        assert!(empty.token.is_empty());
        assert!(empty.data.is_empty());
    }

    #[actix_web::test]
    async fn test_scores_accept_list_and_envelope() {
        let gateway = fake_portal().await;

        let scores = gateway.fetch_test_scores("tok-1", "1042").await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].subjects[0].marks, 90.0);

        let none = gateway.fetch_test_scores("tok-1", "1").await.unwrap();
        assert!(none.is_empty());

        let err = gateway.fetch_test_scores("stale", "1042").await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 401, .. }));
    }

    #[actix_web::test]
    async fn attendance_uses_roll_number_path() {
        let gateway = fake_portal().await;
        let attendance = gateway.fetch_attendance("tok-1", "1042").await.unwrap();
        assert_eq!(attendance.data.len(), 1);
        assert!(attendance.data[0].is_present());
    }

    #[actix_web::test]
    async fn undecodable_body_is_a_decode_error() {
        let gateway = fake_portal().await;
        let err = gateway.fetch_fees("tok-1", "1042").await.unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[actix_web::test]
    async fn unreachable_portal_is_a_transport_error() {
        let gateway = ApiGateway::new("http://127.0.0.1:9/api");
        let err = gateway.send_otp("9876543210").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
