use crate::model::student::{ParentInfo, StudentRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The single persisted login of this device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub student_data: StudentRecord,
    pub phone_number: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Expired strictly after `expires_at`; the boundary instant is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn parent(&self) -> Option<&ParentInfo> {
        self.student_data.parent.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "isLoggedIn": true,
    "expiresAt": "2026-01-02T09:30:00Z",
    "studentName": "Aarav Kumar"
}))]
pub struct SessionInfo {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

impl SessionInfo {
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            expires_at: None,
            student_name: None,
        }
    }
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            is_logged_in: true,
            expires_at: Some(session.expires_at),
            student_name: Some(session.student_data.name.clone()),
        }
    }
}
