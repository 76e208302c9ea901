use crate::model::session::{Session, SessionInfo};
use crate::model::student::{ParentInfo, StudentRecord};
use crate::utils::kv_store::KvStore;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

/// Storage key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "parent_portal_session";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Holds the one active login of this device.
///
/// Expiry is only noticed when the session is read: the first read after
/// `expires_at` deletes the record and reports no session. There is no
/// background timer.
pub struct SessionStore {
    kv: Box<dyn KvStore>,
    clock: Box<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self::with_clock(kv, Box::new(SystemClock))
    }

    pub fn with_clock(kv: Box<dyn KvStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Persists a fresh session, replacing any previous one. Failures are
    /// logged, never returned.
    pub fn save_session(&self, phone_number: &str, token: &str, student: StudentRecord) {
        let issued_at = self.clock.now();
        let session = Session {
            token: token.to_string(),
            student_data: student,
            phone_number: phone_number.to_string(),
            issued_at,
            expires_at: issued_at + self.ttl,
        };

        let encoded = match serde_json::to_string(&session) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to encode session");
                return;
            }
        };

        match self.kv.set(SESSION_STORAGE_KEY, &encoded) {
            Ok(()) => info!(
                phone = %session.phone_number,
                expires_at = %session.expires_at,
                "Session saved"
            ),
            Err(e) => error!(error = %e, "Failed to persist session"),
        }
    }

    pub fn get_session(&self) -> Option<Session> {
        let raw = match self.kv.get(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No session stored");
                return None;
            }
            Err(e) => {
                error!(error = %e, "Failed to read session");
                return None;
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable");
                return None;
            }
        };

        if session.is_expired_at(self.clock.now()) {
            info!(expires_at = %session.expires_at, "Session expired, clearing");
            self.clear_session();
            return None;
        }

        Some(session)
    }

    pub fn get_token(&self) -> Option<String> {
        self.get_session().map(|s| s.token)
    }

    pub fn get_student(&self) -> Option<StudentRecord> {
        self.get_session().map(|s| s.student_data)
    }

    pub fn get_phone_number(&self) -> Option<String> {
        self.get_session().map(|s| s.phone_number)
    }

    pub fn get_parent_info(&self) -> Option<ParentInfo> {
        self.get_session().and_then(|s| s.student_data.parent)
    }

    pub fn is_logged_in(&self) -> bool {
        self.get_session().is_some()
    }

    /// Logout. Safe to call with nothing stored.
    pub fn clear_session(&self) {
        match self.kv.remove(SESSION_STORAGE_KEY) {
            Ok(()) => debug!("Session cleared"),
            Err(e) => error!(error = %e, "Failed to clear session"),
        }
    }

    pub fn session_info(&self) -> SessionInfo {
        self.get_session()
            .as_ref()
            .map(SessionInfo::from)
            .unwrap_or_else(SessionInfo::logged_out)
    }
}
