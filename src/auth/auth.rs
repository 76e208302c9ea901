use crate::auth::session::SessionStore;
use crate::model::session::Session;
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};

/// The logged-in session of the current request.
///
/// Taken from the request extensions when the session middleware ran,
/// otherwise read from the store.
#[derive(Debug, Clone)]
pub struct ActiveSession(pub Session);

impl FromRequest for ActiveSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(active) = req.extensions().get::<ActiveSession>() {
            return ready(Ok(active.clone()));
        }

        let store = match req.app_data::<Data<SessionStore>>() {
            Some(s) => s,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Session store missing",
                )));
            }
        };

        match store.get_session() {
            Some(session) => ready(Ok(ActiveSession(session))),
            None => ready(Err(ErrorUnauthorized("Session expired or missing"))),
        }
    }
}

impl ActiveSession {
    /// Roll number used to key every data request.
    pub fn require_roll_number(&self) -> actix_web::Result<String> {
        self.0
            .student_data
            .roll_number()
            .ok_or_else(|| actix_web::error::ErrorBadRequest("Student has no roll number"))
    }

    pub fn token(&self) -> &str {
        &self.0.token
    }
}
