use serde::Serialize;
use thiserror::Error;

pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginFlowError {
    #[error("Phone number must be 10 digits")]
    InvalidPhone,
    #[error("OTP must be 6 digits")]
    InvalidOtp,
    #[error("No OTP has been requested")]
    OtpNotRequested,
}

/// Where the login screen is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum LoginStep {
    AwaitingPhone,
    #[serde(rename_all = "camelCase")]
    AwaitingOtp { phone_number: String },
    #[serde(rename_all = "camelCase")]
    Verified { phone_number: String },
}

/// Keeps only digits, at most ten of them.
pub fn normalize_phone_number(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

fn is_otp(code: &str) -> bool {
    code.len() == OTP_DIGITS && code.chars().all(|c| c.is_ascii_digit())
}

/// `AwaitingPhone -> AwaitingOtp -> Verified`, with `back` returning to the
/// phone step. Remote calls happen between transitions; this type only
/// decides which calls are allowed.
#[derive(Debug, Clone)]
pub struct LoginFlow {
    step: LoginStep,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self {
            step: LoginStep::AwaitingPhone,
        }
    }
}

impl LoginFlow {
    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    /// Validates raw phone input and returns the normalized number to send
    /// the OTP to. The step does not change until [`LoginFlow::otp_sent`].
    pub fn submit_phone(&self, raw: &str) -> Result<String, LoginFlowError> {
        let phone = normalize_phone_number(raw);
        if phone.len() != PHONE_DIGITS {
            return Err(LoginFlowError::InvalidPhone);
        }
        Ok(phone)
    }

    /// Accepted from any step: requesting a new code restarts the flow.
    pub fn otp_sent(&mut self, phone_number: String) {
        self.step = LoginStep::AwaitingOtp { phone_number };
    }

    /// Returns the phone number the code belongs to.
    pub fn submit_otp(&self, code: &str) -> Result<String, LoginFlowError> {
        let phone_number = match &self.step {
            LoginStep::AwaitingOtp { phone_number } => phone_number.clone(),
            _ => return Err(LoginFlowError::OtpNotRequested),
        };
        if !is_otp(code.trim()) {
            return Err(LoginFlowError::InvalidOtp);
        }
        Ok(phone_number)
    }

    pub fn verified(&mut self) -> Result<(), LoginFlowError> {
        let phone_number = match &self.step {
            LoginStep::AwaitingOtp { phone_number } => phone_number.clone(),
            _ => return Err(LoginFlowError::OtpNotRequested),
        };
        self.step = LoginStep::Verified { phone_number };
        Ok(())
    }

    /// Leaves the OTP step for the phone step; a no-op elsewhere.
    pub fn back(&mut self) {
        if matches!(self.step, LoginStep::AwaitingOtp { .. }) {
            self.step = LoginStep::AwaitingPhone;
        }
    }

    pub fn reset(&mut self) {
        self.step = LoginStep::AwaitingPhone;
    }
}
