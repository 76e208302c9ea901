use crate::model::nullable;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Day status as sent by the attendance endpoint (`P`/`A`, sometimes spelled out).
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PresentStatus {
    #[strum(to_string = "P", serialize = "present")]
    Present,
    #[strum(to_string = "A", serialize = "absent")]
    Absent,
    #[default]
    #[strum(to_string = "?")]
    Unknown,
}

impl PresentStatus {
    pub fn from_code(code: &str) -> Self {
        PresentStatus::from_str(code.trim()).unwrap_or(PresentStatus::Unknown)
    }

    /// Name used by the status filter (`present`, `absent`, `unknown`).
    pub fn label(&self) -> &'static str {
        match self {
            PresentStatus::Present => "present",
            PresentStatus::Absent => "absent",
            PresentStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendanceRecord {
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "2024-09-02")]
    pub date: String,
    /// Code exactly as the portal sent it; see [`AttendanceRecord::status`].
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "P")]
    pub present_status: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "08:55")]
    pub in_time: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "14:30")]
    pub out_time: String,
    #[serde(deserialize_with = "nullable")]
    pub late_arrival: String,
    #[serde(deserialize_with = "nullable")]
    pub working_hours: String,
}

impl AttendanceRecord {
    pub fn status(&self) -> PresentStatus {
        PresentStatus::from_code(&self.present_status)
    }

    pub fn is_present(&self) -> bool {
        self.status() == PresentStatus::Present
    }

    /// `wanted` may be a code (`P`, `A`, or any raw code such as `H`) or a
    /// label (`present`, `absent`, `unknown`), in any case.
    pub fn status_matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        let status = self.status();
        wanted.eq_ignore_ascii_case(self.present_status.trim())
            || wanted.eq_ignore_ascii_case(status.label())
            || (status != PresentStatus::Unknown && PresentStatus::from_code(wanted) == status)
    }
}
