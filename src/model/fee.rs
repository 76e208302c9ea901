use crate::model::nullable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum FeeStatus {
    Paid,
    Partial,
    Pending,
    /// Free text the portal sends that is not one of the known states.
    #[strum(disabled)]
    Other(String),
}

impl FeeStatus {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        FeeStatus::from_str(raw).unwrap_or_else(|_| FeeStatus::Other(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            FeeStatus::Other(text) => text,
            known => known.as_ref(),
        }
    }
}

impl Default for FeeStatus {
    fn default() -> Self {
        FeeStatus::Other(String::new())
    }
}

impl Serialize for FeeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(FeeStatus::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeSubmission {
    #[serde(rename = "_id", deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = 15000.0)]
    pub amount: f64,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "UPI")]
    pub mode: String,
    #[schema(value_type = Option<String>, example = "R-1024")]
    pub receipt_number: Option<serde_json::Value>,
    #[schema(example = "2024-07-15")]
    pub date_of_receipt: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "UTR", skip_serializing_if = "Option::is_none")]
    pub utr: Option<String>,
}

impl FeeSubmission {
    /// Receipt date, falling back to the generic `date` field.
    pub fn effective_date(&self) -> Option<&str> {
        self.date_of_receipt
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.date.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeRecord {
    pub total_fees: Option<f64>,
    pub final_fees: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub paid_amount: f64,
    #[serde(deserialize_with = "nullable")]
    pub pending_amount: f64,
    #[serde(deserialize_with = "nullable")]
    pub discount: f64,
    #[schema(value_type = String, example = "PARTIAL")]
    pub status: FeeStatus,
    pub due_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub submissions: Vec<FeeSubmission>,
}
