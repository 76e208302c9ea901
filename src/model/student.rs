use crate::model::nullable;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentInfo {
    #[schema(example = "Farmer")]
    #[serde(deserialize_with = "nullable")]
    pub occupation: String,
    #[schema(example = "Ramesh Kumar")]
    #[serde(deserialize_with = "nullable")]
    pub father_name: String,
    #[schema(example = "Sunita Devi")]
    #[serde(deserialize_with = "nullable")]
    pub mother_name: String,
    #[schema(example = "9876543210")]
    #[serde(deserialize_with = "nullable")]
    pub parent_contact: String,
    #[schema(example = "ramesh@example.com")]
    #[serde(deserialize_with = "nullable")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ImageRef {
    #[serde(deserialize_with = "nullable")]
    pub public_id: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

/// Roll numbers arrive as JSON numbers from the login endpoint but are
/// used as path segments, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollNumber::Number(n) => write!(f, "{n}"),
            RollNumber::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Student snapshot returned by OTP verification and kept in the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[schema(example = "Aarav Kumar")]
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[schema(value_type = Option<u64>, example = 1042)]
    pub roll_no: Option<RollNumber>,
    #[serde(rename = "class")]
    #[schema(example = "10")]
    #[serde(deserialize_with = "nullable")]
    pub class_name: String,
    pub parent: Option<ParentInfo>,
    pub image: Option<ImageRef>,
    #[serde(deserialize_with = "nullable")]
    pub mobile_number: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub phone: String,
    #[serde(deserialize_with = "nullable")]
    pub emergency_contact: String,
    #[serde(rename = "DOB")]
    #[serde(deserialize_with = "nullable")]
    pub dob: String,
    #[serde(deserialize_with = "nullable")]
    pub gender: String,
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub medium: String,
    #[serde(deserialize_with = "nullable")]
    pub programme_name: String,
    #[serde(deserialize_with = "nullable")]
    pub t_shirt_size: String,
    #[serde(deserialize_with = "nullable")]
    pub previous_school_name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub city: String,
    #[serde(deserialize_with = "nullable")]
    pub pin_code: String,
    #[serde(deserialize_with = "nullable")]
    pub permanent_address: String,
}

impl StudentRecord {
    /// Roll number as used in remote API paths, if the record carries one.
    pub fn roll_number(&self) -> Option<String> {
        self.roll_no
            .as_ref()
            .map(|roll| roll.to_string())
            .filter(|roll| !roll.is_empty())
    }
}
