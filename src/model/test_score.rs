use crate::model::nullable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TestScoreSubject {
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "physics")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = 90.0)]
    pub marks: f64,
    #[serde(rename = "_id", deserialize_with = "nullable")]
    pub id: String,
}

/// One test sitting as returned by the test-score search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiTestScore {
    #[serde(rename = "_id", deserialize_with = "nullable")]
    pub id: String,
    #[schema(value_type = Option<u64>)]
    pub roll_number: Option<serde_json::Value>,
    #[serde(deserialize_with = "nullable")]
    pub student: String,
    #[serde(deserialize_with = "nullable")]
    pub father: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "n/a")]
    pub batch: String,
    #[serde(deserialize_with = "nullable")]
    pub subjects: Vec<TestScoreSubject>,
    pub percentile: Option<f64>,
    pub total: Option<f64>,
    pub rank: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "2024-01-01")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    #[schema(example = "Weekly Test 4")]
    pub name: String,
}

/// A single (test, subject) row ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "subject": "Physics",
    "maxMarks": 180,
    "obtainedMarks": 90.0,
    "percentage": 50,
    "testDate": "2024-01-01",
    "testType": "Weekly Test 4",
    "rank": 1,
    "percentile": 99.0,
    "totalMarks": 90.0
}))]
pub struct TestScoreEntry {
    pub subject: String,
    pub max_marks: u32,
    pub obtained_marks: f64,
    /// Not clamped: malformed marks can push this past 100 or below 0.
    pub percentage: i64,
    pub test_date: String,
    pub test_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}
