//! Turns raw portal records into the flat shapes the dashboard shows.
//!
//! Nothing here fails on odd input: unknown subjects get 100 max marks,
//! unparseable dates sort as the oldest, and empty lists stay empty.

use crate::model::attendance::AttendanceRecord;
use crate::model::fee::{FeeRecord, FeeStatus, FeeSubmission};
use crate::model::test_score::{ApiTestScore, TestScoreEntry, TestScoreSubject};
use crate::utils::dates;
use derive_more::Display;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

pub const DEFAULT_MAX_MARKS: u32 = 100;
const BATCH_PLACEHOLDER: &str = "n/a";

static SUBJECT_MAX_MARKS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("physics", 180),
        ("chemistry", 180),
        ("biology", 360),
        ("mathematics", 100),
        ("english", 100),
        ("hindi", 100),
        ("social studies", 100),
        ("science", 100),
    ])
});

pub fn max_marks_for_subject(subject: &str) -> u32 {
    SUBJECT_MAX_MARKS
        .get(subject.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_MAX_MARKS)
}

/// Half-up rounding, so `2.5 -> 3` and `-2.5 -> -2`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub fn round_1_decimal(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn entry_for(record: &ApiTestScore, subject: &TestScoreSubject) -> TestScoreEntry {
    let max_marks = max_marks_for_subject(&subject.name);
    let percentage = round_half_up(subject.marks / f64::from(max_marks) * 100.0) as i64;

    TestScoreEntry {
        subject: capitalize_first(&subject.name),
        max_marks,
        obtained_marks: subject.marks,
        percentage,
        test_date: record.date.clone(),
        test_type: non_empty(&record.name).unwrap_or_else(|| "Test".to_string()),
        test_id: non_empty(&record.id),
        rank: record.rank,
        percentile: record.percentile,
        total_marks: record.total,
        batch: non_empty(&record.batch).filter(|b| b != BATCH_PLACEHOLDER),
    }
}

/// One entry per (test, subject), newest test first. Entries of the same
/// date keep their input order.
pub fn transform_test_scores(records: &[ApiTestScore]) -> Vec<TestScoreEntry> {
    let mut entries: Vec<TestScoreEntry> = records
        .iter()
        .flat_map(|record| record.subjects.iter().map(move |s| entry_for(record, s)))
        .collect();

    sort_newest_first(&mut entries);
    tracing::debug!(
        tests = records.len(),
        entries = entries.len(),
        "Transformed test scores"
    );
    entries
}

pub fn sort_newest_first(entries: &mut [TestScoreEntry]) {
    // sort_by_key is stable
    entries.sort_by_key(|e| std::cmp::Reverse(dates::sort_key(&e.test_date)));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
pub enum Grade {
    #[display(fmt = "A+")]
    #[serde(rename = "A+")]
    APlus,
    A,
    #[display(fmt = "B+")]
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
}

impl Grade {
    pub fn for_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 90.0 => Grade::APlus,
            p if p >= 80.0 => Grade::A,
            p if p >= 70.0 => Grade::BPlus,
            p if p >= 60.0 => Grade::B,
            p if p >= 50.0 => Grade::C,
            _ => Grade::D,
        }
    }
}

/// Aggregates over whatever subset of entries is currently shown.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestScoreStats {
    pub count: usize,
    pub average_percentage: f64,
    pub grade: Grade,
}

impl TestScoreStats {
    pub fn from_entries(entries: &[TestScoreEntry]) -> Self {
        let count = entries.len();
        let average = if count > 0 {
            entries.iter().map(|e| e.percentage as f64).sum::<f64>() / count as f64
        } else {
            0.0
        };

        Self {
            count,
            average_percentage: round_1_decimal(average),
            grade: Grade::for_percentage(average),
        }
    }
}

/// Subjects in first-seen order, for a subject picker.
pub fn distinct_subjects(entries: &[TestScoreEntry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !seen.contains(&entry.subject) {
            seen.push(entry.subject.clone());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestSitting {
    pub name: String,
    pub date: String,
    pub rank: Option<i64>,
    pub percentile: Option<f64>,
    pub total: Option<f64>,
    /// Sum of the max marks of the subjects in this sitting.
    pub max_marks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestOverview {
    pub test_count: usize,
    pub best_rank: Option<i64>,
    pub tests: Vec<TestSitting>,
}

pub fn test_max_marks(subjects: &[TestScoreSubject]) -> u32 {
    subjects.iter().map(|s| max_marks_for_subject(&s.name)).sum()
}

/// Per-sitting view of the raw records, newest first.
pub fn summarize_tests(records: &[ApiTestScore]) -> TestOverview {
    let mut tests: Vec<TestSitting> = records
        .iter()
        .map(|r| TestSitting {
            name: non_empty(&r.name).unwrap_or_else(|| "Test".to_string()),
            date: r.date.clone(),
            rank: r.rank,
            percentile: r.percentile,
            total: r.total,
            max_marks: test_max_marks(&r.subjects),
        })
        .collect();
    tests.sort_by_key(|t| std::cmp::Reverse(dates::sort_key(&t.date)));

    TestOverview {
        test_count: records.len(),
        best_rank: records.iter().filter_map(|r| r.rank).min(),
        tests,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub total: usize,
    /// Present share of all days, one decimal place.
    pub percentage: f64,
}

pub fn derive_attendance_summary(records: &[AttendanceRecord]) -> AttendanceSummary {
    let present = records.iter().filter(|r| r.is_present()).count();
    let total = records.len();
    let percentage = if total > 0 {
        round_1_decimal(present as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    AttendanceSummary {
        present,
        absent: total - present,
        total,
        percentage,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStanding {
    #[display(fmt = "excellent")]
    Excellent,
    #[display(fmt = "good")]
    Good,
    #[display(fmt = "average")]
    Average,
    #[display(fmt = "poor")]
    Poor,
}

impl AttendanceStanding {
    pub fn for_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 90.0 => AttendanceStanding::Excellent,
            p if p >= 80.0 => AttendanceStanding::Good,
            p if p >= 75.0 => AttendanceStanding::Average,
            _ => AttendanceStanding::Poor,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AttendanceStanding::Excellent => "Excellent attendance! Keep it up.",
            AttendanceStanding::Good => "Good attendance record.",
            AttendanceStanding::Average => "Attendance needs improvement.",
            AttendanceStanding::Poor => "Low attendance. Please ensure regular school attendance.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    /// `finalFees` when present, otherwise `totalFees`.
    pub payable: f64,
    pub paid: f64,
    pub pending: f64,
    pub discount: f64,
    #[schema(value_type = String)]
    pub status: FeeStatus,
    pub due_date: Option<String>,
}

/// Only the first fee record of a student is shown.
pub fn primary_fee(fees: &[FeeRecord]) -> Option<&FeeRecord> {
    fees.first()
}

impl From<&FeeRecord> for FeeSummary {
    fn from(fee: &FeeRecord) -> Self {
        Self {
            payable: fee
                .final_fees
                .filter(|f| *f != 0.0)
                .or(fee.total_fees)
                .unwrap_or_default(),
            paid: fee.paid_amount,
            pending: fee.pending_amount,
            discount: fee.discount,
            status: fee.status.clone(),
            due_date: fee.due_date.clone().filter(|d| !d.trim().is_empty()),
        }
    }
}

pub fn sort_submissions_newest_first(submissions: &mut [FeeSubmission]) {
    submissions.sort_by_key(|s| std::cmp::Reverse(dates::sort_key(s.effective_date().unwrap_or(""))));
}
