//! Date range, subject and status filters over normalized records.
//!
//! Criteria are ANDed; a criterion that is not set lets everything through.
//! Aggregates are not kept here, callers recompute them from the result.

use crate::model::attendance::AttendanceRecord;
use crate::model::fee::FeeSubmission;
use crate::model::test_score::TestScoreEntry;
use crate::transform;
use crate::utils::dates;
use chrono::NaiveDate;

/// Inclusive calendar-date range, open on any side left unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRangeFilter {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self { start_date, end_date }
    }

    pub fn is_open(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    fn lower(&self) -> NaiveDate {
        self.start_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    fn upper(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// A record without a usable date passes an open range and fails any
    /// bounded one.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_open() {
            return true;
        }
        match date {
            Some(d) => self.lower() <= d && d <= self.upper(),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub date_range: DateRangeFilter,
    pub subject: Option<String>,
    pub status: Option<String>,
}

impl RecordFilter {
    pub fn by_date(date_range: DateRangeFilter) -> Self {
        Self {
            date_range,
            ..Default::default()
        }
    }

    pub fn subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn status(mut self, status: Option<String>) -> Self {
        self.status = status.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.date_range.contains(record.filter_date())
            && criterion_matches(self.subject.as_deref(), record.filter_subject())
            && self
                .status
                .as_deref()
                .is_none_or(|wanted| record.matches_status(wanted))
    }
}

fn criterion_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(w), Some(a)) => w.trim().eq_ignore_ascii_case(a.trim()),
        (Some(_), None) => false,
    }
}

/// The dimensions a record can be filtered on. A record without a
/// dimension never matches a criterion on it.
pub trait Filterable {
    fn filter_date(&self) -> Option<NaiveDate>;

    fn filter_subject(&self) -> Option<&str> {
        None
    }

    fn matches_status(&self, _wanted: &str) -> bool {
        false
    }
}

impl Filterable for TestScoreEntry {
    fn filter_date(&self) -> Option<NaiveDate> {
        dates::parse_calendar_date(&self.test_date)
    }

    fn filter_subject(&self) -> Option<&str> {
        Some(&self.subject)
    }
}

impl Filterable for AttendanceRecord {
    fn filter_date(&self) -> Option<NaiveDate> {
        dates::parse_calendar_date(&self.date)
    }

    fn matches_status(&self, wanted: &str) -> bool {
        self.status_matches(wanted)
    }
}

impl Filterable for FeeSubmission {
    fn filter_date(&self) -> Option<NaiveDate> {
        self.effective_date().and_then(dates::parse_calendar_date)
    }
}

/// Records matching every set criterion, in input order.
pub fn apply<T: Filterable + Clone>(records: &[T], filter: &RecordFilter) -> Vec<T> {
    records.iter().filter(|r| filter.matches(*r)).cloned().collect()
}

/// Like [`apply`], then newest test first.
pub fn filter_test_scores(entries: &[TestScoreEntry], filter: &RecordFilter) -> Vec<TestScoreEntry> {
    let mut filtered = apply(entries, filter);
    transform::sort_newest_first(&mut filtered);
    filtered
}

/// Like [`apply`], then newest receipt first.
pub fn filter_submissions(submissions: &[FeeSubmission], range: DateRangeFilter) -> Vec<FeeSubmission> {
    let mut filtered = apply(submissions, &RecordFilter::by_date(range));
    transform::sort_submissions_newest_first(&mut filtered);
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(subject: &str, date: &str) -> TestScoreEntry {
        TestScoreEntry {
            subject: subject.into(),
            max_marks: 100,
            obtained_marks: 50.0,
            percentage: 50,
            test_date: date.into(),
            test_type: "Test".into(),
            test_id: None,
            rank: None,
            percentile: None,
            total_marks: None,
            batch: None,
        }
    }

    fn attendance(date: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            date: date.into(),
            present_status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn range_includes_both_bounds() {
        let records = vec![
            attendance("2024-09-01", "P"),
            attendance("2024-09-02", "P"),
            attendance("2024-09-03", "A"),
            attendance("2024-09-04", "P"),
        ];
        let filter = RecordFilter::by_date(DateRangeFilter::new(
            Some(day("2024-09-02")),
            Some(day("2024-09-03")),
        ));

        let dates: Vec<_> = apply(&records, &filter).into_iter().map(|r| r.date).collect();
        assert_eq!(dates, ["2024-09-02", "2024-09-03"]);
    }

    #[test]
    fn time_of_day_is_ignored() {
        let range = DateRangeFilter::new(Some(day("2024-09-02")), Some(day("2024-09-02")));
        let late = attendance("2024-09-02T23:59:00Z", "P");
        assert!(RecordFilter::by_date(range).matches(&late));
    }

    #[test]
    fn open_sides_never_exclude() {
        let records = vec![
            attendance("1950-01-01", "P"),
            attendance("2090-01-01", "P"),
        ];
        let from = RecordFilter::by_date(DateRangeFilter::new(Some(day("1949-12-31")), None));
        let until = RecordFilter::by_date(DateRangeFilter::new(None, Some(day("2090-01-01"))));
        assert_eq!(apply(&records, &from).len(), 2);
        assert_eq!(apply(&records, &until).len(), 2);
    }

    #[test]
    fn undated_records_only_pass_an_open_range() {
        let records = vec![attendance("someday", "P")];
        assert_eq!(apply(&records, &RecordFilter::default()).len(), 1);

        let bounded = RecordFilter::by_date(DateRangeFilter::new(Some(day("2024-01-01")), None));
        assert!(apply(&records, &bounded).is_empty());
    }

    #[test]
    fn criteria_are_conjunctive() {
        let entries = vec![
            entry("Physics", "2024-01-10"),
            entry("Chemistry", "2024-01-10"),
            entry("Physics", "2024-03-10"),
        ];
        let filter = RecordFilter::by_date(DateRangeFilter::new(None, Some(day("2024-02-01"))))
            .subject(Some("physics".into()));

        let result = filter_test_scores(&entries, &filter);
        assert_eq!(result, vec![entry("Physics", "2024-01-10")]);
    }

    #[test]
    fn test_scores_come_back_newest_first() {
        let entries = vec![
            entry("Physics", "2024-01-10"),
            entry("Physics", "2024-03-10"),
            entry("Physics", "2024-02-10"),
        ];
        let dates: Vec<_> = filter_test_scores(&entries, &RecordFilter::default())
            .into_iter()
            .map(|e| e.test_date)
            .collect();
        assert_eq!(dates, ["2024-03-10", "2024-02-10", "2024-01-10"]);
    }

    #[test]
    fn status_filter_selects_absences() {
        let records = vec![
            attendance("2024-09-01", "P"),
            attendance("2024-09-02", "A"),
        ];
        let absent = RecordFilter::default().status(Some("ABSENT".into()));
        let result = apply(&records, &absent);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, "2024-09-02");
    }

    #[test]
    fn status_filter_accepts_codes() {
        let records = vec![
            attendance("2024-09-01", "P"),
            attendance("2024-09-02", "A"),
            attendance("2024-09-03", "present"),
            attendance("2024-09-04", "H"),
        ];

        let present = RecordFilter::default().status(Some("p".into()));
        let dates: Vec<_> = apply(&records, &present).into_iter().map(|r| r.date).collect();
        assert_eq!(dates, ["2024-09-01", "2024-09-03"]);

        let holiday = RecordFilter::default().status(Some("H".into()));
        assert_eq!(apply(&records, &holiday).len(), 1);

        let unknown = RecordFilter::default().status(Some("unknown".into()));
        assert_eq!(apply(&records, &unknown)[0].date, "2024-09-04");
    }

    #[test]
    fn blank_criteria_are_ignored_and_missing_dimensions_fail() {
        let records = vec![attendance("2024-09-01", "P")];
        let blank = RecordFilter::default().subject(Some("  ".into()));
        assert_eq!(apply(&records, &blank).len(), 1);

        let by_subject = RecordFilter::default().subject(Some("Physics".into()));
        assert!(apply(&records, &by_subject).is_empty());
    }

    #[test]
    fn empty_collections_stay_empty() {
        let filter = RecordFilter::by_date(DateRangeFilter::new(Some(day("2024-01-01")), None));
        assert!(apply::<AttendanceRecord>(&[], &filter).is_empty());
        assert!(filter_test_scores(&[], &filter).is_empty());
        assert!(filter_submissions(&[], DateRangeFilter::default()).is_empty());
    }

    #[test]
    fn submissions_filter_on_receipt_date() {
        let subs = vec![
            FeeSubmission {
                amount: 1000.0,
                date_of_receipt: Some("2024-04-10".into()),
                ..Default::default()
            },
            FeeSubmission {
                amount: 2000.0,
                date: Some("2024-06-01".into()),
                ..Default::default()
            },
        ];
        let june = DateRangeFilter::new(Some(day("2024-06-01")), Some(day("2024-06-30")));
        let result = filter_submissions(&subs, june);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, 2000.0);

        let all = filter_submissions(&subs, DateRangeFilter::default());
        assert_eq!(all[0].amount, 2000.0);
    }
}
