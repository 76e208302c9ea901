use crate::filter::DateRangeFilter;
use crate::utils::dates;
use actix_web::error::ErrorBadRequest;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpReqDto {
    #[schema(example = "98765 43210")]
    pub mobile_number: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyOtpReqDto {
    #[schema(example = "123456")]
    pub code: String,
}

/// Date bounds shared by every listing endpoint.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// Inclusive start, `YYYY-MM-DD`
    #[schema(example = "2024-09-01")]
    pub start_date: Option<String>,
    /// Inclusive end, `YYYY-MM-DD`
    #[schema(example = "2024-12-15")]
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    /// Blank values mean "no bound"; anything else must be a date.
    pub fn to_filter(&self) -> actix_web::Result<DateRangeFilter> {
        Ok(DateRangeFilter::new(
            parse_bound("start_date", self.start_date.as_deref())?,
            parse_bound("end_date", self.end_date.as_deref())?,
        ))
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> actix_web::Result<Option<chrono::NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => dates::parse_calendar_date(value)
            .map(Some)
            .ok_or_else(|| ErrorBadRequest(format!("{name} must be a date like 2024-09-01"))),
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TestScoreQuery {
    #[schema(example = "2024-01-01")]
    pub start_date: Option<String>,
    #[schema(example = "2024-03-31")]
    pub end_date: Option<String>,
    /// Exact subject name, case-insensitive
    #[schema(example = "Physics")]
    pub subject: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    #[schema(example = "2024-09-01")]
    pub start_date: Option<String>,
    #[schema(example = "2024-12-15")]
    pub end_date: Option<String>,
    /// `present`, `absent` or `unknown`
    #[schema(example = "absent")]
    pub status: Option<String>,
}

impl TestScoreQuery {
    pub fn date_range(&self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

impl AttendanceQuery {
    pub fn date_range(&self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn blank_bounds_are_open() {
        let query = DateRangeQuery {
            start_date: Some("".into()),
            end_date: None,
        };
        assert!(query.to_filter().unwrap().is_open());
    }

    #[test]
    fn bounds_parse_as_calendar_dates() {
        let query = DateRangeQuery {
            start_date: Some("2024-09-01".into()),
            end_date: Some("2024-12-15T10:00:00Z".into()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 9, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2024, 12, 15));
    }

    #[test]
    fn garbage_bound_is_rejected() {
        let query = DateRangeQuery {
            start_date: Some("last week".into()),
            end_date: None,
        };
        assert!(query.to_filter().is_err());
    }
}
