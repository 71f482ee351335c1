use std::fmt;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::common::{Error, Result};

/// Wire format of calendar dates in ranges and query parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar date range. A missing bound means "unbounded" on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> DateRange {
        DateRange { from: Some(from), to: Some(to) }
    }

    /// Range with no bounds, used by `all_time` and `custom`
    pub fn unbounded() -> DateRange {
        DateRange { from: None, to: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Number of days between `from` and `to`, if both are set
    pub fn span_days(&self) -> Option<i64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((to - from).num_days()),
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }

    /// Human readable "from - to" using the given chrono format, e.g. `%d.%m.%Y`.
    /// Empty when either bound is missing.
    pub fn format_display(&self, format: &str) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{} - {}", from.format(format), to.format(format)),
            _ => String::new(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bound = |d: Option<NaiveDate>| match d {
            Some(d) => d.format(DATE_FORMAT).to_string(),
            None => "*".to_string(),
        };
        write!(f, "{}..{}", bound(self.from), bound(self.to))
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Same as `parse_date` but an empty string (a cleared date input) means no date
pub fn parse_optional_date(s: &str) -> Result<Option<NaiveDate>> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(s).map(Some)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::common::Error;
    use crate::range::{DateRange, parse_date, parse_optional_date};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-01"), Ok(ymd(2024, 1, 1)));
        assert_eq!(parse_date("2024-02-29"), Ok(ymd(2024, 2, 29)));
        assert_eq!(parse_date("2023-02-29"), Err(Error::InvalidDate("2023-02-29".into())));
        assert_eq!(parse_date("01.02.2024"), Err(Error::InvalidDate("01.02.2024".into())));

        assert_eq!(parse_optional_date(""), Ok(None));
        assert_eq!(parse_optional_date("2024-12-31"), Ok(Some(ymd(2024, 12, 31))));
        assert!(parse_optional_date("tomorrow").is_err());
    }

    #[test]
    fn test_format_display() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 3, 31));
        assert_eq!(range.format_display("%d.%m.%Y"), "01.01.2024 - 31.03.2024");
        assert_eq!(range.to_string(), "2024-01-01..2024-03-31");

        let half_open = DateRange { from: Some(ymd(2024, 1, 1)), to: None };
        assert_eq!(half_open.format_display("%d.%m.%Y"), "");
        assert_eq!(half_open.to_string(), "2024-01-01..*");
        assert_eq!(DateRange::unbounded().to_string(), "*..*");
    }

    #[test]
    fn test_contains_and_span() {
        let range = DateRange::new(ymd(2024, 3, 11), ymd(2024, 3, 17));
        assert!(range.contains(ymd(2024, 3, 11)));
        assert!(range.contains(ymd(2024, 3, 17)));
        assert!(!range.contains(ymd(2024, 3, 18)));
        assert_eq!(range.span_days(), Some(6));

        assert!(!range.is_unbounded());
        assert!(!DateRange { from: None, to: Some(ymd(2024, 3, 17)) }.is_unbounded());
        assert!(DateRange::unbounded().is_unbounded());
        assert!(DateRange::unbounded().contains(ymd(1999, 1, 1)));
        assert_eq!(DateRange::unbounded().span_days(), None);
    }

    #[test]
    fn test_serde() {
        let range = DateRange::new(ymd(2023, 10, 1), ymd(2023, 12, 31));
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"from":"2023-10-01","to":"2023-12-31"}"#);
        let json = serde_json::to_string(&DateRange::unbounded()).unwrap();
        assert_eq!(json, r#"{"from":null,"to":null}"#);
    }
}
