use crate::domain::errors::MarketDataError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Inclusive start / exclusive end range of calendar days for a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MarketDataError> {
        if start >= end {
            return Err(MarketDataError::InvalidArgument {
                reason: format!("start date {} must be before end date {}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, MarketDataError> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }
}

impl FromStr for DateRange {
    type Err = MarketDataError;

    /// Accepts `START..END`, e.g. `2020-01-01..2023-12-31`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| MarketDataError::InvalidArgument {
                reason: format!("expected START..END, got {:?}", s),
            })?;
        Self::parse(start.trim(), end.trim())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, MarketDataError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| MarketDataError::InvalidArgument {
        reason: format!("invalid date {:?}: {}", s, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_range() {
        let range = DateRange::parse("2020-01-01", "2023-12-31").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(range.to_string(), "2020-01-01..2023-12-31");
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::parse("2023-01-01", "2020-01-01").unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidArgument { .. }));
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(DateRange::parse("2023-01-01", "2023-01-01").is_err());
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(DateRange::parse("2023/01/01", "2024-01-01").is_err());
        assert!("2023-01-01".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_from_str() {
        let range: DateRange = "2021-06-01..2021-07-01".parse().unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
    }
}
