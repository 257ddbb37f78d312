//! Raw calendar fields and their validation.

use crate::common::{
    days_of_month, DATE_MAX_YEAR, HOURS_PER_DAY, MINUTES_PER_HOUR, MONTHS_PER_YEAR,
    SECONDS_PER_MINUTE, USECONDS_MAX,
};
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// A candidate set of date/time fields, not yet known to be valid.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Fields {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub microsecond: u32,
}

impl Fields {
    #[inline]
    pub const fn new() -> Self {
        Fields {
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
        }
    }

    #[inline]
    pub const fn from_ymd(year: u32, month: u32, day: u32) -> Self {
        Fields {
            year,
            month,
            day,
            ..Fields::new()
        }
    }

    #[inline]
    pub const fn from_ymd_hms(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Self {
        Fields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond,
        }
    }

    /// Checks every field against the bounds of `9999-12-31 23:59:59.999999`.
    #[inline]
    pub const fn is_in_range(&self) -> bool {
        self.year <= DATE_MAX_YEAR
            && self.month <= MONTHS_PER_YEAR
            && self.day <= 31
            && self.hour < HOURS_PER_DAY
            && self.minute < MINUTES_PER_HOUR
            && self.second < SECONDS_PER_MINUTE
            && self.microsecond <= USECONDS_MAX
    }

    /// Checks the day exists in its month. A zero month is not checked.
    #[inline]
    pub const fn is_valid_date(&self) -> bool {
        if self.month > MONTHS_PER_YEAR {
            return false;
        }
        self.month == 0 || self.day <= days_of_month(self.year, self.month)
    }

    /// Runs the range and calendar checks, naming `input` in the error.
    pub fn validate(self, input: &str) -> Result<Self> {
        if self.is_in_range() && self.is_valid_date() {
            Ok(self)
        } else {
            Err(Error::OutOfRange(try_format!(
                "date literal [{}] is out of range",
                input
            )?))
        }
    }

    /// Zeroes the time of day.
    #[inline]
    pub const fn truncate_time(self) -> Self {
        Fields::from_ymd(self.year, self.month, self.day)
    }

    /// Converts into a chrono datetime, which requires a real calendar date.
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month, self.day)?.and_hms_micro_opt(
            self.hour,
            self.minute,
            self.second,
            self.microsecond,
        )
    }

    /// Converts back from a chrono datetime, rejecting years outside `0..=9999`.
    pub fn from_naive(dt: &NaiveDateTime) -> Option<Self> {
        let year = dt.year();
        if year < 0 || year as u32 > DATE_MAX_YEAR {
            return None;
        }
        Some(Fields::from_ymd_hms(
            year as u32,
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.nanosecond() / 1000,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(Fields::from_ymd(9999, 12, 31).is_in_range());
        assert!(Fields::from_ymd_hms(9999, 12, 31, 23, 59, 59, 999999).is_in_range());
        assert!(!Fields::from_ymd(10000, 1, 1).is_in_range());
        assert!(!Fields::from_ymd(2021, 13, 1).is_in_range());
        assert!(!Fields::from_ymd(2021, 1, 32).is_in_range());
        assert!(!Fields::from_ymd_hms(2021, 1, 1, 24, 0, 0, 0).is_in_range());
        assert!(!Fields::from_ymd_hms(2021, 1, 1, 0, 60, 0, 0).is_in_range());
        assert!(!Fields::from_ymd_hms(2021, 1, 1, 0, 0, 60, 0).is_in_range());
        assert!(!Fields::from_ymd_hms(2021, 1, 1, 0, 0, 0, 1_000_000).is_in_range());
    }

    #[test]
    fn test_calendar() {
        assert!(Fields::from_ymd(2024, 2, 29).is_valid_date());
        assert!(Fields::from_ymd(2000, 2, 29).is_valid_date());
        assert!(!Fields::from_ymd(2023, 2, 29).is_valid_date());
        assert!(!Fields::from_ymd(1900, 2, 29).is_valid_date());
        assert!(!Fields::from_ymd(2021, 4, 31).is_valid_date());
        assert!(!Fields::from_ymd(2021, 2, 30).is_valid_date());
        // zero month and day are not calendar errors
        assert!(Fields::from_ymd(2021, 0, 0).is_valid_date());
    }

    #[test]
    fn test_validate() {
        assert!(Fields::from_ymd(2024, 2, 29).validate("2024-02-29").is_ok());
        assert_eq!(
            Fields::from_ymd(2023, 2, 29).validate("2023-02-29"),
            Err(Error::OutOfRange(
                "date literal [2023-02-29] is out of range".to_string()
            ))
        );
    }

    #[test]
    fn test_naive() {
        let fields = Fields::from_ymd_hms(2021, 1, 6, 1, 2, 3, 456789);
        let naive = fields.to_naive().unwrap();
        assert_eq!(Fields::from_naive(&naive), Some(fields));
        assert!(Fields::from_ymd(2021, 0, 0).to_naive().is_none());

        let naive = NaiveDate::from_ymd_opt(10000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(Fields::from_naive(&naive).is_none());
    }
}
