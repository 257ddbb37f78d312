//! Common structures, constants and calendar functions.
//!
//! Day numbers count days from `0000-01-01` (day 1) the same way the native
//! execution engine does, so every value derived from them (day of year,
//! week numbers) is persisted and compared consistently on both sides.

use crate::error::{Error, Result};
use crate::util::StrExt;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const HOURS_PER_DAY: u32 = 24;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_MINUTE: u32 = 60;

pub const USECONDS_MAX: u32 = 999_999;

pub const DATE_MIN_YEAR: u32 = 0;
pub const DATE_MAX_YEAR: u32 = 9999;

/// Two-digit years below this value belong to the 21st century.
pub const YY_PART_YEAR: u32 = 70;

/// Day number of `9999-12-31`.
pub const DAY_NUMBER_MAX: i64 = 3_652_424;

pub const DAYS_IN_MONTH: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub const POW10: [u32; 7] = [1, 10, 100, 1000, 10000, 100000, 1000000];

/// Proleptic Gregorian leap year test.
#[inline]
pub const fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Leap year test of the day number space, where year 0 has 365 days.
#[inline]
const fn has_leap_day_number(year: i64) -> bool {
    year != 0 && ((year % 4 == 0 && year % 100 != 0) || year % 400 == 0)
}

/// Returns the number of days of the given month, honoring leap years.
#[inline]
pub const fn days_of_month(year: u32, month: u32) -> u32 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Resolves a two-digit year: `70..=99` maps to the 20th century, `00..=69` to the 21st.
#[inline]
pub const fn two_digit_year(year: u32) -> u32 {
    if year >= YY_PART_YEAR {
        year + 1900
    } else {
        year + 2000
    }
}

/// Calendar date to day number conversion.
#[inline]
pub const fn day_number(year: u32, month: u32, day: u32) -> i64 {
    if year == 0 && month == 0 {
        return 0;
    }

    let (year, month, day) = (year as i64, month as i64, day as i64);
    let mut y = year;
    let mut delsum = 365 * y + 31 * (month - 1) + day;
    if month <= 2 {
        y -= 1;
    } else {
        // skips the days of February the linear term counted as 31
        delsum -= (month * 4 + 23) / 10;
    }
    delsum + y / 4 - y / 100 + y / 400
}

/// Day number to calendar date conversion.
pub fn date_from_day_number(day_number_value: i64) -> Result<(u32, u32, u32)> {
    if day_number_value <= 0 || day_number_value > DAY_NUMBER_MAX {
        return Err(Error::InvalidFormat(try_format!(
            "invalid days to year: {}",
            day_number_value
        )?));
    }

    let mut year = day_number_value / 365;
    let mut days_before_year = day_number(year as u32, 1, 1);
    while day_number_value < days_before_year {
        year -= 1;
        days_before_year = day_number(year as u32, 1, 1);
    }

    let mut day_of_year = day_number_value - days_before_year + 1;
    let mut leap_day = 0;
    if has_leap_day_number(year) && day_of_year > 31 + 28 {
        day_of_year -= 1;
        if day_of_year == 31 + 28 {
            leap_day = 1;
        }
    }

    let mut month = 1;
    while day_of_year > DAYS_IN_MONTH[month] as i64 {
        day_of_year -= DAYS_IN_MONTH[month] as i64;
        month += 1;
    }

    Ok((year as u32, month as u32, (day_of_year + leap_day) as u32))
}

/// Day of week of a day number: `0` is Monday, or Sunday when `sunday_first`.
#[inline]
pub const fn weekday(day_number_value: i64, sunday_first: bool) -> u32 {
    ((day_number_value + 5 + sunday_first as i64) % 7) as u32
}

/// Ordinal day within the year, `1`-based.
#[inline]
pub const fn day_of_year(year: u32, month: u32, day: u32) -> u32 {
    (day_number(year, month, day) - day_number(year, 1, 1) + 1) as u32
}

/// Week numbering conventions understood by the `%U/%u/%V/%v` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekMode {
    /// Sunday starts the week (`%U`, `%V`), otherwise Monday (`%u`, `%v`).
    pub sunday_first: bool,
    /// The week number is relative to a week-year given by `%X`/`%x` (`%V`, `%v`).
    pub strict: bool,
}

/// Resolves a week number and a weekday into a day number.
///
/// `weekday_value` counts `1` (Monday) to `7` (Sunday). `week_year` is the
/// year captured by a `%X`/`%x` directive together with whether it was the
/// Sunday based one.
pub fn week_to_day_number(
    year: u32,
    mode: WeekMode,
    week_year: Option<(u32, bool)>,
    week: u32,
    weekday_value: u32,
) -> Result<i64> {
    let base_year = match (mode.strict, week_year) {
        (true, Some((y, sunday_first))) if sunday_first == mode.sunday_first => y,
        (false, None) => year,
        _ => return Err(Error::InvalidFormat("invalid week number".try_to_string()?)),
    };

    let mut days = day_number(base_year, 1, 1);
    let first = weekday(days, mode.sunday_first) as i64;
    let week = week as i64;
    let weekday_value = weekday_value as i64;

    if mode.sunday_first {
        days += (if first == 0 { 0 } else { 7 }) - first + (week - 1) * 7 + weekday_value % 7;
    } else {
        days += (if first <= 3 { 0 } else { 7 }) - first + (week - 1) * 7 + weekday_value - 1;
    }
    Ok(days)
}
