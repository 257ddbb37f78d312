//! Delimiter tolerant parsing of date literals.
//!
//! Accepted shapes are `YYYY-MM-DD[ HH:MM:SS[.ffffff]]` with any ASCII
//! punctuation between fields, an ISO `T` between date and time, and the
//! unseparated `YYMMDD`, `YYYYMMDD`, `YYYYMMDDHHMMSS[.ffffff]` forms.

use crate::common::{two_digit_year, POW10};
use crate::error::Result;
use crate::fields::Fields;
use crate::kind::DateKind;
use crate::util::invalid_at;

/// Year, month, day, hour, minute, second and microsecond.
const MAX_DATE_PARTS: usize = 7;

/// Field indexes that may be followed by whitespace: the day and the microsecond.
const ALLOW_SPACE_MASK: u32 = (1 << 2) | (1 << 6);

/// Parses `input`, returning validated fields and `Date` when exactly three
/// fields were present, `DateTime` otherwise.
///
/// Input left after the last recognized field is ignored.
///
/// Fractional seconds are read as a decimal fraction: `.5` is 500000
/// microseconds, not 5. Digits past the sixth are dropped.
pub fn parse_loose(input: &str) -> Result<(Fields, DateKind)> {
    let s = input.trim().as_bytes();
    if s.is_empty() {
        return Err(invalid_at(s, 0, "empty date literal"));
    }

    // an unseparated run fixes the width of every field up front
    let run = s
        .iter()
        .take_while(|&&ch| ch.is_ascii_digit() || ch == b'T')
        .count();
    let unseparated = run == s.len() || s[run] == b'.';
    let mut year_len = if !unseparated || run == 4 || run == 8 || run >= 14 {
        4
    } else {
        2
    };

    let mut values = [0u32; MAX_DATE_PARTS];
    let mut lens = [0usize; MAX_DATE_PARTS];
    let mut pos = 0;
    let mut index = 0;
    let mut field_len = year_len;

    while pos < s.len() && s[pos].is_ascii_digit() && index < MAX_DATE_PARTS {
        let start = pos;
        let bounded = unseparated || index == 6;
        let mut value = 0u32;
        while pos < s.len() && s[pos].is_ascii_digit() && (!bounded || pos - start < field_len) {
            value = value
                .saturating_mul(10)
                .saturating_add((s[pos] - b'0') as u32);
            pos += 1;
        }
        values[index] = value;
        lens[index] = pos - start;
        field_len = 2;

        if pos == s.len() {
            index += 1;
            break;
        }

        if index == 2 && s[pos] == b'T' {
            pos += 1;
            index += 1;
            continue;
        }

        if index == 5 {
            if s[pos] == b'.' {
                pos += 1;
                field_len = 6;
            } else if s[pos].is_ascii_digit() {
                index += 1;
                break;
            }
            index += 1;
            continue;
        }

        while pos < s.len() && (s[pos].is_ascii_punctuation() || s[pos].is_ascii_whitespace()) {
            if s[pos].is_ascii_whitespace() && (1 << index) & ALLOW_SPACE_MASK == 0 {
                return Err(invalid_at(s, pos, "unexpected whitespace"));
            }
            pos += 1;
        }
        index += 1;
    }

    let field_count = index;
    if field_count < 3 {
        return Err(invalid_at(s, pos, "expected at least year, month and day"));
    }

    if !unseparated {
        year_len = lens[0];
    }
    if year_len == 2 {
        values[0] = two_digit_year(values[0]);
    }
    if lens[6] > 0 {
        values[6] = values[6].saturating_mul(POW10[6 - lens[6]]);
    }

    let fields = Fields::from_ymd_hms(
        values[0], values[1], values[2], values[3], values[4], values[5], values[6],
    )
    .validate(input)?;
    let kind = if field_count == 3 {
        DateKind::Date
    } else {
        DateKind::DateTime
    };
    Ok((fields, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn assert_parse(input: &str, kind: DateKind, expected: (u32, u32, u32, u32, u32, u32, u32)) {
        let (f, k) = parse_loose(input).unwrap();
        assert_eq!(k, kind, "{}", input);
        assert_eq!(
            (
                f.year,
                f.month,
                f.day,
                f.hour,
                f.minute,
                f.second,
                f.microsecond
            ),
            expected,
            "{}",
            input
        );
    }

    #[test]
    fn test_parse_separated() {
        assert_parse("2021-01-06", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse("2021/1/6", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse("  2021-01-06  ", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse(
            "2021-01-06 10:11:12",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 0),
        );
        assert_parse(
            "2021-01-06T10:11:12",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 0),
        );
        assert_parse(
            "2021-01-06 10:11:12.123456",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 123456),
        );
        // a short fraction is half a second, not five microseconds
        assert_parse(
            "2021-01-06 10:11:12.5",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 500000),
        );
        assert_parse(
            "2021-01-06 10:11:12.05",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 50000),
        );
        assert_parse(
            "2021-01-06 10:11",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 0, 0),
        );
        // digits past six fractional ones are dropped
        assert_parse(
            "2021-01-06 10:11:12.1234567",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 123456),
        );
    }

    #[test]
    fn test_parse_unseparated() {
        assert_parse("20210106", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse("210106", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse("700106", DateKind::Date, (1970, 1, 6, 0, 0, 0, 0));
        assert_parse(
            "20210106101112",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 0),
        );
        assert_parse(
            "20210106101112.000001",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 1),
        );
        assert_parse(
            "20210106T101112",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 0),
        );
    }

    #[test]
    fn test_parse_two_digit_year() {
        assert_parse("70-01-01", DateKind::Date, (1970, 1, 1, 0, 0, 0, 0));
        assert_parse("69-01-01", DateKind::Date, (2069, 1, 1, 0, 0, 0, 0));
        assert_parse("00-01-01", DateKind::Date, (2000, 1, 1, 0, 0, 0, 0));
        // any other width is taken as is
        assert_parse("021-01-01", DateKind::Date, (21, 1, 1, 0, 0, 0, 0));
    }

    #[test]
    fn test_parse_trailing() {
        assert_parse("2021-01-06 abc", DateKind::Date, (2021, 1, 6, 0, 0, 0, 0));
        assert_parse(
            "2021-01-06 10:11:12 +08:00",
            DateKind::DateTime,
            (2021, 1, 6, 10, 11, 12, 0),
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_loose(""), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_loose("   "), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_loose("2021-01"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_loose("abc"), Err(Error::InvalidFormat(_))));
        // whitespace is only allowed after the day and the fraction
        assert!(matches!(
            parse_loose("2021 01 06"),
            Err(Error::InvalidFormat(_))
        ));
        assert_eq!(
            parse_loose("2021 01 06").unwrap_err(),
            Error::InvalidFormat(
                "date literal [2021 01 06] is invalid at position 4: unexpected whitespace"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(parse_loose("2024-02-29").is_ok());
        assert!(matches!(
            parse_loose("2023-02-29"),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            parse_loose("2021-13-01"),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            parse_loose("2021-01-01 24:00:00"),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            parse_loose("99999999999-01-01"),
            Err(Error::OutOfRange(_))
        ));
    }
}
