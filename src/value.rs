//! The date literal value.

use crate::codec::{self, pack_v2};
use crate::common::{
    DATE_MAX_YEAR, DATE_MIN_YEAR, HOURS_PER_DAY, MINUTES_PER_HOUR, POW10, SECONDS_PER_MINUTE,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fields::Fields;
use crate::format::Formatter;
use crate::kind::{DateKind, DateType};
use crate::parse::parse_loose;
use crate::util::{write_u32, StrExt};
use chrono::{Duration, FixedOffset, Months, NaiveDate, NaiveDateTime};
use log::debug;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::io::{Read, Write};

/// Unix milliseconds beyond this distance from the epoch are far outside `0000..=9999`.
const MAX_ABS_UNIX_MILLIS: u64 = 1_000_000_000_000_000;

/// Offsets beyond this many seconds always leave `0000..=9999`.
const MAX_ABS_OFFSET_SECONDS: u64 = 1_000_000_000_000;

/// A date or datetime literal.
///
/// Values are always validated: a date-only kind never carries a time of day
/// and every field lies within `0000-01-01 00:00:00` to `9999-12-31 23:59:59.999999`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateValue {
    fields: Fields,
    ty: DateType,
}

impl DateValue {
    #[inline]
    pub(crate) const fn from_fields_unchecked(fields: Fields, ty: DateType) -> Self {
        DateValue { fields, ty }
    }

    /// Validates `fields` and enforces the invariant of date-only kinds.
    fn from_fields(fields: Fields, ty: DateType) -> Result<Self> {
        if !(fields.is_in_range() && fields.is_valid_date()) {
            return Err(Error::OutOfRange(try_format!(
                "date literal {} is out of range",
                DateValue::from_fields_unchecked(fields, DateType::DATETIMEV2)
            )?));
        }
        let fields = if ty.kind().is_date_only() {
            fields.truncate_time()
        } else {
            fields
        };
        Ok(DateValue::from_fields_unchecked(fields, ty))
    }

    /// The smallest value of a type: `0000-01-01` or `0000-01-01 00:00:00`.
    #[inline]
    pub const fn min_value(ty: DateType) -> Self {
        DateValue::from_fields_unchecked(Fields::from_ymd(DATE_MIN_YEAR, 1, 1), ty)
    }

    /// The largest value of a type: `9999-12-31` or `9999-12-31 23:59:59`.
    #[inline]
    pub const fn max_value(ty: DateType) -> Self {
        let fields = if ty.kind().is_date_only() {
            Fields::from_ymd(DATE_MAX_YEAR, 12, 31)
        } else {
            Fields::from_ymd_hms(
                DATE_MAX_YEAR,
                12,
                31,
                HOURS_PER_DAY - 1,
                MINUTES_PER_HOUR - 1,
                SECONDS_PER_MINUTE - 1,
                0,
            )
        };
        DateValue::from_fields_unchecked(fields, ty)
    }

    /// Creates a value of a date-only kind.
    pub fn from_ymd(year: u32, month: u32, day: u32, kind: DateKind) -> Result<Self> {
        if !kind.is_date_only() {
            return Err(Error::UnsupportedConversion(try_format!(
                "date only constructor cannot create {}",
                kind
            )?));
        }
        DateValue::from_fields(Fields::from_ymd(year, month, day), DateType::new(kind))
    }

    /// Creates a value of a datetime kind.
    #[inline]
    pub fn from_ymd_hms(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        ty: DateType,
    ) -> Result<Self> {
        DateValue::from_ymd_hms_micro(year, month, day, hour, minute, second, 0, ty)
    }

    /// Creates a value of a datetime kind with fractional seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn from_ymd_hms_micro(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        ty: DateType,
    ) -> Result<Self> {
        if ty.kind().is_date_only() {
            return Err(Error::UnsupportedConversion(try_format!(
                "datetime constructor cannot create {}",
                ty
            )?));
        }
        let fields =
            Fields::from_ymd_hms(year, month, day, hour, minute, second, microsecond);
        DateValue::from_fields(fields, ty)
    }

    /// Creates a date of the kind `config` picks for plain dates.
    #[inline]
    pub fn from_ymd_default(year: u32, month: u32, day: u32, config: &Config) -> Result<Self> {
        DateValue::from_ymd(year, month, day, config.date_type().kind())
    }

    /// Creates a datetime of the kind `config` picks for plain datetimes.
    #[inline]
    pub fn from_ymd_hms_default(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        config: &Config,
    ) -> Result<Self> {
        DateValue::from_ymd_hms(year, month, day, hour, minute, second, config.datetime_type())
    }

    /// Creates the local date/time at `offset` of a Unix timestamp in milliseconds.
    pub fn from_unix_millis(millis: i64, offset: &FixedOffset, ty: DateType) -> Result<Self> {
        let local = if millis.unsigned_abs() < MAX_ABS_UNIX_MILLIS {
            unix_epoch()?
                .checked_add_signed(Duration::milliseconds(millis))
                .and_then(|dt| {
                    dt.checked_add_signed(Duration::seconds(offset.local_minus_utc() as i64))
                })
        } else {
            None
        };

        match local.as_ref().and_then(Fields::from_naive) {
            Some(fields) => DateValue::from_fields(fields, ty),
            None => Err(Error::OutOfRange(try_format!(
                "unix timestamp {} ms is out of range",
                millis
            )?)),
        }
    }

    /// Unix timestamp in milliseconds, at second precision, of the value
    /// read as a local date/time at `offset`.
    pub fn unix_millis(&self, offset: &FixedOffset) -> Result<i64> {
        let local = self.to_naive()?;
        let seconds = local
            .signed_duration_since(unix_epoch()?)
            .num_seconds()
            - offset.local_minus_utc() as i64;
        Ok(seconds * 1000)
    }

    /// Parses a delimiter tolerant literal and converts it to `ty`.
    ///
    /// Fractional seconds count from the decimal point, so `10:11:12.5` holds
    /// 500000 microseconds. MySQL compatible engines that store the digits as
    /// written would read it as 5.
    pub fn parse<S: AsRef<str>>(input: S, ty: DateType) -> Result<Self> {
        let input = input.as_ref();
        DateValue::parse_loose(input)
            .and_then(|value| value.cast(ty))
            .map_err(|e| {
                debug!("rejected date literal {:?} as {}: {}", input, ty, e);
                e
            })
    }

    /// Parses a delimiter tolerant literal, keeping the inferred `Date` or `DateTime` kind.
    /// Fractional seconds are read as in [`DateValue::parse`].
    #[inline]
    pub fn parse_loose<S: AsRef<str>>(input: S) -> Result<Self> {
        let (fields, kind) = parse_loose(input.as_ref())?;
        Ok(DateValue::from_fields_unchecked(fields, DateType::new(kind)))
    }

    /// Parses a literal with a MySQL style pattern and converts it to `ty`.
    pub fn parse_with_pattern<S1: AsRef<str>, S2: AsRef<str>>(
        input: S1,
        pattern: S2,
        ty: DateType,
    ) -> Result<Self> {
        let (input, pattern) = (input.as_ref(), pattern.as_ref());
        with_formatter(pattern, |p| Formatter::try_new(p), |formatter| {
            formatter.parse_with_type(input, ty)
        })
        .map_err(|e| {
            debug!(
                "rejected date literal {:?} with pattern {:?}: {}",
                input, pattern, e
            );
            e
        })
    }

    /// Whether a MySQL style pattern declares a time of day.
    #[inline]
    pub fn has_time_part<S: AsRef<str>>(pattern: S) -> Result<bool> {
        with_formatter(pattern.as_ref(), |p| Formatter::try_new(p), |formatter| {
            Ok(formatter.has_time_part())
        })
    }

    /// Formats with a MySQL style pattern.
    pub fn format<S: AsRef<str>>(&self, pattern: S) -> Result<String> {
        with_formatter(pattern.as_ref(), |p| Formatter::try_new_for_output(p), |formatter| {
            let mut s = String::new();
            formatter.format(self, &mut s)?;
            Ok(s)
        })
    }

    #[inline]
    pub(crate) const fn fields(&self) -> Fields {
        self.fields
    }

    #[inline]
    pub const fn kind(&self) -> DateKind {
        self.ty.kind()
    }

    #[inline]
    pub const fn date_type(&self) -> DateType {
        self.ty
    }

    #[inline]
    pub const fn year(&self) -> u32 {
        self.fields.year
    }

    #[inline]
    pub const fn month(&self) -> u32 {
        self.fields.month
    }

    #[inline]
    pub const fn day(&self) -> u32 {
        self.fields.day
    }

    #[inline]
    pub const fn hour(&self) -> u32 {
        self.fields.hour
    }

    #[inline]
    pub const fn minute(&self) -> u32 {
        self.fields.minute
    }

    #[inline]
    pub const fn second(&self) -> u32 {
        self.fields.second
    }

    #[inline]
    pub const fn microsecond(&self) -> u32 {
        self.fields.microsecond
    }

    /// `yyyymmddhhmmss` as an integer. Fractional seconds are not part of it.
    #[inline]
    pub const fn long_value(&self) -> i64 {
        let f = &self.fields;
        (f.year as i64 * 10000 + f.month as i64 * 100 + f.day as i64) * 1_000_000
            + f.hour as i64 * 10000
            + f.minute as i64 * 100
            + f.second as i64
    }

    #[inline]
    pub fn double_value(&self) -> f64 {
        self.long_value() as f64
    }

    /// The integer the execution engine holds for the value's kind.
    #[inline]
    pub const fn real_value(&self) -> i64 {
        let f = &self.fields;
        match self.ty.kind() {
            DateKind::Date => f.year as i64 * 16 * 32 + f.month as i64 * 32 + f.day as i64,
            DateKind::DateTime => self.long_value(),
            DateKind::DateV2 => ((f.year as i64) << 16) | ((f.month as i64) << 8) | f.day as i64,
            DateKind::DateTimePrecise => pack_v2(f) as i64,
        }
    }

    /// Orders by `long_value`, so values differing only in fractional
    /// seconds compare equal.
    #[inline]
    pub fn compare(&self, other: &DateValue) -> Ordering {
        self.long_value().cmp(&other.long_value())
    }

    /// The text the value hashes under when stored as `kind`.
    pub fn hash_string(&self, kind: DateKind) -> Result<String> {
        let scale = match kind {
            DateKind::DateTimePrecise => DateType::MAX_SCALE,
            _ => 0,
        };
        let mut s = String::new();
        self.write_text(&mut s, kind, scale)?;
        Ok(s)
    }

    /// The value quoted as a SQL literal.
    #[inline]
    pub fn to_sql(&self) -> Result<String> {
        try_format!("'{}'", self)
    }

    /// Whether the value is the minimum of its date or datetime family.
    #[inline]
    pub fn is_min_value(&self) -> bool {
        self.fields == DateValue::min_value(self.ty).fields
    }

    /// Converts to another kind. Date-only kinds drop the time of day; every
    /// other conversion keeps the fields and only changes the kind.
    pub fn cast(&self, ty: DateType) -> Result<Self> {
        DateValue::from_fields(self.fields, ty)
    }

    /// Truncates to the date kind `config` picks for plain dates.
    #[inline]
    pub fn cast_to_date(&self, config: &Config) -> Result<Self> {
        self.cast(config.date_type())
    }

    /// Truncates fractional seconds to `scale` digits.
    pub fn rescale(&self, scale: u8) -> Result<Self> {
        if self.kind() != DateKind::DateTimePrecise {
            return Err(Error::UnsupportedConversion(try_format!(
                "cannot change the scale of {}",
                self.ty
            )?));
        }
        let ty = DateType::datetime_precise(scale)?;
        let unit = POW10[(DateType::MAX_SCALE - scale) as usize];
        let fields = Fields {
            microsecond: self.fields.microsecond / unit * unit,
            ..self.fields
        };
        DateValue::from_fields(fields, ty)
    }

    #[inline]
    pub fn add_years(&self, years: i64) -> Result<Self> {
        match years.checked_mul(12) {
            Some(months) => self.add_months(months),
            None => Err(self.offset_out_of_range()?),
        }
    }

    /// Adds months, clamping the day to the end of the target month.
    pub fn add_months(&self, months: i64) -> Result<Self> {
        let dt = self.to_naive()?;
        let count = match u32::try_from(months.unsigned_abs()) {
            Ok(count) => Months::new(count),
            Err(_) => return Err(self.offset_out_of_range()?),
        };
        let moved = if months >= 0 {
            dt.checked_add_months(count)
        } else {
            dt.checked_sub_months(count)
        };
        self.with_naive(moved)
    }

    #[inline]
    pub fn add_days(&self, days: i64) -> Result<Self> {
        self.add_offset(days, 24 * 60 * 60)
    }

    #[inline]
    pub fn add_hours(&self, hours: i64) -> Result<Self> {
        self.add_offset(hours, 60 * 60)
    }

    #[inline]
    pub fn add_minutes(&self, minutes: i64) -> Result<Self> {
        self.add_offset(minutes, 60)
    }

    #[inline]
    pub fn add_seconds(&self, seconds: i64) -> Result<Self> {
        self.add_offset(seconds, 1)
    }

    fn add_offset(&self, count: i64, unit_seconds: i64) -> Result<Self> {
        let seconds = match count.checked_mul(unit_seconds) {
            Some(seconds) if seconds.unsigned_abs() < MAX_ABS_OFFSET_SECONDS => seconds,
            _ => return Err(self.offset_out_of_range()?),
        };
        let dt = self.to_naive()?;
        self.with_naive(dt.checked_add_signed(Duration::seconds(seconds)))
    }

    fn with_naive(&self, dt: Option<NaiveDateTime>) -> Result<Self> {
        match dt.as_ref().and_then(Fields::from_naive) {
            Some(fields) => DateValue::from_fields(fields, self.ty),
            None => Err(self.offset_out_of_range()?),
        }
    }

    fn offset_out_of_range(&self) -> Result<Error> {
        Ok(Error::OutOfRange(try_format!(
            "date literal {} plus offset is out of range",
            self
        )?))
    }

    fn to_naive(&self) -> Result<NaiveDateTime> {
        match self.fields.to_naive() {
            Some(dt) => Ok(dt),
            None => Err(Error::OutOfRange(try_format!(
                "date literal {} is not a calendar date",
                self
            )?)),
        }
    }

    /// Packs with the layout of the value's kind.
    #[inline]
    pub const fn pack(&self) -> u64 {
        codec::pack(&self.fields, self.ty.kind())
    }

    /// Unpacks a word packed for `ty`.
    pub fn unpack(packed: u64, ty: DateType) -> Result<Self> {
        DateValue::decoded(codec::unpack(packed, ty.kind()), ty).map_err(|e| {
            debug!("rejected packed date literal {:#x}: {}", packed, e);
            e
        })
    }

    /// Writes the persisted record: kind tag then packed words.
    #[inline]
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        codec::write_record(w, &self.fields, self.ty.kind())
    }

    /// Reads a persisted record. The value gets scale 0.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let (fields, kind) = codec::read_record(r)?;
        DateValue::decoded(fields, DateType::new(kind)).map_err(|e| {
            debug!("rejected date literal record: {}", e);
            e
        })
    }

    fn decoded(fields: Fields, ty: DateType) -> Result<Self> {
        if ty.kind().is_date_only() && fields != fields.truncate_time() {
            return Err(Error::InvalidFormat(try_format!(
                "{} record carries a time of day",
                ty
            )?));
        }
        DateValue::from_fields(fields, ty)
    }

    /// Writes the date, then for datetime kinds the time and `scale` fractional digits.
    pub(crate) fn write_text<W: fmt::Write>(
        &self,
        mut w: W,
        kind: DateKind,
        scale: u8,
    ) -> Result<()> {
        let f = &self.fields;
        write_u32(&mut w, f.year, 4)?;
        w.write_char('-')?;
        write_u32(&mut w, f.month, 2)?;
        w.write_char('-')?;
        write_u32(&mut w, f.day, 2)?;
        if kind.is_date_only() {
            return Ok(());
        }

        w.write_char(' ')?;
        write_u32(&mut w, f.hour, 2)?;
        w.write_char(':')?;
        write_u32(&mut w, f.minute, 2)?;
        w.write_char(':')?;
        write_u32(&mut w, f.second, 2)?;
        if scale > 0 {
            w.write_char('.')?;
            let digits = f.microsecond / POW10[(DateType::MAX_SCALE - scale) as usize];
            write_u32(&mut w, digits, scale as usize)?;
        }
        Ok(())
    }
}

/// Runs `f` with the shared formatter of a default pattern, compiling any other pattern.
fn with_formatter<T>(
    pattern: &str,
    compile: impl FnOnce(&str) -> Result<Formatter>,
    f: impl FnOnce(&Formatter) -> Result<T>,
) -> Result<T> {
    match Formatter::cached(pattern) {
        Some(formatter) => f(formatter),
        None => f(&compile(pattern)?),
    }
}

#[inline]
fn unix_epoch() -> Result<NaiveDateTime> {
    match NaiveDate::from_ymd_opt(1970, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(dt) => Ok(dt),
        None => Err(Error::OutOfRange("unix epoch".try_to_string()?)),
    }
}

impl fmt::Display for DateValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_text(f, self.ty.kind(), self.ty.scale())
            .map_err(|_| fmt::Error)
    }
}
