//! Date literal kinds and the type descriptor carrying the fractional scale.

use crate::error::{Error, Result};
use crate::util::StrExt;
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The four date/datetime variants a literal can represent.
///
/// The discriminant is the tag written in front of a persisted literal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum DateKind {
    /// Legacy datetime, seconds precision.
    DateTime = 0,
    /// Legacy date.
    Date = 1,
    /// Datetime with a fractional seconds scale.
    DateTimePrecise = 2,
    /// Date stored in the precision-aware layout.
    DateV2 = 3,
}

impl DateKind {
    /// Whether values of this kind carry no time of day.
    #[inline]
    pub const fn is_date_only(self) -> bool {
        matches!(self, DateKind::Date | DateKind::DateV2)
    }

    /// Whether this kind is packed with the precision-aware layout.
    #[inline]
    pub const fn is_v2(self) -> bool {
        matches!(self, DateKind::DateV2 | DateKind::DateTimePrecise)
    }

    /// Returns the precision-aware counterpart of a legacy kind.
    #[inline]
    pub const fn to_v2(self) -> Self {
        match self {
            DateKind::Date => DateKind::DateV2,
            DateKind::DateTime => DateKind::DateTimePrecise,
            kind => kind,
        }
    }

    /// Returns the legacy counterpart of a precision-aware kind.
    #[inline]
    pub const fn to_legacy(self) -> Self {
        match self {
            DateKind::DateV2 => DateKind::Date,
            DateKind::DateTimePrecise => DateKind::DateTime,
            kind => kind,
        }
    }

    /// The SQL type name of the kind.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            DateKind::Date => "DATE",
            DateKind::DateTime => "DATETIME",
            DateKind::DateV2 => "DATEV2",
            DateKind::DateTimePrecise => "DATETIMEV2",
        }
    }
}

impl TryFrom<u16> for DateKind {
    type Error = Error;

    #[inline]
    fn try_from(tag: u16) -> Result<Self> {
        match tag {
            0 => Ok(DateKind::DateTime),
            1 => Ok(DateKind::Date),
            2 => Ok(DateKind::DateTimePrecise),
            3 => Ok(DateKind::DateV2),
            _ => Err(Error::InvalidFormat(try_format!(
                "error date literal type: {}",
                tag
            )?)),
        }
    }
}

impl FromStr for DateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        for kind in [
            DateKind::Date,
            DateKind::DateTime,
            DateKind::DateV2,
            DateKind::DateTimePrecise,
        ] {
            if name.eq_ignore_ascii_case(kind.name()) {
                return Ok(kind);
            }
        }
        Err(Error::UnsupportedConversion(try_format!(
            "cannot convert date literal to type {}",
            name
        )?))
    }
}

impl fmt::Display for DateKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type descriptor of a date literal: the kind plus the declared scale of
/// fractional seconds.
///
/// Two descriptors are equal when their kinds are equal; the scale only
/// drives how many fractional digits are displayed.
#[derive(Copy, Clone, Debug)]
pub struct DateType {
    kind: DateKind,
    scale: u8,
}

impl DateType {
    /// The largest scale, i.e. microseconds.
    pub const MAX_SCALE: u8 = 6;

    /// Size in bytes of a packed value.
    pub const WIDTH: usize = 8;

    pub const DATE: Self = DateType::new(DateKind::Date);
    pub const DATETIME: Self = DateType::new(DateKind::DateTime);
    pub const DATEV2: Self = DateType::new(DateKind::DateV2);
    pub const DATETIMEV2: Self = DateType::new(DateKind::DateTimePrecise);

    /// Creates a descriptor with scale 0.
    #[inline]
    pub const fn new(kind: DateKind) -> Self {
        DateType { kind, scale: 0 }
    }

    /// Creates a precision-aware datetime descriptor with the given scale.
    #[inline]
    pub fn datetime_precise(scale: u8) -> Result<Self> {
        if scale > Self::MAX_SCALE {
            return Err(Error::OutOfRange(try_format!(
                "scale of datetime must be between 0 and {}, got {}",
                Self::MAX_SCALE,
                scale
            )?));
        }
        Ok(DateType {
            kind: DateKind::DateTimePrecise,
            scale,
        })
    }

    #[inline]
    pub const fn kind(self) -> DateKind {
        self.kind
    }

    /// Declared fractional seconds scale, always 0 unless the kind is `DateTimePrecise`.
    #[inline]
    pub const fn scale(self) -> u8 {
        self.scale
    }

    #[inline]
    pub const fn width(self) -> usize {
        Self::WIDTH
    }

    /// The kind the catalog stores this type as.
    #[inline]
    pub const fn catalog_kind(self) -> DateKind {
        match self.kind {
            DateKind::DateTimePrecise => DateKind::DateTime,
            kind => kind,
        }
    }
}

impl From<DateKind> for DateType {
    #[inline]
    fn from(kind: DateKind) -> Self {
        DateType::new(kind)
    }
}

impl PartialEq for DateType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for DateType {}

impl Hash for DateType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state)
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            DateKind::DateTimePrecise => write!(f, "{}({})", self.kind, self.scale),
            kind => write!(f, "{}", kind),
        }
    }
}

impl FromStr for DateType {
    type Err = Error;

    /// Parses `DATE`, `DATETIME`, `DATEV2`, `DATETIMEV2` or `DATETIMEV2(<scale>)`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.find('(') {
            Some(open) if s.ends_with(')') => {
                let kind: DateKind = s[..open].parse()?;
                if kind != DateKind::DateTimePrecise {
                    return Err(Error::UnsupportedConversion(try_format!(
                        "type {} does not take a scale",
                        kind
                    )?));
                }
                let scale = s[open + 1..s.len() - 1].trim().parse::<u8>().map_err(|_| {
                    match "invalid scale of datetime".try_to_string() {
                        Ok(msg) => Error::InvalidFormat(msg),
                        Err(e) => e,
                    }
                })?;
                DateType::datetime_precise(scale)
            }
            _ => Ok(DateType::new(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag() {
        for kind in [
            DateKind::DateTime,
            DateKind::Date,
            DateKind::DateTimePrecise,
            DateKind::DateV2,
        ] {
            assert_eq!(DateKind::try_from(kind as u16).unwrap(), kind);
        }
        assert_eq!(DateKind::DateTime as u16, 0);
        assert_eq!(DateKind::Date as u16, 1);
        assert_eq!(DateKind::DateTimePrecise as u16, 2);
        assert_eq!(DateKind::DateV2 as u16, 3);
        assert!(matches!(
            DateKind::try_from(4),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_kind_name() {
        assert_eq!("date".parse::<DateKind>().unwrap(), DateKind::Date);
        assert_eq!(
            "DateTimeV2".parse::<DateKind>().unwrap(),
            DateKind::DateTimePrecise
        );
        assert!(matches!(
            "INT".parse::<DateKind>(),
            Err(Error::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_kind_conversion() {
        assert_eq!(DateKind::Date.to_v2(), DateKind::DateV2);
        assert_eq!(DateKind::DateTime.to_v2(), DateKind::DateTimePrecise);
        assert_eq!(DateKind::DateV2.to_v2(), DateKind::DateV2);
        assert_eq!(DateKind::DateTimePrecise.to_legacy(), DateKind::DateTime);
        assert!(DateKind::DateV2.is_date_only());
        assert!(!DateKind::DateTimePrecise.is_date_only());
    }

    #[test]
    fn test_date_type() {
        let t3 = DateType::datetime_precise(3).unwrap();
        let t6 = DateType::datetime_precise(6).unwrap();
        assert_eq!(t3, t6);
        assert_eq!(t3.scale(), 3);
        assert_eq!(t3.width(), 8);
        assert_eq!(t3.catalog_kind(), DateKind::DateTime);
        assert_eq!(DateType::DATEV2.catalog_kind(), DateKind::DateV2);
        assert!(matches!(
            DateType::datetime_precise(7),
            Err(Error::OutOfRange(_))
        ));

        assert_eq!(t3.to_string(), "DATETIMEV2(3)");
        assert_eq!(DateType::DATE.to_string(), "DATE");

        let parsed: DateType = "datetimev2(3)".parse().unwrap();
        assert_eq!(parsed.kind(), DateKind::DateTimePrecise);
        assert_eq!(parsed.scale(), 3);
        assert_eq!("DATEV2".parse::<DateType>().unwrap(), DateType::DATEV2);
        assert!("DATE(3)".parse::<DateType>().is_err());
        assert!("DATETIMEV2(9)".parse::<DateType>().is_err());
        assert!("DATETIMEV2(x)".parse::<DateType>().is_err());
    }
}
