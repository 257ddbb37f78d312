//! This crate provides MySQL compatible SQL date/datetime literal values.
//!
//! A [`DateValue`] holds calendar fields together with one of four kinds:
//! the legacy `DATE`/`DATETIME` and the precision-aware `DATEV2`/`DATETIMEV2`.
//! Values are parsed from delimiter tolerant text or MySQL style patterns,
//! formatted back, packed into 64-bit words and persisted as tagged records.

#[macro_use]
mod util;

mod codec;
mod common;
mod config;
mod error;
mod fields;
mod format;
mod kind;
mod parse;
mod value;

#[cfg(feature = "serde")]
mod serialize;

pub use crate::common::{date_from_day_number, day_number, weekday, WeekMode};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::format::{Field, Formatter, DATETIME_FORMAT, DATE_FORMAT};
pub use crate::kind::{DateKind, DateType};
pub use crate::value::DateValue;
