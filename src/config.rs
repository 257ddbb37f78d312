//! Default-kind policy.

use crate::kind::{DateKind, DateType};

/// Configuration deciding which kind a date literal gets when the caller
/// asks for a plain date or datetime.
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Produce `DateV2`/`DateTimePrecise` instead of the legacy kinds.
    pub use_date_v2_by_default: bool,
}

impl Config {
    #[inline]
    pub const fn new() -> Self {
        Config {
            use_date_v2_by_default: false,
        }
    }

    #[inline]
    pub const fn with_date_v2_by_default(mut self, enabled: bool) -> Self {
        self.use_date_v2_by_default = enabled;
        self
    }

    /// Maps a legacy kind to the configured default; precision-aware kinds are kept.
    #[inline]
    pub const fn default_kind(&self, kind: DateKind) -> DateKind {
        if self.use_date_v2_by_default {
            kind.to_v2()
        } else {
            kind
        }
    }

    /// Kind of a plain date.
    #[inline]
    pub const fn date_type(&self) -> DateType {
        DateType::new(self.default_kind(DateKind::Date))
    }

    /// Kind of a plain datetime.
    #[inline]
    pub const fn datetime_type(&self) -> DateType {
        DateType::new(self.default_kind(DateKind::DateTime))
    }
}
