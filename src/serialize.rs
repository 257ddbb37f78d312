//! Impl the `serde::Serialize` and `serde::Deserialize` traits.
//!
//! Human readable formats get `"<type> <literal>"`, e.g. `"DATETIMEV2(3) 2021-01-06 10:11:12.500000"`.
//! The literal of a datetime kind always carries all six fractional digits,
//! whatever the scale of its type.
//! Binary formats get the persisted record followed by one byte of scale.

use crate::codec::record_len;
use crate::{DateKind, DateType, DateValue};
use serde_crate::de::Visitor;
use serde_crate::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Cursor, Read};

impl Serialize for DateValue {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let mut text = try_format!("{} ", self.date_type()).map_err(ser::Error::custom)?;
            self.write_text(&mut text, self.kind(), DateType::MAX_SCALE)
                .map_err(ser::Error::custom)?;
            serializer.serialize_str(&text)
        } else {
            let mut buf = Vec::with_capacity(record_len(self.kind()) + 1);
            self.write_to(&mut buf).map_err(ser::Error::custom)?;
            buf.push(self.date_type().scale());
            serializer.serialize_bytes(&buf)
        }
    }
}

impl<'de> Deserialize<'de> for DateValue {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DateValueVisitor;

        impl<'de> Visitor<'de> for DateValueVisitor {
            type Value = DateValue;

            #[inline]
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a DateValue")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let (ty, text) = match v.find(' ') {
                    Some(pos) => (&v[..pos], &v[pos + 1..]),
                    None => {
                        return Err(de::Error::invalid_value(de::Unexpected::Str(v), &self))
                    }
                };
                let ty: DateType = ty.parse().map_err(de::Error::custom)?;
                DateValue::parse(text, ty).map_err(de::Error::custom)
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let mut cursor = Cursor::new(v);
                let value = DateValue::read_from(&mut cursor).map_err(de::Error::custom)?;
                let mut scale = [0u8; 1];
                cursor
                    .read_exact(&mut scale)
                    .map_err(|_| de::Error::invalid_length(v.len(), &self))?;
                match value.kind() {
                    DateKind::DateTimePrecise => {
                        let ty =
                            DateType::datetime_precise(scale[0]).map_err(de::Error::custom)?;
                        value.cast(ty).map_err(de::Error::custom)
                    }
                    _ => Ok(value),
                }
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(DateValueVisitor)
        } else {
            deserializer.deserialize_bytes(DateValueVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_value(input: &str, ty: DateType, json: &str) {
        let value = DateValue::parse(input, ty).unwrap();
        let value_json = serde_json::to_string(&value).unwrap();
        assert_eq!(value_json, json);
        let json_decode: DateValue = serde_json::from_str(&value_json).unwrap();
        assert_eq!(json_decode, value);
        assert_eq!(json_decode.date_type().scale(), ty.scale());

        let bin = bincode::serialize(&value).unwrap();
        let bin_decode: DateValue = bincode::deserialize(&bin).unwrap();
        assert_eq!(bin_decode, value);
        assert_eq!(bin_decode.date_type().scale(), ty.scale());
    }

    #[test]
    fn test_serde_date_value() {
        test_value("2021-01-06", DateType::DATE, r#""DATE 2021-01-06""#);
        test_value("0000-01-01", DateType::DATEV2, r#""DATEV2 0000-01-01""#);
        test_value(
            "2021-01-06 10:11:12",
            DateType::DATETIME,
            r#""DATETIME 2021-01-06 10:11:12.000000""#,
        );
        test_value(
            "9999-12-31 23:59:59.999999",
            DateType::datetime_precise(6).unwrap(),
            r#""DATETIMEV2(6) 9999-12-31 23:59:59.999999""#,
        );
        test_value(
            "2021-01-06 10:11:12.5",
            DateType::datetime_precise(3).unwrap(),
            r#""DATETIMEV2(3) 2021-01-06 10:11:12.500000""#,
        );
        // fractions below the scale of the type survive
        test_value(
            "2021-01-06 10:11:12.500000",
            DateType::datetime_precise(0).unwrap(),
            r#""DATETIMEV2(0) 2021-01-06 10:11:12.500000""#,
        );
        test_value(
            "2021-01-06 10:11:12.5",
            DateType::DATETIME,
            r#""DATETIME 2021-01-06 10:11:12.500000""#,
        );
        test_value(
            "2021-01-06 10:11:12.000001",
            DateType::DATETIME,
            r#""DATETIME 2021-01-06 10:11:12.000001""#,
        );
    }

    #[test]
    fn test_serde_error() {
        assert!(serde_json::from_str::<DateValue>(r#""2021-01-06""#).is_err());
        assert!(serde_json::from_str::<DateValue>(r#""INT 2021-01-06""#).is_err());
        assert!(serde_json::from_str::<DateValue>(r#""DATE 2023-02-29""#).is_err());

        let value = DateValue::parse("2021-01-06", DateType::DATEV2).unwrap();
        let mut bin = bincode::serialize(&value).unwrap();
        bin.pop();
        assert!(bincode::deserialize::<DateValue>(&bin).is_err());
        assert_eq!(value.kind(), DateKind::DateV2);
    }
}
