//! 64-bit packed layouts and the persisted record of a date literal.
//!
//! A record starts with the big-endian `u16` kind tag followed by the value
//! packed in the legacy layout. The precision-aware kinds append a second
//! word packed in their own layout, which takes precedence when read back.

use crate::error::Result;
use crate::fields::Fields;
use crate::kind::DateKind;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::warn;
use std::convert::TryFrom;
use std::io::{Read, Write};

const MICROSECOND_BITS: u32 = 24;
const HMS_BITS: u32 = 17;
const DAY_BITS: u32 = 5;
const V2_MONTH_BITS: u32 = 4;

/// Packs with the layout shared by `Date` and `DateTime`.
#[inline]
pub const fn pack_legacy(f: &Fields) -> u64 {
    let ymd = (((f.year as u64) * 13 + f.month as u64) << DAY_BITS) | f.day as u64;
    let hms = ((f.hour as u64) << 12) | ((f.minute as u64) << 6) | f.second as u64;
    // the microsecond is added, not or-ed, into the low bits
    (((ymd << HMS_BITS) | hms) << MICROSECOND_BITS) + f.microsecond as u64
}

#[inline]
pub const fn unpack_legacy(packed: u64) -> Fields {
    let ymd = ymd_of(packed);
    let ym = ymd >> DAY_BITS;
    let mut f = unpack_time(packed);
    f.day = (ymd % (1 << DAY_BITS)) as u32;
    f.month = (ym % 13) as u32;
    f.year = ((ym / 13) % 10000) as u32;
    f
}

/// Packs with the bit-field layout of `DateV2` and `DateTimePrecise`.
#[inline]
pub const fn pack_v2(f: &Fields) -> u64 {
    ((f.year as u64) << 50)
        | ((f.month as u64) << 46)
        | ((f.day as u64) << 41)
        | ((f.hour as u64) << 36)
        | ((f.minute as u64) << 30)
        | ((f.second as u64) << 24)
        | f.microsecond as u64
}

#[inline]
pub const fn unpack_v2(packed: u64) -> Fields {
    let ymd = ymd_of(packed);
    let ym = ymd >> DAY_BITS;
    let mut f = unpack_time(packed);
    f.day = (ymd % (1 << DAY_BITS)) as u32;
    f.month = (ym % (1 << V2_MONTH_BITS)) as u32;
    f.year = (ym >> V2_MONTH_BITS) as u32;
    f
}

#[inline]
const fn ymd_of(packed: u64) -> u64 {
    (packed >> MICROSECOND_BITS) >> HMS_BITS
}

#[inline]
const fn unpack_time(packed: u64) -> Fields {
    let hms = (packed >> MICROSECOND_BITS) % (1 << HMS_BITS);
    Fields::from_ymd_hms(
        0,
        0,
        0,
        (hms >> 12) as u32,
        ((hms >> 6) % (1 << 6)) as u32,
        (hms % (1 << 6)) as u32,
        (packed % (1 << MICROSECOND_BITS)) as u32,
    )
}

/// Packs with the layout the kind selects.
#[inline]
pub const fn pack(f: &Fields, kind: DateKind) -> u64 {
    if kind.is_v2() {
        pack_v2(f)
    } else {
        pack_legacy(f)
    }
}

#[inline]
pub const fn unpack(packed: u64, kind: DateKind) -> Fields {
    if kind.is_v2() {
        unpack_v2(packed)
    } else {
        unpack_legacy(packed)
    }
}

/// Writes the kind tag and the packed words.
pub fn write_record<W: Write>(w: &mut W, f: &Fields, kind: DateKind) -> Result<()> {
    w.write_u16::<BigEndian>(kind as u16)?;
    w.write_u64::<BigEndian>(pack_legacy(f))?;
    if kind.is_v2() {
        w.write_u64::<BigEndian>(pack_v2(f))?;
    }
    Ok(())
}

/// Reads a record, returning the unvalidated fields and the tagged kind.
pub fn read_record<R: Read>(r: &mut R) -> Result<(Fields, DateKind)> {
    let tag = r.read_u16::<BigEndian>()?;
    let kind = DateKind::try_from(tag).map_err(|e| {
        warn!("unknown date literal type tag {} in record", tag);
        e
    })?;

    let mut fields = unpack_legacy(r.read_u64::<BigEndian>()?);
    if kind.is_v2() {
        fields = unpack_v2(r.read_u64::<BigEndian>()?);
    }
    Ok((fields, kind))
}

/// Size in bytes of the record of a kind.
#[inline]
pub const fn record_len(kind: DateKind) -> usize {
    if kind.is_v2() {
        2 + 8 + 8
    } else {
        2 + 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    fn samples() -> Vec<Fields> {
        vec![
            Fields::from_ymd(0, 1, 1),
            Fields::from_ymd(1970, 1, 1),
            Fields::from_ymd(2024, 2, 29),
            Fields::from_ymd(9999, 12, 31),
            Fields::from_ymd(2021, 0, 0),
            Fields::from_ymd_hms(2021, 1, 6, 10, 11, 12, 0),
            Fields::from_ymd_hms(2021, 1, 6, 23, 59, 59, 999999),
            Fields::from_ymd_hms(9999, 12, 31, 23, 59, 59, 999999),
        ]
    }

    #[test]
    fn test_pack_legacy() {
        let f = Fields::from_ymd_hms(2021, 1, 6, 10, 11, 12, 13);
        let ymd = ((2021u64 * 13 + 1) << 5) | 6;
        let hms = (10u64 << 12) | (11 << 6) | 12;
        assert_eq!(pack_legacy(&f), (((ymd << 17) | hms) << 24) + 13);

        for f in samples() {
            assert_eq!(unpack_legacy(pack_legacy(&f)), f);
        }
    }

    #[test]
    fn test_pack_v2() {
        let f = Fields::from_ymd_hms(2021, 1, 6, 10, 11, 12, 13);
        assert_eq!(
            pack_v2(&f),
            (2021u64 << 50) | (1 << 46) | (6 << 41) | (10 << 36) | (11 << 30) | (12 << 24) | 13
        );

        for f in samples() {
            assert_eq!(unpack_v2(pack_v2(&f)), f);
        }
    }

    #[test]
    fn test_layouts_differ() {
        let f = Fields::from_ymd(2021, 1, 6);
        assert_ne!(pack_legacy(&f), pack_v2(&f));
        assert_eq!(pack(&f, DateKind::Date), pack_legacy(&f));
        assert_eq!(pack(&f, DateKind::DateV2), pack_v2(&f));
        assert_eq!(unpack(pack_v2(&f), DateKind::DateTimePrecise), f);
    }

    #[test]
    fn test_record() {
        let f = Fields::from_ymd_hms(2021, 1, 6, 10, 11, 12, 500000);
        for kind in [
            DateKind::DateTime,
            DateKind::Date,
            DateKind::DateTimePrecise,
            DateKind::DateV2,
        ] {
            let mut buf = Vec::new();
            write_record(&mut buf, &f, kind).unwrap();
            assert_eq!(buf.len(), record_len(kind));
            assert_eq!(&buf[..2], &(kind as u16).to_be_bytes());

            let (decoded, decoded_kind) = read_record(&mut Cursor::new(&buf)).unwrap();
            assert_eq!(decoded, f);
            assert_eq!(decoded_kind, kind);
        }
    }

    #[test]
    fn test_record_v2_word_wins() {
        let mut buf = Vec::new();
        buf.write_u16::<BigEndian>(DateKind::DateV2 as u16).unwrap();
        buf.write_u64::<BigEndian>(pack_legacy(&Fields::from_ymd(2000, 1, 1)))
            .unwrap();
        buf.write_u64::<BigEndian>(pack_v2(&Fields::from_ymd(2021, 1, 6)))
            .unwrap();
        let (decoded, _) = read_record(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, Fields::from_ymd(2021, 1, 6));
    }

    #[test]
    fn test_record_error() {
        let buf = [0u8, 9, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            read_record(&mut Cursor::new(&buf[..])),
            Err(Error::InvalidFormat(_))
        ));

        // a precision-aware record missing its second word
        let mut buf = Vec::new();
        write_record(&mut buf, &Fields::from_ymd(2021, 1, 6), DateKind::DateV2).unwrap();
        buf.truncate(10);
        assert!(matches!(
            read_record(&mut Cursor::new(&buf)),
            Err(Error::IoError(_))
        ));
    }
}
