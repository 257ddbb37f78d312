//! Utilities

use crate::error::{Error, Result};
use std::fmt;

pub trait StrExt {
    fn try_to_string(&self) -> Result<String>;
}

impl StrExt for str {
    #[inline]
    fn try_to_string(&self) -> Result<String> {
        let mut s = String::new();
        s.try_reserve(self.len())?;
        s.push_str(self);
        Ok(s)
    }
}

#[repr(transparent)]
struct StrBuf(String);

impl fmt::Write for StrBuf {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.try_reserve(s.len()).map_err(|_| fmt::Error)?;
        self.0.push_str(s);
        Ok(())
    }
}

#[inline]
pub fn try_format(args: fmt::Arguments<'_>) -> Result<String> {
    use fmt::Write;

    let mut output = StrBuf(String::new());
    output.write_fmt(args)?;
    Ok(output.0)
}

macro_rules! try_format {
    ($($arg:tt)*) => {{
        let res = $crate::util::try_format(format_args!($($arg)*));
        res
    }}
}

/// Builds an `InvalidFormat` error naming the input and the byte position the parser stopped at.
pub fn invalid_at(input: &[u8], pos: usize, reason: &str) -> Error {
    match try_format!(
        "date literal [{}] is invalid at position {}: {}",
        String::from_utf8_lossy(input),
        pos,
        reason
    ) {
        Ok(msg) => Error::InvalidFormat(msg),
        Err(e) => e,
    }
}

/// Writes `value` in decimal, left padded with zeros up to `width` digits.
/// A value wider than `width` is written in full.
pub fn write_u32<W: fmt::Write>(mut w: W, value: u32, width: usize) -> Result<()> {
    const CAP: usize = 10;
    debug_assert!(width <= CAP);

    let mut digits = [b'0'; CAP];
    let mut start = CAP;
    let mut rest = value;
    loop {
        start -= 1;
        digits[start] += (rest % 10) as u8;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    start = start.min(CAP - width.min(CAP));

    for &d in &digits[start..] {
        w.write_char(d as char)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u32() {
        fn assert(val: u32, expected: &str, width: usize) {
            let mut s = String::with_capacity(10);
            write_u32(&mut s, val, width).unwrap();
            assert_eq!(expected, &s);
        }

        assert(0, "0000", 4);
        assert(0, "00", 2);
        assert(0, "0", 0);
        assert(7, "7", 1);
        assert(7, "0007", 4);
        assert(12, "12", 1);
        assert(2021, "2021", 4);
        assert(999999, "999999", 6);
        assert(5, "000005", 6);
        assert(u32::MAX, "4294967295", 10);
    }

    #[test]
    fn test_try_format() {
        assert_eq!(try_format!("{}-{}", 1, "a").unwrap(), "1-a");
        assert_eq!("abc".try_to_string().unwrap(), "abc");
    }
}
