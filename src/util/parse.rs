use crate::error::{util::ParseIntError, Error};

/// Parses an `i64` number from the beginning to the end of the given slice of
/// ASCII digit characters.
///
/// If any byte in the given slice is not `[0-9]`, then this returns an error.
/// Similarly, if the number parsed does not fit into a `i64`, then this
/// returns an error. Notably, this routine does not permit parsing a negative
/// integer. (We use `i64` because everything in this crate uses signed
/// integers, and because a higher level parser can deal with the sign.)
#[inline]
pub(crate) fn i64(bytes: &[u8]) -> Result<i64, Error> {
    if bytes.is_empty() {
        return Err(Error::from(ParseIntError::NoDigitsFound));
    }
    let mut n: i64 = 0;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return Err(Error::from(ParseIntError::InvalidDigit(byte)));
        }
        let digit = i64::from(byte - b'0');
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit))
            .ok_or(ParseIntError::TooBig)?;
    }
    Ok(n)
}

/// Parses an `i64` fractional number from the beginning to the end of the
/// given slice of ASCII digit characters.
///
/// The fraction's maximum precision must be provided. The returned integer
/// will always be in units of `10^{max_precision}`. For example, to parse a
/// fractional amount of seconds with a maximum precision of nanoseconds, then
/// use `max_precision=9`.
///
/// If any byte in the given slice is not `[0-9]`, then this returns an error.
/// Similarly, if the fraction is empty or has more digits than
/// `max_precision`, then this returns an error.
pub(crate) fn fraction(
    bytes: &[u8],
    max_precision: usize,
) -> Result<i64, Error> {
    if bytes.len() > max_precision {
        return Err(err!(
            "too many fractional digits, expected at most {max_precision}",
        ));
    }
    let mut n = i64(bytes)?;
    for _ in bytes.len()..max_precision {
        n = n.checked_mul(10).ok_or(ParseIntError::TooBig)?;
    }
    Ok(n)
}

/// Splits the given input into two slices at the given position.
///
/// If the position is greater than the length of the slice given, then this
/// returns `None`.
#[inline]
pub(crate) fn split(input: &[u8], at: usize) -> Option<(&[u8], &[u8])> {
    if at > input.len() {
        None
    } else {
        Some(input.split_at(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_i64() {
        assert_eq!(i64(b"0").unwrap(), 0);
        assert_eq!(i64(b"2025").unwrap(), 2025);
        assert_eq!(i64(b"9223372036854775807").unwrap(), i64::MAX);
        assert!(i64(b"9223372036854775808").is_err());
        assert!(i64(b"").is_err());
        assert!(i64(b"1a").is_err());
        assert!(i64(b"-1").is_err());
    }

    #[test]
    fn parse_fraction() {
        assert_eq!(fraction(b"1", 9).unwrap(), 100_000_000);
        assert_eq!(fraction(b"123456789", 9).unwrap(), 123_456_789);
        assert_eq!(fraction(b"000000001", 9).unwrap(), 1);
        assert!(fraction(b"1234567891", 9).is_err());
        assert!(fraction(b"", 9).is_err());
    }

    #[test]
    fn slices() {
        let input = b"2025-01-20";
        let (year, rest) = split(input, 4).unwrap();
        assert_eq!(year, b"2025");
        assert_eq!(rest, b"-01-20");
        assert!(split(input, 11).is_none());
    }
}
