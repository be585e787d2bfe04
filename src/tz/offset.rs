use core::ops::Neg;

use crate::{
    civil::CivilDateTime,
    error::{tz::offset::Error as E, Error, ErrorContext},
    util::itime::IEpochSecond,
    Instant,
};

/// Represents a fixed offset from UTC.
///
/// Negative offsets correspond to locations west of the prime meridian, while
/// positive offsets correspond to locations east of the prime meridian.
/// Equivalently, in all cases, `civil - offset = UTC`.
///
/// An offset is limited to the range `-18:00:00..=+18:00:00`.
///
/// # Display format
///
/// This type implements the `std::fmt::Display` trait. It converts the offset
/// to a string in the form `{sign}{hours}:{minutes}[:{seconds}]`, where the
/// seconds are only present when non-zero. The zero offset is written with a
/// `+` sign:
///
/// ```
/// use tempora::tz::UtcOffset;
///
/// assert_eq!(UtcOffset::constant(-5).to_string(), "-05:00");
/// assert_eq!(UtcOffset::constant_seconds(19_800).to_string(), "+05:30");
/// assert_eq!(UtcOffset::constant_seconds(-18_062).to_string(), "-05:01:02");
/// assert_eq!(UtcOffset::UTC.to_string(), "+00:00");
/// ```
///
/// Parsing accepts the same format, plus `Z` as an alias for UTC:
///
/// ```
/// use tempora::tz::UtcOffset;
///
/// assert_eq!("+07:00".parse::<UtcOffset>()?, UtcOffset::constant(7));
/// assert_eq!("Z".parse::<UtcOffset>()?, UtcOffset::UTC);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct UtcOffset {
    second: i32,
}

impl UtcOffset {
    /// The minimum possible offset, `-18:00:00`.
    pub const MIN: UtcOffset = UtcOffset { second: -UtcOffset::MAX_SECONDS };

    /// The maximum possible offset, `+18:00:00`.
    pub const MAX: UtcOffset = UtcOffset { second: UtcOffset::MAX_SECONDS };

    /// The offset corresponding to UTC.
    ///
    /// This is always equivalent to `UtcOffset::ZERO`. This one ought to be
    /// used when UTC is meant specifically.
    pub const UTC: UtcOffset = UtcOffset::ZERO;

    /// The offset corresponding to no offset at all.
    pub const ZERO: UtcOffset = UtcOffset { second: 0 };

    const MAX_SECONDS: i32 = 18 * 60 * 60;

    /// Creates a new offset in a `const` context from a number of hours.
    ///
    /// The fallible non-const version of this constructor is
    /// [`UtcOffset::from_hours`].
    ///
    /// # Panics
    ///
    /// This routine panics when `hours` is not in the range `-18..=18`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// assert_eq!(UtcOffset::constant(-5).seconds(), -18_000);
    /// assert_eq!(UtcOffset::constant(7).seconds(), 25_200);
    /// ```
    #[inline]
    pub const fn constant(hours: i8) -> UtcOffset {
        UtcOffset::constant_seconds(hours as i32 * 3600)
    }

    /// Creates a new offset in a `const` context from a number of seconds.
    ///
    /// # Panics
    ///
    /// This routine panics when `seconds` is not in the range
    /// `-64800..=64800`.
    #[inline]
    pub const fn constant_seconds(seconds: i32) -> UtcOffset {
        if seconds < -UtcOffset::MAX_SECONDS
            || seconds > UtcOffset::MAX_SECONDS
        {
            panic!("offset seconds out of range");
        }
        UtcOffset { second: seconds }
    }

    /// Creates a new offset from a number of hours.
    ///
    /// # Errors
    ///
    /// This returns an error when `hours` is not in the range `-18..=18`.
    #[inline]
    pub fn from_hours(hours: i8) -> Result<UtcOffset, Error> {
        if !(-18..=18).contains(&hours) {
            return Err(Error::range("offset hours", hours, -18, 18));
        }
        Ok(UtcOffset { second: i32::from(hours) * 3600 })
    }

    /// Creates a new offset from a number of seconds.
    ///
    /// # Errors
    ///
    /// This returns an error when `seconds` is not in the range
    /// `-64800..=64800`.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::UtcOffset;
    ///
    /// let offset = UtcOffset::from_seconds(-12_600)?;
    /// assert_eq!(offset.to_string(), "-03:30");
    /// assert!(UtcOffset::from_seconds(64_801).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_seconds(seconds: i32) -> Result<UtcOffset, Error> {
        if !(-UtcOffset::MAX_SECONDS..=UtcOffset::MAX_SECONDS)
            .contains(&seconds)
        {
            return Err(Error::range(
                "offset seconds",
                seconds,
                -UtcOffset::MAX_SECONDS,
                UtcOffset::MAX_SECONDS,
            ));
        }
        Ok(UtcOffset { second: seconds })
    }

    /// Returns the total number of seconds in this offset.
    #[inline]
    pub const fn seconds(self) -> i32 {
        self.second
    }

    /// Returns true if this offset is west of the prime meridian.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.second < 0
    }

    /// Returns this offset with its sign flipped.
    ///
    /// This never fails since the offset range is symmetric.
    #[inline]
    pub const fn negate(self) -> UtcOffset {
        UtcOffset { second: -self.second }
    }

    /// Returns the civil datetime that the given instant corresponds to on
    /// a clock using this offset.
    ///
    /// This never fails. Every instant maps to a valid civil datetime under
    /// every offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::UtcOffset, Instant};
    ///
    /// let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    /// let civil = UtcOffset::constant(7).to_civil(instant);
    /// assert_eq!(civil, datetime(2025, 1, 20, 17, 0, 1, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn to_civil(self, instant: Instant) -> CivilDateTime {
        let second = instant.epoch_second() + i64::from(self.second);
        let idt = IEpochSecond { second }.to_datetime();
        CivilDateTime::from_itime(idt, instant.subsec_nanosecond())
    }

    /// Returns the instant that the given civil datetime corresponds to on a
    /// clock using this offset.
    ///
    /// That is, this computes `civil - offset`.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant would be out of the supported
    /// range. This can only happen for civil datetimes within 18 hours of
    /// [`CivilDateTime::MIN`] or [`CivilDateTime::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::UtcOffset};
    ///
    /// let civil = datetime(2025, 1, 20, 17, 0, 1, 0);
    /// let instant = UtcOffset::constant(7).to_instant(civil)?;
    /// assert_eq!(instant.epoch_second(), 1_737_367_201);
    ///
    /// assert!(UtcOffset::constant(-1).to_instant(tempora::CivilDateTime::MAX).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn to_instant(self, civil: CivilDateTime) -> Result<Instant, Error> {
        let second = civil.local_second() - i64::from(self.second);
        Instant::from_canonical(second, civil.subsec_nanosecond())
            .context(E::ConvertCivilToInstant { offset: self })
    }

    /// Returns the difference `self - other` in seconds.
    #[inline]
    pub(crate) fn seconds_since(self, other: UtcOffset) -> i64 {
        i64::from(self.second) - i64::from(other.second)
    }
}

impl Neg for UtcOffset {
    type Output = UtcOffset;

    #[inline]
    fn neg(self) -> UtcOffset {
        self.negate()
    }
}

impl core::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        let total = self.second.unsigned_abs();
        let (hours, minutes, seconds) =
            (total / 3600, (total % 3600) / 60, total % 60);
        write!(f, "{sign}{hours:02}:{minutes:02}")?;
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for UtcOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::str::FromStr for UtcOffset {
    type Err = Error;

    fn from_str(string: &str) -> Result<UtcOffset, Error> {
        crate::fmt::temporal::DateTimeParser::new().parse_offset(string)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UtcOffset {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UtcOffset {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<UtcOffset, D::Error> {
        deserializer.deserialize_str(crate::fmt::serde::FromStrVisitor::new(
            "a UTC offset string like `+07:00`",
        ))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for UtcOffset {
    fn arbitrary(g: &mut quickcheck::Gen) -> UtcOffset {
        let seconds = i32::arbitrary(g)
            .rem_euclid(2 * UtcOffset::MAX_SECONDS + 1)
            - UtcOffset::MAX_SECONDS;
        UtcOffset { second: seconds }
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = UtcOffset>> {
        alloc::boxed::Box::new(
            self.second.shrink().map(|second| UtcOffset { second }),
        )
    }
}
