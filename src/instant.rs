use crate::{
    civil::CivilDateTime,
    error::Error,
    offset_datetime::OffsetDateTime,
    tz::{UtcOffset, ZoneId},
    zoned::ZonedDateTime,
};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// An instant in time, represented as a number of seconds and nanoseconds
/// since the Unix epoch (`1970-01-01T00:00:00Z`).
///
/// An `Instant` is an absolute point on the UTC timeline. It has no time zone
/// and no offset. To read it on a wall clock, pair it with an offset via
/// [`Instant::at_offset`] or a time zone via [`Instant::at_zone`].
///
/// # Range
///
/// The range of an `Instant` is chosen such that it can be converted to a
/// [`CivilDateTime`] under every legal offset without failure. That means its
/// minimum is `-9999-01-01T18:00:00Z` and its maximum is
/// `9999-12-31T05:59:59.999999999Z`.
///
/// # Representation
///
/// The nanosecond component of an instant is always in the range
/// `0..=999_999_999`. So an instant one nanosecond before the Unix epoch has
/// an epoch second of `-1` and a nanosecond of `999_999_999`. Constructors
/// normalize their inputs into this form:
///
/// ```
/// use tempora::Instant;
///
/// let instant = Instant::from_epoch_second(5, -1)?;
/// assert_eq!(instant.epoch_second(), 4);
/// assert_eq!(instant.subsec_nanosecond(), 999_999_999);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Parsing and printing
///
/// An instant parses from a civil datetime followed by a mandatory offset,
/// and always prints in UTC with a `Z` suffix:
///
/// ```
/// use tempora::Instant;
///
/// let instant: Instant = "2025-01-20T17:00:01+07:00".parse()?;
/// assert_eq!(instant.to_string(), "2025-01-20T10:00:01Z");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Instant {
    second: i64,
    nanosecond: i32,
}

impl Instant {
    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    pub const UNIX_EPOCH: Instant = Instant { second: 0, nanosecond: 0 };

    /// The minimum supported instant, `-9999-01-01T18:00:00Z`.
    pub const MIN: Instant =
        Instant { second: -377_705_052_000, nanosecond: 0 };

    /// The maximum supported instant, `9999-12-31T05:59:59.999999999Z`.
    pub const MAX: Instant =
        Instant { second: 253_402_235_999, nanosecond: 999_999_999 };

    /// Returns the current instant according to the system clock.
    ///
    /// To make code that reads the current time testable, prefer
    /// [`Config::now`](crate::Config::now), which reads the clock carried
    /// by a configuration value.
    ///
    /// # Panics
    ///
    /// This panics if the system clock is set to a time outside of the range
    /// supported by `Instant`. It is reasonable to expect the system clock to
    /// be set to a somewhat sane, if imprecise, value.
    #[cfg(feature = "std")]
    #[inline]
    pub fn now() -> Instant {
        Instant::try_from(std::time::SystemTime::now())
            .expect("system time is valid")
    }

    /// Creates an instant from a number of seconds since the Unix epoch and
    /// an adjustment in nanoseconds.
    ///
    /// The adjustment may be negative or bigger than a second. Whatever
    /// doesn't fit into `0..=999_999_999` is carried into the seconds.
    ///
    /// # Errors
    ///
    /// This returns an error when the normalized instant is outside of the
    /// range [`Instant::MIN`]`..=`[`Instant::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::Instant;
    ///
    /// let instant = Instant::from_epoch_second(2_000_000_123, 456_000_000)?;
    /// assert_eq!(instant, Instant::from_epoch_millisecond(2_000_000_123_456)?);
    ///
    /// let instant = Instant::from_epoch_second(1, 2_500_000_000)?;
    /// assert_eq!(instant.epoch_second(), 3);
    /// assert_eq!(instant.subsec_nanosecond(), 500_000_000);
    ///
    /// assert!(Instant::from_epoch_second(i64::MAX, 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_epoch_second(
        seconds: i64,
        nano_adjustment: i64,
    ) -> Result<Instant, Error> {
        let carry = nano_adjustment.div_euclid(NANOS_PER_SECOND);
        // OK because the remainder is in `0..1_000_000_000`.
        let nanosecond = nano_adjustment.rem_euclid(NANOS_PER_SECOND) as i32;
        let second = seconds.checked_add(carry).ok_or_else(|| {
            Error::range(
                "epoch second",
                i128::from(seconds) + i128::from(carry),
                Instant::MIN.second,
                Instant::MAX.second,
            )
        })?;
        Instant::from_canonical(second, nanosecond)
    }

    /// Creates an instant from a number of milliseconds since the Unix
    /// epoch.
    ///
    /// The milliseconds are split by floor division, so the nanosecond
    /// component is never negative.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is outside of the range
    /// [`Instant::MIN`]`..=`[`Instant::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::Instant;
    ///
    /// let instant = Instant::from_epoch_millisecond(-1)?;
    /// assert_eq!(instant.epoch_second(), -1);
    /// assert_eq!(instant.subsec_nanosecond(), 999_000_000);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_epoch_millisecond(millis: i64) -> Result<Instant, Error> {
        let second = millis.div_euclid(1_000);
        // OK because the remainder is in `0..1_000`.
        let nanosecond = (millis.rem_euclid(1_000) as i32) * 1_000_000;
        Instant::from_canonical(second, nanosecond)
    }

    /// Returns the number of whole seconds since the Unix epoch.
    ///
    /// For instants before the epoch, this is rounded towards negative
    /// infinity, and [`Instant::subsec_nanosecond`] is counted forward from
    /// it.
    #[inline]
    pub const fn epoch_second(self) -> i64 {
        self.second
    }

    /// Returns the fractional second of this instant in nanoseconds.
    ///
    /// This is always in the range `0..=999_999_999`.
    #[inline]
    pub const fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Returns the number of milliseconds since the Unix epoch, rounding
    /// towards negative infinity.
    ///
    /// This never overflows for any instant in the supported range.
    #[inline]
    pub const fn epoch_millisecond(self) -> i64 {
        self.second * 1_000 + (self.nanosecond / 1_000_000) as i64
    }

    /// Returns this instant as seen on a clock using the given offset.
    ///
    /// This is [`OffsetDateTime::from_instant`] and never fails.
    #[inline]
    pub fn at_offset(self, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime::from_instant(self, offset)
    }

    /// Returns this instant as seen in the given time zone.
    ///
    /// This is [`ZonedDateTime::from_instant`] and never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, Instant};
    ///
    /// let sydney = tz::db().get("Australia/Sydney")?;
    /// let zdt = Instant::from_epoch_second(1_737_367_201, 0)?.at_zone(&sydney);
    /// assert_eq!(zdt.to_string(), "2025-01-20T21:00:01+11:00[Australia/Sydney]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn at_zone(self, zone: &ZoneId) -> ZonedDateTime {
        ZonedDateTime::from_instant(self, zone)
    }

    /// Returns this instant as a civil datetime in UTC.
    #[inline]
    pub fn to_civil_utc(self) -> CivilDateTime {
        UtcOffset::UTC.to_civil(self)
    }

    /// Parses an instant from a civil datetime with a mandatory offset.
    ///
    /// This is equivalent to parsing an [`OffsetDateTime`] and converting it
    /// to an instant.
    ///
    /// # Errors
    ///
    /// This returns a parse error when the text is malformed, when the
    /// offset is missing or when a time zone annotation is present.
    #[inline]
    pub fn parse(text: impl AsRef<[u8]>) -> Result<Instant, Error> {
        crate::fmt::temporal::DateTimeParser::new().parse_instant(text)
    }

    /// Creates an instant from an already normalized second and nanosecond
    /// pair, checking only that it's in range.
    ///
    /// Callers must guarantee that `nanosecond` is in `0..=999_999_999`.
    #[inline]
    pub(crate) fn from_canonical(
        second: i64,
        nanosecond: i32,
    ) -> Result<Instant, Error> {
        debug_assert!((0..=999_999_999).contains(&nanosecond));
        if !(Instant::MIN.second..=Instant::MAX.second).contains(&second) {
            return Err(Error::range(
                "epoch second",
                second,
                Instant::MIN.second,
                Instant::MAX.second,
            ));
        }
        Ok(Instant { second, nanosecond })
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::fmt::temporal::DateTimePrinter;

        static P: DateTimePrinter = DateTimePrinter::new();
        P.print_instant(self, f).map_err(|_| core::fmt::Error)
    }
}

impl core::fmt::Debug for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::str::FromStr for Instant {
    type Err = Error;

    fn from_str(string: &str) -> Result<Instant, Error> {
        Instant::parse(string)
    }
}

#[cfg(feature = "std")]
impl TryFrom<std::time::SystemTime> for Instant {
    type Error = Error;

    fn try_from(system_time: std::time::SystemTime) -> Result<Instant, Error> {
        let unix_epoch = std::time::SystemTime::UNIX_EPOCH;
        let (duration, negative) = match system_time.duration_since(unix_epoch)
        {
            Ok(duration) => (duration, false),
            Err(err) => (err.duration(), true),
        };
        let seconds = i64::try_from(duration.as_secs()).map_err(|_| {
            Error::range(
                "epoch second",
                duration.as_secs(),
                Instant::MIN.second,
                Instant::MAX.second,
            )
        })?;
        let nanos = i64::from(duration.subsec_nanos());
        if negative {
            Instant::from_epoch_second(-seconds, -nanos)
        } else {
            Instant::from_epoch_second(seconds, nanos)
        }
    }
}

#[cfg(feature = "std")]
impl From<Instant> for std::time::SystemTime {
    fn from(instant: Instant) -> std::time::SystemTime {
        let unix_epoch = std::time::SystemTime::UNIX_EPOCH;
        let nanos = instant.subsec_nanosecond().unsigned_abs();
        // These are guaranteed to succeed because we assume that SystemTime
        // uses at least 64 bits for the time, and our instants are limited
        // to years `-9999..=9999`.
        if instant.second >= 0 {
            let duration =
                std::time::Duration::new(instant.second.unsigned_abs(), nanos);
            unix_epoch.checked_add(duration).expect("duration too big")
        } else {
            let duration =
                std::time::Duration::new(instant.second.unsigned_abs(), 0);
            unix_epoch
                .checked_sub(duration)
                .and_then(|t| {
                    t.checked_add(std::time::Duration::new(0, nanos))
                })
                .expect("duration too big")
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Instant {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Instant {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Instant, D::Error> {
        deserializer.deserialize_str(crate::fmt::serde::FromStrVisitor::new(
            "an instant string like `2025-01-20T10:00:01Z`",
        ))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Instant {
    fn arbitrary(g: &mut quickcheck::Gen) -> Instant {
        let span = Instant::MAX.second - Instant::MIN.second + 1;
        let second = Instant::MIN.second + i64::arbitrary(g).rem_euclid(span);
        let nanosecond = i32::arbitrary(g).rem_euclid(1_000_000_000);
        Instant { second, nanosecond }
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Instant>> {
        alloc::boxed::Box::new(
            (self.second, self.nanosecond)
                .shrink()
                .filter_map(|(second, nanosecond)| {
                    if nanosecond < 0 {
                        return None;
                    }
                    Instant::from_canonical(second, nanosecond).ok()
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn epoch_second_normalization() {
        let got = Instant::from_epoch_second(5, -1).unwrap();
        assert_eq!((got.epoch_second(), got.subsec_nanosecond()), (4, 999_999_999));

        let got = Instant::from_epoch_second(0, -1_000_000_001).unwrap();
        assert_eq!((got.epoch_second(), got.subsec_nanosecond()), (-2, 999_999_999));

        let got = Instant::from_epoch_second(-1, 3_000_000_000).unwrap();
        assert_eq!((got.epoch_second(), got.subsec_nanosecond()), (2, 0));

        let got = Instant::from_epoch_second(0, i64::MAX).unwrap();
        assert_eq!(got.epoch_second(), 9_223_372_036);
    }

    #[test]
    fn epoch_millisecond() {
        let got = Instant::from_epoch_millisecond(2_000_000_123_456).unwrap();
        let expected = Instant::from_epoch_second(2_000_000_123, 456_000_000);
        assert_eq!(got, expected.unwrap());
        assert_eq!(got.epoch_millisecond(), 2_000_000_123_456);

        let got = Instant::from_epoch_millisecond(-1_001).unwrap();
        assert_eq!((got.epoch_second(), got.subsec_nanosecond()), (-2, 999_000_000));
        assert_eq!(got.epoch_millisecond(), -1_001);
    }

    #[test]
    fn range() {
        assert!(Instant::from_epoch_second(Instant::MAX.second, 999_999_999)
            .is_ok());
        assert!(Instant::from_epoch_second(Instant::MAX.second + 1, 0)
            .unwrap_err()
            .is_range());
        assert!(Instant::from_epoch_second(Instant::MIN.second, -1)
            .unwrap_err()
            .is_range());
        assert!(Instant::from_epoch_second(i64::MAX, 1_000_000_000)
            .unwrap_err()
            .is_range());
        assert!(Instant::from_epoch_millisecond(i64::MIN).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Instant::UNIX_EPOCH.to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(Instant::MIN.to_string(), "-009999-01-01T18:00:00Z");
        assert_eq!(
            Instant::MAX.to_string(),
            "9999-12-31T05:59:59.999999999Z"
        );
        let instant = Instant::from_epoch_second(-1, 500_000_000).unwrap();
        assert_eq!(instant.to_string(), "1969-12-31T23:59:59.5Z");
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_time_roundtrip() {
        let cases = [
            Instant::UNIX_EPOCH,
            Instant::from_epoch_second(-1, 1).unwrap(),
            Instant::from_epoch_second(1_737_367_201, 123_456_789).unwrap(),
            Instant::from_epoch_second(-86_400, 999_999_999).unwrap(),
        ];
        for instant in cases {
            let system_time = std::time::SystemTime::from(instant);
            assert_eq!(Instant::try_from(system_time).unwrap(), instant);
        }
    }

    quickcheck::quickcheck! {
        fn prop_millisecond_roundtrip(instant: Instant) -> bool {
            let millis = instant.epoch_millisecond();
            let got = Instant::from_epoch_millisecond(millis).unwrap();
            got.epoch_second() == instant.epoch_second()
                && got.subsec_nanosecond() / 1_000_000
                    == instant.subsec_nanosecond() / 1_000_000
        }
    }
}
