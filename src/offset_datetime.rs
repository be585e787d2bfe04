use crate::{
    civil::CivilDateTime,
    config::Config,
    error::Error,
    instant::Instant,
    tz::{UtcOffset, ZoneId},
    zoned::ZonedDateTime,
};

/// A civil datetime paired with an offset from UTC.
///
/// An offset datetime always identifies a single instant, namely
/// `civil - offset`. Unlike a [`ZonedDateTime`], there is no time zone, and
/// so the offset is never checked against anything. Any civil datetime may be
/// paired with any offset.
///
/// # Ordering and equality
///
/// Two offset datetimes are equal when both their civil datetimes and their
/// offsets are equal. Ordering is by the instant each one identifies first,
/// and then by the civil datetime. So `2025-01-20T10:00:00+01:00` sorts
/// before `2025-01-20T10:00:00+00:00`, since it identifies an earlier
/// instant, and `2025-01-20T09:00:00+00:00` sorts before
/// `2025-01-20T10:00:00+01:00`, since they identify the same instant.
///
/// # Text format
///
/// The `Display` and `FromStr` trait implementations use the ISO 8601
/// extended format with an offset, like `2025-01-20T10:00:01+07:00`. Parsing
/// also accepts `Z` for a zero offset, but printing always uses a numeric
/// offset.
///
/// # Example
///
/// ```
/// use tempora::{civil::datetime, tz::UtcOffset, OffsetDateTime};
///
/// let odt: OffsetDateTime = "2025-01-20T10:00:01.5+07:00".parse()?;
/// assert_eq!(odt.civil(), datetime(2025, 1, 20, 10, 0, 1, 500_000_000));
/// assert_eq!(odt.offset(), UtcOffset::constant(7));
/// assert_eq!(odt.to_instant()?.to_string(), "2025-01-20T03:00:01.5Z");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct OffsetDateTime {
    civil: CivilDateTime,
    offset: UtcOffset,
}

impl OffsetDateTime {
    /// Pairs a civil datetime with an offset.
    #[inline]
    pub const fn new(civil: CivilDateTime, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime { civil, offset }
    }

    /// Returns the offset datetime for the given instant on a clock using
    /// the given offset.
    ///
    /// This never fails, since every instant can be read at every offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::UtcOffset, Instant, OffsetDateTime};
    ///
    /// let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    /// let odt = OffsetDateTime::from_instant(instant, UtcOffset::constant(-5));
    /// assert_eq!(odt.civil(), datetime(2025, 1, 20, 5, 0, 1, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_instant(instant: Instant, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime::new(offset.to_civil(instant), offset)
    }

    /// Returns the offset datetime for the given instant in the given time
    /// zone.
    ///
    /// The offset is the one the time zone uses at that instant.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, Instant, OffsetDateTime};
    ///
    /// let sydney = tz::db().get("Australia/Sydney")?;
    /// let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    /// let odt = OffsetDateTime::from_instant_in_zone(instant, &sydney);
    /// assert_eq!(odt.to_string(), "2025-01-20T21:00:01+11:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_instant_in_zone(
        instant: Instant,
        zone: &ZoneId,
    ) -> OffsetDateTime {
        OffsetDateTime::from_instant(instant, zone.offset_for_instant(instant))
    }

    /// Returns the current offset datetime in the default time zone of the
    /// given configuration.
    pub fn now(config: &Config) -> OffsetDateTime {
        OffsetDateTime::now_in(config, config.default_zone())
    }

    /// Returns the current offset datetime in the given time zone, according
    /// to the clock of the given configuration.
    pub fn now_in(config: &Config, zone: &ZoneId) -> OffsetDateTime {
        OffsetDateTime::from_instant_in_zone(config.now(), zone)
    }

    /// Returns the civil datetime of this offset datetime.
    #[inline]
    pub const fn civil(self) -> CivilDateTime {
        self.civil
    }

    /// Returns the offset of this offset datetime.
    #[inline]
    pub const fn offset(self) -> UtcOffset {
        self.offset
    }

    /// Returns the instant identified by this offset datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is out of the supported range.
    /// This can only happen within 18 hours of [`CivilDateTime::MIN`] or
    /// [`CivilDateTime::MAX`].
    #[inline]
    pub fn to_instant(self) -> Result<Instant, Error> {
        self.offset.to_instant(self.civil)
    }

    /// Returns a zoned datetime with the same civil datetime and offset, in
    /// a time zone that always uses this offset.
    ///
    /// The zone is the one built by [`ZoneId::fixed`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::OffsetDateTime;
    ///
    /// let odt: OffsetDateTime = "2025-01-20T10:00:01+07:00".parse()?;
    /// let zdt = odt.to_zoned();
    /// assert_eq!(zdt.zone().name(), "+07:00");
    /// assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+07:00");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_zoned(self) -> ZonedDateTime {
        ZonedDateTime::from_parts(self.civil, self.offset, ZoneId::fixed(self.offset))
    }

    /// Returns the zoned datetime in the given time zone that identifies the
    /// same instant as this offset datetime.
    ///
    /// The civil datetime of the result may differ from this one, and the
    /// result's offset is whatever the time zone uses at that instant.
    ///
    /// # Errors
    ///
    /// This returns an error when this offset datetime does not identify an
    /// instant in the supported range. See [`OffsetDateTime::to_instant`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, OffsetDateTime};
    ///
    /// let odt: OffsetDateTime = "2025-01-20T10:00:01+07:00".parse()?;
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let zdt = odt.at_zone_same_instant(&vienna)?;
    /// assert_eq!(zdt.to_string(), "2025-01-20T04:00:01+01:00[Europe/Vienna]");
    /// assert_eq!(zdt.to_instant()?, odt.to_instant()?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn at_zone_same_instant(
        self,
        zone: &ZoneId,
    ) -> Result<ZonedDateTime, Error> {
        let instant = self.to_instant()?;
        Ok(ZonedDateTime::from_instant(instant, zone))
    }

    /// Returns the zoned datetime in the given time zone with the same civil
    /// datetime as this offset datetime.
    ///
    /// The offset is resolved by [`ZonedDateTime::from_local`], with this
    /// offset datetime's offset as the preferred offset in a fold. So the
    /// result usually identifies a different instant than this offset
    /// datetime.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, OffsetDateTime};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    ///
    /// let odt: OffsetDateTime = "2025-01-20T10:00:01+07:00".parse()?;
    /// let zdt = odt.at_zone_similar_local(&vienna);
    /// assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+01:00[Europe/Vienna]");
    ///
    /// // In a fold, the original offset picks the occurrence.
    /// let odt: OffsetDateTime = "2025-10-26T02:30:00+01:00".parse()?;
    /// let zdt = odt.at_zone_similar_local(&vienna);
    /// assert_eq!(zdt.to_string(), "2025-10-26T02:30:00+01:00[Europe/Vienna]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn at_zone_similar_local(self, zone: &ZoneId) -> ZonedDateTime {
        ZonedDateTime::from_local(self.civil, zone, Some(self.offset))
    }

    /// Parses an offset datetime from text like `2025-01-20T10:00:01+07:00`.
    ///
    /// # Errors
    ///
    /// This returns an error when the text is not a valid offset datetime,
    /// including when it has no offset or has a time zone annotation.
    #[inline]
    pub fn parse(text: impl AsRef<[u8]>) -> Result<OffsetDateTime, Error> {
        crate::fmt::temporal::DateTimeParser::new().parse_offset_datetime(text)
    }

    /// The instant identified by this offset datetime, as seconds since the
    /// Unix epoch.
    ///
    /// Unlike `to_instant`, this never fails, since the range of `i64` is
    /// wider than the range of a civil datetime minus an offset.
    #[inline]
    fn epoch_second(self) -> i64 {
        self.civil.local_second() - i64::from(self.offset.seconds())
    }
}

impl Ord for OffsetDateTime {
    fn cmp(&self, other: &OffsetDateTime) -> core::cmp::Ordering {
        (self.epoch_second(), self.civil.subsec_nanosecond(), self.civil).cmp(
            &(other.epoch_second(), other.civil.subsec_nanosecond(), other.civil),
        )
    }
}

impl PartialOrd for OffsetDateTime {
    fn partial_cmp(&self, other: &OffsetDateTime) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::fmt::temporal::DateTimePrinter;

        static P: DateTimePrinter = DateTimePrinter::new();
        P.print_offset_datetime(self, f).map_err(|_| core::fmt::Error)
    }
}

impl core::fmt::Debug for OffsetDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::str::FromStr for OffsetDateTime {
    type Err = Error;

    fn from_str(string: &str) -> Result<OffsetDateTime, Error> {
        OffsetDateTime::parse(string)
    }
}

impl From<OffsetDateTime> for CivilDateTime {
    fn from(odt: OffsetDateTime) -> CivilDateTime {
        odt.civil()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for OffsetDateTime {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for OffsetDateTime {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        deserializer.deserialize_str(crate::fmt::serde::FromStrVisitor::new(
            "an offset datetime string like `2025-01-20T10:00:01+07:00`",
        ))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{civil::datetime, tz};

    use super::*;

    #[test]
    fn instant_conversions() {
        let civil = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);
        let odt = OffsetDateTime::new(civil, UtcOffset::constant(7));
        let instant = odt.to_instant().unwrap();
        assert_eq!(instant.epoch_second(), 1_737_342_001);
        assert_eq!(instant.subsec_nanosecond(), 123_456_789);
        assert_eq!(
            OffsetDateTime::from_instant(instant, UtcOffset::constant(7)),
            odt,
        );
    }

    #[test]
    fn to_instant_out_of_range() {
        let odt = OffsetDateTime::new(CivilDateTime::MIN, UtcOffset::constant(1));
        assert!(odt.to_instant().unwrap_err().is_range());
        let odt = OffsetDateTime::new(CivilDateTime::MIN, UtcOffset::MIN);
        assert!(odt.to_instant().is_ok());
    }

    #[test]
    fn ordering_is_by_instant() {
        let a: OffsetDateTime = "2025-01-20T10:00:00+01:00".parse().unwrap();
        let b: OffsetDateTime = "2025-01-20T10:00:00+00:00".parse().unwrap();
        let c: OffsetDateTime = "2025-01-20T09:00:00+00:00".parse().unwrap();
        assert!(a < b);
        assert!(c < a);
        assert_ne!(a, c);
        assert_eq!(a.to_instant().unwrap(), c.to_instant().unwrap());
    }

    #[test]
    fn zone_conversions() {
        let vienna = tz::db().get("Europe/Vienna").unwrap();
        let odt: OffsetDateTime = "2025-03-30T02:30:00+07:00".parse().unwrap();

        let zdt = odt.at_zone_similar_local(&vienna);
        assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");

        let zdt = odt.at_zone_same_instant(&vienna).unwrap();
        assert_eq!(zdt.to_string(), "2025-03-29T20:30:00+01:00[Europe/Vienna]");

        let zdt = odt.to_zoned();
        assert_eq!(zdt.zone(), &ZoneId::fixed(UtcOffset::constant(7)));
        assert_eq!(zdt.to_offset_datetime(), odt);
    }

    #[test]
    fn display() {
        let odt = OffsetDateTime::new(
            datetime(2025, 1, 20, 10, 0, 1, 0),
            UtcOffset::UTC,
        );
        assert_eq!(odt.to_string(), "2025-01-20T10:00:01+00:00");
        let odt = OffsetDateTime::new(
            datetime(-1, 12, 31, 23, 59, 59, 10),
            UtcOffset::constant_seconds(-18_062),
        );
        assert_eq!(odt.to_string(), "-000001-12-31T23:59:59.00000001-05:01:02");
    }

    quickcheck::quickcheck! {
        fn prop_civil_roundtrip(civil: CivilDateTime, offset: UtcOffset) -> quickcheck::TestResult {
            let odt = OffsetDateTime::new(civil, offset);
            let Ok(instant) = odt.to_instant() else {
                return quickcheck::TestResult::discard();
            };
            let back = OffsetDateTime::from_instant(instant, offset);
            quickcheck::TestResult::from_bool(back.civil() == civil)
        }

        fn prop_instant_roundtrip(instant: Instant, offset: UtcOffset) -> bool {
            let odt = OffsetDateTime::from_instant(instant, offset);
            odt.to_instant().map_or(false, |got| got == instant)
        }
    }
}
