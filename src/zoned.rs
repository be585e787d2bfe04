use core::time::Duration;

use crate::{
    civil::CivilDateTime,
    config::Config,
    error::{tz::offset::Error as E, Error},
    instant::Instant,
    offset_datetime::OffsetDateTime,
    tz::{AmbiguousOffset, UtcOffset, ZoneId},
};

/// A civil datetime and an offset, in a time zone.
///
/// The offset of a zoned datetime is always one that its time zone permits
/// for its civil datetime. There are several ways to establish that, which
/// differ in what they do when the civil datetime is ambiguous in the time
/// zone:
///
/// * [`ZonedDateTime::from_local`] never fails. It moves a civil datetime in
/// a gap forward by the length of the gap, and picks an offset in a fold
/// using an optional preference.
/// * [`ZonedDateTime::from_strict`] fails unless the offset given is valid
/// for the civil datetime in the time zone.
/// * [`ZonedDateTime::from_instant`] is never ambiguous, since an instant
/// maps to exactly one offset in every time zone.
/// * [`ZonedDateTime::from_local_at_offset`] computes an instant from a civil
/// datetime and an offset, and then proceeds like `from_instant`.
///
/// # Equality
///
/// Two zoned datetimes are equal when their civil datetimes, offsets and
/// time zones are. Time zones are compared by name and rules, so the same
/// wall clock reading in two different rule sets that share a name is not
/// equal.
///
/// # Text format
///
/// The `Display` and `FromStr` trait implementations use the ISO 8601
/// extended format with an offset, followed by the time zone name in square
/// brackets, like `2025-01-20T10:00:01+01:00[Europe/Vienna]`. The bracketed
/// name is omitted for time zones built by [`ZoneId::fixed`].
///
/// Parsing is strict by default. If the offset in the text isn't valid for
/// the civil datetime in the named time zone, then parsing fails. See
/// [`DateTimeParser`](crate::fmt::temporal::DateTimeParser) for other
/// options and for parsing with a time zone database other than the global
/// one.
///
/// # Example
///
/// ```
/// use tempora::{civil::datetime, tz::{self, UtcOffset}, ZonedDateTime};
///
/// let vienna = tz::db().get("Europe/Vienna")?;
///
/// // 02:30 never happened in Vienna on this day, so this moves forward.
/// let zdt = ZonedDateTime::from_local(datetime(2025, 3, 30, 2, 30, 0, 0), &vienna, None);
/// assert_eq!(zdt.civil(), datetime(2025, 3, 30, 3, 30, 0, 0));
/// assert_eq!(zdt.offset(), UtcOffset::constant(2));
///
/// // 02:30 happened twice in Vienna on this day. The preference decides.
/// let civil = datetime(2025, 10, 26, 2, 30, 0, 0);
/// for (preferred, expected) in [(1, 1), (2, 2), (7, 2)] {
///     let preferred = Some(UtcOffset::constant(preferred));
///     let zdt = ZonedDateTime::from_local(civil, &vienna, preferred);
///     assert_eq!(zdt.offset(), UtcOffset::constant(expected));
/// }
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct ZonedDateTime {
    civil: CivilDateTime,
    offset: UtcOffset,
    zone: ZoneId,
}

impl ZonedDateTime {
    /// Resolves a civil datetime in a time zone, using the preferred offset
    /// to disambiguate.
    ///
    /// When the civil datetime has exactly one valid offset in the time
    /// zone, that offset is used and the preference is ignored.
    ///
    /// When the civil datetime is in a fold, the preferred offset is used if
    /// it is one of the two valid offsets. Otherwise, the offset of the
    /// earlier occurrence is used.
    ///
    /// When the civil datetime is in a gap, it is moved forward by the length
    /// of the gap and paired with the offset in effect after the gap. The
    /// preference is ignored. The length of the gap comes from
    /// [`ZoneRules::transition_after_gap`](crate::tz::ZoneRules::transition_after_gap)
    /// when the time zone provides it, and is the difference between the
    /// offsets after and before the gap otherwise.
    ///
    /// In the rare case that moving forward would exceed
    /// [`CivilDateTime::MAX`], the civil datetime is instead moved backward
    /// by the length of the gap and paired with the offset in effect before
    /// the gap.
    ///
    /// This never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz, ZonedDateTime};
    ///
    /// let new_york = tz::db().get("America/New_York")?;
    /// let zdt = ZonedDateTime::from_local(
    ///     datetime(2025, 3, 9, 2, 15, 0, 0),
    ///     &new_york,
    ///     None,
    /// );
    /// assert_eq!(zdt.to_string(), "2025-03-09T03:15:00-04:00[America/New_York]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_local(
        civil: CivilDateTime,
        zone: &ZoneId,
        preferred: Option<UtcOffset>,
    ) -> ZonedDateTime {
        match zone.offsets_for_civil(civil) {
            AmbiguousOffset::Unambiguous { offset } => {
                ZonedDateTime::from_parts(civil, offset, zone.clone())
            }
            AmbiguousOffset::Fold { before, after } => {
                let offset = match preferred {
                    Some(offset) if offset == after => after,
                    _ => before,
                };
                trace!(
                    "{civil} is in a fold in {zone} between {before} \
                     and {after}, using {offset}",
                );
                ZonedDateTime::from_parts(civil, offset, zone.clone())
            }
            AmbiguousOffset::Gap { before, after } => {
                ZonedDateTime::from_gap(civil, zone, before, after)
            }
        }
    }

    /// Pairs a civil datetime with an offset in a time zone, if and only if
    /// the time zone permits that offset for that civil datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the offset is not valid for the civil
    /// datetime in the time zone. That includes every offset when the civil
    /// datetime is in a gap.
    /// [`Error::is_zone_offset_mismatch`](crate::Error::is_zone_offset_mismatch)
    /// is true for such errors.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::{self, UtcOffset}, ZonedDateTime};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let civil = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);
    ///
    /// let zdt = ZonedDateTime::from_strict(civil, UtcOffset::constant(1), &vienna)?;
    /// assert_eq!(zdt.civil(), civil);
    ///
    /// let err = ZonedDateTime::from_strict(civil, UtcOffset::constant(7), &vienna)
    ///     .unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "offset `+07:00` is not valid for `2025-01-20T10:00:01.123456789` \
    ///      in time zone `Europe/Vienna`, which only permits offset `+01:00`",
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_strict(
        civil: CivilDateTime,
        offset: UtcOffset,
        zone: &ZoneId,
    ) -> Result<ZonedDateTime, Error> {
        let given = offset;
        let zone = zone.clone();
        match zone.offsets_for_civil(civil) {
            AmbiguousOffset::Unambiguous { offset } if offset == given => {}
            AmbiguousOffset::Unambiguous { offset } => {
                return Err(Error::from(E::MismatchUnambiguous {
                    civil,
                    given,
                    offset,
                    zone,
                }));
            }
            AmbiguousOffset::Gap { before, after } => {
                return Err(Error::from(E::MismatchGap {
                    civil,
                    given,
                    before,
                    after,
                    zone,
                }));
            }
            AmbiguousOffset::Fold { before, after }
                if given == before || given == after => {}
            AmbiguousOffset::Fold { before, after } => {
                return Err(Error::from(E::MismatchFold {
                    civil,
                    given,
                    before,
                    after,
                    zone,
                }));
            }
        }
        Ok(ZonedDateTime::from_parts(civil, given, zone))
    }

    /// Returns the zoned datetime for the given instant in the given time
    /// zone.
    ///
    /// This never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, Instant, ZonedDateTime};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    /// let zdt = ZonedDateTime::from_instant(instant, &vienna);
    /// assert_eq!(zdt.to_string(), "2025-01-20T11:00:01+01:00[Europe/Vienna]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_instant(instant: Instant, zone: &ZoneId) -> ZonedDateTime {
        let offset = zone.offset_for_instant(instant);
        ZonedDateTime::from_parts(offset.to_civil(instant), offset, zone.clone())
    }

    /// Returns the zoned datetime in the given time zone for the instant
    /// identified by the given civil datetime and offset.
    ///
    /// The offset need not be valid for the civil datetime in the time zone.
    /// The instant is what's preserved, so the civil datetime and offset of
    /// the result may both differ from the ones given.
    ///
    /// # Errors
    ///
    /// This returns an error when the civil datetime and offset do not
    /// identify an instant in the supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::{self, UtcOffset}, ZonedDateTime};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let zdt = ZonedDateTime::from_local_at_offset(
    ///     datetime(2025, 1, 20, 10, 0, 1, 0),
    ///     UtcOffset::constant(7),
    ///     &vienna,
    /// )?;
    /// assert_eq!(zdt.to_string(), "2025-01-20T04:00:01+01:00[Europe/Vienna]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_local_at_offset(
        civil: CivilDateTime,
        offset: UtcOffset,
        zone: &ZoneId,
    ) -> Result<ZonedDateTime, Error> {
        let instant = offset.to_instant(civil)?;
        Ok(ZonedDateTime::from_instant(instant, zone))
    }

    /// Returns the current zoned datetime in the default time zone of the
    /// given configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, Config, FixedClock, Instant, ZonedDateTime};
    ///
    /// let clock = FixedClock::new(Instant::from_epoch_second(1_737_367_201, 0)?);
    /// let config = Config::new(tz::db().get("Asia/Tokyo")?, clock);
    /// let zdt = ZonedDateTime::now(&config);
    /// assert_eq!(zdt.to_string(), "2025-01-20T19:00:01+09:00[Asia/Tokyo]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn now(config: &Config) -> ZonedDateTime {
        ZonedDateTime::now_in(config, config.default_zone())
    }

    /// Returns the current zoned datetime in the given time zone, according
    /// to the clock of the given configuration.
    pub fn now_in(config: &Config, zone: &ZoneId) -> ZonedDateTime {
        ZonedDateTime::from_instant(config.now(), zone)
    }

    /// Returns the civil datetime of this zoned datetime.
    #[inline]
    pub fn civil(&self) -> CivilDateTime {
        self.civil
    }

    /// Returns the offset of this zoned datetime.
    #[inline]
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns the time zone of this zoned datetime.
    #[inline]
    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    /// Returns the instant identified by this zoned datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is out of the supported range.
    /// This can only happen within 18 hours of [`CivilDateTime::MIN`] or
    /// [`CivilDateTime::MAX`], and never for a zoned datetime built from an
    /// instant.
    #[inline]
    pub fn to_instant(&self) -> Result<Instant, Error> {
        self.offset.to_instant(self.civil)
    }

    /// Returns the civil datetime and offset of this zoned datetime, without
    /// its time zone.
    #[inline]
    pub fn to_offset_datetime(&self) -> OffsetDateTime {
        OffsetDateTime::new(self.civil, self.offset)
    }

    /// Returns the zoned datetime in the given time zone that identifies the
    /// same instant as this one.
    ///
    /// # Errors
    ///
    /// This returns an error when this zoned datetime does not identify an
    /// instant in the supported range. See [`ZonedDateTime::to_instant`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, ZonedDateTime};
    ///
    /// let zdt: ZonedDateTime = "2025-01-20T10:00:01+01:00[Europe/Vienna]".parse()?;
    /// let sydney = tz::db().get("Australia/Sydney")?;
    /// let zdt = zdt.with_zone_same_instant(&sydney)?;
    /// assert_eq!(zdt.to_string(), "2025-01-20T20:00:01+11:00[Australia/Sydney]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_zone_same_instant(
        &self,
        zone: &ZoneId,
    ) -> Result<ZonedDateTime, Error> {
        self.to_offset_datetime().at_zone_same_instant(zone)
    }

    /// Returns the zoned datetime in the given time zone with the same civil
    /// datetime as this one.
    ///
    /// This resolves the civil datetime in the new time zone with
    /// [`ZonedDateTime::from_local`], preferring this zoned datetime's offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{tz, ZonedDateTime};
    ///
    /// let zdt: ZonedDateTime = "2025-01-20T10:00:01+01:00[Europe/Vienna]".parse()?;
    /// let sydney = tz::db().get("Australia/Sydney")?;
    /// let zdt = zdt.with_zone_similar_local(&sydney);
    /// assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+11:00[Australia/Sydney]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_zone_similar_local(&self, zone: &ZoneId) -> ZonedDateTime {
        self.to_offset_datetime().at_zone_similar_local(zone)
    }

    /// Parses a zoned datetime from text like
    /// `2025-01-20T10:00:01+01:00[Europe/Vienna]`.
    ///
    /// Time zone names are looked up in the global database returned by
    /// [`tz::db`](crate::tz::db).
    ///
    /// # Errors
    ///
    /// This returns an error when the text is not a valid zoned datetime,
    /// when its time zone is unknown or when its offset is not valid for its
    /// civil datetime in its time zone.
    #[inline]
    pub fn parse(text: impl AsRef<[u8]>) -> Result<ZonedDateTime, Error> {
        crate::fmt::temporal::DateTimeParser::new().parse_zoned(text)
    }

    /// Builds a zoned datetime without checking the offset.
    ///
    /// Callers must ensure the offset is valid for the civil datetime in
    /// the time zone.
    #[inline]
    pub(crate) fn from_parts(
        civil: CivilDateTime,
        offset: UtcOffset,
        zone: ZoneId,
    ) -> ZonedDateTime {
        ZonedDateTime { civil, offset, zone }
    }

    /// Resolves a civil datetime that is in a gap.
    #[cold]
    fn from_gap(
        civil: CivilDateTime,
        zone: &ZoneId,
        before: UtcOffset,
        after: UtcOffset,
    ) -> ZonedDateTime {
        let length = match zone.transition_after_gap(civil) {
            Some(gap) => gap.length(),
            None => {
                let seconds = after.seconds_since(before).unsigned_abs();
                debug!(
                    "{zone} does not describe the gap containing {civil}, \
                     using {seconds}s between {before} and {after}",
                );
                Duration::from_secs(seconds)
            }
        };
        let (shifted, offset) = match civil.checked_add(length) {
            Ok(shifted) => (shifted, after),
            Err(_err) => {
                warn!(
                    "cannot move {civil} in {zone} forward by {length:?} \
                     ({_err}), moving it backward instead",
                );
                // A gap is far shorter than the supported civil range, so
                // moving back cannot also overflow.
                (civil.checked_sub(length).unwrap_or(civil), before)
            }
        };
        trace!(
            "{civil} is in a gap in {zone} between {before} and {after}, \
             resolved to {shifted}{offset}",
        );
        ZonedDateTime::from_parts(shifted, offset, zone.clone())
    }

    /// The instant identified by this zoned datetime, as seconds since the
    /// Unix epoch.
    #[inline]
    fn epoch_second(&self) -> i64 {
        self.civil.local_second() - i64::from(self.offset.seconds())
    }
}

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &ZonedDateTime) -> core::cmp::Ordering {
        let key = |zdt: &ZonedDateTime| {
            (zdt.epoch_second(), zdt.civil.subsec_nanosecond(), zdt.civil)
        };
        key(self)
            .cmp(&key(other))
            .then_with(|| self.zone.name().cmp(other.zone.name()))
    }
}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &ZonedDateTime) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::fmt::temporal::DateTimePrinter;

        static P: DateTimePrinter = DateTimePrinter::new();
        P.print_zoned(self, f).map_err(|_| core::fmt::Error)
    }
}

impl core::fmt::Debug for ZonedDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::str::FromStr for ZonedDateTime {
    type Err = Error;

    fn from_str(string: &str) -> Result<ZonedDateTime, Error> {
        ZonedDateTime::parse(string)
    }
}

impl From<ZonedDateTime> for OffsetDateTime {
    fn from(zdt: ZonedDateTime) -> OffsetDateTime {
        zdt.to_offset_datetime()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ZonedDateTime {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ZonedDateTime {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ZonedDateTime, D::Error> {
        deserializer.deserialize_str(crate::fmt::serde::FromStrVisitor::new(
            "a zoned datetime string like \
             `2025-01-20T10:00:01+01:00[Europe/Vienna]`",
        ))
    }
}
