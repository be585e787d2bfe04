use core::time::Duration;

use crate::{
    config::Config,
    error::{civil::Error as E, Error, ErrorContext},
    instant::Instant,
    offset_datetime::OffsetDateTime,
    tz::{UtcOffset, ZoneId},
    util::itime::{self, IDate, IDateTime, IEpochSecond, ITime},
    zoned::ZonedDateTime,
};

/// A representation of a civil datetime in the Gregorian calendar.
///
/// A `CivilDateTime` value corresponds to a year, month, day, hour, minute,
/// second and fractional second in nanoseconds. Every value is guaranteed to
/// be a valid date in the proleptic Gregorian calendar. For example, both
/// `2023-02-29T00:00:00` and `2023-11-31T00:00:00` are invalid and cannot
/// be represented by a `CivilDateTime`.
///
/// # Civil datetimes
///
/// A `CivilDateTime` value isn't tied to any particular time zone or offset.
/// Its fields describe what a clock on the wall says, and nothing more. This
/// means the same civil datetime can refer to different instants in
/// different places, or to zero or two instants in the same place when a
/// daylight saving time transition skips over or repeats it.
///
/// # Comparisons
///
/// `CivilDateTime` implements `Eq` and `Ord`, and compares its fields
/// lexicographically from the year down to the nanosecond. This is purely a
/// calendar comparison and says nothing about which of two civil datetimes
/// happened first in time, since that depends on the offsets they'd be read
/// at.
///
/// # Parsing and printing
///
/// ```
/// use tempora::{civil::datetime, CivilDateTime};
///
/// let dt: CivilDateTime = "2025-01-20T10:00:01.5".parse()?;
/// assert_eq!(dt, datetime(2025, 1, 20, 10, 0, 1, 500_000_000));
/// assert_eq!(dt.to_string(), "2025-01-20T10:00:01.5");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Parsing a civil datetime from a string that includes an offset or a time
/// zone annotation is an error, since silently discarding that information
/// is usually a bug:
///
/// ```
/// use tempora::CivilDateTime;
///
/// assert!("2025-01-20T10:00:01+01:00".parse::<CivilDateTime>().is_err());
/// assert!("2025-01-20T10:00:01[Europe/Vienna]".parse::<CivilDateTime>().is_err());
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct CivilDateTime {
    year: i16,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
}

impl CivilDateTime {
    /// The minimum representable civil datetime, `-9999-01-01T00:00:00`.
    pub const MIN: CivilDateTime =
        CivilDateTime::constant(-9999, 1, 1, 0, 0, 0, 0);

    /// The maximum representable civil datetime,
    /// `9999-12-31T23:59:59.999999999`.
    pub const MAX: CivilDateTime =
        CivilDateTime::constant(9999, 12, 31, 23, 59, 59, 999_999_999);

    /// The smallest number of seconds, read on a wall clock, between
    /// `1970-01-01T00:00:00` and a civil datetime.
    const MIN_LOCAL_SECOND: i64 = -377_705_116_800;

    /// The largest number of seconds, read on a wall clock, between
    /// `1970-01-01T00:00:00` and a civil datetime.
    const MAX_LOCAL_SECOND: i64 = 253_402_300_799;

    /// Creates a new civil datetime from its component parts.
    ///
    /// # Errors
    ///
    /// This returns an invalid field error (see
    /// [`Error::is_invalid_field`]) when the components do not correspond
    /// to a valid civil datetime. Namely, all of the following must be true:
    ///
    /// * The year must be in the range `-9999..=9999`.
    /// * The month must be in the range `1..=12`.
    /// * The day must be at least `1` and must be at most the number of days
    /// in the corresponding month.
    /// * `0 <= hour <= 23`
    /// * `0 <= minute <= 59`
    /// * `0 <= second <= 59`
    /// * `0 <= subsec_nanosecond <= 999,999,999`
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::CivilDateTime;
    ///
    /// let dt = CivilDateTime::new(2024, 2, 29, 21, 30, 5, 0)?;
    /// assert_eq!(dt.to_string(), "2024-02-29T21:30:05");
    ///
    /// assert!(CivilDateTime::new(2025, 2, 29, 21, 30, 5, 0).is_err());
    /// assert!(CivilDateTime::new(2025, 13, 1, 0, 0, 0, 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn new(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Result<CivilDateTime, Error> {
        CivilDateTime::try_new(
            year.into(),
            month.into(),
            day.into(),
            hour.into(),
            minute.into(),
            second.into(),
            subsec_nanosecond.into(),
        )
    }

    /// Creates a new civil datetime in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics when [`CivilDateTime::new`] would return an error. When
    /// used in a const context, invalid parameters will prevent your Rust
    /// program from compiling.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::CivilDateTime;
    ///
    /// const DT: CivilDateTime =
    ///     CivilDateTime::constant(2025, 3, 30, 2, 30, 0, 0);
    /// assert_eq!(DT.hour(), 2);
    /// ```
    #[inline]
    pub const fn constant(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> CivilDateTime {
        if !(-9999 <= year && year <= 9999) {
            panic!("invalid year");
        }
        if !(1 <= month && month <= 12) {
            panic!("invalid month");
        }
        if !(1 <= day && day <= itime::days_in_month(year, month)) {
            panic!("invalid day");
        }
        if !(0 <= hour && hour <= 23) {
            panic!("invalid hour");
        }
        if !(0 <= minute && minute <= 59) {
            panic!("invalid minute");
        }
        if !(0 <= second && second <= 59) {
            panic!("invalid second");
        }
        if !(0 <= subsec_nanosecond && subsec_nanosecond <= 999_999_999) {
            panic!("invalid nanosecond");
        }
        CivilDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            subsec_nanosecond,
        }
    }

    /// Returns the current civil datetime in the default time zone of the
    /// given configuration, according to its clock.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz, CivilDateTime, Config, FixedClock, Instant};
    ///
    /// let clock = FixedClock::new(Instant::from_epoch_second(1_737_367_201, 0)?);
    /// let config = Config::new(tz::db().get("Europe/Vienna")?, clock);
    /// assert_eq!(CivilDateTime::now(&config), datetime(2025, 1, 20, 11, 0, 1, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn now(config: &Config) -> CivilDateTime {
        CivilDateTime::now_in(config, config.default_zone())
    }

    /// Returns the current civil datetime in the given time zone, according
    /// to the clock of the given configuration.
    #[inline]
    pub fn now_in(config: &Config, zone: &ZoneId) -> CivilDateTime {
        CivilDateTime::from_instant(config.now(), zone)
    }

    /// Returns the civil datetime on a clock using the given offset,
    /// `seconds` seconds and `subsec_nanosecond` nanoseconds after the Unix
    /// epoch.
    ///
    /// # Errors
    ///
    /// This returns an error when `subsec_nanosecond` is not in the range
    /// `0..=999_999_999` or when the resulting civil datetime is out of
    /// range.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::UtcOffset, CivilDateTime};
    ///
    /// let dt = CivilDateTime::from_epoch_second(0, 0, UtcOffset::constant(-5))?;
    /// assert_eq!(dt, datetime(1969, 12, 31, 19, 0, 0, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_epoch_second(
        seconds: i64,
        subsec_nanosecond: i32,
        offset: UtcOffset,
    ) -> Result<CivilDateTime, Error> {
        if !(0..=999_999_999).contains(&subsec_nanosecond) {
            return Err(Error::range(
                "subsec nanosecond",
                subsec_nanosecond,
                0,
                999_999_999,
            ));
        }
        let offset = i64::from(offset.seconds());
        let second = seconds.checked_add(offset).ok_or_else(|| {
            Error::range(
                "civil second",
                i128::from(seconds) + i128::from(offset),
                CivilDateTime::MIN_LOCAL_SECOND,
                CivilDateTime::MAX_LOCAL_SECOND,
            )
        })?;
        CivilDateTime::from_local_second(second, subsec_nanosecond)
    }

    /// Returns the civil datetime that the given instant corresponds to in
    /// the given time zone.
    ///
    /// This never fails. Every instant maps to precisely one offset in a
    /// time zone, and every instant can be read on a clock at any offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz, CivilDateTime, Instant};
    ///
    /// let sydney = tz::db().get("Australia/Sydney")?;
    /// let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    /// let dt = CivilDateTime::from_instant(instant, &sydney);
    /// assert_eq!(dt, datetime(2025, 1, 20, 21, 0, 1, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn from_instant(instant: Instant, zone: &ZoneId) -> CivilDateTime {
        zone.offset_for_instant(instant).to_civil(instant)
    }

    /// Returns the year of this datetime.
    #[inline]
    pub const fn year(self) -> i16 {
        self.year
    }

    /// Returns the month of this datetime, in the range `1..=12`.
    #[inline]
    pub const fn month(self) -> i8 {
        self.month
    }

    /// Returns the day of the month, in the range `1..=31`.
    #[inline]
    pub const fn day(self) -> i8 {
        self.day
    }

    /// Returns the hour, in the range `0..=23`.
    #[inline]
    pub const fn hour(self) -> i8 {
        self.hour
    }

    /// Returns the minute, in the range `0..=59`.
    #[inline]
    pub const fn minute(self) -> i8 {
        self.minute
    }

    /// Returns the second, in the range `0..=59`.
    #[inline]
    pub const fn second(self) -> i8 {
        self.second
    }

    /// Returns the fractional part of the second in nanoseconds, in the
    /// range `0..=999_999_999`.
    #[inline]
    pub const fn subsec_nanosecond(self) -> i32 {
        self.subsec_nanosecond
    }

    /// Pairs this civil datetime with an offset.
    ///
    /// This never fails. The offset isn't validated against anything.
    #[inline]
    pub fn at_offset(self, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime::new(self, offset)
    }

    /// Resolves this civil datetime in the given time zone.
    ///
    /// This is [`ZonedDateTime::from_local`] without a preferred offset.
    /// So a civil datetime in a gap is shifted forward by the length of the
    /// gap, and a civil datetime in a fold is paired with the offset of its
    /// first occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let zdt = datetime(2025, 3, 30, 2, 30, 0, 0).at_zone(&vienna);
    /// assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn at_zone(self, zone: &ZoneId) -> ZonedDateTime {
        ZonedDateTime::from_local(self, zone, None)
    }

    /// Returns the instant at which a clock using the given offset reads
    /// this civil datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is out of the supported
    /// range. This only happens within 18 hours of [`CivilDateTime::MIN`]
    /// or [`CivilDateTime::MAX`].
    #[inline]
    pub fn to_instant(self, offset: UtcOffset) -> Result<Instant, Error> {
        offset.to_instant(self)
    }

    /// Adds the given duration to this civil datetime.
    ///
    /// This is plain clock arithmetic. Every day has 86,400 seconds and no
    /// time zone transitions are considered.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would exceed
    /// [`CivilDateTime::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use core::time::Duration;
    ///
    /// use tempora::civil::datetime;
    ///
    /// let dt = datetime(2024, 12, 31, 23, 30, 0, 0);
    /// let got = dt.checked_add(Duration::from_secs(3600))?;
    /// assert_eq!(got, datetime(2025, 1, 1, 0, 30, 0, 0));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn checked_add(
        self,
        duration: Duration,
    ) -> Result<CivilDateTime, Error> {
        self.checked_add_impl(duration).context(E::FailedAddDuration)
    }

    /// Subtracts the given duration from this civil datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would precede
    /// [`CivilDateTime::MIN`].
    #[inline]
    pub fn checked_sub(
        self,
        duration: Duration,
    ) -> Result<CivilDateTime, Error> {
        self.checked_sub_impl(duration).context(E::FailedSubDuration)
    }

    /// Parses a civil datetime from text like `2025-01-20T10:00:01`.
    ///
    /// # Errors
    ///
    /// This returns a parse error when the text is malformed, when its
    /// fields are invalid, or when it contains an offset or a time zone
    /// annotation.
    #[inline]
    pub fn parse(text: impl AsRef<[u8]>) -> Result<CivilDateTime, Error> {
        crate::fmt::temporal::DateTimeParser::new().parse_civil(text)
    }

    fn checked_add_impl(
        self,
        duration: Duration,
    ) -> Result<CivilDateTime, Error> {
        let seconds = duration_seconds(duration)?;
        // OK because sub-second nanoseconds are always less than 10^9.
        let mut nanos =
            self.subsec_nanosecond + duration.subsec_nanos() as i32;
        let mut second = self.local_second().saturating_add(seconds);
        if nanos >= 1_000_000_000 {
            nanos -= 1_000_000_000;
            second = second.saturating_add(1);
        }
        CivilDateTime::from_local_second(second, nanos)
    }

    fn checked_sub_impl(
        self,
        duration: Duration,
    ) -> Result<CivilDateTime, Error> {
        let seconds = duration_seconds(duration)?;
        // OK because sub-second nanoseconds are always less than 10^9.
        let mut nanos =
            self.subsec_nanosecond - duration.subsec_nanos() as i32;
        let mut second = self.local_second().saturating_sub(seconds);
        if nanos < 0 {
            nanos += 1_000_000_000;
            second = second.saturating_sub(1);
        }
        CivilDateTime::from_local_second(second, nanos)
    }

    /// Validates and creates a civil datetime from wide integers.
    ///
    /// Parsing uses this directly, since it may see numbers that don't fit
    /// into the narrow field types.
    pub(crate) fn try_new(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        subsec_nanosecond: i64,
    ) -> Result<CivilDateTime, Error> {
        fn check(
            what: &'static str,
            given: i64,
            min: i64,
            max: i64,
        ) -> Result<(), Error> {
            if !(min..=max).contains(&given) {
                return Err(E::InvalidField { what, given, min, max }.into());
            }
            Ok(())
        }

        check("year", year, -9999, 9999)?;
        check("month", month, 1, 12)?;
        check("day", day, 1, 31)?;
        check("hour", hour, 0, 23)?;
        check("minute", minute, 0, 59)?;
        check("second", second, 0, 59)?;
        check("subsec nanosecond", subsec_nanosecond, 0, 999_999_999)?;
        // OK because every value was just checked to fit its field type.
        let (year, month, day) = (year as i16, month as i8, day as i8);
        let max = itime::days_in_month(year, month);
        if day > max {
            return Err(E::InvalidDay { year, month, day, max }.into());
        }
        Ok(CivilDateTime {
            year,
            month,
            day,
            hour: hour as i8,
            minute: minute as i8,
            second: second as i8,
            subsec_nanosecond: subsec_nanosecond as i32,
        })
    }

    /// Creates a civil datetime from a number of wall clock seconds since
    /// `1970-01-01T00:00:00`.
    pub(crate) fn from_local_second(
        second: i64,
        subsec_nanosecond: i32,
    ) -> Result<CivilDateTime, Error> {
        let (min, max) =
            (CivilDateTime::MIN_LOCAL_SECOND, CivilDateTime::MAX_LOCAL_SECOND);
        if !(min..=max).contains(&second) {
            return Err(Error::range("civil second", second, min, max));
        }
        let idt = IEpochSecond { second }.to_datetime();
        Ok(CivilDateTime::from_itime(idt, subsec_nanosecond))
    }

    /// Returns the number of seconds between `1970-01-01T00:00:00` and this
    /// datetime, as read on the same wall clock.
    ///
    /// The fractional second is ignored.
    #[inline]
    pub(crate) const fn local_second(self) -> i64 {
        self.to_itime().to_epoch_second().second
    }

    #[inline]
    pub(crate) const fn from_itime(
        idt: IDateTime,
        subsec_nanosecond: i32,
    ) -> CivilDateTime {
        CivilDateTime {
            year: idt.date.year,
            month: idt.date.month,
            day: idt.date.day,
            hour: idt.time.hour,
            minute: idt.time.minute,
            second: idt.time.second,
            subsec_nanosecond,
        }
    }

    #[inline]
    pub(crate) const fn to_itime(self) -> IDateTime {
        IDateTime {
            date: IDate { year: self.year, month: self.month, day: self.day },
            time: ITime {
                hour: self.hour,
                minute: self.minute,
                second: self.second,
                subsec_nanosecond: self.subsec_nanosecond,
            },
        }
    }
}

fn duration_seconds(duration: Duration) -> Result<i64, Error> {
    i64::try_from(duration.as_secs()).map_err(|_| {
        Error::range("duration seconds", duration.as_secs(), 0, i64::MAX)
    })
}

impl core::fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::fmt::temporal::DateTimePrinter;

        static P: DateTimePrinter = DateTimePrinter::new();
        P.print_civil(self, f).map_err(|_| core::fmt::Error)
    }
}

impl core::fmt::Debug for CivilDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl core::str::FromStr for CivilDateTime {
    type Err = Error;

    fn from_str(string: &str) -> Result<CivilDateTime, Error> {
        CivilDateTime::parse(string)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CivilDateTime {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CivilDateTime {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<CivilDateTime, D::Error> {
        deserializer.deserialize_str(crate::fmt::serde::FromStrVisitor::new(
            "a civil datetime string like `2025-01-20T10:00:01`",
        ))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for CivilDateTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> CivilDateTime {
        let year = i16::arbitrary(g).rem_euclid(19_999) - 9999;
        let month = i8::arbitrary(g).rem_euclid(12) + 1;
        let day =
            i8::arbitrary(g).rem_euclid(itime::days_in_month(year, month)) + 1;
        CivilDateTime {
            year,
            month,
            day,
            hour: i8::arbitrary(g).rem_euclid(24),
            minute: i8::arbitrary(g).rem_euclid(60),
            second: i8::arbitrary(g).rem_euclid(60),
            subsec_nanosecond: i32::arbitrary(g).rem_euclid(1_000_000_000),
        }
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = CivilDateTime>> {
        let dt = *self;
        alloc::boxed::Box::new(
            (dt.year, dt.month, dt.day, dt.hour).shrink().filter_map(
                move |(year, month, day, hour)| {
                    CivilDateTime::new(
                        year,
                        month,
                        day,
                        hour,
                        dt.minute,
                        dt.second,
                        dt.subsec_nanosecond,
                    )
                    .ok()
                },
            ),
        )
    }
}
