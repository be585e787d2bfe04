/*!
Provides support for [POSIX's `TZ` environment variable][posix-env] rules.

A POSIX time zone rule tersely describes a standard offset, an optional
daylight saving time (DST) offset and the rule for when DST begins and ends.
For example, `CET-1CEST,M3.5.0,M10.5.0/3` describes Central European Time:
`+01:00` in winter, `+02:00` in summer, with DST starting on the last Sunday
of March at 02:00 and ending on the last Sunday of October at 03:00.

Note that a POSIX time zone like `EST5` corresponds to the UTC offset
`-05:00`, and `GMT-4` corresponds to the UTC offset `+04:00`. Yes, it's
backwards. How fun.

Every rule is applied to every year in the supported range. There is no
history here, only the rule.

[posix-env]: https://pubs.opengroup.org/onlinepubs/9699919799/basedefs/V1_chap08.html#tag_08_03
*/

use core::time::Duration;

use crate::{
    civil::CivilDateTime,
    error::{tz::posix::Error as E, Error, ErrorContext},
    tz::{AmbiguousOffset, GapTransition, UtcOffset},
    util::itime::{self, IDate, SECONDS_PER_DAY},
    Instant,
};

mod parser;

/// A POSIX time zone.
///
/// Abbreviations are validated when parsing but not retained, since nothing
/// in this crate prints them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PosixTimeZone {
    std_offset: UtcOffset,
    dst: Option<PosixDst>,
}

impl PosixTimeZone {
    /// Parse a POSIX `TZ` rule, with the IANA v3+ extensions enabled.
    pub(crate) fn parse(input: &str) -> Result<PosixTimeZone, Error> {
        parser::parse(input.as_bytes()).with_context(|| E::invalid_rule(input))
    }

    /// Returns the appropriate time zone offset to use for the given
    /// instant.
    pub(crate) fn to_offset(&self, instant: Instant) -> UtcOffset {
        let year = UtcOffset::UTC.to_civil(instant).year();
        self.dst_info_utc(year)
            .filter(|info| info.in_dst(instant.epoch_second()))
            .map(|info| info.offset)
            .unwrap_or(self.std_offset)
    }

    /// Returns the possibly ambiguous offset for the given civil datetime.
    ///
    /// The given datetime should correspond to the "wall" clock time of what
    /// humans use to tell time for this time zone.
    pub(crate) fn to_ambiguous_kind(
        &self,
        civil: CivilDateTime,
    ) -> AmbiguousOffset {
        let std_offset = self.std_offset;
        let Some(info) = self.dst_info_wall(civil.year()) else {
            return AmbiguousOffset::Unambiguous { offset: std_offset };
        };
        // Every boundary is a whole second, so comparing whole seconds is
        // the same as comparing with full precision.
        let second = civil.local_second();
        let diff = info.offset.seconds_since(std_offset);
        // A positive difference puts the gap at the start of DST and the fold
        // at its end. A negative one (Dublin's winter time) swaps them.
        if diff == 0 {
            AmbiguousOffset::Unambiguous { offset: std_offset }
        } else if diff < 0 {
            if info.in_dst(second) {
                return AmbiguousOffset::Unambiguous { offset: info.offset };
            }
            let fold_start = info.start + diff;
            let gap_end = info.end - diff;
            if fold_start <= second && second < info.start {
                AmbiguousOffset::Fold { before: std_offset, after: info.offset }
            } else if info.end <= second && second < gap_end {
                AmbiguousOffset::Gap { before: info.offset, after: std_offset }
            } else {
                AmbiguousOffset::Unambiguous { offset: std_offset }
            }
        } else {
            if !info.in_dst(second) {
                return AmbiguousOffset::Unambiguous { offset: std_offset };
            }
            let gap_end = info.start + diff;
            let fold_start = info.end - diff;
            if info.start <= second && second < gap_end {
                AmbiguousOffset::Gap { before: std_offset, after: info.offset }
            } else if fold_start <= second && second < info.end {
                AmbiguousOffset::Fold { before: info.offset, after: std_offset }
            } else {
                AmbiguousOffset::Unambiguous { offset: info.offset }
            }
        }
    }

    /// Returns the gap containing the given civil datetime, if any.
    pub(crate) fn transition_after_gap(
        &self,
        civil: CivilDateTime,
    ) -> Option<GapTransition> {
        if !matches!(self.to_ambiguous_kind(civil), AmbiguousOffset::Gap { .. })
        {
            return None;
        }
        let info = self.dst_info_wall(civil.year())?;
        let diff = info.offset.seconds_since(self.std_offset);
        let (start, length) =
            if diff > 0 { (info.start, diff) } else { (info.end, -diff) };
        let start = CivilDateTime::from_local_second(start, 0).ok()?;
        let length = Duration::from_secs(length.unsigned_abs());
        Some(GapTransition::new(start, length))
    }

    /// Returns the range in which DST occurs.
    ///
    /// The seconds returned are in UTC. This is useful for determining
    /// whether an instant is in DST or not.
    fn dst_info_utc(&self, year: i16) -> Option<DstInfo> {
        let dst = self.dst.as_ref()?;
        // DST time starts with respect to standard time, so offset it by the
        // standard offset.
        let start = dst.rule.start.to_second(year, self.std_offset);
        // DST time ends with respect to DST time, so offset it by the DST
        // offset.
        let end = dst.rule.end.to_second(year, dst.offset);
        Some(DstInfo { start, end, offset: dst.offset })
    }

    /// Returns the range in which DST occurs.
    ///
    /// The seconds returned are in "wall clock time." That is, they
    /// represent the transitions as they are seen from humans reading a clock
    /// within the geographic location of that time zone.
    fn dst_info_wall(&self, year: i16) -> Option<DstInfo> {
        let dst = self.dst.as_ref()?;
        // POSIX time zones express their DST transitions in terms of wall
        // clock time, so we don't want to offset our datetimes at all.
        let start = dst.rule.start.to_second(year, UtcOffset::ZERO);
        let end = dst.rule.end.to_second(year, UtcOffset::ZERO);
        Some(DstInfo { start, end, offset: dst.offset })
    }
}

/// The daylight saving time (DST) info for a POSIX time zone in a particular
/// year.
///
/// The boundaries are seconds since the Unix epoch, either on the UTC
/// timeline or read on the wall clock of the time zone.
#[derive(Debug, Eq, PartialEq)]
struct DstInfo {
    /// The start time (inclusive) that DST begins.
    ///
    /// Note that this may be greater than `end`. This tends to happen in the
    /// southern hemisphere.
    start: i64,
    /// The end time (exclusive) that DST ends.
    end: i64,
    /// The DST offset.
    offset: UtcOffset,
}

impl DstInfo {
    /// Returns true if and only if the given second ought to be considered
    /// in DST.
    fn in_dst(&self, second: i64) -> bool {
        if self.start <= self.end {
            self.start <= second && second < self.end
        } else {
            !(self.end <= second && second < self.start)
        }
    }
}

/// The daylight-saving-time offset and rule for this time zone.
///
/// When a TZ string omits the rule, the parser fills in a default one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PosixDst {
    offset: UtcOffset,
    rule: PosixRule,
}

/// The start and end of DST in every year.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PosixRule {
    start: PosixDayTime,
    end: PosixDayTime,
}

/// A specification for the day and an optional time at which a DST
/// transition occurs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PosixDayTime {
    date: PosixDay,
    /// The transition time in seconds after midnight. With the IANA v3+
    /// extension, this is in the range `-604799..=604799`.
    time: i32,
}

impl PosixDayTime {
    /// The transition time POSIX uses when one isn't given.
    const DEFAULT_TIME: i32 = 2 * 3600;

    /// Turns this POSIX datetime spec into a number of seconds since the
    /// Unix epoch in the year given, offset by the given offset. For wall
    /// clock time, an offset of `0` should be given. For UTC time, the
    /// offset (standard or DST) corresponding to this time spec should be
    /// given.
    ///
    /// The second returned is guaranteed to be within the given year, where
    /// the first second of the following year stands in for "the end of the
    /// year." This guarantee is upheld even when the datetime specification
    /// (combined with the offset) would extend past the end of the year (or
    /// before the start of the year).
    fn to_second(&self, year: i16, offset: UtcOffset) -> i64 {
        let first = year_start_day(year);
        let days = if itime::is_leap_year(year) { 366 } else { 365 };
        let year_start = first * SECONDS_PER_DAY;
        let year_end = (first + days) * SECONDS_PER_DAY;
        let Some(day) = self.date.to_epoch_day(year) else { return year_end };
        let second = day * SECONDS_PER_DAY + i64::from(self.time)
            - i64::from(offset.seconds());
        second.clamp(year_start, year_end)
    }
}

/// A specification for the day at which a DST transition occurs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum PosixDay {
    /// POSIX says:
    ///
    /// > The Julian day n (`1 <= n <= 365`). Leap days shall not be counted.
    /// > That is, in all years-including leap years-February 28 is day 59
    /// > and March 1 is day 60. It is impossible to refer explicitly to the
    /// > occasional February 29.
    JulianOne(i16),
    /// POSIX says:
    ///
    /// > The zero-based Julian day (`0 <= n <= 365`). Leap days shall be
    /// > counted, and it is possible to refer to February 29.
    JulianZero(i16),
    /// POSIX says:
    ///
    /// > The `d`'th day (`0 <= d <= 6`) of week `n` of month `m` of the year
    /// > (`1 <= n <= 5`, `1 <= m <= 12`, where week `5` means "the last `d`
    /// > day in month `m`" which may occur in either the fourth or the fifth
    /// > week). Week `1` is the first week in which the `d`'th day occurs.
    /// > Day zero is Sunday.
    WeekdayOfMonth { month: i8, week: i8, weekday: i8 },
}

impl PosixDay {
    /// Convert this date specification to a day since the Unix epoch in the
    /// year given.
    ///
    /// If this date specification couldn't be turned into a date in the year
    /// given, then `None` is returned. This happens when `365` is given as a
    /// zero based day, but the year given is not a leap year. Callers treat
    /// this as the end of the year.
    fn to_epoch_day(&self, year: i16) -> Option<i64> {
        let first = year_start_day(year);
        let leap = itime::is_leap_year(year);
        match *self {
            PosixDay::JulianOne(day) => {
                let day = i64::from(day);
                let leap_day = i64::from(leap && day >= 60);
                Some(first + day - 1 + leap_day)
            }
            PosixDay::JulianZero(day) => {
                if day == 365 && !leap {
                    return None;
                }
                Some(first + i64::from(day))
            }
            PosixDay::WeekdayOfMonth { month, week, weekday } => {
                let first = i64::from(
                    IDate { year, month, day: 1 }.to_epoch_day().epoch_day,
                );
                let weekday = i64::from(weekday);
                if week == 5 {
                    let len = i64::from(itime::days_in_month(year, month));
                    let last = first + len - 1;
                    let back = (sunday_zero_weekday(last) - weekday).rem_euclid(7);
                    Some(last - back)
                } else {
                    let to_first =
                        (weekday - sunday_zero_weekday(first)).rem_euclid(7);
                    Some(first + to_first + 7 * (i64::from(week) - 1))
                }
            }
        }
    }
}

/// Returns the day since the Unix epoch of January 1 of the given year.
fn year_start_day(year: i16) -> i64 {
    i64::from(IDate { year, month: 1, day: 1 }.to_epoch_day().epoch_day)
}

/// Returns the weekday of a day since the Unix epoch, with Sunday as `0`.
///
/// `1970-01-01` was a Thursday.
fn sunday_zero_weekday(epoch_day: i64) -> i64 {
    (epoch_day + 4).rem_euclid(7)
}
