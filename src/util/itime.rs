/*!
Internal integer representations of civil time.

These types are a home for the calendar arithmetic everything else reduces
to: converting between a proleptic Gregorian datetime and a count of seconds
since the Unix epoch, read on the same clock.

The routines here are implemented on simple primitive integer types and
implicitly assume that their inputs are valid. That is, a date is a real
Gregorian date with a year in `-9999..=9999`, and a second count maps to
such a date. Validation happens at the boundaries, in the public types.

The `I` prefix marks these as internal, so `IDateTime` is the bare
counterpart of `CivilDateTime`.
*/

/// The number of seconds in a single civil day.
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// The Gregorian calendar repeats every 400 years.
const DAYS_PER_ERA: i32 = 146_097;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDateTime {
    pub(crate) date: IDate,
    pub(crate) time: ITime,
}

impl IDateTime {
    /// Returns the number of seconds between `1970-01-01T00:00:00` and this
    /// datetime, where both are read on the same clock.
    ///
    /// The fractional second of this datetime is ignored. Callers carry it
    /// separately.
    #[inline(always)]
    pub(crate) const fn to_epoch_second(&self) -> IEpochSecond {
        let epoch_day = self.date.to_epoch_day().epoch_day as i64;
        let second = epoch_day * SECONDS_PER_DAY
            + (self.time.to_second().second as i64);
        IEpochSecond { second }
    }
}

/// A count of seconds since `1970-01-01T00:00:00`, without any reference to
/// a time zone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IEpochSecond {
    pub(crate) second: i64,
}

impl IEpochSecond {
    /// Converts this second count to a civil datetime with a zero
    /// fractional second.
    ///
    /// This is the inverse of `IDateTime::to_epoch_second` for every
    /// datetime with a zero fractional second.
    #[inline(always)]
    pub(crate) const fn to_datetime(&self) -> IDateTime {
        let epoch_day = self.second.div_euclid(SECONDS_PER_DAY) as i32;
        let second = self.second.rem_euclid(SECONDS_PER_DAY) as i32;
        let date = IEpochDay { epoch_day }.to_date();
        let time = ITimeSecond { second }.to_time();
        IDateTime { date, time }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IEpochDay {
    pub(crate) epoch_day: i32,
}

impl IEpochDay {
    /// Converts days since the Unix epoch to a Gregorian date.
    ///
    /// Years are counted from March so that the leap day is the last day of
    /// the year, and in 400 year eras of exactly 146,097 days each.
    ///
    /// Ref: <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
    #[inline(always)]
    pub(crate) const fn to_date(&self) -> IDate {
        // Shift the epoch to 0000-03-01.
        let days = self.epoch_day + 719_468;
        let era = days.div_euclid(DAYS_PER_ERA);
        let day_of_era = days.rem_euclid(DAYS_PER_ERA);
        let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36524
            - day_of_era / 146_096)
            / 365;
        let day_of_year = day_of_era
            - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        // 0 is March and 11 is February.
        let shifted_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
        let month =
            if shifted_month < 10 { shifted_month + 3 } else { shifted_month - 9 };
        let year = year_of_era + era * 400 + if month <= 2 { 1 } else { 0 };
        IDate { year: year as i16, month: month as i8, day: day as i8 }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDate {
    pub(crate) year: i16,
    pub(crate) month: i8,
    pub(crate) day: i8,
}

impl IDate {
    /// Converts a Gregorian date to days since the Unix epoch.
    ///
    /// This is the inverse of `IEpochDay::to_date`.
    ///
    /// Ref: <https://howardhinnant.github.io/date_algorithms.html#days_from_civil>
    #[inline(always)]
    pub(crate) const fn to_epoch_day(&self) -> IEpochDay {
        let month = self.month as i32;
        let year = self.year as i32 - if month <= 2 { 1 } else { 0 };
        let era = year.div_euclid(400);
        let year_of_era = year.rem_euclid(400);
        let shifted_month = if month > 2 { month - 3 } else { month + 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + self.day as i32 - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4
            - year_of_era / 100
            + day_of_year;
        IEpochDay { epoch_day: era * DAYS_PER_ERA + day_of_era - 719_468 }
    }
}

/// Represents a clock time to nanosecond precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITime {
    pub(crate) hour: i8,
    pub(crate) minute: i8,
    pub(crate) second: i8,
    pub(crate) subsec_nanosecond: i32,
}

impl ITime {
    pub(crate) const ZERO: ITime =
        ITime { hour: 0, minute: 0, second: 0, subsec_nanosecond: 0 };

    #[inline(always)]
    pub(crate) const fn to_second(&self) -> ITimeSecond {
        let second = (self.hour as i32) * 3600
            + (self.minute as i32) * 60
            + (self.second as i32);
        ITimeSecond { second }
    }
}

/// Represents a single point in the day, to second precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITimeSecond {
    pub(crate) second: i32,
}

impl ITimeSecond {
    #[inline(always)]
    pub(crate) const fn to_time(&self) -> ITime {
        let second = self.second;
        ITime {
            hour: (second / 3600) as i8,
            minute: ((second % 3600) / 60) as i8,
            second: (second % 60) as i8,
            subsec_nanosecond: 0,
        }
    }
}

/// Returns true if and only if the given year has a February 29.
#[inline]
pub(crate) const fn is_leap_year(year: i16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks every date in the supported range, checking that consecutive
    /// dates get consecutive epoch days and that each epoch day maps back
    /// to its date.
    #[test]
    fn every_date_has_its_own_epoch_day() {
        let first = IDate { year: -9999, month: 1, day: 1 }.to_epoch_day();
        let mut expected = first.epoch_day;
        for year in -9999..=9999 {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let date = IDate { year, month, day };
                    let got = date.to_epoch_day();
                    assert_eq!(got.epoch_day, expected, "{date:?}");
                    assert_eq!(got.to_date(), date);
                    expected += 1;
                }
            }
        }
    }

    #[test]
    fn every_second_of_the_day() {
        for second in (0..86_400).map(|second| ITimeSecond { second }) {
            let time = second.to_time();
            assert!(time.hour < 24 && time.minute < 60 && time.second < 60);
            assert_eq!(time.to_second(), second);
        }
    }

    #[test]
    fn known_epoch_seconds() {
        let dt = |year, month, day, hour, minute, second| IDateTime {
            date: IDate { year, month, day },
            time: ITime { hour, minute, second, subsec_nanosecond: 0 },
        };
        let cases = [
            (dt(1970, 1, 1, 0, 0, 0), 0),
            (dt(1969, 12, 31, 23, 59, 59), -1),
            (dt(2000, 2, 29, 12, 0, 0), 951_825_600),
            (dt(2025, 1, 20, 10, 0, 1), 1_737_367_201),
            (dt(1, 1, 1, 0, 0, 0), -62_135_596_800),
            (dt(0, 12, 31, 23, 59, 59), -62_135_596_801),
            (dt(-9999, 1, 1, 0, 0, 0), -377_705_116_800),
            (dt(9999, 12, 31, 23, 59, 59), 253_402_300_799),
        ];
        for (datetime, second) in cases {
            assert_eq!(datetime.to_epoch_second().second, second);
            assert_eq!(IEpochSecond { second }.to_datetime(), datetime);
        }
    }

    #[test]
    fn leap_year() {
        let leap = [-400, -4, 0, 4, 1600, 2000, 2024];
        let common = [-100, -1, 1, 1900, 2001, 2025, 2100];
        assert!(leap.into_iter().all(is_leap_year));
        assert!(!common.into_iter().any(is_leap_year));
    }

    #[test]
    fn number_of_days_in_month() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, &days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(2025, i as i8 + 1), days);
        }
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
    }

    quickcheck::quickcheck! {
        fn prop_epoch_second_roundtrip(second: i64) -> bool {
            let min = IDateTime {
                date: IDate { year: -9999, month: 1, day: 1 },
                time: ITime::ZERO,
            }.to_epoch_second().second;
            let max = 253_402_300_799;
            let second = min + second.rem_euclid(max - min + 1);
            let got = IEpochSecond { second }.to_datetime().to_epoch_second();
            got.second == second
        }
    }
}
