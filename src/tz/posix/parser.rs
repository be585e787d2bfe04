use crate::{
    error::{Error, ErrorContext},
    tz::UtcOffset,
    util::escape::{Byte, Bytes},
};

use super::{PosixDay, PosixDayTime, PosixDst, PosixRule, PosixTimeZone};

/// The rule used when a TZ string names a DST abbreviation without saying
/// when DST begins and ends. This is the current rule in the United States,
/// which is also what glibc and musl assume.
const DEFAULT_RULE: PosixRule = PosixRule {
    start: PosixDayTime {
        date: PosixDay::WeekdayOfMonth { month: 3, week: 2, weekday: 0 },
        time: PosixDayTime::DEFAULT_TIME,
    },
    end: PosixDayTime {
        date: PosixDay::WeekdayOfMonth { month: 11, week: 1, weekday: 0 },
        time: PosixDayTime::DEFAULT_TIME,
    },
};

/// Abbreviations are validated but not kept. These are the lengths that
/// glibc accepts.
const ABBREVIATION_LEN: core::ops::RangeInclusive<usize> = 3..=30;

/// The largest hour permitted in an offset, as in `EST5`.
const MAX_OFFSET_HOUR: i32 = 24;

/// The largest hour permitted in a transition time, as in `M3.2.0/2`.
///
/// This is the IANA v3+ extension, which also permits a sign. It's a strict
/// superset of POSIX, so it's always enabled.
const MAX_TRANSITION_HOUR: i32 = 167;

/// Parses a complete POSIX `TZ` rule, like `CET-1CEST,M3.5.0,M10.5.0/3`.
///
/// Each routine below takes the remaining input and returns what it parsed
/// along with whatever input is left after it.
pub(super) fn parse(input: &[u8]) -> Result<PosixTimeZone, Error> {
    if input.is_empty() {
        return Err(err!("POSIX time zone rule is empty"));
    }
    let (tz, rest) = time_zone(input)?;
    if !rest.is_empty() {
        return Err(err!(
            "expected the entire string to be a POSIX time zone rule, \
             but found `{}` after a valid rule",
            Bytes(rest),
        ));
    }
    Ok(tz)
}

// std offset [dst [offset] [,rule]]
fn time_zone(input: &[u8]) -> Result<(PosixTimeZone, &[u8]), Error> {
    let rest = abbreviation(input)
        .context(err!("failed to parse standard abbreviation"))?;
    let (std_offset, rest) =
        offset(rest).context(err!("failed to parse standard offset"))?;
    match rest.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'<' => {
            let (dst, rest) = dst(rest, std_offset)?;
            Ok((PosixTimeZone { std_offset, dst: Some(dst) }, rest))
        }
        _ => Ok((PosixTimeZone { std_offset, dst: None }, rest)),
    }
}

// dst [offset] [,rule]
fn dst(input: &[u8], std_offset: UtcOffset) -> Result<(PosixDst, &[u8]), Error> {
    let mut rest = abbreviation(input)
        .context(err!("failed to parse DST abbreviation"))?;
    // Without an explicit offset, DST is one hour ahead of standard time.
    let mut dst = PosixDst {
        offset: UtcOffset::from_seconds(std_offset.seconds() + 3600)
            .context(err!("failed to compute default DST offset"))?,
        rule: DEFAULT_RULE,
    };
    if !rest.is_empty() && rest[0] != b',' {
        let (offset, tail) =
            offset(rest).context(err!("failed to parse DST offset"))?;
        dst.offset = offset;
        rest = tail;
    }
    let Some((&first, tail)) = rest.split_first() else {
        return Ok((dst, rest));
    };
    if first != b',' {
        return Err(err!(
            "expected `,` after the DST offset, but found `{}`",
            Byte(first),
        ));
    }
    let (rule, rest) = rule(tail)?;
    dst.rule = rule;
    Ok((dst, rest))
}

// start[/time],end[/time]
fn rule(input: &[u8]) -> Result<(PosixRule, &[u8]), Error> {
    let (start, rest) = day_time(input)
        .context(err!("failed to parse start of DST transition rule"))?;
    let rest = rest.strip_prefix(b",").ok_or_else(|| {
        err!("expected `,` after the start of the DST transition rule")
    })?;
    let (end, rest) = day_time(rest)
        .context(err!("failed to parse end of DST transition rule"))?;
    Ok((PosixRule { start, end }, rest))
}

/// Parses an abbreviation, either bare (`EST`) or quoted (`<+0530>`), and
/// returns the input that follows it.
fn abbreviation(input: &[u8]) -> Result<&[u8], Error> {
    let (name, rest) = match input.strip_prefix(b"<") {
        None => split_while(input, |b| b.is_ascii_alphabetic()),
        Some(quoted) => {
            let (name, rest) = split_while(quoted, |b| {
                b.is_ascii_alphanumeric() || b == b'+' || b == b'-'
            });
            let rest = match rest.split_first() {
                Some((b'>', rest)) => rest,
                Some((&b, _)) => {
                    return Err(err!(
                        "expected `>` to close quoted abbreviation `{}`, \
                         but found `{}`",
                        Bytes(name),
                        Byte(b),
                    ))
                }
                None => {
                    return Err(err!(
                        "expected `>` to close quoted abbreviation `{}`, \
                         but found end of input",
                        Bytes(name),
                    ))
                }
            };
            (name, rest)
        }
    };
    if !ABBREVIATION_LEN.contains(&name.len()) {
        return Err(err!(
            "expected abbreviation with {} to {} bytes, \
             but found `{}` with {} bytes",
            ABBREVIATION_LEN.start(),
            ABBREVIATION_LEN.end(),
            Bytes(name),
            name.len(),
        ));
    }
    Ok(rest)
}

/// Parses `[+-]hh[:mm[:ss]]` as an offset.
///
/// POSIX offsets count hours west of Greenwich, so `EST5` is `-05:00`.
fn offset(input: &[u8]) -> Result<(UtcOffset, &[u8]), Error> {
    let (sign, rest) = sign(input)?;
    let (seconds, rest) = duration(rest, MAX_OFFSET_HOUR)?;
    Ok((UtcOffset::from_seconds(-sign * seconds)?, rest))
}

/// Parses a day, optionally followed by `/` and a transition time.
fn day_time(input: &[u8]) -> Result<(PosixDayTime, &[u8]), Error> {
    let (date, rest) = day(input)?;
    let Some(rest) = rest.strip_prefix(b"/") else {
        return Ok((PosixDayTime { date, time: PosixDayTime::DEFAULT_TIME }, rest));
    };
    let (sign, rest) = sign(rest).context(err!("failed to parse transition time"))?;
    let (seconds, rest) = duration(rest, MAX_TRANSITION_HOUR)
        .context(err!("failed to parse transition time"))?;
    Ok((PosixDayTime { date, time: sign * seconds }, rest))
}

// Jn | n | Mm.w.d
fn day(input: &[u8]) -> Result<(PosixDay, &[u8]), Error> {
    match input.split_first() {
        Some((b'J', rest)) => {
            let (n, rest) = number(rest, "one based Julian day", 3, 1, 365)?;
            // OK because of the range check.
            Ok((PosixDay::JulianOne(n as i16), rest))
        }
        Some((b'0'..=b'9', _)) => {
            let (n, rest) = number(input, "zero based Julian day", 3, 0, 365)?;
            // OK because of the range check.
            Ok((PosixDay::JulianZero(n as i16), rest))
        }
        Some((b'M', rest)) => {
            let (month, rest) = number(rest, "month", 2, 1, 12)?;
            let rest = expect_dot(rest, "month")?;
            let (week, rest) = number(rest, "week", 1, 1, 5)?;
            let rest = expect_dot(rest, "week")?;
            let (weekday, rest) = number(rest, "weekday", 1, 0, 6)?;
            // OK because of the range checks.
            let (month, week, weekday) = (month as i8, week as i8, weekday as i8);
            Ok((PosixDay::WeekdayOfMonth { month, week, weekday }, rest))
        }
        Some((&b, _)) => Err(err!(
            "expected `J`, a digit or `M` to begin the day of a DST \
             transition, but found `{}`",
            Byte(b),
        )),
        None => Err(err!(
            "expected `J`, a digit or `M` to begin the day of a DST \
             transition, but found end of input",
        )),
    }
}

fn expect_dot<'i>(input: &'i [u8], after: &str) -> Result<&'i [u8], Error> {
    input
        .strip_prefix(b".")
        .ok_or_else(|| err!("expected `.` after {after} in DST transition day"))
}

/// Parses `hh[:mm[:ss]]` into a number of seconds.
///
/// The hours have one digit or more, up to as many as `max_hour` has. The
/// minutes and seconds always have exactly two digits.
fn duration(input: &[u8], max_hour: i32) -> Result<(i32, &[u8]), Error> {
    let hour_digits = if max_hour > 99 { 3 } else { 2 };
    let (hour, mut rest) = number(input, "hour", hour_digits, 0, max_hour)?;
    let mut seconds = hour * 3600;
    for (what, scale) in [("minute", 60), ("second", 1)] {
        let Some(tail) = rest.strip_prefix(b":") else { break };
        let (digits, tail) = crate::util::parse::split(tail, 2)
            .ok_or_else(|| err!("expected two digit {what} after `:`"))?;
        let (n, leftover) = number(digits, what, 2, 0, 59)?;
        if !leftover.is_empty() {
            return Err(err!("expected two digit {what} after `:`"));
        }
        seconds += n * scale;
        rest = tail;
    }
    Ok((seconds, rest))
}

/// Parses an optional `+` or `-` and returns `1` or `-1`.
fn sign(input: &[u8]) -> Result<(i32, &[u8]), Error> {
    let (sign, rest) = match input.split_first() {
        Some((b'+', rest)) => (1, rest),
        Some((b'-', rest)) => (-1, rest),
        _ => return Ok((1, input)),
    };
    if rest.is_empty() {
        return Err(err!("expected digits after sign, but found end of input"));
    }
    Ok((sign, rest))
}

/// Parses a decimal number of one to `max_digits` digits and checks that it
/// is in the range `min..=max`.
fn number<'i>(
    input: &'i [u8],
    what: &str,
    max_digits: usize,
    min: i32,
    max: i32,
) -> Result<(i32, &'i [u8]), Error> {
    let len = input
        .iter()
        .take(max_digits)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return Err(match input.first() {
            None => err!("expected {what}, but found end of input"),
            Some(&b) => err!("expected {what}, but found `{}`", Byte(b)),
        });
    }
    let (digits, rest) = input.split_at(len);
    let n = digits
        .iter()
        .fold(0, |n, &b| n * 10 + i32::from(b - b'0'));
    if !(min..=max).contains(&n) {
        return Err(err!(
            "parsed {what} `{n}`, but it must be in the range {min}..={max}",
        ));
    }
    Ok((n, rest))
}

/// Splits the input after the longest prefix whose bytes all match.
fn split_while(input: &[u8], matches: impl Fn(u8) -> bool) -> (&[u8], &[u8]) {
    let len = input.iter().take_while(|&&b| matches(b)).count();
    input.split_at(len)
}
