/*!
Datetimes with no time zone.

A civil datetime is what you'd read on a wall calendar next to a wall clock:
a year, month, day, hour, minute, second and fractional second. It carries no
offset and no time zone, and so, on its own, it does not identify a precise
instant in time. To get an instant, a civil datetime must be paired with an
offset (see [`CivilDateTime::to_instant`]) or resolved in a time zone (see
[`CivilDateTime::at_zone`]).
*/

pub use self::datetime::CivilDateTime;

mod datetime;

/// Creates a new `CivilDateTime` value in a `const` context.
///
/// This is a convenience free function for [`CivilDateTime::constant`]. It
/// is intended to provide a terse syntax for constructing civil datetimes
/// from parameters that are known to be valid.
///
/// # Panics
///
/// This routine panics when [`CivilDateTime::new`] would return an error.
/// That is, when the given components do not correspond to a valid civil
/// datetime. Namely, all of the following must be true:
///
/// * The year must be in the range `-9999..=9999`.
/// * The month must be in the range `1..=12`.
/// * The day must be at least `1` and must be at most the number of days
/// in the corresponding month. So for example, `2024-02-29` is valid but
/// `2025-02-29` is not.
/// * `0 <= hour <= 23`
/// * `0 <= minute <= 59`
/// * `0 <= second <= 59`
/// * `0 <= subsec_nanosecond <= 999,999,999`
///
/// Similarly, when used in a const context, invalid parameters will prevent
/// your Rust program from compiling.
///
/// # Example
///
/// ```
/// use tempora::civil::datetime;
///
/// let dt = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);
/// assert_eq!(dt.to_string(), "2025-01-20T10:00:01.123456789");
/// ```
#[inline]
pub const fn datetime(
    year: i16,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
) -> CivilDateTime {
    CivilDateTime::constant(
        year,
        month,
        day,
        hour,
        minute,
        second,
        subsec_nanosecond,
    )
}
