/*!
Time zones: offsets from UTC, zone rules and the database they come from.

The central type of this module is [`ZoneId`]. It names a time zone and
carries that zone's [`ZoneRules`], which map instants to offsets and civil
datetimes to the offsets that are valid for them. Around daylight saving time
transitions, a civil datetime may have no valid offset (a gap) or two (a
fold). This is described by [`AmbiguousOffset`].

Zones are usually looked up by name in a [`ZoneDatabase`], and most callers
want the global one returned by [`db`]:

```
use tempora::{civil::datetime, tz::{self, AmbiguousOffset, UtcOffset}};

let vienna = tz::db().get("Europe/Vienna")?;
assert_eq!(
    vienna.offsets_for_civil(datetime(2025, 1, 20, 10, 0, 1, 0)),
    AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(1) },
);

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    ambiguous::{AmbiguousOffset, GapTransition, ValidOffsets},
    db::{db, ZoneDatabase},
    offset::UtcOffset,
    zone::{ZoneId, ZoneRules},
};

mod ambiguous;
mod db;
mod offset;
pub(crate) mod posix;
#[cfg(feature = "std")]
pub(crate) mod system;
mod zone;

/// What to do when text names both an offset and a time zone, and the offset
/// is not valid for the civil datetime in that time zone.
///
/// This is used by
/// [`DateTimeParser::offset_conflict`](crate::fmt::temporal::DateTimeParser::offset_conflict).
///
/// # Example
///
/// This shows how text that was written before a change to a time zone's
/// rules (or written by a buggy program) can still be parsed by preferring
/// the civil datetime and the time zone over the offset:
///
/// ```
/// use tempora::{fmt::temporal::DateTimeParser, tz::OffsetConflict};
///
/// let text = "2025-01-20T10:00:01+07:00[Europe/Vienna]";
///
/// let parser = DateTimeParser::new();
/// let err = parser.parse_zoned(text).unwrap_err();
/// assert!(err.is_zone_offset_mismatch());
///
/// let parser = DateTimeParser::new()
///     .offset_conflict(OffsetConflict::PreferOffset);
/// let zdt = parser.parse_zoned(text)?;
/// assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+01:00[Europe/Vienna]");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum OffsetConflict {
    /// Return an error when the offset isn't valid for the civil datetime in
    /// the time zone.
    ///
    /// This is the default.
    #[default]
    Reject,
    /// Resolve the civil datetime in the time zone, using the offset only to
    /// pick between the two offsets of a fold.
    ///
    /// This never fails because of a mismatched offset. It corresponds to
    /// [`ZonedDateTime::from_local`](crate::ZonedDateTime::from_local) with
    /// the parsed offset as the preference.
    PreferOffset,
}
