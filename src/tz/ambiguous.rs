use core::time::Duration;

use crate::{civil::CivilDateTime, tz::UtcOffset};

/// A possibly ambiguous offset for a civil datetime in a time zone.
///
/// This is the answer to "which offsets does this time zone use for this
/// wall clock reading?" Most of the time the answer is exactly one offset.
/// But around transitions, like the start or end of daylight saving time,
/// a civil datetime may never occur (a gap) or may occur twice (a fold).
///
/// This is returned by [`ZoneRules::offsets_for_civil`](crate::tz::ZoneRules::offsets_for_civil).
///
/// # Example
///
/// ```
/// use tempora::{civil::datetime, tz::{self, AmbiguousOffset, UtcOffset}};
///
/// let vienna = tz::db().get("Europe/Vienna")?;
///
/// let kind = vienna.offsets_for_civil(datetime(2025, 3, 30, 2, 30, 0, 0));
/// assert_eq!(kind, AmbiguousOffset::Gap {
///     before: UtcOffset::constant(1),
///     after: UtcOffset::constant(2),
/// });
/// assert!(kind.offsets().is_empty());
///
/// let kind = vienna.offsets_for_civil(datetime(2025, 10, 26, 2, 30, 0, 0));
/// assert_eq!(
///     &*kind.offsets(),
///     &[UtcOffset::constant(2), UtcOffset::constant(1)],
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AmbiguousOffset {
    /// The civil datetime has exactly one offset.
    Unambiguous {
        /// The sole offset.
        offset: UtcOffset,
    },
    /// The civil datetime never appears on a clock in this time zone,
    /// because the clocks jumped over it.
    ///
    /// Usually this happens when daylight saving time starts and the clocks
    /// move forward.
    Gap {
        /// The offset in effect before the gap.
        before: UtcOffset,
        /// The offset in effect after the gap.
        after: UtcOffset,
    },
    /// The civil datetime appears twice on a clock in this time zone,
    /// because the clocks were set back over it.
    ///
    /// Usually this happens when daylight saving time ends and the clocks
    /// move backward.
    Fold {
        /// The offset of the first occurrence.
        before: UtcOffset,
        /// The offset of the second occurrence.
        after: UtcOffset,
    },
}

impl AmbiguousOffset {
    /// Returns the offsets that are valid for the civil datetime.
    ///
    /// This is empty for a gap, has one offset when unambiguous and has two
    /// offsets for a fold. The offsets of a fold are ordered by the
    /// occurrence they belong to, so the offset of the earlier instant
    /// comes first.
    #[inline]
    pub fn offsets(self) -> ValidOffsets {
        match self {
            AmbiguousOffset::Unambiguous { offset } => {
                ValidOffsets { offsets: [offset, offset], len: 1 }
            }
            AmbiguousOffset::Gap { before, after } => {
                ValidOffsets { offsets: [before, after], len: 0 }
            }
            AmbiguousOffset::Fold { before, after } => {
                ValidOffsets { offsets: [before, after], len: 2 }
            }
        }
    }

    /// Returns true when the given offset is one of the valid offsets.
    #[inline]
    pub fn is_valid(self, offset: UtcOffset) -> bool {
        self.offsets().contains(&offset)
    }
}

/// The zero, one or two offsets that are valid for a civil datetime.
///
/// This dereferences to a slice of offsets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ValidOffsets {
    offsets: [UtcOffset; 2],
    len: u8,
}

impl core::ops::Deref for ValidOffsets {
    type Target = [UtcOffset];

    #[inline]
    fn deref(&self) -> &[UtcOffset] {
        &self.offsets[..usize::from(self.len)]
    }
}

/// A description of a gap in a time zone.
///
/// This is the wall clock time at which the clocks jumped forward, along
/// with how far they jumped. Shifting a civil datetime inside the gap forward
/// by [`GapTransition::length`] yields the wall clock reading the same
/// elapsed time after the transition.
///
/// This is returned by [`ZoneRules::transition_after_gap`](crate::tz::ZoneRules::transition_after_gap).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GapTransition {
    start: CivilDateTime,
    length: Duration,
}

impl GapTransition {
    /// Creates a new description of a gap, starting at the given wall clock
    /// time and skipping the given length.
    #[inline]
    pub fn new(start: CivilDateTime, length: Duration) -> GapTransition {
        GapTransition { start, length }
    }

    /// The first wall clock time that was skipped.
    #[inline]
    pub fn start(&self) -> CivilDateTime {
        self.start
    }

    /// The amount of wall clock time skipped.
    #[inline]
    pub fn length(&self) -> Duration {
        self.length
    }
}
