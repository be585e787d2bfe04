use alloc::{boxed::Box, sync::Arc};

use crate::{
    civil::CivilDateTime,
    error::{tz::zone::Error as E, Error},
    tz::{posix::PosixTimeZone, AmbiguousOffset, GapTransition, UtcOffset},
    Instant,
};

/// The rules of a time zone.
///
/// A time zone's rules map instants to offsets, and civil datetimes to the
/// offsets that are valid for them. Every datetime conversion in this crate
/// that involves a time zone reduces to these three operations.
///
/// This crate provides rules for fixed offsets and for POSIX TZ strings (see
/// [`ZoneId::fixed`] and [`ZoneId::posix`]). Other rule sources, like a
/// compiled time zone database with full history, can implement this trait
/// and be wrapped with [`ZoneId::custom`].
///
/// # Contract
///
/// Implementations must be deterministic, and must agree with themselves:
///
/// * `offset_for_instant` returns exactly one offset for every instant.
/// * `offsets_for_civil(civil)` is unambiguous with offset `o` if and only if
/// exactly one instant `i` satisfies `offset_for_instant(i) == o` and `i`
/// read at `o` is `civil`. It is a fold when two such instants exist, with
/// the offset of the earlier one as `before`. It is a gap when none exist.
/// * `transition_after_gap(civil)` returns `Some` only when `civil` is in a
/// gap.
///
/// # Example
///
/// A custom time zone that is always three hours ahead of UTC:
///
/// ```
/// use tempora::{
///     civil::datetime,
///     tz::{AmbiguousOffset, GapTransition, UtcOffset, ZoneId, ZoneRules},
///     CivilDateTime, Instant, ZonedDateTime,
/// };
///
/// #[derive(Debug)]
/// struct Mars;
///
/// impl ZoneRules for Mars {
///     fn offsets_for_civil(&self, _: CivilDateTime) -> AmbiguousOffset {
///         AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(3) }
///     }
///
///     fn offset_for_instant(&self, _: Instant) -> UtcOffset {
///         UtcOffset::constant(3)
///     }
/// }
///
/// let zone = ZoneId::custom("Mars/Base", Mars)?;
/// let zdt = ZonedDateTime::from_local(datetime(2025, 1, 20, 10, 0, 1, 0), &zone, None);
/// assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+03:00[Mars/Base]");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait ZoneRules: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the offsets that are valid for the given civil datetime.
    fn offsets_for_civil(&self, civil: CivilDateTime) -> AmbiguousOffset;

    /// Returns the offset in effect at the given instant.
    fn offset_for_instant(&self, instant: Instant) -> UtcOffset;

    /// Returns a description of the gap containing the given civil
    /// datetime, or `None` if the civil datetime isn't in a gap.
    ///
    /// The default implementation always returns `None`. In that case,
    /// resolving a civil datetime in a gap shifts it forward by the
    /// difference between the offsets after and before the gap, which is
    /// correct for every rule set where a gap is caused by a single
    /// transition.
    fn transition_after_gap(
        &self,
        civil: CivilDateTime,
    ) -> Option<GapTransition> {
        let _ = civil;
        None
    }
}

/// An identifier for a time zone, along with its rules.
///
/// A `ZoneId` is cheap to clone. Two zone identifiers are equal when they
/// have the same name and the same rules. Zones built by
/// [`ZoneId::custom`] are only equal to their own clones.
///
/// # Getting a `ZoneId`
///
/// Most callers look up a zone by its IANA name in a
/// [`ZoneDatabase`](crate::tz::ZoneDatabase):
///
/// ```
/// use tempora::tz;
///
/// let vienna = tz::db().get("Europe/Vienna")?;
/// assert_eq!(vienna.name(), "Europe/Vienna");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// A `ZoneId` can also be built directly from a fixed offset, a POSIX TZ
/// rule or a custom [`ZoneRules`] implementation.
///
/// # Fixed offset zones
///
/// A zone built by [`ZoneId::fixed`] is named after its offset, like
/// `+07:00`. Zoned datetimes in such a zone print without a time zone
/// annotation, since the offset already says everything there is to say.
/// [`ZoneId::UTC`] is not a fixed offset zone in this sense. It is named
/// `UTC` and is printed as an annotation.
#[derive(Clone)]
pub struct ZoneId {
    /// `None` is `UTC`, which lets `ZoneId::UTC` be a constant.
    inner: Option<Arc<ZoneIdInner>>,
}

#[derive(Debug)]
struct ZoneIdInner {
    name: Box<str>,
    kind: ZoneKind,
}

#[derive(Debug)]
enum ZoneKind {
    Fixed(UtcOffset),
    Posix(PosixTimeZone),
    Custom(Box<dyn ZoneRules>),
}

impl ZoneId {
    /// The `UTC` time zone.
    pub const UTC: ZoneId = ZoneId { inner: None };

    /// Creates a time zone that always uses the given offset.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{UtcOffset, ZoneId};
    ///
    /// let zone = ZoneId::fixed(UtcOffset::constant(-5));
    /// assert_eq!(zone.name(), "-05:00");
    /// assert_eq!(zone.fixed_offset(), Some(UtcOffset::constant(-5)));
    /// ```
    pub fn fixed(offset: UtcOffset) -> ZoneId {
        use alloc::string::ToString;

        let name = offset.to_string().into_boxed_str();
        ZoneId::from_kind(name, ZoneKind::Fixed(offset))
    }

    /// Creates a time zone with the given name from a POSIX TZ rule.
    ///
    /// The rule is applied to every year. If the rule names a daylight
    /// saving time abbreviation without saying when it begins and ends, then
    /// `M3.2.0,M11.1.0` is assumed.
    ///
    /// # Errors
    ///
    /// This returns an error when the name is empty or contains whitespace
    /// or square brackets, or when the rule is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::{UtcOffset, ZoneId}};
    ///
    /// let zone = ZoneId::posix("Europe/Vienna", "CET-1CEST,M3.5.0,M10.5.0/3")?;
    /// let kind = zone.offsets_for_civil(datetime(2025, 7, 1, 12, 0, 0, 0));
    /// assert_eq!(&*kind.offsets(), &[UtcOffset::constant(2)]);
    ///
    /// assert!(ZoneId::posix("Europe/Vienna", "CET-1CEST,M3.5.0").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn posix(name: &str, rule: &str) -> Result<ZoneId, Error> {
        let name = validate_name(name)?;
        let tz = PosixTimeZone::parse(rule)?;
        Ok(ZoneId::from_kind(name, ZoneKind::Posix(tz)))
    }

    /// Creates a time zone with the given name from custom rules.
    ///
    /// # Errors
    ///
    /// This returns an error when the name is empty or contains whitespace
    /// or square brackets.
    pub fn custom(
        name: &str,
        rules: impl ZoneRules,
    ) -> Result<ZoneId, Error> {
        let name = validate_name(name)?;
        Ok(ZoneId::from_kind(name, ZoneKind::Custom(Box::new(rules))))
    }

    /// Returns the name of this time zone.
    ///
    /// For zones from a database, this is the IANA identifier, like
    /// `Europe/Vienna`. For fixed offset zones, this is the offset.
    pub fn name(&self) -> &str {
        self.inner.as_ref().map(|inner| &*inner.name).unwrap_or("UTC")
    }

    /// Returns the offset of this time zone, if it never changes.
    ///
    /// This is `Some` for [`ZoneId::UTC`] and for zones built by
    /// [`ZoneId::fixed`]. It is `None` for every other zone, even a POSIX
    /// rule without daylight saving time.
    pub fn fixed_offset(&self) -> Option<UtcOffset> {
        match self.inner.as_deref().map(|inner| &inner.kind) {
            None => Some(UtcOffset::UTC),
            Some(ZoneKind::Fixed(offset)) => Some(*offset),
            Some(_) => None,
        }
    }

    /// Returns the offsets that are valid for the given civil datetime in
    /// this time zone.
    ///
    /// See [`ZoneRules::offsets_for_civil`].
    pub fn offsets_for_civil(&self, civil: CivilDateTime) -> AmbiguousOffset {
        match self.inner.as_deref().map(|inner| &inner.kind) {
            None => AmbiguousOffset::Unambiguous { offset: UtcOffset::UTC },
            Some(ZoneKind::Fixed(offset)) => {
                AmbiguousOffset::Unambiguous { offset: *offset }
            }
            Some(ZoneKind::Posix(tz)) => tz.to_ambiguous_kind(civil),
            Some(ZoneKind::Custom(rules)) => rules.offsets_for_civil(civil),
        }
    }

    /// Returns the offset in effect at the given instant in this time zone.
    ///
    /// See [`ZoneRules::offset_for_instant`].
    pub fn offset_for_instant(&self, instant: Instant) -> UtcOffset {
        match self.inner.as_deref().map(|inner| &inner.kind) {
            None => UtcOffset::UTC,
            Some(ZoneKind::Fixed(offset)) => *offset,
            Some(ZoneKind::Posix(tz)) => tz.to_offset(instant),
            Some(ZoneKind::Custom(rules)) => rules.offset_for_instant(instant),
        }
    }

    /// Returns a description of the gap containing the given civil datetime
    /// in this time zone, if any.
    ///
    /// See [`ZoneRules::transition_after_gap`].
    pub fn transition_after_gap(
        &self,
        civil: CivilDateTime,
    ) -> Option<GapTransition> {
        match self.inner.as_deref().map(|inner| &inner.kind) {
            None | Some(ZoneKind::Fixed(_)) => None,
            Some(ZoneKind::Posix(tz)) => tz.transition_after_gap(civil),
            Some(ZoneKind::Custom(rules)) => rules.transition_after_gap(civil),
        }
    }

    /// Returns true when this zone was built by [`ZoneId::fixed`].
    pub(crate) fn is_fixed(&self) -> bool {
        matches!(
            self.inner.as_deref().map(|inner| &inner.kind),
            Some(ZoneKind::Fixed(_))
        )
    }

    fn from_kind(name: Box<str>, kind: ZoneKind) -> ZoneId {
        ZoneId { inner: Some(Arc::new(ZoneIdInner { name, kind })) }
    }
}

impl ZoneRules for ZoneId {
    fn offsets_for_civil(&self, civil: CivilDateTime) -> AmbiguousOffset {
        ZoneId::offsets_for_civil(self, civil)
    }

    fn offset_for_instant(&self, instant: Instant) -> UtcOffset {
        ZoneId::offset_for_instant(self, instant)
    }

    fn transition_after_gap(
        &self,
        civil: CivilDateTime,
    ) -> Option<GapTransition> {
        ZoneId::transition_after_gap(self, civil)
    }
}

impl Eq for ZoneId {}

impl PartialEq for ZoneId {
    fn eq(&self, other: &ZoneId) -> bool {
        let (a, b) = match (&self.inner, &other.inner) {
            (None, None) => return true,
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if Arc::ptr_eq(a, b) {
            return true;
        }
        if a.name != b.name {
            return false;
        }
        match (&a.kind, &b.kind) {
            (ZoneKind::Fixed(x), ZoneKind::Fixed(y)) => x == y,
            (ZoneKind::Posix(x), ZoneKind::Posix(y)) => x == y,
            // Custom rules are opaque, so only clones of one zone are equal.
            _ => false,
        }
    }
}

impl core::hash::Hash for ZoneId {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl core::fmt::Debug for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("ZoneId").field(&self.name()).finish()
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

fn validate_name(name: &str) -> Result<Box<str>, Error> {
    if name.is_empty() {
        return Err(E::EmptyName.into());
    }
    if name.chars().any(|ch| ch.is_whitespace() || ch == '[' || ch == ']') {
        return Err(E::InvalidName { name: name.into() }.into());
    }
    Ok(name.into())
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString};

    use crate::civil::datetime;

    use super::*;

    #[derive(Debug)]
    struct AlwaysThree;

    impl ZoneRules for AlwaysThree {
        fn offsets_for_civil(&self, _: CivilDateTime) -> AmbiguousOffset {
            AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(3) }
        }

        fn offset_for_instant(&self, _: Instant) -> UtcOffset {
            UtcOffset::constant(3)
        }
    }

    #[test]
    fn names() {
        assert_eq!(ZoneId::UTC.name(), "UTC");
        assert_eq!(ZoneId::fixed(UtcOffset::UTC).name(), "+00:00");
        assert_eq!(ZoneId::fixed(UtcOffset::constant(7)).to_string(), "+07:00");
        assert_eq!(
            format!("{:?}", ZoneId::posix("Asia/Tokyo", "JST-9").unwrap()),
            "ZoneId(\"Asia/Tokyo\")",
        );
    }

    #[test]
    fn invalid_names() {
        insta::assert_snapshot!(
            ZoneId::posix("", "UTC0").unwrap_err(),
            @"time zone names must not be empty",
        );
        insta::assert_snapshot!(
            ZoneId::custom("Mars Base", AlwaysThree).unwrap_err(),
            @"time zone name `Mars Base` is invalid, since names must not contain whitespace or square brackets",
        );
        assert!(ZoneId::custom("Mars[Base]", AlwaysThree).is_err());
    }

    #[test]
    fn equality_needs_name_and_rules() {
        let vienna = "CET-1CEST,M3.5.0,M10.5.0/3";
        let a = ZoneId::posix("Europe/Vienna", vienna).unwrap();
        assert_eq!(a, ZoneId::posix("Europe/Vienna", vienna).unwrap());
        assert_ne!(a, ZoneId::posix("Europe/Vienna", "UTC0").unwrap());
        assert_ne!(a, ZoneId::posix("Europe/Berlin", vienna).unwrap());
        assert_ne!(a, ZoneId::UTC);
        assert_ne!(ZoneId::UTC, ZoneId::fixed(UtcOffset::UTC));
        assert_eq!(
            ZoneId::fixed(UtcOffset::constant(7)),
            ZoneId::fixed(UtcOffset::constant(7)),
        );

        let custom = ZoneId::custom("Test/Three", AlwaysThree).unwrap();
        assert_eq!(custom, custom.clone());
        assert_ne!(custom, ZoneId::custom("Test/Three", AlwaysThree).unwrap());
    }

    #[test]
    fn fixed_offsets() {
        assert_eq!(ZoneId::UTC.fixed_offset(), Some(UtcOffset::UTC));
        assert!(!ZoneId::UTC.is_fixed());
        let zone = ZoneId::fixed(UtcOffset::constant(-5));
        assert!(zone.is_fixed());
        assert_eq!(
            zone.offsets_for_civil(datetime(2025, 3, 9, 2, 30, 0, 0)),
            AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(-5) },
        );
        assert_eq!(zone.transition_after_gap(datetime(2025, 3, 9, 2, 30, 0, 0)), None);
        let zone = ZoneId::posix("Asia/Tokyo", "JST-9").unwrap();
        assert_eq!(zone.fixed_offset(), None);
    }

    #[test]
    fn custom_rules() {
        let zone = ZoneId::custom("Mars/Base", AlwaysThree).unwrap();
        assert_eq!(zone.offset_for_instant(Instant::UNIX_EPOCH), UtcOffset::constant(3));
        assert_eq!(zone.transition_after_gap(datetime(2025, 1, 1, 0, 0, 0, 0)), None);
        assert_eq!(zone.fixed_offset(), None);
    }
}
