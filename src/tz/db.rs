use alloc::{boxed::Box, collections::BTreeMap};

use crate::{
    error::{tz::db::Error as E, Error},
    tz::{UtcOffset, ZoneId},
};

/// Returns a reference to the global time zone database.
///
/// The global database is the [bundled](ZoneDatabase::bundled) one. It is
/// built the first time this routine is called and then shared by all
/// callers for the lifetime of the process.
///
/// When the `std` feature is disabled, this returns an empty database.
/// Fixed offsets can still be looked up in it, but no names can be found
/// other than `UTC`.
///
/// # Example
///
/// ```
/// use tempora::tz::{self, UtcOffset};
///
/// let tokyo = tz::db().get("Asia/Tokyo")?;
/// assert_eq!(tokyo.name(), "Asia/Tokyo");
///
/// let fixed = tz::db().get("+07:00")?;
/// assert_eq!(fixed.fixed_offset(), Some(UtcOffset::constant(7)));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn db() -> &'static ZoneDatabase {
    #[cfg(not(feature = "std"))]
    {
        static NONE: ZoneDatabase = ZoneDatabase::none();
        &NONE
    }
    #[cfg(feature = "std")]
    {
        use std::sync::OnceLock;

        static DB: OnceLock<ZoneDatabase> = OnceLock::new();
        DB.get_or_init(ZoneDatabase::bundled)
    }
}

/// A read-only collection of named time zones.
///
/// Lookups are case insensitive, but the [`ZoneId`] returned always carries
/// the name it was registered under.
///
/// # Bundled zones
///
/// [`ZoneDatabase::bundled`] returns a compact table of commonly used IANA
/// time zone identifiers, each described by the POSIX TZ rule it uses today.
/// Those rules are applied to every year, in the past and in the future. This
/// means historical offsets (say, before a country adopted daylight saving
/// time) are not represented.
///
/// Callers with access to richer data can implement
/// [`ZoneRules`](crate::tz::ZoneRules) and add the result to a database
/// with [`ZoneDatabase::with_zone`].
#[derive(Clone, Debug)]
pub struct ZoneDatabase {
    /// Keyed by ASCII lowercase name.
    zones: BTreeMap<Box<str>, ZoneId>,
}

impl ZoneDatabase {
    /// Returns an empty database.
    ///
    /// Only `UTC` and fixed offsets can be found in an empty database.
    pub const fn none() -> ZoneDatabase {
        ZoneDatabase { zones: BTreeMap::new() }
    }

    /// Returns a database of the zones bundled with this crate.
    ///
    /// Callers usually want [`db`], which builds this once and shares it.
    pub fn bundled() -> ZoneDatabase {
        let mut db = ZoneDatabase::none();
        db.insert(ZoneId::UTC);
        for &(name, rule) in BUNDLED {
            match ZoneId::posix(name, rule) {
                Ok(zone) => db.insert(zone),
                Err(_err) => {
                    warn!(
                        "skipping bundled time zone {name} \
                         with rule {rule:?}: {_err}",
                    );
                }
            }
        }
        trace!("built bundled time zone database with {} zones", db.len());
        db
    }

    /// Returns a copy of this database with the given zone added to it.
    ///
    /// If a zone with the same name (ignoring ASCII case) is already in
    /// this database, then it is replaced.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{self, ZoneId};
    ///
    /// let zone = ZoneId::posix("Antarctica/Troll", "<+00>0<+02>-2,M3.5.0/1,M10.5.0/3")?;
    /// let db = tz::db().with_zone(zone.clone());
    /// assert_eq!(db.get("antarctica/troll")?, zone);
    /// assert!(tz::db().get("Antarctica/Troll").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_zone(&self, zone: ZoneId) -> ZoneDatabase {
        let mut db = self.clone();
        db.insert(zone);
        db
    }

    /// Looks up a time zone by name.
    ///
    /// Besides names in this database, this also accepts `UTC` (even when
    /// the database is empty) and fixed offsets like `Z`, `+07:00` or
    /// `-05:30`. A fixed offset returns a zone built by [`ZoneId::fixed`].
    ///
    /// # Errors
    ///
    /// This returns an error when no zone with the given name exists.
    /// [`Error::is_unknown_zone`](crate::Error::is_unknown_zone) is true for
    /// such errors.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz::{self, UtcOffset, ZoneId};
    ///
    /// assert_eq!(tz::db().get("europe/vienna")?.name(), "Europe/Vienna");
    /// assert_eq!(tz::db().get("UTC")?, ZoneId::UTC);
    /// assert_eq!(tz::db().get("Z")?, ZoneId::fixed(UtcOffset::UTC));
    ///
    /// let err = tz::db().get("Europe/Atlantis").unwrap_err();
    /// assert!(err.is_unknown_zone());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get(&self, name: &str) -> Result<ZoneId, Error> {
        if name.eq_ignore_ascii_case("z") {
            return Ok(ZoneId::fixed(UtcOffset::UTC));
        }
        if name.starts_with(['+', '-']) {
            let offset = crate::fmt::temporal::DateTimeParser::new()
                .parse_offset(name)?;
            return Ok(ZoneId::fixed(offset));
        }
        let key = name.to_ascii_lowercase();
        if let Some(zone) = self.zones.get(key.as_str()) {
            return Ok(zone.clone());
        }
        if key == "utc" {
            return Ok(ZoneId::UTC);
        }
        Err(E::unknown_zone(name).into())
    }

    /// Returns the names of all zones in this database, in ASCII lowercase
    /// order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.zones.values().map(|zone| zone.name())
    }

    /// Returns the number of zones in this database.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true when this database has no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    fn insert(&mut self, zone: ZoneId) {
        self.zones.insert(zone.name().to_ascii_lowercase().into(), zone);
    }
}

impl Default for ZoneDatabase {
    fn default() -> ZoneDatabase {
        ZoneDatabase::none()
    }
}

/// IANA identifiers and the POSIX TZ rule each currently uses.
static BUNDLED: &[(&str, &str)] = &[
    ("Etc/UTC", "UTC0"),
    ("GMT", "GMT0"),
    ("Europe/Vienna", "CET-1CEST,M3.5.0,M10.5.0/3"),
    ("Europe/Berlin", "CET-1CEST,M3.5.0,M10.5.0/3"),
    ("Europe/Paris", "CET-1CEST,M3.5.0,M10.5.0/3"),
    ("Europe/London", "GMT0BST,M3.5.0/1,M10.5.0"),
    ("Europe/Dublin", "IST-1GMT0,M10.5.0,M3.5.0/1"),
    ("America/New_York", "EST5EDT,M3.2.0,M11.1.0"),
    ("America/Chicago", "CST6CDT,M3.2.0,M11.1.0"),
    ("America/Denver", "MST7MDT,M3.2.0,M11.1.0"),
    ("America/Los_Angeles", "PST8PDT,M3.2.0,M11.1.0"),
    ("America/St_Johns", "NST3:30NDT,M3.2.0,M11.1.0"),
    ("America/Sao_Paulo", "<-03>3"),
    ("Australia/Sydney", "AEST-10AEDT,M10.1.0,M4.1.0/3"),
    ("Australia/Lord_Howe", "<+1030>-10:30<+11>-11,M10.1.0,M4.1.0"),
    ("Asia/Tokyo", "JST-9"),
    ("Asia/Kolkata", "IST-5:30"),
    ("Asia/Bangkok", "<+07>-7"),
    ("Pacific/Auckland", "NZST-12NZDT,M9.5.0,M4.1.0/3"),
    ("Pacific/Chatham", "<+1245>-12:45<+1345>,M9.5.0/2:45,M4.1.0/3:45"),
];

#[cfg(test)]
mod tests {
    use crate::{
        civil::datetime,
        tz::{AmbiguousOffset, UtcOffset},
    };

    use super::*;

    #[test]
    fn every_bundled_rule_parses() {
        let db = ZoneDatabase::bundled();
        assert_eq!(db.len(), BUNDLED.len() + 1);
        for &(name, _) in BUNDLED {
            assert_eq!(db.get(name).unwrap().name(), name);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let db = ZoneDatabase::bundled();
        assert_eq!(db.get("AMERICA/NEW_YORK").unwrap().name(), "America/New_York");
        assert_eq!(db.get("utc").unwrap(), ZoneId::UTC);
        assert_eq!(ZoneDatabase::none().get("UTC").unwrap(), ZoneId::UTC);
    }

    #[test]
    fn fixed_offsets() {
        let db = ZoneDatabase::none();
        let zone = db.get("-05:30").unwrap();
        assert_eq!(zone.fixed_offset(), Some(UtcOffset::constant_seconds(-19_800)));
        assert_eq!(db.get("z").unwrap(), ZoneId::fixed(UtcOffset::UTC));
        assert!(db.get("+19:00").unwrap_err().is_parse());
    }

    #[test]
    fn unknown_zone() {
        let err = ZoneDatabase::bundled().get("Mars/Olympus_Mons").unwrap_err();
        assert!(err.is_unknown_zone());
        insta::assert_snapshot!(
            err,
            @"failed to find time zone `Mars/Olympus_Mons` in time zone database",
        );
    }

    #[test]
    fn bundled_rules_behave() {
        let db = ZoneDatabase::bundled();
        let sydney = db.get("Australia/Sydney").unwrap();
        assert_eq!(
            sydney.offsets_for_civil(datetime(2025, 1, 20, 10, 0, 0, 0)),
            AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(11) },
        );
        let dublin = db.get("Europe/Dublin").unwrap();
        assert_eq!(
            dublin.offsets_for_civil(datetime(2025, 1, 20, 10, 0, 0, 0)),
            AmbiguousOffset::Unambiguous { offset: UtcOffset::UTC },
        );
        assert_eq!(
            dublin.offsets_for_civil(datetime(2025, 7, 20, 10, 0, 0, 0)),
            AmbiguousOffset::Unambiguous { offset: UtcOffset::constant(1) },
        );
    }

    #[test]
    fn with_zone_replaces() {
        let db = ZoneDatabase::bundled();
        let before = db.len();
        let tokyo = ZoneId::posix("ASIA/TOKYO", "JST-9").unwrap();
        let db = db.with_zone(tokyo);
        assert_eq!(db.len(), before);
        assert_eq!(db.get("Asia/Tokyo").unwrap().name(), "ASIA/TOKYO");
    }
}
