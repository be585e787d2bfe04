use std::path::Path;

use crate::tz::{ZoneDatabase, ZoneId};

/// Detects the default time zone of this system.
///
/// This consults the `TZ` environment variable first. When it is set, its
/// value is looked up in the given database, either as a name, as the
/// suffix of a path into a `zoneinfo` directory or as a POSIX TZ rule. When
/// `TZ` is unset on Unix, the target of the `/etc/localtime` symlink is
/// used instead.
///
/// This never fails. When detection fails, `UTC` is returned and the reason
/// is logged.
pub(crate) fn detect(db: &ZoneDatabase) -> ZoneId {
    if let Some(tz) = std::env::var_os("TZ") {
        let Some(tz) = tz.to_str() else {
            warn!("TZ environment variable is not valid UTF-8, using UTC");
            return ZoneId::UTC;
        };
        return from_tz_env(db, tz);
    }
    #[cfg(unix)]
    {
        if let Some(zone) = from_localtime(db, Path::new("/etc/localtime")) {
            return zone;
        }
    }
    debug!("could not detect system time zone, using UTC");
    ZoneId::UTC
}

/// Interprets the value of the `TZ` environment variable.
fn from_tz_env(db: &ZoneDatabase, tz: &str) -> ZoneId {
    let tz = tz.strip_prefix(':').unwrap_or(tz);
    if tz.is_empty() {
        debug!("TZ environment variable is empty, using UTC");
        return ZoneId::UTC;
    }
    if let Some(zone) = lookup_path(db, Path::new(tz)) {
        debug!("using time zone {zone} from TZ={tz}");
        return zone;
    }
    match ZoneId::posix(tz, tz) {
        Ok(zone) => {
            debug!("using POSIX time zone rule from TZ={tz}");
            zone
        }
        Err(_err) => {
            warn!(
                "TZ={tz} is neither a known time zone nor a valid POSIX \
                 time zone rule ({_err}), using UTC",
            );
            ZoneId::UTC
        }
    }
}

/// Finds the zone named by the target of the given symlink.
#[cfg(unix)]
fn from_localtime(db: &ZoneDatabase, link: &Path) -> Option<ZoneId> {
    let target = match std::fs::read_link(link) {
        Ok(target) => target,
        Err(_err) => {
            debug!("failed to read symlink {}: {_err}", link.display());
            return None;
        }
    };
    let zone = lookup_path(db, &target);
    if zone.is_none() {
        warn!(
            "{} points to {}, which is not a known time zone",
            link.display(),
            target.display(),
        );
    }
    zone
}

/// Looks up a zone by name, where the name may be a path into a `zoneinfo`
/// directory like `/usr/share/zoneinfo/Europe/Vienna`.
fn lookup_path(db: &ZoneDatabase, path: &Path) -> Option<ZoneId> {
    let path = path.to_str()?;
    let name = match path.rfind("zoneinfo/") {
        Some(i) => &path[i + "zoneinfo/".len()..],
        None => path,
    };
    db.get(name).ok()
}

#[cfg(test)]
mod tests {
    use crate::tz::UtcOffset;

    use super::*;

    #[test]
    fn tz_env_values() {
        let _ = env_logger::try_init();
        let db = ZoneDatabase::bundled();

        assert_eq!(from_tz_env(&db, "Europe/Vienna").name(), "Europe/Vienna");
        assert_eq!(from_tz_env(&db, ":Asia/Tokyo").name(), "Asia/Tokyo");
        assert_eq!(
            from_tz_env(&db, "/usr/share/zoneinfo/America/New_York").name(),
            "America/New_York",
        );
        assert_eq!(from_tz_env(&db, ""), ZoneId::UTC);
        assert_eq!(from_tz_env(&db, ":"), ZoneId::UTC);

        let zone = from_tz_env(&db, "EST5EDT,M3.2.0,M11.1.0");
        assert_eq!(zone.name(), "EST5EDT,M3.2.0,M11.1.0");
        assert_eq!(
            zone.offset_for_instant(crate::Instant::UNIX_EPOCH),
            UtcOffset::constant(-5),
        );

        assert_eq!(from_tz_env(&db, "Nowhere/Special"), ZoneId::UTC);
    }

    #[test]
    fn zoneinfo_paths() {
        let db = ZoneDatabase::bundled();
        let path = Path::new("/var/db/timezone/zoneinfo/Australia/Sydney");
        assert_eq!(lookup_path(&db, path).unwrap().name(), "Australia/Sydney");
        assert!(lookup_path(&db, Path::new("/etc/zoneinfo/")).is_none());
    }
}
