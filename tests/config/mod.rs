use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::Duration,
};

use tempora::{
    civil::datetime,
    fmt::temporal::DateTimeParser,
    tz::{self, AmbiguousOffset, GapTransition, UtcOffset, ZoneId, ZoneRules},
    CivilDateTime, Clock, Config, FixedClock, Instant, OffsetDateTime,
    SystemClock, ZonedDateTime,
};

/// A clock that moves forward by one second every time it is read.
#[derive(Debug)]
struct Ticking {
    next: AtomicI64,
}

impl Clock for Ticking {
    fn now(&self) -> Instant {
        let second = self.next.fetch_add(1, Ordering::Relaxed);
        Instant::from_epoch_second(second, 0).unwrap()
    }
}

/// A time zone that moved from `+00:00` to `+01:00` for good at the start of
/// 2030.
#[derive(Debug)]
struct Jump;

impl Jump {
    const START: CivilDateTime = datetime(2030, 1, 1, 0, 0, 0, 0);
    const END: CivilDateTime = datetime(2030, 1, 1, 1, 0, 0, 0);
    const BEFORE: UtcOffset = UtcOffset::constant(0);
    const AFTER: UtcOffset = UtcOffset::constant(1);
}

impl ZoneRules for Jump {
    fn offsets_for_civil(&self, civil: CivilDateTime) -> AmbiguousOffset {
        if civil < Jump::START {
            AmbiguousOffset::Unambiguous { offset: Jump::BEFORE }
        } else if civil >= Jump::END {
            AmbiguousOffset::Unambiguous { offset: Jump::AFTER }
        } else {
            AmbiguousOffset::Gap { before: Jump::BEFORE, after: Jump::AFTER }
        }
    }

    fn offset_for_instant(&self, instant: Instant) -> UtcOffset {
        if instant.epoch_second() < 1_893_456_000 {
            Jump::BEFORE
        } else {
            Jump::AFTER
        }
    }

    fn transition_after_gap(
        &self,
        civil: CivilDateTime,
    ) -> Option<GapTransition> {
        if !(Jump::START..Jump::END).contains(&civil) {
            return None;
        }
        Some(GapTransition::new(Jump::START, Duration::from_secs(3_600)))
    }
}

#[test]
fn fixed_clock() -> crate::Result {
    let _ = env_logger::try_init();

    let instant = Instant::from_epoch_second(1_737_367_201, 123_456_789)?;
    let config = Config::new(tz::db().get("Europe/Vienna")?, FixedClock::new(instant));
    assert_eq!(config.default_zone().name(), "Europe/Vienna");
    assert_eq!(config.now(), instant);

    assert_eq!(CivilDateTime::now(&config), datetime(2025, 1, 20, 11, 0, 1, 123_456_789));
    assert_eq!(OffsetDateTime::now(&config).offset(), UtcOffset::constant(1));
    assert_eq!(
        ZonedDateTime::now(&config).to_string(),
        "2025-01-20T11:00:01.123456789+01:00[Europe/Vienna]",
    );

    let sydney = tz::db().get("Australia/Sydney")?;
    assert_eq!(
        ZonedDateTime::now_in(&config, &sydney).to_string(),
        "2025-01-20T21:00:01.123456789+11:00[Australia/Sydney]",
    );
    assert_eq!(
        OffsetDateTime::now_in(&config, &sydney).to_string(),
        "2025-01-20T21:00:01.123456789+11:00",
    );
    assert_eq!(CivilDateTime::now_in(&config, &ZoneId::UTC).hour(), 10);

    let config = config.with_default_zone(sydney.clone());
    assert_eq!(ZonedDateTime::now(&config).zone(), &sydney);
    assert_eq!(config.now(), instant);
    Ok(())
}

#[test]
fn custom_clock() -> crate::Result {
    let config = Config::system(ZoneId::UTC).with_clock(Ticking { next: AtomicI64::new(0) });
    assert_eq!(ZonedDateTime::now(&config).to_string(), "1970-01-01T00:00:00+00:00[UTC]");
    assert_eq!(config.clock().now(), Instant::from_epoch_second(1, 0)?);

    // Clones share the clock.
    let clone = config.clone();
    assert_eq!(clone.now().epoch_second(), 2);
    assert_eq!(config.now().epoch_second(), 3);
    Ok(())
}

#[test]
fn system_clock() {
    let config = Config::new(ZoneId::UTC, SystemClock);
    let before = Instant::now();
    let now = config.now();
    assert!(before <= now);
    assert!(now <= Instant::now());
    // Detecting the default time zone never fails.
    let _ = Config::from_env().default_zone().name();
}

#[test]
fn custom_zone_rules() -> crate::Result {
    let jump = ZoneId::custom("Test/Jump", Jump)?;
    assert_eq!(jump.name(), "Test/Jump");
    assert_eq!(jump.fixed_offset(), None);

    let zdt = ZonedDateTime::from_local(datetime(2030, 1, 1, 0, 15, 0, 0), &jump, None);
    assert_eq!(zdt.to_string(), "2030-01-01T01:15:00+01:00[Test/Jump]");
    let err = ZonedDateTime::from_strict(datetime(2030, 1, 1, 0, 15, 0, 0), UtcOffset::UTC, &jump)
        .unwrap_err();
    assert!(err.is_zone_offset_mismatch());

    let instant = Instant::from_epoch_second(1_893_456_000, 0)?;
    assert_eq!(instant.at_zone(&jump).to_string(), "2030-01-01T01:00:00+01:00[Test/Jump]");
    let before = Instant::from_epoch_second(1_893_455_999, 0)?;
    assert_eq!(before.at_zone(&jump).to_string(), "2029-12-31T23:59:59+00:00[Test/Jump]");

    let db = tz::db().with_zone(jump.clone());
    assert_eq!(db.get("test/jump")?, jump);
    let zdt = DateTimeParser::new().parse_zoned_with(&db, "2030-01-01T00:30:00[Test/Jump]")?;
    assert_eq!(zdt.to_string(), "2030-01-01T01:30:00+01:00[Test/Jump]");
    assert!(tz::db().get("Test/Jump").unwrap_err().is_unknown_zone());

    let config = Config::new(jump, FixedClock::new(before));
    assert_eq!(ZonedDateTime::now(&config).offset(), UtcOffset::UTC);
    Ok(())
}
