use tempora::{
    civil::datetime,
    tz::{UtcOffset, ZoneId},
    CivilDateTime, Instant, OffsetDateTime,
};

#[test]
fn epoch_constructors() -> crate::Result {
    assert_eq!(
        Instant::from_epoch_millisecond(2_000_000_123_456)?,
        Instant::from_epoch_second(2_000_000_123, 456_000_000)?,
    );

    let instant = Instant::from_epoch_second(5, -1)?;
    assert_eq!((instant.epoch_second(), instant.subsec_nanosecond()), (4, 999_999_999));
    let instant = Instant::from_epoch_second(-5, -1_000_000_001)?;
    assert_eq!((instant.epoch_second(), instant.subsec_nanosecond()), (-7, 999_999_999));

    let instant = Instant::from_epoch_millisecond(-1_001)?;
    assert_eq!((instant.epoch_second(), instant.subsec_nanosecond()), (-2, 999_000_000));
    assert_eq!(instant.epoch_millisecond(), -1_001);
    Ok(())
}

#[test]
fn epoch_range() -> crate::Result {
    let max = Instant::MAX.epoch_second();
    assert!(Instant::from_epoch_second(max, 999_999_999).is_ok());
    assert!(Instant::from_epoch_second(max, 1_000_000_000).unwrap_err().is_range());
    let min = Instant::MIN.epoch_second();
    assert!(Instant::from_epoch_second(min, 0).is_ok());
    assert!(Instant::from_epoch_second(min, -1).unwrap_err().is_range());
    assert!(Instant::from_epoch_millisecond(i64::MIN).unwrap_err().is_range());

    // Every instant is representable at every offset.
    for offset in [UtcOffset::MIN, UtcOffset::UTC, UtcOffset::MAX] {
        for instant in [Instant::MIN, Instant::MAX] {
            let odt = OffsetDateTime::from_instant(instant, offset);
            assert_eq!(odt.to_instant()?, instant);
        }
    }
    Ok(())
}

#[test]
fn civil_epoch_second_is_invertible() -> crate::Result {
    const MIN: i64 = -377_705_116_800;
    const MAX: i64 = 253_402_300_799;

    let known = [
        (MIN, datetime(-9999, 1, 1, 0, 0, 0, 0)),
        (-62_135_596_800, datetime(1, 1, 1, 0, 0, 0, 0)),
        (-62_135_596_801, datetime(0, 12, 31, 23, 59, 59, 0)),
        (-1, datetime(1969, 12, 31, 23, 59, 59, 0)),
        (0, datetime(1970, 1, 1, 0, 0, 0, 0)),
        (951_782_400, datetime(2000, 2, 29, 0, 0, 0, 0)),
        (951_868_800, datetime(2000, 3, 1, 0, 0, 0, 0)),
        (1_709_164_800, datetime(2024, 2, 29, 0, 0, 0, 0)),
        (4_107_542_400, datetime(2100, 3, 1, 0, 0, 0, 0)),
        (MAX, datetime(9999, 12, 31, 23, 59, 59, 0)),
    ];
    for (second, civil) in known {
        assert_eq!(CivilDateTime::from_epoch_second(second, 0, UtcOffset::UTC)?, civil);
    }

    // The stride isn't a multiple of a day, so this hits many times of day.
    for second in (MIN..=MAX).step_by(86_399 * 9_973) {
        let civil = CivilDateTime::from_epoch_second(second, 0, UtcOffset::UTC)?;
        let roundtrip = CivilDateTime::from_epoch_second(
            second - 3_600,
            0,
            UtcOffset::constant(1),
        )?;
        assert_eq!(civil, roundtrip);
        if let Ok(instant) = civil.to_instant(UtcOffset::UTC) {
            assert_eq!(instant.epoch_second(), second);
        }
    }
    assert!(CivilDateTime::from_epoch_second(MAX + 1, 0, UtcOffset::UTC).is_err());
    assert!(CivilDateTime::from_epoch_second(0, 1_000_000_000, UtcOffset::UTC).is_err());
    Ok(())
}

#[test]
fn offset_datetime_conversions() -> crate::Result {
    let civil = datetime(2025, 1, 20, 17, 0, 1, 123_456_789);
    let odt = civil.at_offset(UtcOffset::constant(7));
    assert_eq!(odt, OffsetDateTime::new(civil, UtcOffset::constant(7)));
    assert_eq!(odt.civil(), civil);
    assert_eq!(CivilDateTime::from(odt), civil);

    let instant = odt.to_instant()?;
    assert_eq!(instant.to_string(), "2025-01-20T10:00:01.123456789Z");
    assert_eq!(instant, civil.to_instant(UtcOffset::constant(7))?);
    assert_eq!(OffsetDateTime::from_instant(instant, UtcOffset::constant(7)), odt);
    assert_eq!(instant.at_offset(UtcOffset::constant(-5)).to_string(), "2025-01-20T05:00:01.123456789-05:00");

    let zdt = odt.to_zoned();
    assert_eq!(zdt.zone(), &ZoneId::fixed(UtcOffset::constant(7)));
    assert_eq!(zdt.to_string(), "2025-01-20T17:00:01.123456789+07:00");
    assert_eq!(OffsetDateTime::from(zdt), odt);
    Ok(())
}

#[test]
fn zone_changes() -> crate::Result {
    let vienna = ZoneId::posix("Europe/Vienna", "CET-1CEST,M3.5.0,M10.5.0/3")?;
    let bangkok = ZoneId::posix("Asia/Bangkok", "<+07>-7")?;

    let odt: OffsetDateTime = "2025-01-20T17:00:01+07:00".parse()?;
    let same_instant = odt.at_zone_same_instant(&vienna)?;
    assert_eq!(same_instant.to_string(), "2025-01-20T11:00:01+01:00[Europe/Vienna]");
    let similar_local = odt.at_zone_similar_local(&vienna);
    assert_eq!(similar_local.to_string(), "2025-01-20T17:00:01+01:00[Europe/Vienna]");

    let back = same_instant.with_zone_same_instant(&bangkok)?;
    assert_eq!(back.to_string(), "2025-01-20T17:00:01+07:00[Asia/Bangkok]");
    assert_eq!(back.to_offset_datetime(), odt);
    let local = same_instant.with_zone_similar_local(&bangkok);
    assert_eq!(local.to_string(), "2025-01-20T11:00:01+07:00[Asia/Bangkok]");

    // The offset is a preference for the fold, and it is ignored in a gap.
    let fold: OffsetDateTime = "2025-10-26T02:30:00+01:00".parse()?;
    assert_eq!(fold.at_zone_similar_local(&vienna).offset(), UtcOffset::constant(1));
    let gap: OffsetDateTime = "2025-03-30T02:30:00+01:00".parse()?;
    let zdt = gap.at_zone_similar_local(&vienna);
    assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");

    let instant = Instant::from_epoch_second(1_737_367_201, 0)?;
    assert_eq!(
        OffsetDateTime::from_instant_in_zone(instant, &vienna).to_string(),
        "2025-01-20T11:00:01+01:00",
    );
    assert_eq!(CivilDateTime::from_instant(instant, &bangkok), datetime(2025, 1, 20, 17, 0, 1, 0));
    assert_eq!(instant.at_zone(&bangkok).civil(), datetime(2025, 1, 20, 17, 0, 1, 0));
    Ok(())
}

#[test]
fn system_time_conversions() -> crate::Result {
    use std::time::{Duration, SystemTime};

    let instant = Instant::from_epoch_second(-1, 500_000_000)?;
    let system = SystemTime::from(instant);
    assert_eq!(SystemTime::UNIX_EPOCH.duration_since(system)?, Duration::from_millis(500));
    assert_eq!(Instant::try_from(system)?, instant);
    Ok(())
}

#[test]
fn civil_duration_arithmetic() -> crate::Result {
    use std::time::Duration;

    let dt = datetime(2024, 2, 28, 23, 30, 0, 999_999_999);
    assert_eq!(dt.checked_add(Duration::from_secs(3_600))?, datetime(2024, 2, 29, 0, 30, 0, 999_999_999));
    assert_eq!(dt.checked_add(Duration::from_nanos(1))?, datetime(2024, 2, 28, 23, 30, 1, 0));
    assert_eq!(
        datetime(2025, 3, 1, 0, 0, 0, 0).checked_sub(Duration::from_secs(1))?,
        datetime(2025, 2, 28, 23, 59, 59, 0),
    );
    assert!(CivilDateTime::MAX.checked_add(Duration::from_nanos(1)).is_err());
    assert!(CivilDateTime::MIN.checked_sub(Duration::from_nanos(1)).is_err());
    Ok(())
}
