use tempora::{
    civil::datetime,
    tz::{self, AmbiguousOffset, UtcOffset, ZoneId},
    ZonedDateTime,
};

fn offset(hours: i8, minutes: i32) -> UtcOffset {
    let sign = if hours < 0 { -1 } else { 1 };
    UtcOffset::constant_seconds(i32::from(hours) * 3600 + sign * minutes * 60)
}

#[test]
fn vienna_gap_and_fold() -> crate::Result {
    let _ = env_logger::try_init();
    let vienna = tz::db().get("Europe/Vienna")?;

    let gap = datetime(2025, 3, 30, 2, 30, 0, 0);
    assert!(vienna.offsets_for_civil(gap).offsets().is_empty());
    for preferred in [None, Some(offset(1, 0)), Some(offset(2, 0)), Some(offset(7, 0))] {
        let zdt = ZonedDateTime::from_local(gap, &vienna, preferred);
        assert_eq!(zdt.civil(), datetime(2025, 3, 30, 3, 30, 0, 0));
        assert_eq!(zdt.offset(), offset(2, 0));
    }

    let fold = datetime(2025, 10, 26, 2, 30, 0, 0);
    assert_eq!(&*vienna.offsets_for_civil(fold).offsets(), &[offset(2, 0), offset(1, 0)]);
    let got = |preferred| ZonedDateTime::from_local(fold, &vienna, preferred);
    assert_eq!(got(Some(offset(1, 0))).offset(), offset(1, 0));
    assert_eq!(got(Some(offset(2, 0))).offset(), offset(2, 0));
    assert_eq!(got(Some(offset(7, 0))).offset(), offset(2, 0));
    assert_eq!(got(None).offset(), offset(2, 0));
    assert_eq!(got(None).civil(), fold);

    let winter = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);
    assert_eq!(
        vienna.offsets_for_civil(winter),
        AmbiguousOffset::Unambiguous { offset: offset(1, 0) },
    );
    let zdt = ZonedDateTime::from_local(winter, &vienna, Some(offset(7, 0)));
    assert_eq!(zdt.to_string(), "2025-01-20T10:00:01.123456789+01:00[Europe/Vienna]");
    Ok(())
}

#[test]
fn strict_construction() -> crate::Result {
    let vienna = tz::db().get("Europe/Vienna")?;
    let winter = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);

    let err = ZonedDateTime::from_strict(winter, offset(7, 0), &vienna).unwrap_err();
    assert!(err.is_zone_offset_mismatch());
    assert!(!err.is_parse());
    let zdt = ZonedDateTime::from_strict(winter, offset(1, 0), &vienna)?;
    assert_eq!(zdt, ZonedDateTime::from_local(winter, &vienna, None));

    let gap = datetime(2025, 3, 30, 2, 30, 0, 0);
    for given in [offset(1, 0), offset(2, 0)] {
        let err = ZonedDateTime::from_strict(gap, given, &vienna).unwrap_err();
        assert!(err.is_zone_offset_mismatch());
    }

    let fold = datetime(2025, 10, 26, 2, 30, 0, 0);
    assert_eq!(ZonedDateTime::from_strict(fold, offset(1, 0), &vienna)?.offset(), offset(1, 0));
    assert_eq!(ZonedDateTime::from_strict(fold, offset(2, 0), &vienna)?.offset(), offset(2, 0));
    let err = ZonedDateTime::from_strict(fold, offset(7, 0), &vienna).unwrap_err();
    assert!(err.is_zone_offset_mismatch());
    Ok(())
}

#[test]
fn instant_privileged_construction() -> crate::Result {
    let vienna = tz::db().get("Europe/Vienna")?;

    let zdt = ZonedDateTime::from_local_at_offset(
        datetime(2025, 1, 20, 17, 0, 1, 0),
        offset(7, 0),
        &vienna,
    )?;
    assert_eq!(zdt.to_string(), "2025-01-20T11:00:01+01:00[Europe/Vienna]");

    // A consistent pair is left untouched.
    let fold = datetime(2025, 10, 26, 2, 30, 0, 0);
    let zdt = ZonedDateTime::from_local_at_offset(fold, offset(1, 0), &vienna)?;
    assert_eq!((zdt.civil(), zdt.offset()), (fold, offset(1, 0)));

    // A civil datetime in a gap still identifies an instant with an offset.
    let gap = datetime(2025, 3, 30, 2, 30, 0, 0);
    let zdt = ZonedDateTime::from_local_at_offset(gap, offset(1, 0), &vienna)?;
    assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");

    let err = ZonedDateTime::from_local_at_offset(
        tempora::CivilDateTime::MAX,
        offset(-1, 0),
        &vienna,
    )
    .unwrap_err();
    assert!(err.is_range());
    Ok(())
}

#[test]
fn zoned_offset_zoned_preserves_instant() -> crate::Result {
    let vienna = tz::db().get("Europe/Vienna")?;
    let civils = [
        datetime(2025, 1, 20, 10, 0, 1, 123_456_789),
        datetime(2025, 3, 30, 1, 59, 59, 999_999_999),
        datetime(2025, 3, 30, 2, 30, 0, 0),
        datetime(2025, 10, 26, 2, 30, 0, 0),
        datetime(2025, 10, 26, 3, 0, 0, 0),
    ];
    for civil in civils {
        for preferred in [None, Some(offset(1, 0))] {
            let zdt = ZonedDateTime::from_local(civil, &vienna, preferred);
            let instant = zdt.to_offset_datetime().to_instant()?;
            let back = ZonedDateTime::from_instant(instant, &vienna);
            assert_eq!(back.to_instant()?, zdt.to_instant()?);
            assert_eq!(back, zdt);
        }
    }
    Ok(())
}

#[test]
fn northern_hemisphere() -> crate::Result {
    let new_york = tz::db().get("America/New_York")?;
    let zdt = datetime(2025, 3, 9, 2, 30, 0, 0).at_zone(&new_york);
    assert_eq!(zdt.to_string(), "2025-03-09T03:30:00-04:00[America/New_York]");

    let fold = datetime(2025, 11, 2, 1, 30, 0, 0);
    assert_eq!(fold.at_zone(&new_york).offset(), offset(-4, 0));
    let zdt = ZonedDateTime::from_local(fold, &new_york, Some(offset(-5, 0)));
    assert_eq!(zdt.to_string(), "2025-11-02T01:30:00-05:00[America/New_York]");

    let london = tz::db().get("Europe/London")?;
    let zdt = datetime(2025, 3, 30, 1, 30, 0, 0).at_zone(&london);
    assert_eq!(zdt.to_string(), "2025-03-30T02:30:00+01:00[Europe/London]");
    let zdt = datetime(2025, 10, 26, 1, 30, 0, 0).at_zone(&london);
    assert_eq!(zdt.offset(), offset(1, 0));
    Ok(())
}

/// Ireland observes "negative" daylight saving time: its standard time is
/// `+01:00` in summer. The clock readings match London's nonetheless.
#[test]
fn negative_daylight_saving_time() -> crate::Result {
    let dublin = tz::db().get("Europe/Dublin")?;
    let zdt = datetime(2025, 3, 30, 1, 30, 0, 0).at_zone(&dublin);
    assert_eq!(zdt.to_string(), "2025-03-30T02:30:00+01:00[Europe/Dublin]");

    let fold = datetime(2025, 10, 26, 1, 30, 0, 0);
    assert_eq!(&*dublin.offsets_for_civil(fold).offsets(), &[offset(1, 0), offset(0, 0)]);
    let zdt = ZonedDateTime::from_local(fold, &dublin, Some(offset(0, 0)));
    assert_eq!(zdt.to_string(), "2025-10-26T01:30:00+00:00[Europe/Dublin]");
    Ok(())
}

#[test]
fn southern_hemisphere() -> crate::Result {
    let sydney = tz::db().get("Australia/Sydney")?;
    let zdt = datetime(2025, 10, 5, 2, 30, 0, 0).at_zone(&sydney);
    assert_eq!(zdt.to_string(), "2025-10-05T03:30:00+11:00[Australia/Sydney]");

    let fold = datetime(2025, 4, 6, 2, 30, 0, 0);
    assert_eq!(fold.at_zone(&sydney).offset(), offset(11, 0));
    let zdt = ZonedDateTime::from_local(fold, &sydney, Some(offset(10, 0)));
    assert_eq!(zdt.to_string(), "2025-04-06T02:30:00+10:00[Australia/Sydney]");

    // DST spans the new year.
    assert_eq!(datetime(2025, 1, 1, 0, 0, 0, 0).at_zone(&sydney).offset(), offset(11, 0));
    assert_eq!(datetime(2025, 7, 1, 0, 0, 0, 0).at_zone(&sydney).offset(), offset(10, 0));
    Ok(())
}

#[test]
fn odd_offsets() -> crate::Result {
    let chatham = tz::db().get("Pacific/Chatham")?;
    let zdt = datetime(2025, 9, 28, 3, 0, 0, 0).at_zone(&chatham);
    assert_eq!(zdt.to_string(), "2025-09-28T04:00:00+13:45[Pacific/Chatham]");
    assert_eq!(zdt.offset(), offset(13, 45));

    let st_johns = tz::db().get("America/St_Johns")?;
    let zdt = datetime(2025, 1, 20, 10, 0, 1, 0).at_zone(&st_johns);
    assert_eq!(zdt.offset(), offset(-3, 30));
    assert_eq!(zdt.to_instant()?.to_string(), "2025-01-20T13:30:01Z");

    let kolkata = tz::db().get("Asia/Kolkata")?;
    let zdt = datetime(2025, 3, 30, 2, 30, 0, 0).at_zone(&kolkata);
    assert_eq!(zdt.to_string(), "2025-03-30T02:30:00+05:30[Asia/Kolkata]");
    Ok(())
}

#[test]
fn fixed_and_utc_zones_are_never_ambiguous() -> crate::Result {
    let civil = datetime(2025, 3, 30, 2, 30, 0, 0);
    for zone in [ZoneId::UTC, ZoneId::fixed(offset(-9, 30)), tz::db().get("Asia/Tokyo")?] {
        let offsets = zone.offsets_for_civil(civil).offsets();
        assert_eq!(offsets.len(), 1);
        let zdt = ZonedDateTime::from_strict(civil, offsets[0], &zone)?;
        assert_eq!(zdt.civil(), civil);
    }
    Ok(())
}
