use tempora::{
    civil::datetime,
    fmt::temporal::{DateTimeParser, DateTimePrinter},
    tz::{self, OffsetConflict, UtcOffset, ZoneId},
    CivilDateTime, Instant, OffsetDateTime, ZonedDateTime,
};

const DATE_STRING: &str = "2025-01-20T10:00:01.123456789";

#[test]
fn civil() -> crate::Result {
    let dt: CivilDateTime = DATE_STRING.parse()?;
    assert_eq!(dt, datetime(2025, 1, 20, 10, 0, 1, 123_456_789));
    assert_eq!(dt.to_string(), DATE_STRING);

    assert_eq!(CivilDateTime::parse("2025-01-20 10:00")?, datetime(2025, 1, 20, 10, 0, 0, 0));
    assert_eq!(CivilDateTime::parse("2025-01-20t10:00:01,5")?, datetime(2025, 1, 20, 10, 0, 1, 500_000_000));
    assert_eq!(CivilDateTime::parse("+002025-01-20T10:00:01")?, datetime(2025, 1, 20, 10, 0, 1, 0));

    let dt = CivilDateTime::parse("-000001-12-31T23:59:59")?;
    assert_eq!(dt.year(), -1);
    assert_eq!(dt.to_string(), "-000001-12-31T23:59:59");
    Ok(())
}

#[test]
fn civil_errors() {
    let err = CivilDateTime::parse("2025-02-30T10:00:00").unwrap_err();
    assert!(err.is_parse());
    assert!(err.is_invalid_field());

    let err = CivilDateTime::parse("2025-13-01T10:00:00").unwrap_err();
    assert!(err.is_parse());
    assert!(err.is_invalid_field());

    let err = CivilDateTime::parse("2025-01-20T10:17:60").unwrap_err();
    assert!(err.is_parse());
    assert!(err.is_invalid_field());

    let err = CivilDateTime::new(2025, 2, 29, 0, 0, 0, 0).unwrap_err();
    assert!(err.is_invalid_field());
    assert!(!err.is_parse());
    assert!(CivilDateTime::new(2024, 2, 29, 0, 0, 0, 0).is_ok());

    for text in [
        "",
        "2025-01-20",
        "2025-01-20T10",
        "25-01-20T10:00:00",
        "2025/01/20T10:00:00",
        "2025-01-20T10:00:00.",
        "2025-01-20T10:00:00.1234567891",
        "-000000-01-01T00:00:00",
        "2025-01-20T10:00:00Z",
        "2025-01-20T10:00:00[Europe/Vienna]",
        "2025-01-20T10:00:00 ",
        "2016-12-31T23:59:60",
        "2025-01-20T10:17:60",
    ] {
        let err = CivilDateTime::parse(text).unwrap_err();
        assert!(err.is_parse(), "{text:?} should fail to parse: {err}");
    }
}

#[test]
fn offsets_and_instants() -> crate::Result {
    let odt: OffsetDateTime = "2025-01-20T10:00:01.123456789+07:00".parse()?;
    assert_eq!(odt.offset(), UtcOffset::constant(7));
    assert_eq!(odt.to_string(), "2025-01-20T10:00:01.123456789+07:00");

    let odt = OffsetDateTime::parse("2025-01-20T10:00:01z")?;
    assert_eq!(odt.offset(), UtcOffset::UTC);
    assert_eq!(odt.to_string(), "2025-01-20T10:00:01+00:00");

    let offset: UtcOffset = "-03:30:15".parse()?;
    assert_eq!(offset.seconds(), -12_615);
    assert_eq!(offset.to_string(), "-03:30:15");

    let instant: Instant = "2025-01-20T10:00:01Z".parse()?;
    assert_eq!(instant.epoch_second(), 1_737_367_201);
    let instant = Instant::parse("2025-01-20T17:00:01.5+07:00")?;
    assert_eq!(instant.to_string(), "2025-01-20T10:00:01.5Z");

    for text in [
        "2025-01-20T10:00:01",
        "2025-01-20T10:00:01+7:00",
        "2025-01-20T10:00:01+07",
        "2025-01-20T10:00:01+18:00:01",
        "2025-01-20T10:00:01+07:60",
        "2025-01-20T10:00:01+07:00[Asia/Bangkok]",
    ] {
        let err = OffsetDateTime::parse(text).unwrap_err();
        assert!(err.is_parse(), "{text:?} should fail to parse: {err}");
        assert!(Instant::parse(text).unwrap_err().is_parse());
    }
    Ok(())
}

#[test]
fn zoned() -> crate::Result {
    let text = "2025-01-20T10:00:01.123456789+01:00[Europe/Vienna]";
    let zdt: ZonedDateTime = text.parse()?;
    assert_eq!(zdt.zone().name(), "Europe/Vienna");
    assert_eq!(zdt.to_string(), text);

    let zdt = ZonedDateTime::parse("2025-01-20T10:00:01Z")?;
    assert_eq!(zdt.zone(), &ZoneId::fixed(UtcOffset::UTC));
    let zdt = ZonedDateTime::parse("2025-01-20T10:00:01+07:00")?;
    assert_eq!(zdt.zone().fixed_offset(), Some(UtcOffset::constant(7)));
    assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+07:00");

    let zdt = ZonedDateTime::parse("2025-03-30T02:30:00[Europe/Vienna]")?;
    assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");
    let zdt = ZonedDateTime::parse("2025-10-26T01:30:00Z[Europe/Vienna]")?;
    assert_eq!(zdt.to_string(), "2025-10-26T02:30:00+01:00[Europe/Vienna]");
    let zdt = ZonedDateTime::parse("2025-01-20T10:00:01+00:00[utc]")?;
    assert_eq!(zdt.to_string(), "2025-01-20T10:00:01+00:00[UTC]");

    let err = ZonedDateTime::parse("2025-01-20T10:00:01+01:00[Mars/Olympus_Mons]").unwrap_err();
    assert!(err.is_parse());
    assert!(err.is_unknown_zone());
    let err = ZonedDateTime::parse("2025-01-20T10:00:01+01:00[]").unwrap_err();
    assert!(err.is_parse());
    let err = ZonedDateTime::parse("2025-01-20T10:00:01+01:00[Europe/Vienna").unwrap_err();
    assert!(err.is_parse());
    Ok(())
}

/// Parsing a zoned datetime rejects an offset that the time zone doesn't
/// permit by default, and re-resolves the civil datetime with the lenient
/// policy.
#[test]
fn zoned_offset_conflicts() -> crate::Result {
    let strict = DateTimeParser::new();
    let lenient = DateTimeParser::new().offset_conflict(OffsetConflict::PreferOffset);

    let mismatch = "2025-01-20T10:00:01.123456789+07:00[Europe/Vienna]";
    let err = strict.parse_zoned(mismatch).unwrap_err();
    assert!(err.is_zone_offset_mismatch());
    assert!(ZonedDateTime::parse(mismatch).unwrap_err().is_zone_offset_mismatch());
    assert_eq!(
        lenient.parse_zoned(mismatch)?.to_string(),
        "2025-01-20T10:00:01.123456789+01:00[Europe/Vienna]",
    );

    let gap = "2025-03-30T02:30:00+02:00[Europe/Vienna]";
    assert!(strict.parse_zoned(gap).unwrap_err().is_zone_offset_mismatch());
    assert_eq!(lenient.parse_zoned(gap)?.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");

    for (given, expected) in [("+01:00", 1), ("+02:00", 2)] {
        let text = format!("2025-10-26T02:30:00{given}[Europe/Vienna]");
        assert_eq!(strict.parse_zoned(&text)?.offset(), UtcOffset::constant(expected));
        assert_eq!(lenient.parse_zoned(&text)?.offset(), UtcOffset::constant(expected));
        assert_eq!(strict.parse_zoned(&text)?.to_string(), text);
    }
    let fold = "2025-10-26T02:30:00+07:00[Europe/Vienna]";
    assert!(strict.parse_zoned(fold).unwrap_err().is_zone_offset_mismatch());
    assert_eq!(lenient.parse_zoned(fold)?.offset(), UtcOffset::constant(2));
    Ok(())
}

#[test]
fn zoned_with_custom_database() -> crate::Result {
    let db = tz::db().with_zone(ZoneId::posix("America/Nuuk", "<-02>2<-01>,M3.5.0/-1,M10.5.0/0")?);
    let parser = DateTimeParser::new();
    let zdt = parser.parse_zoned_with(&db, "2025-07-01T12:00:00[America/Nuuk]")?;
    assert_eq!(zdt.to_string(), "2025-07-01T12:00:00-01:00[America/Nuuk]");

    let err = parser.parse_zoned("2025-07-01T12:00:00[America/Nuuk]").unwrap_err();
    assert!(err.is_unknown_zone());
    Ok(())
}

#[test]
fn printer() -> crate::Result {
    let printer = DateTimePrinter::new().separator(b' ');
    let zdt = ZonedDateTime::parse("2025-01-20T10:00:01.120+01:00[Europe/Vienna]")?;

    let mut buf = String::new();
    printer.print_zoned(&zdt, &mut buf)?;
    assert_eq!(buf, "2025-01-20 10:00:01.12+01:00[Europe/Vienna]");

    buf.clear();
    printer.print_instant(&zdt.to_instant()?, &mut buf)?;
    assert_eq!(buf, "2025-01-20 09:00:01.12Z");

    buf.clear();
    printer.print_offset_datetime(&zdt.to_offset_datetime(), &mut buf)?;
    printer.print_offset(&UtcOffset::constant_seconds(-1), &mut buf)?;
    assert_eq!(buf, "2025-01-20 10:00:01.12+01:00-00:00:01");
    Ok(())
}
