/*!
A parser and printer for the ISO 8601 based text format used by this crate.

# Grammar

The format is a subset of ISO 8601's extended format, plus the time zone
annotation from [RFC 9557]:

```text
datetime   = date ("T" / "t" / " ") time [offset] ["[" zone "]"]
date       = year "-" month "-" day
year       = 4DIGIT / ("+" / "-") 6DIGIT
time       = hour ":" minute [":" second [("." / ",") 1*9DIGIT]]
offset     = "Z" / "z" / ("+" / "-") hour ":" minute [":" second]
```

Seconds are optional when parsing, but always printed. Seconds range over
`0..=59`, so leap seconds are rejected. The year `-000000` is rejected, and
years outside of `0..=9999` are printed with a sign and six digits. A
fractional second is printed with the fewest digits that represent it
exactly.

Which parts are required depends on what is being parsed:

| Type | Offset | Time zone annotation |
| ---- | ------ | -------------------- |
| [`CivilDateTime`] | rejected | rejected |
| [`UtcOffset`] | required (alone) | rejected |
| [`OffsetDateTime`] | required | rejected |
| [`Instant`] | required | rejected |
| [`ZonedDateTime`] | see below | see below |

When parsing a zoned datetime:

* With both a numeric offset and an annotation, the offset must be valid for
the civil datetime in the time zone. This is the default
[`OffsetConflict::Reject`] policy. With [`OffsetConflict::PreferOffset`],
the civil datetime is instead resolved in the time zone by
[`ZonedDateTime::from_local`], using the offset only to choose between the
two offsets of a fold.
* With `Z` and an annotation, the text identifies an instant. The zoned
datetime is the one for that instant in the time zone, as returned by
[`ZonedDateTime::from_instant`].
* With only an annotation, the civil datetime is resolved in the time zone by
[`ZonedDateTime::from_local`].
* With only an offset (including `Z`), the time zone is the fixed offset
zone returned by [`ZoneId::fixed`].

[RFC 9557]: https://datatracker.ietf.org/doc/rfc9557/

# Example

```
use tempora::{fmt::temporal::DateTimeParser, tz::{self, ZoneId}};

static PARSER: DateTimeParser = DateTimeParser::new();

// A database with a zone that isn't bundled.
let db = tz::db().with_zone(ZoneId::posix("Asia/Kathmandu", "<+0545>-5:45")?);

let zdt = PARSER.parse_zoned_with(&db, "2025-01-20T10:00:01Z[Asia/Kathmandu]")?;
assert_eq!(zdt.to_string(), "2025-01-20T15:45:01+05:45[Asia/Kathmandu]");

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use crate::{
    civil::CivilDateTime,
    error::{fmt::temporal::Error as E, Error, ErrorContext},
    instant::Instant,
    offset_datetime::OffsetDateTime,
    tz::{OffsetConflict, UtcOffset, ZoneDatabase, ZoneId},
    zoned::ZonedDateTime,
};

use self::parser::{ParsedDateTime, ParsedOffset};

mod parser;
mod printer;

/// A parser for datetime strings.
///
/// This parser is configurable and can be constructed in a `const` context,
/// so a single parser can be put in a `static` and reused.
///
/// # Example
///
/// This shows the difference between strict and lenient handling of an
/// offset that doesn't match its time zone:
///
/// ```
/// use tempora::{fmt::temporal::DateTimeParser, tz::OffsetConflict};
///
/// static STRICT: DateTimeParser = DateTimeParser::new();
/// static LENIENT: DateTimeParser = DateTimeParser::new()
///     .offset_conflict(OffsetConflict::PreferOffset);
///
/// // A fold. Both offsets are valid, so both parsers agree.
/// let text = "2025-10-26T02:30:00+01:00[Europe/Vienna]";
/// assert_eq!(STRICT.parse_zoned(text)?, LENIENT.parse_zoned(text)?);
///
/// // A gap. No offset is valid.
/// let text = "2025-03-30T02:30:00+01:00[Europe/Vienna]";
/// assert!(STRICT.parse_zoned(text).unwrap_err().is_zone_offset_mismatch());
/// assert_eq!(
///     LENIENT.parse_zoned(text)?.to_string(),
///     "2025-03-30T03:30:00+02:00[Europe/Vienna]",
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DateTimeParser {
    p: parser::Parser,
    offset_conflict: OffsetConflict,
}

impl DateTimeParser {
    /// Creates a new parser with the default configuration.
    pub const fn new() -> DateTimeParser {
        DateTimeParser {
            p: parser::Parser::new(),
            offset_conflict: OffsetConflict::Reject,
        }
    }

    /// Sets what to do when parsing a zoned datetime whose offset isn't valid
    /// for its civil datetime in its time zone.
    ///
    /// The default is [`OffsetConflict::Reject`].
    pub const fn offset_conflict(
        self,
        strategy: OffsetConflict,
    ) -> DateTimeParser {
        DateTimeParser { offset_conflict: strategy, ..self }
    }

    /// Parses a civil datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid datetime, or when
    /// it has an offset or a time zone annotation.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, fmt::temporal::DateTimeParser};
    ///
    /// let parser = DateTimeParser::new();
    /// assert_eq!(
    ///     parser.parse_civil("2025-01-20T10:00:01.123456789")?,
    ///     datetime(2025, 1, 20, 10, 0, 1, 123_456_789),
    /// );
    /// assert!(parser.parse_civil("2025-01-20T10:00:01Z").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_civil<I: AsRef<[u8]>>(
        &self,
        input: I,
    ) -> Result<CivilDateTime, Error> {
        fn imp(p: &DateTimeParser, input: &[u8]) -> Result<CivilDateTime, Error> {
            let parsed = p.parse_datetime(input)?;
            if parsed.offset.is_some() {
                return Err(Error::from(E::CivilWithOffset));
            }
            if parsed.zone.is_some() {
                return Err(Error::from(E::CivilWithTimeZone));
            }
            Ok(parsed.civil)
        }
        imp(self, input.as_ref())
    }

    /// Parses a UTC offset, like `+07:00`, `-05:30:15` or `Z`.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid offset.
    pub fn parse_offset<I: AsRef<[u8]>>(
        &self,
        input: I,
    ) -> Result<UtcOffset, Error> {
        fn imp(p: &DateTimeParser, input: &[u8]) -> Result<UtcOffset, Error> {
            let offset = p.p.parse_offset(input)?.into_full()?;
            Ok(offset.to_offset())
        }
        imp(self, input.as_ref())
    }

    /// Parses an offset datetime.
    ///
    /// `Z` is accepted as a zero offset.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid datetime, when it
    /// has no offset or when it has a time zone annotation.
    pub fn parse_offset_datetime<I: AsRef<[u8]>>(
        &self,
        input: I,
    ) -> Result<OffsetDateTime, Error> {
        fn imp(
            p: &DateTimeParser,
            input: &[u8],
        ) -> Result<OffsetDateTime, Error> {
            let parsed = p.parse_datetime(input)?;
            if parsed.zone.is_some() {
                return Err(Error::from(E::UnexpectedTimeZone));
            }
            let offset = parsed.offset.ok_or(E::MissingOffset)?;
            Ok(OffsetDateTime::new(parsed.civil, offset.to_offset()))
        }
        imp(self, input.as_ref())
    }

    /// Parses an instant.
    ///
    /// The input is an offset datetime, which is then converted to the
    /// instant it identifies.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid offset datetime,
    /// or when it identifies an instant outside of the supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::fmt::temporal::DateTimeParser;
    ///
    /// let parser = DateTimeParser::new();
    /// let instant = parser.parse_instant("2025-01-20T17:00:01+07:00")?;
    /// assert_eq!(instant.to_string(), "2025-01-20T10:00:01Z");
    ///
    /// let err = parser.parse_instant("2025-01-20T17:00:01").unwrap_err();
    /// assert!(err.is_parse());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_instant<I: AsRef<[u8]>>(
        &self,
        input: I,
    ) -> Result<Instant, Error> {
        fn imp(p: &DateTimeParser, input: &[u8]) -> Result<Instant, Error> {
            let odt = p.parse_offset_datetime(input)?;
            odt.to_instant().context(E::InvalidInstant)
        }
        imp(self, input.as_ref())
    }

    /// Parses a zoned datetime, looking up time zone names in the global
    /// database returned by [`tz::db`](crate::tz::db).
    ///
    /// See the [module documentation](self) for how the offset and time zone
    /// annotation are interpreted.
    ///
    /// # Errors
    ///
    /// This returns an error when the input is not a valid datetime, when it
    /// has neither an offset nor a time zone annotation, or when its time
    /// zone is unknown. With [`OffsetConflict::Reject`], this also returns
    /// an error when the offset is not valid in the time zone.
    pub fn parse_zoned<I: AsRef<[u8]>>(
        &self,
        input: I,
    ) -> Result<ZonedDateTime, Error> {
        self.parse_zoned_with(crate::tz::db(), input)
    }

    /// Parses a zoned datetime, looking up time zone names in the given
    /// database.
    ///
    /// This is like [`DateTimeParser::parse_zoned`], except for the database
    /// used.
    pub fn parse_zoned_with<I: AsRef<[u8]>>(
        &self,
        db: &ZoneDatabase,
        input: I,
    ) -> Result<ZonedDateTime, Error> {
        fn imp(
            p: &DateTimeParser,
            db: &ZoneDatabase,
            input: &[u8],
        ) -> Result<ZonedDateTime, Error> {
            let parsed = p.parse_datetime(input)?;
            p.to_zoned(db, parsed)
        }
        imp(self, db, input.as_ref())
    }

    fn parse_datetime<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<ParsedDateTime<'i>, Error> {
        self.p.parse_datetime(input)?.into_full()
    }

    fn to_zoned(
        &self,
        db: &ZoneDatabase,
        parsed: ParsedDateTime<'_>,
    ) -> Result<ZonedDateTime, Error> {
        let ParsedDateTime { civil, offset, zone } = parsed;
        let Some(name) = zone else {
            let offset = offset.ok_or(E::MissingOffsetOrTimeZone)?.to_offset();
            let zone = ZoneId::fixed(offset);
            return Ok(ZonedDateTime::from_parts(civil, offset, zone));
        };
        let zone =
            db.get(name).with_context(|| E::failed_time_zone_lookup(name))?;
        match offset {
            None => Ok(ZonedDateTime::from_local(civil, &zone, None)),
            Some(ParsedOffset::Zulu) => {
                let instant = UtcOffset::UTC
                    .to_instant(civil)
                    .context(E::InvalidInstant)?;
                Ok(ZonedDateTime::from_instant(instant, &zone))
            }
            Some(ParsedOffset::Numeric(offset)) => match self.offset_conflict {
                OffsetConflict::Reject => {
                    ZonedDateTime::from_strict(civil, offset, &zone)
                }
                OffsetConflict::PreferOffset => {
                    Ok(ZonedDateTime::from_local(civil, &zone, Some(offset)))
                }
            },
        }
    }
}

impl Default for DateTimeParser {
    fn default() -> DateTimeParser {
        DateTimeParser::new()
    }
}

/// A printer for datetime strings.
///
/// This is what the `Display` implementations of the datetime types in this
/// crate use. It can be constructed in a `const` context and can write to
/// anything implementing [`core::fmt::Write`], including a `String`.
///
/// # Example
///
/// ```
/// use tempora::{civil::datetime, fmt::temporal::DateTimePrinter};
///
/// static PRINTER: DateTimePrinter = DateTimePrinter::new().separator(b' ');
///
/// let mut buf = String::new();
/// PRINTER.print_civil(&datetime(2025, 1, 20, 10, 0, 1, 0), &mut buf)?;
/// assert_eq!(buf, "2025-01-20 10:00:01");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct DateTimePrinter {
    p: printer::Printer,
}

impl DateTimePrinter {
    /// Creates a new printer with the default configuration.
    pub const fn new() -> DateTimePrinter {
        DateTimePrinter { p: printer::Printer::new() }
    }

    /// Sets the character written between the date and the time.
    ///
    /// The default is `T`.
    ///
    /// # Panics
    ///
    /// This panics when the given byte is not ASCII.
    pub const fn separator(self, ascii_char: u8) -> DateTimePrinter {
        DateTimePrinter { p: self.p.separator(ascii_char) }
    }

    /// Prints a civil datetime.
    ///
    /// # Errors
    ///
    /// This only returns an error when the writer does.
    pub fn print_civil<W: core::fmt::Write>(
        &self,
        civil: &CivilDateTime,
        wtr: W,
    ) -> Result<(), Error> {
        self.p.print_civil(civil, wtr)
    }

    /// Prints a UTC offset.
    ///
    /// # Errors
    ///
    /// This only returns an error when the writer does.
    pub fn print_offset<W: core::fmt::Write>(
        &self,
        offset: &UtcOffset,
        wtr: W,
    ) -> Result<(), Error> {
        self.p.print_offset(offset, wtr)
    }

    /// Prints an offset datetime.
    ///
    /// # Errors
    ///
    /// This only returns an error when the writer does.
    pub fn print_offset_datetime<W: core::fmt::Write>(
        &self,
        odt: &OffsetDateTime,
        wtr: W,
    ) -> Result<(), Error> {
        self.p.print_offset_datetime(odt, wtr)
    }

    /// Prints an instant, as a datetime in UTC followed by `Z`.
    ///
    /// # Errors
    ///
    /// This only returns an error when the writer does.
    pub fn print_instant<W: core::fmt::Write>(
        &self,
        instant: &Instant,
        wtr: W,
    ) -> Result<(), Error> {
        self.p.print_instant(instant, wtr)
    }

    /// Prints a zoned datetime.
    ///
    /// The time zone annotation is omitted for zones built by
    /// [`ZoneId::fixed`].
    ///
    /// # Errors
    ///
    /// This only returns an error when the writer does.
    pub fn print_zoned<W: core::fmt::Write>(
        &self,
        zdt: &ZonedDateTime,
        wtr: W,
    ) -> Result<(), Error> {
        self.p.print_zoned(zdt, wtr)
    }
}

impl Default for DateTimePrinter {
    fn default() -> DateTimePrinter {
        DateTimePrinter::new()
    }
}
