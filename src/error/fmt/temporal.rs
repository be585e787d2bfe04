use alloc::boxed::Box;

use crate::{error, util::escape};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    CivilWithOffset,
    CivilWithTimeZone,
    EmptyTimeZone,
    ExpectedDateTimeSeparatorFoundByte { byte: u8 },
    ExpectedDateTimeSeparatorFoundEndOfInput,
    ExpectedFourDigitYear,
    ExpectedFractionDigits,
    ExpectedOffsetSeparatorFoundByte { byte: u8 },
    ExpectedOffsetSeparatorFoundEndOfInput,
    ExpectedSeparatorFoundByte { byte: u8 },
    ExpectedSeparatorFoundEndOfInput,
    ExpectedSixDigitYear,
    ExpectedTimeSeparatorFoundByte { byte: u8 },
    ExpectedTimeSeparatorFoundEndOfInput,
    ExpectedTwoDigits { what: &'static str },
    FailedField { what: &'static str },
    FailedOffset,
    FailedTimeZoneAnnotation,
    FailedTimeZoneLookup { name: Box<str> },
    InvalidDateTime,
    InvalidInstant,
    InvalidOffset,
    InvalidTimeZoneUtf8,
    InvalidYearZero,
    MissingOffset,
    MissingOffsetOrTimeZone,
    ParseDigits { what: &'static str },
    TrailingInput { unparsed: Box<[u8]> },
    UnclosedTimeZoneAnnotation,
    UnexpectedTimeZone,
}

impl Error {
    pub(crate) fn failed_time_zone_lookup(name: &str) -> Error {
        Error::FailedTimeZoneLookup { name: name.into() }
    }

    pub(crate) fn trailing_input(unparsed: &[u8]) -> Error {
        Error::TrailingInput { unparsed: unparsed.into() }
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::FmtTemporal(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            CivilWithOffset => f.write_str(
                "cannot parse civil datetime from string with an offset, \
                 parse as an offset datetime first and take its civil \
                 datetime instead",
            ),
            CivilWithTimeZone => f.write_str(
                "cannot parse civil datetime from string with a time zone \
                 annotation, parse as a zoned datetime first and take its \
                 civil datetime instead",
            ),
            EmptyTimeZone => {
                f.write_str("an empty string is not a valid time zone")
            }
            ExpectedDateTimeSeparatorFoundByte { byte } => write!(
                f,
                "expected `T`, `t` or a space between date and time, \
                 but found `{byte}` instead",
                byte = escape::Byte(byte),
            ),
            ExpectedDateTimeSeparatorFoundEndOfInput => f.write_str(
                "expected `T`, `t` or a space between date and time, \
                 but found end of input",
            ),
            ExpectedFourDigitYear => f.write_str(
                "expected four digit year (or leading sign for \
                 six digit year), but found end of input",
            ),
            ExpectedFractionDigits => f.write_str(
                "found decimal after seconds component, \
                 but did not find any decimal digits after decimal",
            ),
            ExpectedOffsetSeparatorFoundByte { byte } => write!(
                f,
                "expected `:` separator in offset, but found `{byte}`",
                byte = escape::Byte(byte),
            ),
            ExpectedOffsetSeparatorFoundEndOfInput => f.write_str(
                "expected `:` separator in offset, but found end of input",
            ),
            ExpectedSeparatorFoundByte { byte } => write!(
                f,
                "expected `-` separator, but found `{byte}`",
                byte = escape::Byte(byte),
            ),
            ExpectedSeparatorFoundEndOfInput => {
                f.write_str("expected `-` separator, but found end of input")
            }
            ExpectedSixDigitYear => f.write_str(
                "expected six digit year (because of a leading sign), \
                 but found end of input",
            ),
            ExpectedTimeSeparatorFoundByte { byte } => write!(
                f,
                "expected `:` separator, but found `{byte}`",
                byte = escape::Byte(byte),
            ),
            ExpectedTimeSeparatorFoundEndOfInput => {
                f.write_str("expected `:` separator, but found end of input")
            }
            ExpectedTwoDigits { what } => {
                write!(f, "expected two digit {what}, but found end of input")
            }
            FailedField { what } => write!(f, "failed to parse {what}"),
            FailedOffset => f.write_str("failed to parse UTC offset"),
            FailedTimeZoneAnnotation => {
                f.write_str("failed to parse time zone annotation")
            }
            FailedTimeZoneLookup { ref name } => write!(
                f,
                "parsed time zone annotation `{name}`, \
                 but the time zone database lookup failed",
            ),
            InvalidDateTime => f.write_str(
                "parsed date and time fields do not form \
                 a valid civil datetime",
            ),
            InvalidInstant => f.write_str(
                "parsed datetime and offset do not identify \
                 an instant in the supported range",
            ),
            InvalidOffset => f.write_str(
                "parsed UTC offset is not in the supported range",
            ),
            InvalidTimeZoneUtf8 => f.write_str(
                "found plausible time zone annotation, \
                 but it is not valid UTF-8",
            ),
            InvalidYearZero => f.write_str(
                "year zero must be written without a sign \
                 or with a `+` sign",
            ),
            MissingOffset => f.write_str(
                "expected a UTC offset (`Z` or `±HH:MM`) after the time, \
                 but found none",
            ),
            MissingOffsetOrTimeZone => f.write_str(
                "expected a UTC offset or a time zone annotation \
                 after the time, but found neither",
            ),
            ParseDigits { what } => {
                write!(f, "failed to parse digits for {what}")
            }
            TrailingInput { ref unparsed } => write!(
                f,
                "parsed value, but unparsed input {unparsed:?} \
                 remains (expected no unparsed input)",
                unparsed = escape::Bytes(unparsed),
            ),
            UnclosedTimeZoneAnnotation => f.write_str(
                "expected `]` to close time zone annotation, \
                 but found end of input",
            ),
            UnexpectedTimeZone => f.write_str(
                "found a time zone annotation, but this value \
                 cannot carry a time zone",
            ),
        }
    }
}
