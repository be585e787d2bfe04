use crate::{
    civil::CivilDateTime,
    error::{fmt::temporal::Error as E, Error, ErrorContext},
    fmt::Parsed,
    tz::UtcOffset,
    util::parse,
};

/// The datetime components parsed from a string.
#[derive(Debug)]
pub(super) struct ParsedDateTime<'i> {
    /// A required civil datetime.
    pub(super) civil: CivilDateTime,
    /// An optional UTC offset.
    pub(super) offset: Option<ParsedOffset>,
    /// An optional time zone name, from a `[...]` annotation.
    pub(super) zone: Option<&'i str>,
}

/// A parsed UTC offset.
///
/// `Z` is kept distinct from `+00:00`, since it means that the offset is
/// unknown and only the instant is.
#[derive(Clone, Copy, Debug)]
pub(super) enum ParsedOffset {
    Zulu,
    Numeric(UtcOffset),
}

impl ParsedOffset {
    pub(super) fn to_offset(self) -> UtcOffset {
        match self {
            ParsedOffset::Zulu => UtcOffset::UTC,
            ParsedOffset::Numeric(offset) => offset,
        }
    }
}

/// A parser for the grammar of datetime strings.
///
/// This only parses. Interpreting the parsed components, like resolving a
/// time zone name, is left to the caller.
#[derive(Debug)]
pub(super) struct Parser {
    _priv: (),
}

impl Parser {
    pub(super) const fn new() -> Parser {
        Parser { _priv: () }
    }

    // DateTime :::
    //   Date DateTimeSeparator Time Offset[opt] TimeZoneAnnotation[opt]
    //
    // DateTimeSeparator ::: one of
    //   T t <SP>
    pub(super) fn parse_datetime<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, ParsedDateTime<'i>>, Error> {
        let Parsed { value: (year, month, day), input } =
            self.parse_date(input)?;

        let (&first, input) = input
            .split_first()
            .ok_or(E::ExpectedDateTimeSeparatorFoundEndOfInput)?;
        if !matches!(first, b'T' | b't' | b' ') {
            return Err(Error::from(E::ExpectedDateTimeSeparatorFoundByte {
                byte: first,
            }));
        }

        let Parsed { value: (hour, minute, second, nanosecond), input } =
            self.parse_time(input)?;
        let civil = CivilDateTime::try_new(
            year, month, day, hour, minute, second, nanosecond,
        )
        .context(E::InvalidDateTime)?;

        let Parsed { value: offset, input } =
            self.parse_optional_offset(input).context(E::FailedOffset)?;
        let Parsed { value: zone, input } = self
            .parse_optional_annotation(input)
            .context(E::FailedTimeZoneAnnotation)?;
        let value = ParsedDateTime { civil, offset, zone };
        Ok(Parsed { value, input })
    }

    // Offset :::
    //   Z z
    //   Sign Hour : Minute
    //   Sign Hour : Minute : Second
    pub(super) fn parse_offset<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, ParsedOffset>, Error> {
        let Parsed { value: offset, input } =
            self.parse_optional_offset(input).context(E::FailedOffset)?;
        let offset = offset.ok_or(E::MissingOffset)?;
        Ok(Parsed { value: offset, input })
    }

    // Date :::
    //   Year - Month - Day
    fn parse_date<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, (i64, i64, i64)>, Error> {
        let Parsed { value: year, input } =
            self.parse_year(input).context(E::FailedField { what: "year" })?;
        let Parsed { input, .. } = self.parse_date_separator(input)?;
        let Parsed { value: month, input } =
            self.parse_two_digits(input, "month")?;
        let Parsed { input, .. } = self.parse_date_separator(input)?;
        let Parsed { value: day, input } =
            self.parse_two_digits(input, "day")?;
        Ok(Parsed { value: (year, month, day), input })
    }

    // Time :::
    //   Hour : Minute
    //   Hour : Minute : Second Fraction[opt]
    //
    // Fraction :::
    //   DecimalSeparator DecimalDigit{1,9}
    //
    // DecimalSeparator ::: one of
    //   . ,
    fn parse_time<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, (i64, i64, i64, i64)>, Error> {
        let Parsed { value: hour, input } =
            self.parse_two_digits(input, "hour")?;
        let Parsed { input, .. } = self.parse_time_separator(input)?;
        let Parsed { value: minute, input } =
            self.parse_two_digits(input, "minute")?;

        let Some(input) = input.strip_prefix(b":") else {
            return Ok(Parsed { value: (hour, minute, 0, 0), input });
        };
        let Parsed { value: second, input } =
            self.parse_two_digits(input, "second")?;

        let Parsed { value: nanosecond, input } = self
            .parse_fraction(input)
            .context(E::FailedField { what: "fractional second" })?;
        Ok(Parsed { value: (hour, minute, second, nanosecond), input })
    }

    // Year :::
    //   DecimalDigit{4}
    //   Sign DecimalDigit{6}
    fn parse_year<'i>(&self, input: &'i [u8]) -> Result<Parsed<'i, i64>, Error> {
        let Some((&sign, tail)) = input.split_first() else {
            return Err(Error::from(E::ExpectedFourDigitYear));
        };
        if !matches!(sign, b'+' | b'-') {
            let (year, input) =
                parse::split(input, 4).ok_or(E::ExpectedFourDigitYear)?;
            let year = parse::i64(year)
                .context(E::ParseDigits { what: "four digit year" })?;
            return Ok(Parsed { value: year, input });
        }
        let (year, input) =
            parse::split(tail, 6).ok_or(E::ExpectedSixDigitYear)?;
        let year = parse::i64(year)
            .context(E::ParseDigits { what: "six digit year" })?;
        if sign == b'-' {
            if year == 0 {
                return Err(Error::from(E::InvalidYearZero));
            }
            return Ok(Parsed { value: -year, input });
        }
        Ok(Parsed { value: year, input })
    }

    fn parse_two_digits<'i>(
        &self,
        input: &'i [u8],
        what: &'static str,
    ) -> Result<Parsed<'i, i64>, Error> {
        let (digits, input) =
            parse::split(input, 2).ok_or(E::ExpectedTwoDigits { what })?;
        let n = parse::i64(digits).context(E::ParseDigits { what })?;
        Ok(Parsed { value: n, input })
    }

    /// Parses an optional fraction of a second into nanoseconds.
    fn parse_fraction<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, i64>, Error> {
        let Some((&first, tail)) = input.split_first() else {
            return Ok(Parsed { value: 0, input });
        };
        if !matches!(first, b'.' | b',') {
            return Ok(Parsed { value: 0, input });
        }
        let len = tail.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return Err(Error::from(E::ExpectedFractionDigits));
        }
        let (digits, input) = tail.split_at(len);
        let nanosecond = parse::fraction(digits, 9)?;
        Ok(Parsed { value: nanosecond, input })
    }

    fn parse_optional_offset<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, Option<ParsedOffset>>, Error> {
        let Some((&first, tail)) = input.split_first() else {
            return Ok(Parsed { value: None, input });
        };
        if matches!(first, b'Z' | b'z') {
            return Ok(Parsed { value: Some(ParsedOffset::Zulu), input: tail });
        }
        let sign = match first {
            b'+' => 1,
            b'-' => -1,
            _ => return Ok(Parsed { value: None, input }),
        };
        let input = tail;

        let Parsed { value: hours, input } =
            self.parse_two_digits(input, "offset hours")?;
        let Parsed { input, .. } = self.parse_offset_separator(input)?;
        let Parsed { value: minutes, input } =
            self.parse_two_digits(input, "offset minutes")?;
        let (seconds, input) = match input.strip_prefix(b":") {
            None => (0, input),
            Some(input) => {
                let Parsed { value, input } =
                    self.parse_two_digits(input, "offset seconds")?;
                (value, input)
            }
        };
        if minutes > 59 {
            return Err(Error::range("offset minutes", minutes, 0, 59));
        }
        if seconds > 59 {
            return Err(Error::range("offset seconds", seconds, 0, 59));
        }
        let total = sign * (hours * 3600 + minutes * 60 + seconds);
        // OK because every input has at most two digits per component.
        let total = i32::try_from(total).unwrap();
        let offset = UtcOffset::from_seconds(total).context(E::InvalidOffset)?;
        Ok(Parsed { value: Some(ParsedOffset::Numeric(offset)), input })
    }

    // TimeZoneAnnotation :::
    //   [ TimeZoneName ]
    fn parse_optional_annotation<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, Option<&'i str>>, Error> {
        let Some(input) = input.strip_prefix(b"[") else {
            return Ok(Parsed { value: None, input });
        };
        let end = input
            .iter()
            .position(|&b| b == b']')
            .ok_or(E::UnclosedTimeZoneAnnotation)?;
        let (name, input) = (&input[..end], &input[end + 1..]);
        if name.is_empty() {
            return Err(Error::from(E::EmptyTimeZone));
        }
        let name =
            core::str::from_utf8(name).map_err(|_| E::InvalidTimeZoneUtf8)?;
        Ok(Parsed { value: Some(name), input })
    }

    fn parse_date_separator<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, ()>, Error> {
        let (&first, input) =
            input.split_first().ok_or(E::ExpectedSeparatorFoundEndOfInput)?;
        if first != b'-' {
            return Err(Error::from(E::ExpectedSeparatorFoundByte {
                byte: first,
            }));
        }
        Ok(Parsed { value: (), input })
    }

    fn parse_time_separator<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, ()>, Error> {
        let (&first, input) = input
            .split_first()
            .ok_or(E::ExpectedTimeSeparatorFoundEndOfInput)?;
        if first != b':' {
            return Err(Error::from(E::ExpectedTimeSeparatorFoundByte {
                byte: first,
            }));
        }
        Ok(Parsed { value: (), input })
    }

    fn parse_offset_separator<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, ()>, Error> {
        let (&first, input) = input
            .split_first()
            .ok_or(E::ExpectedOffsetSeparatorFoundEndOfInput)?;
        if first != b':' {
            return Err(Error::from(E::ExpectedOffsetSeparatorFoundByte {
                byte: first,
            }));
        }
        Ok(Parsed { value: (), input })
    }
}
