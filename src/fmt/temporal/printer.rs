use crate::{
    civil::CivilDateTime, error::Error, instant::Instant, tz::UtcOffset,
    zoned::ZonedDateTime, OffsetDateTime,
};

/// The low level printer behind the public `DateTimePrinter`.
#[derive(Clone, Copy, Debug)]
pub(super) struct Printer {
    separator: u8,
}

impl Printer {
    pub(super) const fn new() -> Printer {
        Printer { separator: b'T' }
    }

    pub(super) const fn separator(self, ascii_char: u8) -> Printer {
        assert!(ascii_char.is_ascii(), "separator must be ASCII");
        Printer { separator: ascii_char }
    }

    pub(super) fn print_zoned<W: core::fmt::Write>(
        &self,
        zdt: &ZonedDateTime,
        mut wtr: W,
    ) -> Result<(), Error> {
        self.print_civil(&zdt.civil(), &mut wtr)?;
        self.print_offset(&zdt.offset(), &mut wtr)?;
        if !zdt.zone().is_fixed() {
            write(&mut wtr, format_args!("[{}]", zdt.zone().name()))?;
        }
        Ok(())
    }

    pub(super) fn print_offset_datetime<W: core::fmt::Write>(
        &self,
        odt: &OffsetDateTime,
        mut wtr: W,
    ) -> Result<(), Error> {
        self.print_civil(&odt.civil(), &mut wtr)?;
        self.print_offset(&odt.offset(), &mut wtr)
    }

    pub(super) fn print_instant<W: core::fmt::Write>(
        &self,
        instant: &Instant,
        mut wtr: W,
    ) -> Result<(), Error> {
        self.print_civil(&instant.to_civil_utc(), &mut wtr)?;
        write(&mut wtr, format_args!("Z"))
    }

    pub(super) fn print_civil<W: core::fmt::Write>(
        &self,
        civil: &CivilDateTime,
        mut wtr: W,
    ) -> Result<(), Error> {
        let year = civil.year();
        if (0..=9999).contains(&year) {
            write(&mut wtr, format_args!("{year:04}"))?;
        } else {
            let sign = if year < 0 { '-' } else { '+' };
            write(&mut wtr, format_args!("{sign}{:06}", year.unsigned_abs()))?;
        }
        write(
            &mut wtr,
            format_args!(
                "-{:02}-{:02}{}{:02}:{:02}:{:02}",
                civil.month(),
                civil.day(),
                char::from(self.separator),
                civil.hour(),
                civil.minute(),
                civil.second(),
            ),
        )?;
        let nanos = civil.subsec_nanosecond();
        if nanos != 0 {
            let mut digits: usize = 9;
            let mut fraction = nanos;
            while fraction % 10 == 0 {
                fraction /= 10;
                digits -= 1;
            }
            write(&mut wtr, format_args!(".{fraction:0digits$}"))?;
        }
        Ok(())
    }

    pub(super) fn print_offset<W: core::fmt::Write>(
        &self,
        offset: &UtcOffset,
        mut wtr: W,
    ) -> Result<(), Error> {
        write(&mut wtr, format_args!("{offset}"))
    }
}

fn write<W: core::fmt::Write>(
    mut wtr: W,
    args: core::fmt::Arguments<'_>,
) -> Result<(), Error> {
    wtr.write_fmt(args)
        .map_err(|_| err!("an error occurred when formatting an argument"))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::civil::datetime;

    use super::*;

    fn civil(printer: Printer, dt: CivilDateTime) -> String {
        let mut buf = String::new();
        printer.print_civil(&dt, &mut buf).unwrap();
        buf
    }

    #[test]
    fn print_civil() {
        let p = Printer::new();
        insta::assert_snapshot!(
            civil(p, datetime(2025, 1, 20, 10, 0, 1, 0)),
            @"2025-01-20T10:00:01",
        );
        insta::assert_snapshot!(
            civil(p, datetime(2025, 1, 20, 10, 0, 1, 120_000_000)),
            @"2025-01-20T10:00:01.12",
        );
        insta::assert_snapshot!(
            civil(p, datetime(2025, 1, 20, 10, 0, 1, 1_000)),
            @"2025-01-20T10:00:01.000001",
        );
        insta::assert_snapshot!(
            civil(p, datetime(-9999, 1, 1, 0, 0, 0, 0)),
            @"-009999-01-01T00:00:00",
        );
        insta::assert_snapshot!(
            civil(p, datetime(0, 1, 1, 0, 0, 0, 0)),
            @"0000-01-01T00:00:00",
        );
        insta::assert_snapshot!(
            civil(p.separator(b' '), datetime(2025, 1, 20, 10, 0, 1, 0)),
            @"2025-01-20 10:00:01",
        );
    }

    #[test]
    fn print_instant() {
        let mut buf = String::new();
        Printer::new().print_instant(&Instant::MAX, &mut buf).unwrap();
        insta::assert_snapshot!(buf, @"9999-12-31T05:59:59.999999999Z");
    }
}
