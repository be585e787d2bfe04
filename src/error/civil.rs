use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    FailedAddDuration,
    FailedSubDuration,
    InvalidDay {
        year: i16,
        month: i8,
        day: i8,
        max: i8,
    },
    InvalidField {
        what: &'static str,
        given: i64,
        min: i64,
        max: i64,
    },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Civil(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            FailedAddDuration => {
                f.write_str("failed to add duration to civil datetime")
            }
            FailedSubDuration => {
                f.write_str("failed to subtract duration from civil datetime")
            }
            InvalidDay { year, month, day, max } => write!(
                f,
                "day {day} is not valid for {year:04}-{month:02}, \
                 which has {max} days",
            ),
            InvalidField { what, given, min, max } => write!(
                f,
                "field '{what}' with value {given} \
                 is not in the required range of {min}..={max}",
            ),
        }
    }
}
