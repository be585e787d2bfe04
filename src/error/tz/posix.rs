use alloc::boxed::Box;

use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    InvalidRule { input: Box<str> },
}

impl Error {
    pub(crate) fn invalid_rule(input: &str) -> Error {
        Error::InvalidRule { input: input.into() }
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzPosix(err).into()
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
            InvalidRule { ref input } => {
                write!(f, "invalid POSIX time zone rule `{input}`")
            }
        }
    }
}
