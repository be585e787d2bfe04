use crate::{
    civil::CivilDateTime,
    error,
    tz::{UtcOffset, ZoneId},
};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    ConvertCivilToInstant {
        offset: UtcOffset,
    },
    MismatchFold {
        civil: CivilDateTime,
        given: UtcOffset,
        before: UtcOffset,
        after: UtcOffset,
        zone: ZoneId,
    },
    MismatchGap {
        civil: CivilDateTime,
        given: UtcOffset,
        before: UtcOffset,
        after: UtcOffset,
        zone: ZoneId,
    },
    MismatchUnambiguous {
        civil: CivilDateTime,
        given: UtcOffset,
        offset: UtcOffset,
        zone: ZoneId,
    },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::TzOffset(err).into()
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
            ConvertCivilToInstant { offset } => write!(
                f,
                "converting civil datetime with offset `{offset}` \
                 to instant overflowed",
            ),
            MismatchFold { civil, given, before, after, ref zone } => write!(
                f,
                "offset `{given}` is not valid for `{civil}` in time zone \
                 `{name}`, since it falls in a fold between offsets \
                 `{before}` and `{after}`, neither of which match",
                name = zone.name(),
            ),
            MismatchGap { civil, given, before, after, ref zone } => write!(
                f,
                "offset `{given}` is not valid for `{civil}` in time zone \
                 `{name}`, since it falls in a gap between offsets \
                 `{before}` and `{after}` and so no offset is valid",
                name = zone.name(),
            ),
            MismatchUnambiguous { civil, given, offset, ref zone } => write!(
                f,
                "offset `{given}` is not valid for `{civil}` in time zone \
                 `{name}`, which only permits offset `{offset}`",
                name = zone.name(),
            ),
        }
    }
}
