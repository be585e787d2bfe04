use alloc::{boxed::Box, sync::Arc};

pub(crate) mod civil;
pub(crate) mod fmt;
pub(crate) mod tz;
pub(crate) mod util;

/// Creates a new ad hoc error value from `format_args!` style arguments.
///
/// This is used for errors with no structured counterpart, like the many
/// small failure modes of the POSIX time zone parser.
macro_rules! err {
    ($($tt:tt)*) => {{
        crate::error::Error::from_args(format_args!($($tt)*))
    }}
}

/// An error that can occur in this crate.
///
/// Errors fall into a handful of categories, each of which can be detected
/// with one of the `Error::is_*` predicates:
///
/// * [`Error::is_parse`] for malformed text.
/// * [`Error::is_invalid_field`] for calendar fields that don't form a valid
/// date or time, like February 30.
/// * [`Error::is_zone_offset_mismatch`] for strict construction of a zoned
/// datetime with an offset that its time zone doesn't permit.
/// * [`Error::is_unknown_zone`] for time zone names that are not in the
/// time zone database.
/// * [`Error::is_range`] for values outside of the supported range.
///
/// Some errors match more than one predicate. For example, parsing
/// `2025-02-30T00:00:00` is both a parse error and an invalid field error.
///
/// # Design
///
/// This crate has only one error type for all of its fallible operations.
/// An error is a chain of causes, where each link in the chain adds context
/// to the link it wraps. The `Display` implementation prints the entire
/// chain. The predicates above inspect the chain.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cheap to clone and to keep its
    /// size to one word.
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// This is useful for implementations of [`ZoneRules`](crate::tz::ZoneRules)
    /// or [`Clock`](crate::Clock) outside of this crate that need to report
    /// their own failures.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when this error was caused by malformed text.
    ///
    /// This returns true for any error that occurred while parsing, even
    /// when the root cause is something else, like an invalid field or an
    /// unknown time zone.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::CivilDateTime;
    ///
    /// assert!("2025-01-20X10:00:00".parse::<CivilDateTime>().unwrap_err().is_parse());
    /// assert!("2025-02-30T10:00:00".parse::<CivilDateTime>().unwrap_err().is_parse());
    /// ```
    pub fn is_parse(&self) -> bool {
        use self::ErrorKind::*;

        self.chain().any(|err| {
            matches!(*err.kind(), FmtTemporal(_) | ParseInt(_) | TzPosix(_))
        })
    }

    /// Returns true when the root cause of this error is a combination of
    /// calendar or clock fields that is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::CivilDateTime;
    ///
    /// let err = CivilDateTime::new(2025, 2, 30, 0, 0, 0, 0).unwrap_err();
    /// assert!(err.is_invalid_field());
    /// ```
    pub fn is_invalid_field(&self) -> bool {
        use self::{civil::Error as CivilError, ErrorKind::*};

        matches!(
            *self.root().kind(),
            Civil(
                CivilError::InvalidField { .. }
                    | CivilError::InvalidDay { .. }
            )
        )
    }

    /// Returns true when the root cause of this error is an offset that is
    /// not valid for a civil datetime in a particular time zone.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::datetime, tz::{self, UtcOffset}, ZonedDateTime};
    ///
    /// let vienna = tz::db().get("Europe/Vienna")?;
    /// let dt = datetime(2025, 1, 20, 10, 0, 1, 123_456_789);
    /// let err = ZonedDateTime::from_strict(dt, UtcOffset::constant(7), &vienna)
    ///     .unwrap_err();
    /// assert!(err.is_zone_offset_mismatch());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn is_zone_offset_mismatch(&self) -> bool {
        use self::{tz::offset::Error as OffsetError, ErrorKind::*};

        matches!(
            *self.root().kind(),
            TzOffset(
                OffsetError::MismatchUnambiguous { .. }
                    | OffsetError::MismatchGap { .. }
                    | OffsetError::MismatchFold { .. }
            )
        )
    }

    /// Returns true when the root cause of this error is a time zone name
    /// that could not be found.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::tz;
    ///
    /// assert!(tz::db().get("Mars/Olympus_Mons").unwrap_err().is_unknown_zone());
    /// ```
    pub fn is_unknown_zone(&self) -> bool {
        matches!(
            *self.root().kind(),
            ErrorKind::TzDb(self::tz::db::Error::UnknownZone { .. })
        )
    }

    /// Returns true when the root cause of this error is a value that is
    /// out of the range supported by this crate.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::Instant;
    ///
    /// assert!(Instant::from_epoch_second(i64::MAX, 0).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Range(_))
    }
}

impl Error {
    /// Reports that the `given` value of the parameter named `what` is not in
    /// `min..=max`.
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError::new(what, given, min, max)))
    }

    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    /// Makes `self` the cause of `consequent`.
    ///
    /// The consequent is nearly always freshly created and so owned
    /// uniquely. Otherwise, its message is copied into a new link.
    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner.map(Arc::try_unwrap) {
            None => ErrorKind::Unknown,
            Some(Ok(ErrorInner { kind, cause })) => {
                debug_assert!(cause.is_none(), "consequent already has a cause");
                kind
            }
            Some(Err(shared)) => {
                let shared = Error { inner: Some(shared) };
                ErrorKind::Adhoc(AdhocError::from_args(format_args!("{shared}")))
            }
        };
        Error { inner: Some(Arc::new(ErrorInner { kind, cause: Some(self) })) }
    }

    /// Returns the last link in this chain.
    fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = err.inner.as_ref().and_then(|i| i.cause.as_ref()) {
            err = cause;
        }
        err
    }

    /// Iterates over this error followed by each of its causes, outermost
    /// first.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            return core::fmt::Display::fmt(self, f);
        }
        let Some(ref inner) = self.inner else {
            return f.debug_struct("Error").field("kind", &"None").finish();
        };
        f.debug_struct("Error")
            .field("kind", &inner.kind)
            .field("cause", &inner.cause)
            .finish()
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Civil(self::civil::Error),
    FmtTemporal(self::fmt::temporal::Error),
    ParseInt(self::util::ParseIntError),
    Range(RangeError),
    TzDb(self::tz::db::Error),
    TzOffset(self::tz::offset::Error),
    TzPosix(self::tz::posix::Error),
    TzZone(self::tz::zone::Error),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => msg.fmt(f),
            Civil(ref err) => err.fmt(f),
            FmtTemporal(ref err) => err.fmt(f),
            ParseInt(ref err) => err.fmt(f),
            Range(ref err) => err.fmt(f),
            TzDb(ref err) => err.fmt(f),
            TzOffset(ref err) => err.fmt(f),
            TzPosix(ref err) => err.fmt(f),
            TzZone(ref err) => err.fmt(f),
            Unknown => f.write_str("unknown tempora error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Some(Arc::new(ErrorInner { kind, cause: None })) }
    }
}

/// A generic error message.
///
/// This backs the public `Error::from_args` constructor and the internal
/// `err!` macro.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args<'a>(message: core::fmt::Arguments<'a>) -> AdhocError {
        use alloc::string::ToString;

        AdhocError { message: message.to_string().into_boxed_str() }
    }
}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// An error that occurs when an input value is out of bounds.
///
/// The error message produced by this type will include a name describing
/// which input was out of bounds, the value given and its minimum and maximum
/// allowed values.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i128,
    min: i128,
    max: i128,
}

impl RangeError {
    fn new(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> RangeError {
        RangeError {
            what,
            given: given.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

/// Converts a module level error into an [`Error`] without a public `From`
/// impl.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// Wraps the error of a `Result` in a higher level error.
pub(crate) trait ErrorContext<T, E> {
    /// Returns `consequent` caused by the error in `self`, if any.
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but only builds the consequent on failure.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T, E> for Result<T, E>
where
    E: IntoError,
{
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| {
            err.into_error().context_impl(consequent.into_error())
        })
    }

    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| {
            err.into_error().context_impl(consequent().into_error())
        })
    }
}
