/*!
Parsing and printing of datetimes as text.

The text formats are described in the [`temporal`] module. Most callers never
need to use this module directly, since every datetime type implements
`FromStr` and `Display` in terms of it. It exists for configuring a parser or
printer, like parsing zoned datetimes leniently or with a different time
zone database.

With the `serde` feature enabled, the [`serde`] module provides helpers for
(de)serializing instants as integers.
*/

#[cfg(feature = "serde")]
pub mod serde;
pub mod temporal;

/// A value parsed from the front of some input, along with whatever input
/// follows it.
#[derive(Clone, Debug)]
pub(crate) struct Parsed<'i, V> {
    value: V,
    input: &'i [u8],
}

impl<'i, V> Parsed<'i, V> {
    /// Returns the value, or an error if any input is left over.
    #[inline]
    fn into_full(self) -> Result<V, crate::Error> {
        if self.input.is_empty() {
            return Ok(self.value);
        }
        Err(crate::error::fmt::temporal::Error::trailing_input(self.input)
            .into())
    }
}
