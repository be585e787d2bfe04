/*!
Provides convenience routines for escaping raw bytes in error messages.
*/

/// Provides a convenient `Display` implementation for a `u8`.
///
/// The byte is treated as ASCII. If it isn't printable ASCII, then it's
/// emitted as an escape sequence.
#[derive(Clone, Copy)]
pub(crate) struct Byte(pub(crate) u8);

impl core::fmt::Display for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == b' ' {
            return f.write_str(" ");
        }
        use core::fmt::Write;

        for (i, mut b) in core::ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            if i >= 2 {
                b = b.to_ascii_uppercase();
            }
            f.write_char(char::from(b))?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// Provides a convenient `Debug` implementation for `&[u8]`.
///
/// Valid UTF-8 is emitted as is (modulo the usual escaping of control
/// characters), while every byte that isn't part of valid UTF-8 is emitted as
/// a hex escape sequence.
pub(crate) struct Bytes<'a>(pub(crate) &'a [u8]);

impl<'a> core::fmt::Display for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut bytes = self.0;
        while !bytes.is_empty() {
            let (valid, rest) = match core::str::from_utf8(bytes) {
                Ok(valid) => (valid, &[][..]),
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    // OK because `valid_up_to` guarantees this prefix is
                    // valid UTF-8.
                    (core::str::from_utf8(valid).unwrap(), rest)
                }
            };
            for ch in valid.chars() {
                write!(f, "{}", ch.escape_debug())?;
            }
            if let Some((&byte, rest)) = rest.split_first() {
                write!(f, r"\x{byte:02x}")?;
                bytes = rest;
            } else {
                bytes = rest;
            }
        }
        Ok(())
    }
}

impl<'a> core::fmt::Debug for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
