/*!
This module provides helpers to use with [Serde].

With the `serde` feature enabled, every datetime type in this crate
implements `Serialize` and `Deserialize` using its text format. This module
adds helpers, exposed as modules meant to be used with Serde's
[`with` attribute], for (de)serializing an [`Instant`](crate::Instant) as an
integer number of seconds or milliseconds since the Unix epoch.

# Module hierarchy

Only the leaves of the tree are usable with Serde's `with` attribute.

* [`instant`]
    * [`second`](self::instant::second)
        * [`tempora::fmt::serde::instant::second::required`](self::instant::second::required)
        * [`tempora::fmt::serde::instant::second::optional`](self::instant::second::optional)
    * [`millisecond`](self::instant::millisecond)
        * [`tempora::fmt::serde::instant::millisecond::required`](self::instant::millisecond::required)
        * [`tempora::fmt::serde::instant::millisecond::optional`](self::instant::millisecond::optional)

These helpers exist to talk to APIs that transmit times as integers. The
subsecond part of an instant is truncated when serializing to seconds, and
truncated to whole milliseconds when serializing to milliseconds.

# Example

```
use tempora::Instant;

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct Record {
    #[serde(with = "tempora::fmt::serde::instant::second::required")]
    created: Instant,
    #[serde(with = "tempora::fmt::serde::instant::millisecond::optional")]
    updated: Option<Instant>,
}

let json = r#"{"created":1737367201,"updated":1737367201123}"#;
let got: Record = serde_json::from_str(&json)?;
assert_eq!(got.created, Instant::from_epoch_second(1_737_367_201, 0)?);
assert_eq!(got.updated, Some(Instant::from_epoch_millisecond(1_737_367_201_123)?));
assert_eq!(serde_json::to_string(&got)?, json);

# Ok::<(), Box<dyn std::error::Error>>(())
```

[Serde]: https://serde.rs/
[`with` attribute]: https://serde.rs/field-attrs.html#with
*/

use core::{fmt::Display, marker::PhantomData, str::FromStr};

use serde::de;

/// A visitor that deserializes a string with a type's `FromStr`
/// implementation.
///
/// Every `Deserialize` implementation in this crate uses this.
pub(crate) struct FromStrVisitor<T> {
    expecting: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> FromStrVisitor<T> {
    pub(crate) fn new(expecting: &'static str) -> FromStrVisitor<T> {
        FromStrVisitor { expecting, _type: PhantomData }
    }
}

impl<'de, T> de::Visitor<'de> for FromStrVisitor<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Value = T;

    fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.expecting)
    }

    #[inline]
    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        value.parse().map_err(de::Error::custom)
    }

    #[inline]
    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<T, E> {
        let value = core::str::from_utf8(value).map_err(de::Error::custom)?;
        self.visit_str(value)
    }
}

/// Convenience routines for (de)serializing [`Instant`](crate::Instant) as
/// raw integer values.
pub mod instant {
    use serde::de;

    /// A generic visitor for `Option<Instant>`.
    struct OptionalVisitor<V>(V);

    impl<'de, V: de::Visitor<'de, Value = crate::Instant>> de::Visitor<'de>
        for OptionalVisitor<V>
    {
        type Value = Option<crate::Instant>;

        fn expecting(
            &self,
            f: &mut core::fmt::Formatter,
        ) -> core::fmt::Result {
            f.write_str("an integer offset from the Unix epoch or `None`")
        }

        #[inline]
        fn visit_some<D: de::Deserializer<'de>>(
            self,
            de: D,
        ) -> Result<Option<crate::Instant>, D::Error> {
            de.deserialize_i64(self.0).map(Some)
        }

        #[inline]
        fn visit_none<E: de::Error>(self) -> Result<Option<crate::Instant>, E> {
            Ok(None)
        }
    }

    /// Converts an unsigned integer to `i64`, reporting the unit in the error
    /// when it doesn't fit.
    fn to_i64<E: de::Error>(
        v: impl TryInto<i64> + core::fmt::Display + Copy,
        unit: &'static str,
    ) -> Result<i64, E> {
        v.try_into().map_err(|_| {
            de::Error::custom(alloc::format!(
                "got integer {v} {unit}, \
                 which is too big to fit in an `Instant`",
            ))
        })
    }

    /// (De)serialize an integer number of seconds from the Unix epoch.
    pub mod second {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = crate::Instant;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("an integer number of seconds from the Unix epoch")
            }

            #[inline]
            fn visit_i64<E: de::Error>(
                self,
                v: i64,
            ) -> Result<crate::Instant, E> {
                crate::Instant::from_epoch_second(v, 0)
                    .map_err(de::Error::custom)
            }

            #[inline]
            fn visit_u64<E: de::Error>(
                self,
                v: u64,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "seconds")?)
            }

            #[inline]
            fn visit_i128<E: de::Error>(
                self,
                v: i128,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "seconds")?)
            }

            #[inline]
            fn visit_u128<E: de::Error>(
                self,
                v: u128,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "seconds")?)
            }
        }

        /// (De)serialize a required integer number of seconds from the Unix
        /// epoch.
        pub mod required {
            /// Serialize a required integer number of seconds since the Unix
            /// epoch.
            #[inline]
            pub fn serialize<S: serde::Serializer>(
                instant: &crate::Instant,
                se: S,
            ) -> Result<S::Ok, S::Error> {
                se.serialize_i64(instant.epoch_second())
            }

            /// Deserialize a required integer number of seconds since the
            /// Unix epoch.
            #[inline]
            pub fn deserialize<'de, D: serde::Deserializer<'de>>(
                de: D,
            ) -> Result<crate::Instant, D::Error> {
                de.deserialize_i64(super::Visitor)
            }
        }

        /// (De)serialize an optional integer number of seconds from the Unix
        /// epoch.
        pub mod optional {
            /// Serialize an optional integer number of seconds since the Unix
            /// epoch.
            #[inline]
            pub fn serialize<S: serde::Serializer>(
                instant: &Option<crate::Instant>,
                se: S,
            ) -> Result<S::Ok, S::Error> {
                match *instant {
                    None => se.serialize_none(),
                    Some(instant) => se.serialize_i64(instant.epoch_second()),
                }
            }

            /// Deserialize an optional integer number of seconds since the
            /// Unix epoch.
            #[inline]
            pub fn deserialize<'de, D: serde::Deserializer<'de>>(
                de: D,
            ) -> Result<Option<crate::Instant>, D::Error> {
                de.deserialize_option(super::super::OptionalVisitor(
                    super::Visitor,
                ))
            }
        }
    }

    /// (De)serialize an integer number of milliseconds from the Unix epoch.
    pub mod millisecond {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = crate::Instant;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str(
                    "an integer number of milliseconds from the Unix epoch",
                )
            }

            #[inline]
            fn visit_i64<E: de::Error>(
                self,
                v: i64,
            ) -> Result<crate::Instant, E> {
                crate::Instant::from_epoch_millisecond(v)
                    .map_err(de::Error::custom)
            }

            #[inline]
            fn visit_u64<E: de::Error>(
                self,
                v: u64,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "milliseconds")?)
            }

            #[inline]
            fn visit_i128<E: de::Error>(
                self,
                v: i128,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "milliseconds")?)
            }

            #[inline]
            fn visit_u128<E: de::Error>(
                self,
                v: u128,
            ) -> Result<crate::Instant, E> {
                self.visit_i64(super::to_i64(v, "milliseconds")?)
            }
        }

        /// (De)serialize a required integer number of milliseconds from the
        /// Unix epoch.
        pub mod required {
            /// Serialize a required integer number of milliseconds since the
            /// Unix epoch.
            #[inline]
            pub fn serialize<S: serde::Serializer>(
                instant: &crate::Instant,
                se: S,
            ) -> Result<S::Ok, S::Error> {
                se.serialize_i64(instant.epoch_millisecond())
            }

            /// Deserialize a required integer number of milliseconds since
            /// the Unix epoch.
            #[inline]
            pub fn deserialize<'de, D: serde::Deserializer<'de>>(
                de: D,
            ) -> Result<crate::Instant, D::Error> {
                de.deserialize_i64(super::Visitor)
            }
        }

        /// (De)serialize an optional integer number of milliseconds from the
        /// Unix epoch.
        pub mod optional {
            /// Serialize an optional integer number of milliseconds since the
            /// Unix epoch.
            #[inline]
            pub fn serialize<S: serde::Serializer>(
                instant: &Option<crate::Instant>,
                se: S,
            ) -> Result<S::Ok, S::Error> {
                match *instant {
                    None => se.serialize_none(),
                    Some(instant) => {
                        se.serialize_i64(instant.epoch_millisecond())
                    }
                }
            }

            /// Deserialize an optional integer number of milliseconds since
            /// the Unix epoch.
            #[inline]
            pub fn deserialize<'de, D: serde::Deserializer<'de>>(
                de: D,
            ) -> Result<Option<crate::Instant>, D::Error> {
                de.deserialize_option(super::super::OptionalVisitor(
                    super::Visitor,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{Instant, OffsetDateTime, ZonedDateTime};

    #[test]
    fn instant_as_integers() {
        #[derive(Debug, serde::Deserialize, serde::Serialize)]
        struct Record {
            #[serde(with = "crate::fmt::serde::instant::second::required")]
            second: Instant,
            #[serde(with = "crate::fmt::serde::instant::millisecond::optional")]
            millis: Option<Instant>,
        }

        let got: Record =
            serde_json::from_str(r#"{"second":-1,"millis":null}"#).unwrap();
        assert_eq!(got.second, Instant::from_epoch_second(-1, 0).unwrap());
        assert_eq!(got.millis, None);

        let got: Record =
            serde_json::from_str(r#"{"second":0,"millis":-1}"#).unwrap();
        assert_eq!(got.millis, Some(Instant::from_epoch_millisecond(-1).unwrap()));
        assert_eq!(
            serde_json::to_string(&got).unwrap(),
            r#"{"second":0,"millis":-1}"#,
        );

        let err = serde_json::from_str::<Record>(
            r#"{"second":18446744073709551615,"millis":null}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("too big to fit in an `Instant`"));
    }

    #[test]
    fn values_as_strings() {
        let json = r#""2025-01-20T10:00:01.5+01:00[Europe/Vienna]""#;
        let zdt: ZonedDateTime = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&zdt).unwrap(), json);

        let odt: OffsetDateTime =
            serde_json::from_str(r#""2025-01-20T10:00:01-03:30""#).unwrap();
        assert_eq!(odt.offset().seconds(), -12_600);

        let err = serde_json::from_str::<Instant>(r#""2025-01-20T10:00:01""#)
            .unwrap_err();
        assert!(err.to_string().contains("UTC offset"));
    }
}
