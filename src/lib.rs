/*!
Tempora is a datetime library with four distinct representations of a point
in time and well defined conversions between them.

* [`CivilDateTime`] is a calendar date and a wall clock time, with no time
zone. It is what a person reads off of a calendar and a clock.
* [`Instant`] is a precise point on the UTC timeline, with nanosecond
precision.
* [`OffsetDateTime`] is a civil datetime paired with a fixed [`UtcOffset`].
It identifies an instant, but knows nothing about the time zone it came from.
* [`ZonedDateTime`] is a civil datetime paired with a time zone
([`tz::ZoneId`]) and the offset that the time zone uses at that civil
datetime.

The hard part is going from a civil datetime to a zoned datetime. Time zones
with daylight saving time have civil datetimes that never happen (a *gap*,
when clocks jump forward) and civil datetimes that happen twice (a *fold*,
when clocks jump back). This crate provides separate operations for the
different ways of dealing with that:

* [`ZonedDateTime::from_local`] never fails. A civil datetime in a gap is
moved forward by the length of the gap. A civil datetime in a fold uses the
preferred offset when it's one of the two candidates, and the earlier
occurrence otherwise.
* [`ZonedDateTime::from_strict`] requires the caller to provide an offset
that the time zone permits for the civil datetime, and fails otherwise.
* [`ZonedDateTime::from_instant`] is never ambiguous, since an instant
identifies exactly one offset in any time zone.
* [`ZonedDateTime::from_local_at_offset`] computes the instant identified by
a civil datetime and an offset, then re-expresses it in a time zone.

# Example

```
use tempora::{civil::datetime, tz::{self, UtcOffset}, ZonedDateTime};

let vienna = tz::db().get("Europe/Vienna")?;

// Clocks in Vienna jumped from 02:00 to 03:00 on 2025-03-30.
let zdt = ZonedDateTime::from_local(datetime(2025, 3, 30, 2, 30, 0, 0), &vienna, None);
assert_eq!(zdt.to_string(), "2025-03-30T03:30:00+02:00[Europe/Vienna]");

// Clocks in Vienna jumped from 03:00 back to 02:00 on 2025-10-26.
let dt = datetime(2025, 10, 26, 2, 30, 0, 0);
let first = ZonedDateTime::from_local(dt, &vienna, None);
let second = ZonedDateTime::from_local(dt, &vienna, Some(UtcOffset::constant(1)));
assert_eq!(first.to_string(), "2025-10-26T02:30:00+02:00[Europe/Vienna]");
assert_eq!(second.to_string(), "2025-10-26T02:30:00+01:00[Europe/Vienna]");
assert!(first < second);

// Every type parses from and prints to an ISO 8601 based format.
let zdt: ZonedDateTime = "2025-01-20T10:00:01.123456789+01:00[Europe/Vienna]".parse()?;
assert_eq!(zdt.to_instant()?.to_string(), "2025-01-20T09:00:01.123456789Z");

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Time zones

Time zone rules are an external collaborator, described by the
[`tz::ZoneRules`] trait. This crate includes a small database of POSIX TZ
rules for well known IANA time zone names, available through [`tz::db`],
and callers can add their own zones with [`tz::ZoneDatabase::with_zone`].
The bundled rules are the current rules of each time zone, applied to all of
history.

# The current time

There is no process-wide default time zone. Operations that need the current
time, like [`ZonedDateTime::now`], take a [`Config`] carrying a default time
zone and a [`Clock`]. Tests can use a [`FixedClock`] to make those operations
deterministic.

# Crate features

* **std** (enabled by default) - Enables the system clock, detection of the
default time zone from the environment and the global time zone database.
Without it, this crate is `no_std` but still requires `alloc`.
* **logging** - Emits log messages through the [`log`] crate for things like
time zone detection and gap resolution.
* **serde** - Implements `Serialize` and `Deserialize` for every datetime
type, and enables the helpers in [`fmt::serde`].

[`log`]: https://docs.rs/log
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
// This adds Cargo feature annotations to items in the rustdoc output.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

// Errors and time zones allocate, so `alloc` is required even without `std`.
extern crate alloc;

pub use crate::{
    civil::CivilDateTime,
    config::{Clock, Config, FixedClock},
    error::Error,
    instant::Instant,
    offset_datetime::OffsetDateTime,
    tz::UtcOffset,
    zoned::ZonedDateTime,
};

#[cfg(feature = "std")]
pub use crate::config::SystemClock;

#[macro_use]
mod logging;
#[macro_use]
mod error;

pub mod civil;
mod config;
pub mod fmt;
mod instant;
mod offset_datetime;
pub mod tz;
mod util;
mod zoned;
