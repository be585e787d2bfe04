use alloc::sync::Arc;

use crate::{instant::Instant, tz::ZoneId};

/// A source of the current time.
///
/// Every operation in this crate that needs the current time asks a clock
/// through a [`Config`]. Tests can use a [`FixedClock`] to make those
/// operations deterministic.
pub trait Clock: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// A clock that reads the system's wall clock.
///
/// # Panics
///
/// Reading this clock panics if the system reports a time outside the
/// range supported by [`Instant`]. This can only happen when the system
/// clock is set thousands of years away from the present.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that is stopped at a particular instant.
///
/// # Example
///
/// ```
/// use tempora::{Clock, FixedClock, Instant};
///
/// let clock = FixedClock::new(Instant::UNIX_EPOCH);
/// assert_eq!(clock.now(), Instant::UNIX_EPOCH);
/// assert_eq!(clock.now(), Instant::UNIX_EPOCH);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FixedClock {
    instant: Instant,
}

impl FixedClock {
    /// Creates a clock that always reports the given instant.
    pub const fn new(instant: Instant) -> FixedClock {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.instant
    }
}

/// The default time zone and clock used to answer "what time is it now?"
///
/// This crate has no process-wide default time zone. Operations like
/// [`ZonedDateTime::now`](crate::ZonedDateTime::now) take a configuration
/// instead, which makes the time zone and the clock they use explicit and
/// easy to replace in tests.
///
/// A `Config` is cheap to clone.
///
/// # Example
///
/// ```
/// use tempora::{civil::datetime, tz, CivilDateTime, Config, FixedClock, Instant};
///
/// let clock = FixedClock::new(Instant::from_epoch_second(1_737_367_201, 0)?);
/// let config = Config::new(tz::db().get("Europe/Vienna")?, clock);
/// assert_eq!(CivilDateTime::now(&config), datetime(2025, 1, 20, 11, 0, 1, 0));
///
/// let config = config.with_default_zone(tz::db().get("Asia/Kolkata")?);
/// assert_eq!(CivilDateTime::now(&config), datetime(2025, 1, 20, 15, 30, 1, 0));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    zone: ZoneId,
    clock: Arc<dyn Clock>,
}

impl Config {
    /// Creates a configuration with the given default time zone and clock.
    pub fn new(zone: ZoneId, clock: impl Clock) -> Config {
        Config { zone, clock: Arc::new(clock) }
    }

    /// Creates a configuration with the given default time zone and the
    /// system clock.
    #[cfg(feature = "std")]
    pub fn system(zone: ZoneId) -> Config {
        Config::new(zone, SystemClock)
    }

    /// Creates a configuration using the system clock and the time zone
    /// detected from the environment.
    ///
    /// The time zone comes from the `TZ` environment variable when it is
    /// set, and from `/etc/localtime` on Unix otherwise. Names are looked up
    /// in the global database returned by [`tz::db`](crate::tz::db). When
    /// `TZ` is neither a known name nor a valid POSIX TZ rule, or when
    /// nothing can be detected, the default time zone is `UTC`.
    ///
    /// Detection happens every time this is called. Callers should build a
    /// configuration once and pass it around.
    #[cfg(feature = "std")]
    pub fn from_env() -> Config {
        let zone = crate::tz::system::detect(crate::tz::db());
        debug!("detected default time zone {zone}");
        Config::system(zone)
    }

    /// Returns a copy of this configuration with a different default time
    /// zone.
    pub fn with_default_zone(&self, zone: ZoneId) -> Config {
        Config { zone, clock: Arc::clone(&self.clock) }
    }

    /// Returns a copy of this configuration with a different clock.
    pub fn with_clock(&self, clock: impl Clock) -> Config {
        Config { zone: self.zone.clone(), clock: Arc::new(clock) }
    }

    /// Returns the default time zone of this configuration.
    pub fn default_zone(&self) -> &ZoneId {
        &self.zone
    }

    /// Returns the clock of this configuration.
    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Reads the clock of this configuration.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }
}
