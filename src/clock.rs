/// Monotonic time source used to decide whether a cached measurement is still fresh
/// and to time the bus transactions.
///
/// embedded-hal has no notion of "now", so the platform supplies one.  The origin is
/// arbitrary; only differences between two readings are used.  The value must never go
/// backwards.
pub trait Clock {
    /// Microseconds elapsed since some fixed origin
    fn now_us(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// [`Clock`] backed by [`std::time::Instant`], counting from its creation
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
