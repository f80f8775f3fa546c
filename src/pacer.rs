//! Interruptible sleeping between choreography ticks.
//!
//! See [`Pacer`].

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::logging::log_warn;
use crate::{Error, Result};

/// Sleeps for the choreography, giving up early when a stop is requested.
///
/// Sleeping is the only place a running choreography can be interrupted: a stop signalled
/// while servos are being written takes effect at the next sleep.
///
/// On the Pico, `D` is [`embassy_time::Delay`] and the stop signal is usually a `static`
/// raised from another task.
pub struct Pacer<'a, D, M: RawMutex> {
    delay: D,
    stop: &'a Signal<M, ()>,
}

impl<'a, D: DelayNs, M: RawMutex> Pacer<'a, D, M> {
    /// Create a pacer from a delay provider and a stop signal.
    #[must_use]
    pub const fn new(delay: D, stop: &'a Signal<M, ()>) -> Self {
        Self { delay, stop }
    }

    /// Sleep for `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] if the stop signal is (or becomes) raised before the
    /// duration elapses. The signal is consumed.
    pub async fn sleep(&mut self, duration: Duration) -> Result<()> {
        let Self { delay, stop } = self;
        let wait = async move {
            if let Ok(micros) = u32::try_from(duration.as_micros()) {
                delay.delay_us(micros).await;
            } else {
                let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
                delay.delay_ms(millis).await;
            }
        };

        // Stop is polled first so a pending request wins over a ready delay.
        match select(stop.wait(), wait).await {
            Either::First(()) => {
                log_warn!("stop requested during sleep");
                Err(Error::Interrupted)
            }
            Either::Second(()) => Ok(()),
        }
    }
}
