//! Recording servo outputs and delays for host tests.
//!
//! Every [`MockOutput`] and [`MockDelay`] created from the same [`Journal`] appends to it,
//! so tests can check the exact interleaving of duty writes, releases, and sleeps.

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;

use crate::channel::{ChannelId, ServoCalibration, ServoChannel, ServoOutput};
use crate::rig::ServoRig;

/// One call made on a mock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MockEvent {
    /// A duty cycle was written (scaled so `u16::MAX` is always-high).
    Duty {
        /// Channel written.
        channel: ChannelId,
        /// Duty written.
        duty: u16,
    },
    /// A release was attempted, whether or not it succeeded.
    Release {
        /// Channel released.
        channel: ChannelId,
    },
    /// A delay ran to completion.
    Sleep {
        /// Length of the delay in microseconds.
        micros: u64,
    },
}

/// Shared, ordered log of [`MockEvent`]s.
#[derive(Clone, Debug, Default)]
pub struct Journal(Rc<RefCell<Vec<MockEvent>>>);

impl Journal {
    fn record(&self, event: MockEvent) {
        self.0.borrow_mut().push(event);
    }

    /// Every event so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<MockEvent> {
        self.0.borrow().clone()
    }

    /// Duty writes so far, in order.
    #[must_use]
    pub fn duties(&self) -> Vec<(ChannelId, u16)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Duty { channel, duty } => Some((channel, duty)),
                MockEvent::Release { .. } | MockEvent::Sleep { .. } => None,
            })
            .collect()
    }

    /// Release attempts so far, in order.
    #[must_use]
    pub fn releases(&self) -> Vec<ChannelId> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Release { channel } => Some(channel),
                MockEvent::Duty { .. } | MockEvent::Sleep { .. } => None,
            })
            .collect()
    }

    /// Completed sleeps so far, in microseconds.
    #[must_use]
    pub fn sleeps(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Sleep { micros } => Some(micros),
                MockEvent::Duty { .. } | MockEvent::Release { .. } => None,
            })
            .collect()
    }
}

/// Error returned by a [`MockOutput`] configured to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MockPwmError;

impl embedded_hal::pwm::Error for MockPwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A [`ServoOutput`] that records to a [`Journal`] instead of driving a pin.
///
/// Its full-scale duty is `u16::MAX`, so recorded duties equal the converted duties.
#[derive(Debug)]
pub struct MockOutput {
    channel: ChannelId,
    journal: Journal,
    fail_writes: bool,
    fail_release: bool,
}

impl MockOutput {
    /// Create a mock output for `channel`.
    #[must_use]
    pub fn new(channel: ChannelId, journal: &Journal) -> Self {
        Self {
            channel,
            journal: journal.clone(),
            fail_writes: false,
            fail_release: false,
        }
    }

    /// Make every duty write fail (nothing is recorded).
    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make release fail (the attempt is still recorded).
    #[must_use]
    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }
}

impl ErrorType for MockOutput {
    type Error = MockPwmError;
}

impl SetDutyCycle for MockOutput {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockPwmError);
        }
        self.journal.record(MockEvent::Duty {
            channel: self.channel,
            duty,
        });
        Ok(())
    }
}

impl ServoOutput for MockOutput {
    fn release(&mut self) -> Result<(), Self::Error> {
        self.journal.record(MockEvent::Release {
            channel: self.channel,
        });
        if self.fail_release {
            return Err(MockPwmError);
        }
        Ok(())
    }
}

/// A rig of `N` mock servos on channels `GP0..GP{N-1}` with the default calibration.
///
/// # Panics
///
/// Panics if `N` exceeds 256.
#[must_use]
pub fn mock_rig<const N: usize>(journal: &Journal) -> ServoRig<MockOutput, N> {
    ServoRig::new(core::array::from_fn(|index| {
        let channel = ChannelId(u8::try_from(index).expect("mock rigs have at most 256 servos"));
        ServoChannel::new(
            channel,
            ServoCalibration::DEFAULT,
            MockOutput::new(channel, journal),
        )
    }))
}

/// A [`DelayNs`] that returns immediately and records each delay to a [`Journal`].
///
/// It can also raise a stop signal after a given number of delays, to exercise
/// interruption.
pub struct MockDelay<'a> {
    journal: Journal,
    completed: usize,
    raise_stop: Option<(usize, &'a Signal<NoopRawMutex, ()>)>,
}

impl<'a> MockDelay<'a> {
    /// Create a mock delay.
    #[must_use]
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            completed: 0,
            raise_stop: None,
        }
    }

    /// Raise `stop` as the `count`-th delay completes.
    #[must_use]
    pub fn raising_stop_after(
        mut self,
        count: usize,
        stop: &'a Signal<NoopRawMutex, ()>,
    ) -> Self {
        self.raise_stop = Some((count, stop));
        self
    }

    fn record(&mut self, micros: u64) {
        self.journal.record(MockEvent::Sleep { micros });
        self.completed = self.completed.saturating_add(1);
        if let Some((count, stop)) = self.raise_stop {
            if count == self.completed {
                stop.signal(());
            }
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns) / 1_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000));
    }
}
