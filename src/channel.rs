//! Servo channels: calibration, identity, and the hardware output they drive.
//!
//! A [`ServoChannel`] pairs a [`ServoCalibration`] with anything that implements
//! [`ServoOutput`], which is `embedded_hal`'s [`SetDutyCycle`] plus a way to release the pin.
//! On the Pico this is [`PicoPwmOutput`](crate::pico_pwm::PicoPwmOutput); host tests use
//! [`MockOutput`](crate::mock::MockOutput).

use derive_more::Display;
use embedded_hal::pwm::SetDutyCycle;

use crate::duty::{PulseDuty, convert};
use crate::logging::log_trace;
use crate::{Error, Result};

/// Default servo PWM frequency (Hz), giving a 20 ms frame.
pub const SERVO_FREQUENCY_HZ_DEFAULT: u32 = 50;

/// Default minimum pulse width for hobby servos (microseconds).
pub const SERVO_MIN_US_DEFAULT: u16 = 500;

/// Default maximum pulse width for hobby servos (microseconds).
pub const SERVO_MAX_US_DEFAULT: u16 = 2_500;

const MICROS_PER_SECOND: u32 = 1_000_000;

/// GPIO pin number a servo's signal wire is attached to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
#[display("GP{_0}")]
pub struct ChannelId(pub u8);

/// Per-servo calibration: PWM frequency and the pulse widths for 0° and 180°.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct ServoCalibration {
    frequency_hz: u32,
    min_us: u16,
    max_us: u16,
}

impl ServoCalibration {
    /// 50 Hz, 500 µs at 0°, 2500 µs at 180°.
    pub const DEFAULT: Self = Self::new(
        SERVO_FREQUENCY_HZ_DEFAULT,
        SERVO_MIN_US_DEFAULT,
        SERVO_MAX_US_DEFAULT,
    );

    /// Create a calibration.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in `const` contexts) if `frequency_hz` is zero, if
    /// `min_us >= max_us`, or if `max_us` does not fit in one PWM period.
    #[must_use]
    pub const fn new(frequency_hz: u32, min_us: u16, max_us: u16) -> Self {
        assert!(frequency_hz > 0, "frequency_hz must be positive");
        assert!(min_us < max_us, "min_us must be less than max_us");
        assert!(
            max_us as u32 <= MICROS_PER_SECOND / frequency_hz,
            "max_us must fit in the PWM period"
        );
        Self {
            frequency_hz,
            min_us,
            max_us,
        }
    }

    /// PWM frequency in Hz.
    #[must_use]
    pub const fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Pulse width commanding 0° (microseconds).
    #[must_use]
    pub const fn min_us(&self) -> u16 {
        self.min_us
    }

    /// Pulse width commanding 180° (microseconds).
    #[must_use]
    pub const fn max_us(&self) -> u16 {
        self.max_us
    }

    /// Length of one PWM period in whole microseconds (truncating).
    #[must_use]
    pub const fn period_us(&self) -> u32 {
        MICROS_PER_SECOND / self.frequency_hz
    }
}

impl Default for ServoCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A PWM output that can drive one servo.
///
/// Duty cycles are written through [`SetDutyCycle::set_duty_cycle_fraction`] with a
/// denominator of `u16::MAX`, so implementations may use any counter resolution.
pub trait ServoOutput: SetDutyCycle {
    /// Stop driving the servo and give the pin back to an idle state.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the output could not be released.
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// One servo: where it is wired, how it is calibrated, and the output driving it.
pub struct ServoChannel<O> {
    id: ChannelId,
    calibration: ServoCalibration,
    output: O,
}

impl<O: ServoOutput> ServoChannel<O> {
    /// Create a servo channel.
    #[must_use]
    pub const fn new(id: ChannelId, calibration: ServoCalibration, output: O) -> Self {
        Self {
            id,
            calibration,
            output,
        }
    }

    /// Where this servo is wired.
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Command the servo to `degrees` (clamped to 0..=180).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DutyWrite`] if the PWM driver rejects the duty cycle.
    pub fn write_degrees(&mut self, degrees: u16) -> Result<PulseDuty> {
        let pulse_duty = convert(i32::from(degrees), &self.calibration);
        log_trace!(
            "{} angle {} pulse {}us duty {}",
            self.id,
            degrees,
            pulse_duty.pulse_us,
            pulse_duty.duty
        );
        self.output
            .set_duty_cycle_fraction(pulse_duty.duty, u16::MAX)
            .map_err(|_| Error::DutyWrite { channel: self.id })?;
        Ok(pulse_duty)
    }

    /// Release the underlying output.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the output could not be released.
    pub fn release(&mut self) -> Result<(), O::Error> {
        self.output.release()
    }
}
