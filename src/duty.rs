//! Angle to PWM duty-cycle conversion.
//!
//! See [`convert`].

use crate::channel::ServoCalibration;

/// Largest commandable angle in degrees. Inputs above this are clamped.
pub const MAX_DEGREES: u16 = 180;

/// Pulse width and the 16-bit duty cycle that produces it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct PulseDuty {
    /// High time per period in whole microseconds (truncated).
    pub pulse_us: u16,
    /// Fraction of the period spent high, scaled so `u16::MAX` is always-high.
    pub duty: u16,
}

/// Convert an angle to a pulse width and duty cycle.
///
/// The angle is clamped to `0..=180` first; out-of-range input is not an error. The pulse
/// width is interpolated linearly between the calibration's `min_us` and `max_us` in
/// floating point. The duty is `floor(pulse / period_us * 65535)` computed from the
/// untruncated pulse, saturating at `u16::MAX`.
///
/// # Example
///
/// ```rust
/// use servo_choreo::channel::ServoCalibration;
/// use servo_choreo::duty::convert;
///
/// let pulse_duty = convert(90, &ServoCalibration::new(50, 500, 2_500));
/// assert_eq!(pulse_duty.pulse_us, 1_500);
/// assert_eq!(pulse_duty.duty, 4_915);
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to int casts saturate; both values are non-negative and bounded"
)]
pub fn convert(angle: i32, calibration: &ServoCalibration) -> PulseDuty {
    let angle = angle.clamp(0, i32::from(MAX_DEGREES));
    let min_us = f64::from(calibration.min_us());
    let span_us = f64::from(calibration.max_us()) - min_us;
    let pulse = min_us + (f64::from(angle) / f64::from(MAX_DEGREES)) * span_us;
    let duty = pulse / f64::from(calibration.period_us()) * f64::from(u16::MAX);
    PulseDuty {
        pulse_us: pulse as u16,
        duty: duty as u16,
    }
}
