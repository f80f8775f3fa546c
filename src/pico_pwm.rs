//! [`ServoOutput`]s on RP2040/RP2350 PWM slices.
//!
//! A [`PicoPwmSlice`] clocks one PWM slice at ~1 MHz so one counter tick is one
//! microsecond, and the counter wraps once per servo period. Both channels of a slice
//! share that period, so a slice can carry two servos: one on its A pin and one on its
//! B pin. Calculate which slice a pin uses: `slice = (pin / 2) % 8` on Pico 1, with even
//! pins on channel A and odd pins on channel B. For example, PIN_0 and PIN_1 are channels
//! A and B of PWM_SLICE0.
//!
//! # Example
//!
//! ```rust,no_run
//! # #![no_std]
//! # #![no_main]
//! # use panic_probe as _;
//! use embassy_rp::pwm::{Config, Pwm};
//! use servo_choreo::channel::{ChannelId, ServoCalibration, ServoChannel};
//! use servo_choreo::pico_pwm::PicoPwmSlice;
//!
//! # fn example(p: embassy_rp::Peripherals) {
//! let calibration = ServoCalibration::DEFAULT;
//! let slice0 = PicoPwmSlice::new(
//!     Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, Config::default()),
//!     calibration.frequency_hz(),
//! );
//! let gp0 = ServoChannel::new(ChannelId(0), calibration, slice0.output_a());
//! let gp1 = ServoChannel::new(ChannelId(1), calibration, slice0.output_b());
//! # }
//! ```

use core::cell::RefCell;
use core::convert::Infallible;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use fixed::types::U12F4;

use crate::channel::ServoOutput;
use crate::logging::{log_debug, log_info};

const TICKS_PER_SECOND: u64 = 1_000_000;

/// One PWM slice configured for servo pulses, shared by its A and B outputs.
pub struct PicoPwmSlice<'d> {
    state: Mutex<CriticalSectionRawMutex, RefCell<SliceState<'d>>>,
    period_ticks: u16,
}

struct SliceState<'d> {
    pwm: Pwm<'d>,
    // The whole config is reapplied on every change; rebuilding it from
    // `Config::default()` would reset the divider.
    cfg: Config,
    // Channels handed out and not yet released, indexed by `PwmChannel`.
    live: [bool; 2],
}

#[derive(Debug, Clone, Copy)]
enum PwmChannel {
    A,
    B,
}

impl PwmChannel {
    const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl<'d> PicoPwmSlice<'d> {
    /// Configure the slice behind `pwm` for 1 µs ticks and one wrap per servo period.
    ///
    /// `pwm` may come from `Pwm::new_output_a`, `Pwm::new_output_b` or
    /// `Pwm::new_output_ab`. Both outputs start low until their first duty write.
    ///
    /// # Panics
    ///
    /// Panics if `frequency_hz` is zero or if one period does not fit the 16-bit
    /// counter (`frequency_hz` below 16).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "divider parts are clamped to their register widths"
    )]
    pub fn new(mut pwm: Pwm<'d>, frequency_hz: u32) -> Self {
        assert!(frequency_hz > 0, "frequency_hz must be positive");
        let period_us = 1_000_000 / frequency_hz;
        let Ok(period_ticks) = u16::try_from(period_us) else {
            panic!("servo period of {} us does not fit the 16-bit PWM counter", period_us);
        };

        let clk = u64::from(clk_sys_freq()); // Hz
        // Aim for tick ≈ 1 µs: divider = clk_sys / 1_000_000 (with /16 fractional)
        let mut div_int = (clk / TICKS_PER_SECOND).clamp(1, 255) as u16;
        let rem = clk.saturating_sub(u64::from(div_int) * TICKS_PER_SECOND);
        let mut div_frac = ((rem * 16 + TICKS_PER_SECOND / 2) / TICKS_PER_SECOND) as u16;
        if div_frac >= 16 {
            div_frac = 0;
            div_int = (div_int + 1).min(255);
        }

        let mut cfg = Config::default();
        cfg.top = period_ticks - 1; // 19999 -> 20_000 ticks/frame at 50 Hz
        cfg.phase_correct = false; // edge-aligned => exact 1 µs steps
        cfg.divider = U12F4::from_bits((div_int << 4) | div_frac);
        cfg.compare_a = 0;
        cfg.compare_b = 0;
        cfg.enable = true;
        pwm.set_config(&cfg);

        log_info!(
            "servo pwm clk={}Hz div={}.{}/16 top={}",
            clk,
            div_int,
            div_frac,
            cfg.top
        );

        Self {
            state: Mutex::new(RefCell::new(SliceState {
                pwm,
                cfg,
                live: [false; 2],
            })),
            period_ticks,
        }
    }

    /// The servo output on this slice's A pin.
    #[must_use]
    pub fn output_a(&self) -> PicoPwmOutput<'_, 'd> {
        self.output(PwmChannel::A)
    }

    /// The servo output on this slice's B pin.
    #[must_use]
    pub fn output_b(&self) -> PicoPwmOutput<'_, 'd> {
        self.output(PwmChannel::B)
    }

    fn output(&self, channel: PwmChannel) -> PicoPwmOutput<'_, 'd> {
        self.state.lock(|state| {
            if let Some(live) = state.borrow_mut().live.get_mut(channel.index()) {
                *live = true;
            }
        });
        PicoPwmOutput {
            slice: self,
            channel,
        }
    }
}

/// A servo output on channel A or B of a [`PicoPwmSlice`].
pub struct PicoPwmOutput<'s, 'd> {
    slice: &'s PicoPwmSlice<'d>,
    channel: PwmChannel,
}

impl ErrorType for PicoPwmOutput<'_, '_> {
    type Error = Infallible;
}

impl SetDutyCycle for PicoPwmOutput<'_, '_> {
    /// One tick per microsecond, so full scale is the period length in ticks.
    fn max_duty_cycle(&self) -> u16 {
        self.slice.period_ticks
    }

    /// Updates this channel's compare value and reapplies the stored config, so the
    /// divider and the other channel's compare value are kept.
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let channel = self.channel;
        self.slice.state.lock(|state| {
            let state = &mut *state.borrow_mut();
            match channel {
                PwmChannel::A => state.cfg.compare_a = duty,
                PwmChannel::B => state.cfg.compare_b = duty,
            }
            state.pwm.set_config(&state.cfg);
        });
        Ok(())
    }
}

impl ServoOutput for PicoPwmOutput<'_, '_> {
    /// Drive this channel low so its servo stops receiving pulses and relaxes.
    ///
    /// The slice itself is disabled once every output handed out from it is released.
    fn release(&mut self) -> Result<(), Self::Error> {
        let channel = self.channel;
        self.slice.state.lock(|state| {
            let state = &mut *state.borrow_mut();
            match channel {
                PwmChannel::A => state.cfg.compare_a = 0,
                PwmChannel::B => state.cfg.compare_b = 0,
            }
            if let Some(live) = state.live.get_mut(channel.index()) {
                *live = false;
            }
            if !state.live.iter().any(|live| *live) {
                log_debug!("pwm slice idle, disabling");
                state.cfg.enable = false;
            }
            state.pwm.set_config(&state.cfg);
        });
        Ok(())
    }
}
