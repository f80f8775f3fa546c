//! Lockstep choreography for hobby servos on Pico 1 and 2.
//!
//! A choreography is a list of [`Waypoint`](pose::Waypoint)s. Between waypoints every servo
//! moves one degree per tick toward its target, all servos in lockstep, with one PWM write
//! per servo per tick followed by a single fixed delay. See [`choreography`] for the full
//! sequence and [`interpolate`] for the stepping rule.
//!
//! # Glossary
//!
//! - **Duty cycle:** fraction of each PWM period during which the signal is high, here a
//!   16-bit value where `u16::MAX` is always-high.
//! - **Pulse width:** absolute high-time in microseconds, which encodes the commanded angle.
//! - **Pose:** one angle per servo at one instant.
//! - **Waypoint:** a target pose plus how long to hold it.
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:**
//!   Both Pico 1 and 2 have 8 or more slices; each slice can drive two servos (channels A and B).
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(not(feature = "arm"), not(feature = "host")))]
compile_error!("Must enable the 'arm' architecture feature");

pub(crate) mod logging;

pub mod channel;
pub mod choreography;
pub mod duty;
mod error;
pub mod interpolate;
#[cfg(feature = "host")]
pub mod mock;
pub mod pacer;
// This module requires embassy_rp and is excluded when testing on host
#[cfg(not(feature = "host"))]
pub mod pico_pwm;
pub mod pose;
pub mod rig;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
