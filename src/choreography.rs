//! A fixed sequence of waypoints played on a [`ServoRig`].
//!
//! This page provides the primary documentation and examples for running a choreography.
//! The sequence is:
//!
//! 1. Write the home pose to every servo at once and sleep for the settle time.
//! 2. For each [`Waypoint`], glide there one degree per tick (see [`interpolate`]) and
//!    hold for the waypoint's duration.
//! 3. Finish according to [`AtEnd`].
//!
//! [`perform`] then releases every servo exactly once, whether the run finished, failed,
//! or was interrupted through the [`Pacer`]'s stop signal.
//!
//! # Example
//!
//! ```rust
//! use embassy_futures::block_on;
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use embassy_sync::signal::Signal;
//! use embassy_time::Duration;
//! use servo_choreo::choreography::{AtEnd, Choreography, perform};
//! use servo_choreo::mock::{Journal, MockDelay, mock_rig};
//! use servo_choreo::pacer::Pacer;
//! use servo_choreo::pose::{Pose, Waypoint};
//!
//! const WAYPOINTS: [Waypoint<2>; 2] = [
//!     Waypoint::new([10, 0], Duration::from_millis(100)),
//!     Waypoint::new([0, 5], Duration::from_millis(100)),
//! ];
//! const CHOREOGRAPHY: Choreography<'static, 2> = Choreography {
//!     home: Pose::splat(0),
//!     settle: Duration::from_secs(1),
//!     step_delay: Duration::from_millis(5),
//!     waypoints: &WAYPOINTS,
//!     at_end: AtEnd::ReturnHome,
//! };
//!
//! let journal = Journal::default();
//! let rig = mock_rig::<2>(&journal);
//! let stop = Signal::<NoopRawMutex, ()>::new();
//! let mut pacer = Pacer::new(MockDelay::new(&journal), &stop);
//!
//! let performance = block_on(perform(rig, &CHOREOGRAPHY, &mut pacer));
//! assert_eq!(performance.outcome.ok(), Some(Pose::splat(0)));
//! assert!(performance.release.is_clean());
//! ```

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::Result;
use crate::channel::ServoOutput;
use crate::interpolate::interpolate;
use crate::logging::{log_info, log_warn};
use crate::pacer::Pacer;
use crate::pose::{Pose, Waypoint};
use crate::rig::{ReleaseReport, ServoRig};

/// What to do after the last waypoint's hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum AtEnd {
    /// Finish where the last waypoint left the servos.
    Stop,
    /// Glide back to the home pose and settle there.
    ReturnHome,
    /// Repeat the waypoints until a stop is requested.
    ///
    /// Each pass ends by yielding to the executor. With no waypoints this behaves like
    /// [`AtEnd::Stop`].
    Loop,
}

/// The full description of a run: start pose, timings, and waypoints.
#[derive(Clone, Copy, Debug)]
pub struct Choreography<'a, const N: usize> {
    /// Pose written immediately (without gliding) before the first waypoint.
    pub home: Pose<N>,
    /// Pause after jumping to `home`, and after returning there with [`AtEnd::ReturnHome`].
    pub settle: Duration,
    /// Pause after each one-degree tick.
    pub step_delay: Duration,
    /// Poses to visit, in order.
    pub waypoints: &'a [Waypoint<N>],
    /// What to do after the last waypoint.
    pub at_end: AtEnd,
}

/// Result of [`perform`]: how the run ended, and how the release went.
#[derive(Debug)]
pub struct Performance<const N: usize> {
    /// The final pose on success, or why the run stopped early.
    pub outcome: Result<Pose<N>>,
    /// Per-servo release outcome; always covers every servo.
    pub release: ReleaseReport<N>,
}

/// Run `choreography` on `rig` and then release every servo.
///
/// Release happens whatever the outcome. See the [module documentation](self) for the
/// sequence and an example.
pub async fn perform<O, D, M, const N: usize>(
    mut rig: ServoRig<O, N>,
    choreography: &Choreography<'_, N>,
    pacer: &mut Pacer<'_, D, M>,
) -> Performance<N>
where
    O: ServoOutput,
    D: DelayNs,
    M: RawMutex,
{
    let outcome = run(&mut rig, choreography, pacer).await;
    match &outcome {
        Ok(pose) => log_info!("Sequence finished at {}", pose),
        Err(err) => log_warn!("Sequence stopped early: {}", err),
    }
    let release = rig.release_all();
    Performance { outcome, release }
}

/// Run `choreography` on `rig` without releasing it afterwards.
///
/// The returned pose is the last pose written.
///
/// # Errors
///
/// Returns [`Error::DutyWrite`](crate::Error::DutyWrite) if a write fails and
/// [`Error::Interrupted`](crate::Error::Interrupted) if a stop is requested during any
/// sleep.
pub async fn run<O, D, M, const N: usize>(
    rig: &mut ServoRig<O, N>,
    choreography: &Choreography<'_, N>,
    pacer: &mut Pacer<'_, D, M>,
) -> Result<Pose<N>>
where
    O: ServoOutput,
    D: DelayNs,
    M: RawMutex,
{
    log_info!("Init: moving all to {}", choreography.home);
    rig.write_pose(&choreography.home)?;
    pacer.sleep(choreography.settle).await?;
    let mut current = choreography.home;

    log_info!(
        "Starting sequence of {} waypoints",
        choreography.waypoints.len()
    );
    loop {
        for (index, waypoint) in choreography.waypoints.iter().enumerate() {
            log_info!("Step {} -> {}", index.saturating_add(1), waypoint.pose);
            current = interpolate(
                rig,
                pacer,
                current,
                waypoint.pose,
                choreography.step_delay,
            )
            .await?;
            pacer.sleep(waypoint.hold).await?;
        }

        match choreography.at_end {
            AtEnd::Loop if !choreography.waypoints.is_empty() => {
                // A pass may have no pending sleep (zero holds, nothing to move).
                yield_now().await;
            }
            AtEnd::Stop | AtEnd::Loop => return Ok(current),
            AtEnd::ReturnHome => {
                log_info!("Returning to {}", choreography.home);
                current = interpolate(
                    rig,
                    pacer,
                    current,
                    choreography.home,
                    choreography.step_delay,
                )
                .await?;
                pacer.sleep(choreography.settle).await?;
                return Ok(current);
            }
        }
    }
}
