//! Lockstep pose interpolation.
//!
//! Moving from one pose to another takes as many ticks as the largest single-servo
//! distance. On each tick every servo that has not yet arrived moves one degree toward its
//! target; servos with shorter distances arrive early and hold. Every servo is written on
//! every tick, then the [`Pacer`] sleeps once.
//!
//! ```rust
//! use servo_choreo::interpolate::steps;
//! use servo_choreo::pose::Pose;
//!
//! let poses: Vec<_> = steps(Pose::new([0, 2, 1]), Pose::new([3, 0, 1])).collect();
//! assert_eq!(
//!     poses,
//!     [Pose::new([1, 1, 1]), Pose::new([2, 0, 1]), Pose::new([3, 0, 1])]
//! );
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::Result;
use crate::channel::ServoOutput;
use crate::logging::log_debug;
use crate::pacer::Pacer;
use crate::pose::Pose;
use crate::rig::ServoRig;

/// Iterator over the intermediate poses between two poses, one per tick.
///
/// Created by [`steps`]. The last item is the target; an empty iterator means the poses
/// are already equal.
#[derive(Clone, Debug)]
pub struct PoseSteps<const N: usize> {
    current: Pose<N>,
    target: Pose<N>,
    remaining: u16,
}

/// The poses visited when moving from `current` to `target`, excluding `current`.
#[must_use]
pub fn steps<const N: usize>(current: Pose<N>, target: Pose<N>) -> PoseSteps<N> {
    PoseSteps {
        current,
        target,
        remaining: current.max_delta(&target),
    }
}

impl<const N: usize> Iterator for PoseSteps<N> {
    type Item = Pose<N>;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        self.current = self.current.step_toward(&self.target);
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.remaining);
        (remaining, Some(remaining))
    }
}

impl<const N: usize> ExactSizeIterator for PoseSteps<N> {}

/// Move the rig from `current` to `target`, one degree per tick, sleeping `step_delay`
/// after each tick. Returns `target`.
///
/// Equal poses return immediately with no writes and no sleeps. Otherwise exactly
/// `current.max_delta(&target) * N` writes are made.
///
/// # Errors
///
/// Returns [`Error::DutyWrite`](crate::Error::DutyWrite) if a write fails and
/// [`Error::Interrupted`](crate::Error::Interrupted) if a stop is requested during a
/// sleep. The rig is then somewhere between the two poses.
pub async fn interpolate<O, D, M, const N: usize>(
    rig: &mut ServoRig<O, N>,
    pacer: &mut Pacer<'_, D, M>,
    current: Pose<N>,
    target: Pose<N>,
    step_delay: Duration,
) -> Result<Pose<N>>
where
    O: ServoOutput,
    D: DelayNs,
    M: RawMutex,
{
    if current == target {
        return Ok(target);
    }
    let poses = steps(current, target);
    log_debug!("{} -> {} in {} steps", current, target, poses.len());

    for pose in poses {
        rig.write_pose(&pose)?;
        pacer.sleep(step_delay).await?;
    }
    Ok(target)
}
