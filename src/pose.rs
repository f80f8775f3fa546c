//! Poses and waypoints.

use core::fmt;
use core::ops::Deref;

use embassy_time::Duration;

use crate::duty::MAX_DEGREES;

/// One angle (degrees, `0..=180`) per servo.
///
/// # Example
///
/// ```rust
/// use servo_choreo::pose::Pose;
///
/// let pose = Pose::new([180, 0, 90, 0, 0]);
/// assert_eq!(pose.max_delta(&Pose::splat(0)), 180);
/// assert_eq!(pose[2], 90);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct Pose<const N: usize>([u16; N]);

impl<const N: usize> Pose<N> {
    /// Create a pose.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in `const` contexts) if any angle exceeds 180°.
    #[must_use]
    pub const fn new(degrees: [u16; N]) -> Self {
        let mut index = 0;
        while index < N {
            assert!(degrees[index] <= MAX_DEGREES, "pose angles must be 0..=180");
            index += 1;
        }
        Self(degrees)
    }

    /// Create a pose with every servo at the same angle.
    ///
    /// # Panics
    ///
    /// Panics if `degrees` exceeds 180°.
    #[must_use]
    pub const fn splat(degrees: u16) -> Self {
        Self::new([degrees; N])
    }

    /// Largest single-servo angular distance to `target`.
    ///
    /// This is the number of one-degree ticks needed to move from `self` to `target`.
    #[must_use]
    pub fn max_delta(&self, target: &Self) -> u16 {
        self.0
            .iter()
            .zip(target.0.iter())
            .map(|(current, target)| current.abs_diff(*target))
            .max()
            .unwrap_or(0)
    }

    /// Move every servo one degree toward `target`; servos already there stay put.
    #[must_use]
    pub fn step_toward(&self, target: &Self) -> Self {
        let mut next = self.0;
        for (degrees, target) in next.iter_mut().zip(target.0.iter()) {
            *degrees = match (*degrees).cmp(target) {
                core::cmp::Ordering::Less => degrees.saturating_add(1),
                core::cmp::Ordering::Greater => degrees.saturating_sub(1),
                core::cmp::Ordering::Equal => *degrees,
            };
        }
        Self(next)
    }
}

impl<const N: usize> Deref for Pose<N> {
    type Target = [u16; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> fmt::Display for Pose<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, degrees) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{degrees}")?;
        }
        f.write_str("]")
    }
}

/// A target pose and how long to hold it once reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct Waypoint<const N: usize> {
    /// Where every servo should end up.
    pub pose: Pose<N>,
    /// How long to stay there before moving on.
    pub hold: Duration,
}

impl<const N: usize> Waypoint<N> {
    /// Create a waypoint.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in `const` contexts) if any angle exceeds 180°.
    #[must_use]
    pub const fn new(degrees: [u16; N], hold: Duration) -> Self {
        Self {
            pose: Pose::new(degrees),
            hold,
        }
    }
}
