//! A fixed set of servos driven together.
//!
//! See [`ServoRig`].

use heapless::Vec;

use crate::Result;
use crate::channel::{ChannelId, ServoChannel, ServoOutput};
use crate::logging::{log_info, log_warn};
use crate::pose::Pose;

/// `N` servos owned by whoever runs the choreography.
///
/// The rig is consumed by [`release_all`](Self::release_all), so every channel is released
/// at most once.
pub struct ServoRig<O, const N: usize> {
    channels: [ServoChannel<O>; N],
}

impl<O: ServoOutput, const N: usize> ServoRig<O, N> {
    /// Create a rig. Servo `i` of every [`Pose`] drives `channels[i]`.
    #[must_use]
    pub const fn new(channels: [ServoChannel<O>; N]) -> Self {
        Self { channels }
    }

    /// Write every angle of `pose` to its servo, back to back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DutyWrite`](crate::Error::DutyWrite) for the first servo whose
    /// write fails; later servos are not written.
    pub fn write_pose(&mut self, pose: &Pose<N>) -> Result<()> {
        for (channel, degrees) in self.channels.iter_mut().zip(pose.iter()) {
            channel.write_degrees(*degrees)?;
        }
        Ok(())
    }

    /// Release every servo, in order, exactly once.
    ///
    /// A failing release never stops the remaining ones; failures are logged and
    /// collected in the returned report.
    pub fn release_all(self) -> ReleaseReport<N> {
        // At most one entry per channel, so the failure list cannot overflow.
        let failed: Vec<ChannelId, N> = self
            .channels
            .into_iter()
            .filter_map(|mut channel| {
                let id = channel.id();
                channel.release().err().map(|_| {
                    log_warn!("release failed on {}", id);
                    id
                })
            })
            .collect();
        let report = ReleaseReport {
            attempted: N,
            failed,
        };
        log_info!(
            "Servos released: {} of {}",
            report.released(),
            report.attempted
        );
        report
    }
}

/// Outcome of [`ServoRig::release_all`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseReport<const N: usize> {
    attempted: usize,
    failed: Vec<ChannelId, N>,
}

impl<const N: usize> ReleaseReport<N> {
    /// How many releases were attempted (always the rig size).
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.attempted
    }

    /// How many releases succeeded.
    #[must_use]
    pub fn released(&self) -> usize {
        self.attempted.saturating_sub(self.failed.len())
    }

    /// Channels whose release failed, in rig order.
    #[must_use]
    pub fn failed(&self) -> &[ChannelId] {
        &self.failed
    }

    /// `true` when every release succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
