use derive_more::{Display, Error};

use crate::channel::ChannelId;

/// Errors raised while performing a choreography.
///
/// Release failures during shutdown are not errors; they are collected in a
/// [`ReleaseReport`](crate::rig::ReleaseReport) instead.
#[derive(Debug, Display, Error)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Error {
    /// The PWM driver refused a duty-cycle write.
    #[display("duty write failed on {channel}")]
    DutyWrite {
        /// Channel whose write failed.
        channel: ChannelId,
    },

    /// A stop was requested while the choreography was sleeping.
    #[display("interrupted by stop request")]
    Interrupted,

    /// The executor could not spawn a task.
    #[cfg(not(feature = "host"))]
    #[display("task spawn failed: {_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}

/// Result type for this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
