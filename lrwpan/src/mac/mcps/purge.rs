//! MCPS-PURGE service primitives.

use rand_core::RngCore;

use crate::mac::{MacContext, Notification, Status};
use crate::phy::radio::Radio;

/// Reports the result of a request to purge an MSDU from the transaction
/// queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeConfirm {
    /// The handle of the MSDU requested to be purged.
    pub msdu_handle: u8,
    /// Either [`Status::Success`] or [`Status::InvalidHandle`].
    pub status: Status,
}

impl<R: Radio, Rng: RngCore> MacContext<R, Rng> {
    /// Allows a higher layer to purge an MSDU from the transaction queue.
    ///
    /// An MSDU that is on its way to a polling device can no longer be
    /// purged. A purged MSDU produces no data confirm.
    pub fn purge_request(&mut self, msdu_handle: u8) {
        let status = if self.indirect.purge(msdu_handle).is_some() {
            Status::Success
        } else {
            Status::InvalidHandle
        };
        self.stop_persistence_when_idle();
        self.notify(Notification::PurgeConfirm(PurgeConfirm {
            msdu_handle,
            status,
        }));
    }
}
