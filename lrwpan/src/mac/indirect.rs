//! Queue of transactions held for sleeping devices.
//!
//! In a non-beacon network a coordinator cannot push frames to a device
//! that keeps its receiver off. Frames for such devices are held here
//! until the device asks for them with a data request command, or until
//! their persistence time runs out (section 6.7.3).

use lrwpan_frame::{Address, Frame, FrameControl};

use crate::mac::constants::MAC_INDIRECT_QUEUE_CAPACITY;
use crate::tal::TxFrame;

/// A frame held until its destination polls for it.
#[derive(Debug)]
pub(crate) struct PendingTransaction {
    pub(crate) frame: TxFrame,
    /// Remaining lifetime, in persistence timer periods.
    pub(crate) persistence_time: u16,
    /// Set while the transmitter works on a copy of this frame. At most
    /// one transaction is in transit at any time.
    pub(crate) in_transit: bool,
}

/// The transaction queue for indirect transmissions.
///
/// Transactions are served oldest first per polling device. The stored
/// frame stays queued while a copy of it is on the air, so a failed
/// delivery attempt leaves the transaction available for the next poll.
#[derive(Debug, Default)]
pub(crate) struct IndirectQueue {
    entries: heapless::Vec<PendingTransaction, MAC_INDIRECT_QUEUE_CAPACITY>,
}

impl IndirectQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add a transaction to the queue. The frame is handed back when the
    /// queue is full.
    pub(crate) fn enqueue(
        &mut self,
        frame: TxFrame,
        persistence_time: u16,
    ) -> Result<(), TxFrame> {
        self.entries
            .push(PendingTransaction {
                frame,
                persistence_time,
                in_transit: false,
            })
            .map_err(|entry| entry.frame)
    }

    /// Remove the transaction with the given handle, unless it is
    /// currently in transit.
    pub(crate) fn purge(&mut self, msdu_handle: u8) -> Option<TxFrame> {
        let index = self
            .entries
            .iter()
            .position(|entry| !entry.in_transit && entry.frame.msdu_handle == msdu_handle)?;
        Some(self.entries.remove(index).frame)
    }

    /// Mark the oldest transaction addressed to the polling device as in
    /// transit and return a copy of it for transmission. When more
    /// transactions wait for the same device, the frame pending bit is
    /// set in the stored frame first, so the copy announces the backlog.
    pub(crate) fn serve_poll(&mut self, pan_id: u16, address: Address) -> Option<TxFrame> {
        let index = self
            .entries
            .iter()
            .position(|entry| !entry.in_transit && is_for(entry, pan_id, address))?;
        let more_pending = self.entries.iter().enumerate().any(|(other, entry)| {
            other != index && !entry.in_transit && is_for(entry, pan_id, address)
        });

        let entry = &mut self.entries[index];
        entry.in_transit = true;
        if more_pending {
            FrameControl::new_unchecked(&mut entry.frame.mpdu_mut()[..2])
                .set_frame_pending(true);
        }
        Some(entry.frame.clone())
    }

    pub(crate) fn has_in_transit(&self) -> bool {
        self.entries.iter().any(|entry| entry.in_transit)
    }

    /// Settle the in transit transaction once its transmission attempt
    /// ended. A delivered transaction is removed and returned, a failed
    /// one stays queued for the next poll.
    pub(crate) fn finish_in_transit(&mut self, delivered: bool) -> Option<TxFrame> {
        let index = self.entries.iter().position(|entry| entry.in_transit)?;
        if delivered {
            Some(self.entries.remove(index).frame)
        } else {
            self.entries[index].in_transit = false;
            None
        }
    }

    /// Count down the lifetime of every waiting transaction by one
    /// persistence timer period. Transactions in transit do not age.
    pub(crate) fn decrement_persistence(&mut self) {
        for entry in self.entries.iter_mut().filter(|entry| !entry.in_transit) {
            entry.persistence_time = entry.persistence_time.saturating_sub(1);
        }
    }

    /// Remove and return the next transaction whose lifetime ran out.
    pub(crate) fn take_expired(&mut self) -> Option<TxFrame> {
        let index = self
            .entries
            .iter()
            .position(|entry| !entry.in_transit && entry.persistence_time == 0)?;
        Some(self.entries.remove(index).frame)
    }
}

/// Whether a stored frame is destined for the given device.
fn is_for(entry: &PendingTransaction, pan_id: u16, address: Address) -> bool {
    let Ok(frame) = Frame::new(entry.frame.mpdu()) else {
        return false;
    };
    let Some(addressing) = frame.addressing() else {
        return false;
    };
    addressing.dst_pan_id() == Some(pan_id) && addressing.dst_address() == Some(address)
}
