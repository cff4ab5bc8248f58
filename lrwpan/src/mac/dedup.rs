//! Suppression of retransmitted data frames.

use lrwpan_frame::Address;

/// Cache of the last accepted (sequence number, source address) pair.
///
/// A data frame matching the cached pair is a retransmission of the frame
/// that was last indicated, most likely because our acknowledgment was lost,
/// and is dropped. The cache starts out empty so the very first frame is
/// never filtered.
#[derive(Debug, Default)]
pub(crate) struct DuplicateFilter {
    last: Option<(u8, Address)>,
}

impl DuplicateFilter {
    /// Check a frame against the cache. An accepted frame replaces the
    /// cached pair.
    pub(crate) fn is_duplicate(&mut self, sequence_number: u8, src_addr: Address) -> bool {
        if self.last == Some((sequence_number, src_addr)) {
            return true;
        }
        self.last = Some((sequence_number, src_addr));
        false
    }
}
