//! The transaction persistence timer.

use crate::mac::constants::{
    BASE_SUPERFRAME_DURATION, BO_USED_FOR_MAC_PERS_TIME, NON_BEACON_NETWORK,
};
use crate::time::{Duration, Instant};

/// Periodic timer aging the indirect transaction queue.
///
/// macTransactionPersistenceTime counts superframe periods, so one timer
/// period is one superframe duration at the current beacon order. A
/// non-beacon network has no beacon interval to derive the period from
/// and falls back to a configured beacon order instead.
#[derive(Debug, Default)]
pub(crate) struct PersistenceTimer {
    deadline: Option<Instant>,
}

impl PersistenceTimer {
    /// The timer period for the given beacon order.
    pub(crate) fn period(beacon_order: u8) -> Duration {
        let order = if beacon_order >= NON_BEACON_NETWORK {
            BO_USED_FOR_MAC_PERS_TIME
        } else {
            beacon_order
        };
        Duration::from_symbols(BASE_SUPERFRAME_DURATION << order)
    }

    /// Arm the timer unless it is already running.
    pub(crate) fn start(&mut self, now: Instant, beacon_order: u8) {
        if self.deadline.is_none() {
            self.deadline = Some(now + Self::period(beacon_order));
        }
    }

    pub(crate) fn stop(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the period elapsed. A due timer disarms itself, the
    /// caller restarts it while transactions remain queued.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
