//! Bounded channel feeding hardware events into the MAC event loop. Sending
//! is non-blocking and may run in interrupt context; a full channel drops the
//! new item instead of the oldest one.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// A bounded first-in first-out channel.
///
/// Every operation takes a critical section, so producers may run in
/// interrupt handlers while a single consumer drains the channel.
pub struct EventChannel<T, const N: usize> {
    events: Mutex<RefCell<Deque<T, N>>>,
}

impl<T, const N: usize> EventChannel<T, N> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Push an item onto the channel.
    ///
    /// Returns whether the item was accepted. A full channel drops the item.
    pub fn send(&self, event: T) -> bool {
        let accepted =
            critical_section::with(|cs| self.events.borrow_ref_mut(cs).push_back(event).is_ok());
        if !accepted {
            error!("event channel full, dropping event");
        }
        accepted
    }

    /// Pop the oldest item from the channel.
    pub fn receive(&self) -> Option<T> {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).pop_front())
    }

    /// Returns whether the channel holds an item.
    pub fn has_item(&self) -> bool {
        critical_section::with(|cs| !self.events.borrow_ref(cs).is_empty())
    }
}

impl<T, const N: usize> Default for EventChannel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
