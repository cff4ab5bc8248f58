//! Synchronization primitives between interrupt context and the event loop.

mod channel;

pub use channel::EventChannel;
