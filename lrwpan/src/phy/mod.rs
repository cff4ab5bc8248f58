//! Access to IEEE 802.15.4 devices.
//!
//! This module provides access to IEEE 802.15.4 radio devices. It provides a
//! trait for driving a transceiver from the MAC event loop, [Radio].
//!
//! [Radio]: radio::Radio

pub mod constants;
pub mod radio;
