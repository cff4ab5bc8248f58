#![allow(dead_code)]
pub use customizable::*;

use crate::phy::constants::{CCA_TIME, TURNAROUND_TIME};

pub const BROADCAST_PAN_ID: u16 = 0xffff;
pub const BROADCAST_SHORT_ADDRESS: u16 = 0xffff;
/// The short address of a device that communicates with its extended address
/// only (section 6.4.2, macShortAddress).
pub const NO_SHORT_ADDRESS: u16 = 0xfffe;
/// The beacon order of a device operating on a nonbeacon-enabled PAN.
pub const NON_BEACON_NETWORK: u8 = 15;

// Constants of section 8.4.2, Table 8-93, MAC constants
/// The number of symbols forming a superframe slot when the superframe order is
/// equal to zero, as described in 6.2.1.
pub const BASE_SLOT_DURATION: u32 = 60;
/// The number of symbols forming a superframe when the superframe order is
/// equal to zero.
pub const BASE_SUPERFRAME_DURATION: u32 = BASE_SLOT_DURATION * NUM_SUPERFRAME_SLOTS;
/// The number of slots contained in any superframe.
pub const NUM_SUPERFRAME_SLOTS: u32 = 16;
/// The number of symbols forming the basic time period used by the CSMA-CA
/// algorithm.
pub const UNIT_BACKOFF_PERIOD: u32 = TURNAROUND_TIME + CCA_TIME;
/// The minimum number of symbols forming a SIFS period.
pub const MIN_SIFS_PERIOD: u32 = 12;
/// The minimum number of symbols forming a LIFS period.
pub const MIN_LIFS_PERIOD: u32 = 40;
/// The maximum number of symbols to wait for an acknowledgment frame to
/// arrive following a transmitted data frame, for the O-QPSK PHY on 2.4 GHz.
pub const ACK_WAIT_DURATION: u32 = 54;


#[cfg(not(test))]
mod customizable {
    #![allow(unused)]
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
