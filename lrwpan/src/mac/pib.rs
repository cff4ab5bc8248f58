use crate::time::Duration;

use super::constants::*;

/// PAN Information Base (PIB) specified by MAC sublayer
pub struct Pib {
    /// The extended address assigned to the device. When `None`, the address
    /// is read from the radio when the MAC is created.
    pub extended_address: Option<[u8; 8]>,
    /// The address that the device uses to communicate in the PAN. A value of
    /// 0xffff indicates that the device does not have a short address.
    pub short_address: u16,
    /// The identifier of the PAN on which the device is operating. If this
    /// value is 0xffff, the device is not associated.
    pub pan_id: u16,
    /// The minimum value of the backoff exponent (BE) in the CSMA-CA
    /// algorithm.
    pub min_be: u8,
    /// The maximum value of the backoff exponent, BE, in the CSMA-CA
    /// algorithm.
    pub max_be: u8,
    /// The maximum number of backoffs the CSMA-CA algorithm will attempt
    /// before declaring a channel access failure.
    pub max_csma_backoffs: u8,
    /// The maximum number of retries allowed after a transmission failure.
    pub max_frame_retries: u8,
    /// The minimum time forming a SIFS period.
    pub sifs_period: Duration,
    /// The minimum time forming a LIFS period.
    pub lifs_period: Duration,
    /// The maximum time to wait for an acknowledgment frame to arrive
    /// following a transmitted data frame.
    pub ack_wait_duration: Duration,
    /// Specification of how often the coordinator transmits its beacon. Value
    /// ranges from 0 to 15. If value is 15, the PAN is nonbeacon-enabled.
    pub beacon_order: u8,
    /// The maximum time, in beacon intervals, that a transaction is stored by
    /// a coordinator for a device to poll it.
    pub transaction_persistence_time: u16,
    /// The outgoing frame counter placed in the auxiliary security header of
    /// secured frames.
    pub frame_counter: u32,
    /// Indication of whether the MAC sublayer is in a promiscuous (receive
    /// all) mode. A value of `true` indicates that the MAC sublayer accepts
    /// all frames received from the PHY.
    pub promiscuous_mode: bool,
}

impl Default for Pib {
    fn default() -> Self {
        Self {
            extended_address: None,
            short_address: 0xffff,
            pan_id: MAC_PAN_ID,
            min_be: MAC_MIN_BE,
            max_be: MAC_MAX_BE,
            max_csma_backoffs: MAC_MAX_CSMA_BACKOFFS,
            max_frame_retries: MAC_MAX_FRAME_RETRIES,
            sifs_period: MAC_SIFS_PERIOD,
            lifs_period: MAC_LIFS_PERIOD,
            ack_wait_duration: MAC_ACK_WAIT_DURATION,
            beacon_order: NON_BEACON_NETWORK,
            transaction_persistence_time: MAC_TRANSACTION_PERSISTENCE_TIME,
            frame_counter: 0,
            promiscuous_mode: false,
        }
    }
}
