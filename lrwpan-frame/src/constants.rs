//! Wire-format size constants.

// Constants from section 11.3, Table 11-1, PHY constants
/// The maximum PSDU size (in octets) the PHY shall be able to receive.
pub const MAX_PHY_PACKET_SIZE: usize = 127;

// Constants of section 8.4.2, Table 8-93, MAC constants
/// The length (in octets) of the Frame Check Sequence field.
pub const FCS_LEN: usize = 2;
/// The length (in octets) of the PHY header carrying the frame length.
pub const PHR_LEN: usize = 1;
/// The minimum MPDU overhead: frame control, sequence number and FCS.
pub const MIN_MPDU_OVERHEAD: usize = 5;
/// The maximum MPDU overhead of an unsecured frame: frame control, sequence
/// number, two PAN IDs, two extended addresses and the FCS.
pub const MAX_MPDU_UNSECURED_OVERHEAD: usize = 25;
/// The maximum number of octets that can be transmitted in the MAC payload
/// field.
pub const MAX_MAC_PAYLOAD_SIZE: usize = MAX_PHY_PACKET_SIZE - MIN_MPDU_OVERHEAD;
/// The maximum number of octets that can be transmitted in the MAC payload
/// field of an unsecured frame while guaranteeing room for the addressing
/// fields. Larger payloads require the 2006 frame format.
pub const MAX_MAC_SAFE_PAYLOAD_SIZE: usize = MAX_PHY_PACKET_SIZE - MAX_MPDU_UNSECURED_OVERHEAD;
/// The maximum size of an MPDU, in octets, that can be followed by a SIFS
/// period.
pub const MAX_SIFS_FRAME_SIZE: usize = 18;
