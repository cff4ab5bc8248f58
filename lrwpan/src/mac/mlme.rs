//! MLME primitives reported by the transaction expiry handling.

use lrwpan_frame::Address;

use crate::mac::Status;

/// Indicates the fate of a command frame the MAC transmitted on its own
/// behalf, such as an association response held for a polling device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommStatusIndication {
    /// The PAN identifier this device operates on.
    pub pan_id: u16,
    /// The address of this device.
    pub src_addr: Address,
    /// The address of the device the frame was meant for.
    pub dst_addr: Address,
    /// The result of the transmission.
    pub status: Status,
}

/// Reports the result of a disassociation notification held for a sleeping
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisassociateConfirm {
    /// The result of the notification.
    pub status: Status,
    /// The PAN identifier of the device being disassociated.
    pub device_pan_id: u16,
    /// The address of the device being disassociated.
    pub device_addr: Address,
}
