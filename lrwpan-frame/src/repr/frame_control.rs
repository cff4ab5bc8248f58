use crate::{AddressingMode, Error, FrameControl, FrameType, FrameVersion, Result};

/// A high-level representation of the IEEE 802.15.4 frame control field.
#[derive(Debug)]
pub struct FrameControlRepr {
    /// The type of the frame.
    pub frame_type: FrameType,
    /// The frame is secured with the auxiliary security header.
    pub security_enabled: bool,
    /// More frames are pending for the recipient.
    pub frame_pending: bool,
    /// The frame requires an acknowledgment.
    pub ack_request: bool,
    /// The source PAN ID is elided.
    pub pan_id_compression: bool,
    /// The sequence number field is elided.
    pub sequence_number_suppression: bool,
    /// The frame contains information elements.
    pub information_elements_present: bool,
    /// The addressing mode of the destination address.
    pub dst_addressing_mode: AddressingMode,
    /// The addressing mode of the source address.
    pub src_addressing_mode: AddressingMode,
    /// The version of the frame.
    pub frame_version: FrameVersion,
}

impl FrameControlRepr {
    /// Parse a frame control field.
    pub fn parse(fc: FrameControl<&[u8]>) -> Result<Self> {
        if matches!(fc.frame_type(), FrameType::Unknown) {
            return Err(Error);
        }

        if matches!(fc.frame_version(), FrameVersion::Unknown) {
            return Err(Error);
        }

        Ok(Self {
            frame_type: fc.frame_type(),
            security_enabled: fc.security_enabled(),
            frame_pending: fc.frame_pending(),
            ack_request: fc.ack_request(),
            pan_id_compression: fc.pan_id_compression(),
            sequence_number_suppression: fc.sequence_number_suppression(),
            information_elements_present: fc.information_elements_present(),
            dst_addressing_mode: fc.dst_addressing_mode(),
            src_addressing_mode: fc.src_addressing_mode(),
            frame_version: fc.frame_version(),
        })
    }
}
