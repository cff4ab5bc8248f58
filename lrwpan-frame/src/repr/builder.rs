use super::*;
use crate::constants::MAX_MAC_SAFE_PAYLOAD_SIZE;
use crate::{Address, AddressingMode, FrameType, FrameVersion};
use crate::{Error, Result};

/// Marker type for building acknowledgment frames.
pub struct Ack;
/// Marker type for building data and MAC command frames.
pub struct Data;

/// A helper for building IEEE 802.15.4 frames.
pub struct FrameBuilder<'p, T> {
    frame: FrameRepr<'p>,
    r#type: core::marker::PhantomData<T>,
}

impl<'p> FrameBuilder<'p, Ack> {
    /// Create a new builder for an immediate acknowledgment frame.
    pub fn new_imm_ack(sequence_number: u8) -> Self {
        Self {
            frame: FrameRepr {
                frame_control: FrameControlRepr {
                    frame_type: FrameType::Ack,
                    security_enabled: false,
                    frame_pending: false,
                    ack_request: false,
                    pan_id_compression: false,
                    sequence_number_suppression: false,
                    information_elements_present: false,
                    dst_addressing_mode: AddressingMode::Absent,
                    src_addressing_mode: AddressingMode::Absent,
                    frame_version: FrameVersion::Ieee802154_2006,
                },
                sequence_number: Some(sequence_number),
                addressing_fields: None,
                auxiliary_security_header: None,
                payload: None,
            },
            r#type: core::marker::PhantomData,
        }
    }
}

impl<'p> FrameBuilder<'p, Data> {
    /// Create a new builder for a data frame.
    ///
    /// The frame version starts out as IEEE 802.15.4-2003 and is upgraded
    /// by [`finalize`] when the frame uses features introduced later.
    ///
    /// [`finalize`]: FrameBuilder::finalize
    pub fn new_data(payload: &'p [u8]) -> Self {
        Self::new(FrameType::Data, payload)
    }

    /// Create a new builder for a MAC command frame.
    ///
    /// The first octet of the payload is the command identifier.
    pub fn new_command(payload: &'p [u8]) -> Self {
        Self::new(FrameType::MacCommand, payload)
    }

    fn new(frame_type: FrameType, payload: &'p [u8]) -> Self {
        Self {
            frame: FrameRepr {
                frame_control: FrameControlRepr {
                    frame_type,
                    security_enabled: false,
                    frame_pending: false,
                    ack_request: false,
                    pan_id_compression: false,
                    sequence_number_suppression: true,
                    information_elements_present: false,
                    dst_addressing_mode: AddressingMode::Absent,
                    src_addressing_mode: AddressingMode::Absent,
                    frame_version: FrameVersion::Ieee802154_2003,
                },
                sequence_number: None,
                addressing_fields: None,
                auxiliary_security_header: None,
                payload: Some(payload),
            },
            r#type: core::marker::PhantomData,
        }
    }
}

impl<'p, T> FrameBuilder<'p, T> {
    /// Set the frame sequence number.
    ///
    /// # Note
    /// This method disables sequence number suppression.
    pub fn set_sequence_number(mut self, sequence_number: u8) -> Self {
        self.frame.sequence_number = Some(sequence_number);
        self.frame.frame_control.sequence_number_suppression = false;
        self
    }

    /// Set the acknowledgment request bit.
    pub fn set_ack_request(mut self, ack_request: bool) -> Self {
        self.frame.frame_control.ack_request = ack_request;
        self
    }

    /// Set the frame pending bit.
    pub fn set_frame_pending(mut self, frame_pending: bool) -> Self {
        self.frame.frame_control.frame_pending = frame_pending;
        self
    }

    /// Set the destination PAN ID.
    pub fn set_dst_pan_id(mut self, pan_id: u16) -> Self {
        self.frame
            .addressing_fields
            .get_or_insert_with(AddressingFieldsRepr::default)
            .dst_pan_id = Some(pan_id);

        self
    }

    /// Set the source PAN ID.
    pub fn set_src_pan_id(mut self, pan_id: u16) -> Self {
        self.frame
            .addressing_fields
            .get_or_insert_with(AddressingFieldsRepr::default)
            .src_pan_id = Some(pan_id);
        self
    }

    /// Set the destination address.
    ///
    /// # Note
    /// Based on the address, the addressing mode will be set.
    pub fn set_dst_address(mut self, address: Address) -> Self {
        self.frame.frame_control.dst_addressing_mode = address.into();
        self.frame
            .addressing_fields
            .get_or_insert_with(AddressingFieldsRepr::default)
            .dst_address = Some(address);
        self
    }

    /// Set the source address.
    ///
    /// # Note
    /// Based on the address, the addressing mode will be set.
    pub fn set_src_address(mut self, address: Address) -> Self {
        self.frame.frame_control.src_addressing_mode = address.into();
        self.frame
            .addressing_fields
            .get_or_insert_with(AddressingFieldsRepr::default)
            .src_address = Some(address);
        self
    }

    /// Protect the frame with the given auxiliary security header.
    ///
    /// # Note
    /// This method enables the security bit in the frame control.
    pub fn set_security(mut self, header: AuxiliarySecurityHeaderRepr) -> Self {
        self.frame.frame_control.security_enabled = true;
        self.frame.auxiliary_security_header = Some(header);
        self
    }

    /// Set the frame payload.
    pub fn set_payload(mut self, payload: &'p [u8]) -> Self {
        self.frame.payload = Some(payload);
        self
    }

    /// Finalize the frame builder, returning the frame representation.
    ///
    /// # Note
    /// This method upgrades the frame version when required, and checks and
    /// sets if PAN ID compression is possible.
    pub fn finalize(mut self) -> Result<FrameRepr<'p>> {
        if matches!(self.frame.frame_control.frame_type, FrameType::Ack) {
            // The sequence number is required for immediate acknowledgment frames.
            if self.frame.sequence_number.is_none() {
                return Err(Error);
            }

            // The addressing fields are not present in acknowledgment frames.
            self.frame.addressing_fields = None;

            return Ok(self.frame);
        }

        // Secured frames and frames with a payload larger than the 2003 limit
        // require the IEEE 802.15.4-2006 frame version.
        if self.frame.frame_control.security_enabled
            || self.frame.payload.map_or(0, |p| p.len()) > MAX_MAC_SAFE_PAYLOAD_SIZE
        {
            self.frame.frame_control.frame_version = FrameVersion::Ieee802154_2006;
        }

        // - If both destination and source addresses are present, and the PAN IDs are
        //   equal, then PAN ID compression is possible. In this case, the source PAN ID
        //   field is omitted and the PAN ID compression bit is set to 1. If PAN IDs are
        //   different, the PAN ID compression bit is set to 0.
        // - If only either the destination or source address is present, the PAN ID
        //   compression bit is set to 0. The PAN ID field of the single address shall
        //   be included in the frame.
        let Some(addr) = self.frame.addressing_fields.as_mut() else {
            return Err(Error);
        };

        match (
            addr.dst_address,
            addr.src_address,
            addr.dst_pan_id,
            addr.src_pan_id,
        ) {
            (Some(_), Some(_), Some(dst_pan_id), Some(src_pan_id)) => {
                if dst_pan_id == src_pan_id {
                    self.frame.frame_control.pan_id_compression = true;
                    addr.src_pan_id = None;
                }
            }
            (Some(_), None, Some(_), _) => {
                self.frame.frame_control.pan_id_compression = false;
                addr.src_pan_id = None;
            }
            (None, Some(_), _, Some(_)) => {
                self.frame.frame_control.pan_id_compression = false;
                addr.dst_pan_id = None;
            }
            _ => return Err(Error),
        }

        Ok(self.frame)
    }
}
