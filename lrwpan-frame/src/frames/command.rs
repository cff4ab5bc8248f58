use crate::{Error, Result};

use crate::{
    AddressingFields, AddressingMode, AuxiliarySecurityHeader, FrameControl, FrameType,
    FrameVersion, MAX_PHY_PACKET_SIZE,
};
use crate::{AddressingFieldsRepr, FrameControlRepr};

/// IEEE 802.15.4 MAC command identifier.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum CommandId {
    /// Association request command.
    AssociationRequest = 0x01,
    /// Association response command.
    AssociationResponse = 0x02,
    /// Disassociation notification command.
    DisassociationNotification = 0x03,
    /// Data request command.
    DataRequest = 0x04,
    /// PAN ID conflict notification command.
    PanIdConflictNotification = 0x05,
    /// Orphan notification command.
    OrphanNotification = 0x06,
    /// Beacon request command.
    BeaconRequest = 0x07,
    /// Coordinator realignment command.
    CoordinatorRealignment = 0x08,
    /// GTS request command.
    GtsRequest = 0x09,
    /// Unknown command.
    Unknown,
}

impl From<u8> for CommandId {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::AssociationRequest,
            0x02 => Self::AssociationResponse,
            0x03 => Self::DisassociationNotification,
            0x04 => Self::DataRequest,
            0x05 => Self::PanIdConflictNotification,
            0x06 => Self::OrphanNotification,
            0x07 => Self::BeaconRequest,
            0x08 => Self::CoordinatorRealignment,
            0x09 => Self::GtsRequest,
            _ => Self::Unknown,
        }
    }
}

/// A reader/writer for an IEEE 802.15.4 MAC command frame.
///
/// The MAC payload of a command frame consists of the command identifier
/// followed by the command-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> CommandFrame<T> {
    /// Create a new [`CommandFrame`] reader/writer from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not contain a valid frame, or
    /// when the command identifier is missing.
    pub fn new(buffer: T) -> Result<Self> {
        let b = Self::new_unchecked(buffer);

        if !b.check_len() {
            return Err(Error);
        }

        let fc = b.frame_control();

        if fc.frame_type() != FrameType::MacCommand {
            return Err(Error);
        }

        if fc.frame_version() == FrameVersion::Unknown {
            return Err(Error);
        }

        if fc.information_elements_present() {
            return Err(Error);
        }

        if fc.dst_addressing_mode() == AddressingMode::Unknown {
            return Err(Error);
        }

        if fc.src_addressing_mode() == AddressingMode::Unknown {
            return Err(Error);
        }

        if fc.security_enabled() && b.auxiliary_security_header().is_none() {
            return Err(Error);
        }

        // The command identifier octet is part of the MAC payload.
        if b.buffer.as_ref().len() <= b.payload_offset() {
            return Err(Error);
        }

        Ok(b)
    }

    /// Returns `false` if the buffer is too short to contain a valid frame.
    pub fn check_len(&self) -> bool {
        let buffer = self.buffer.as_ref();

        if buffer.len() < 2 || buffer.len() > MAX_PHY_PACKET_SIZE {
            return false;
        }

        let fc = self.frame_control();

        if !fc.sequence_number_suppression() && buffer.len() < 3 {
            return false;
        }

        true
    }

    /// Create a new [`CommandFrame`] reader/writer from a given buffer
    /// without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    fn payload_offset(&self) -> usize {
        let fc = self.frame_control();

        let mut offset = 2;
        offset += !fc.sequence_number_suppression() as usize;

        if let Some(af) = self.addressing() {
            offset += af.len();
        }

        if fc.security_enabled() {
            if let Some(header) = self.auxiliary_security_header() {
                offset += header.len();
            }
        }

        offset
    }

    /// Return a [`FrameControl`] reader.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        FrameControl::new_unchecked(&self.buffer.as_ref()[..2])
    }

    /// Return the sequence number if not suppressed.
    pub fn sequence_number(&self) -> Option<u8> {
        if self.frame_control().sequence_number_suppression() {
            None
        } else {
            Some(self.buffer.as_ref()[2])
        }
    }

    /// Return an [`AddressingFields`] reader.
    pub fn addressing(&self) -> Option<AddressingFields<&'_ [u8], &'_ [u8]>> {
        let fc = self.frame_control();

        if fc.sequence_number_suppression() {
            AddressingFields::new(&self.buffer.as_ref()[2..], fc).ok()
        } else {
            AddressingFields::new(&self.buffer.as_ref()[3..], fc).ok()
        }
    }

    /// Return an [`AuxiliarySecurityHeader`] reader.
    pub fn auxiliary_security_header(&self) -> Option<AuxiliarySecurityHeader<&'_ [u8]>> {
        let fc = self.frame_control();

        if fc.security_enabled() {
            let mut offset = 2;

            offset += !fc.sequence_number_suppression() as usize;

            if let Some(af) = self.addressing() {
                offset += af.len();
            }

            if self.buffer.as_ref().len() < offset {
                return None;
            }

            AuxiliarySecurityHeader::new(&self.buffer.as_ref()[offset..]).ok()
        } else {
            None
        }
    }

    /// Return the command identifier.
    pub fn command_id(&self) -> CommandId {
        CommandId::from(self.buffer.as_ref()[self.payload_offset()])
    }
}

impl<'f, T: AsRef<[u8]> + ?Sized> CommandFrame<&'f T> {
    /// Return the MAC payload of the frame, starting with the command
    /// identifier.
    pub fn payload(&self) -> Option<&'f [u8]> {
        let offset = self.payload_offset();

        if self.buffer.as_ref().len() <= offset {
            return None;
        }

        Some(&self.buffer.as_ref()[offset..])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> CommandFrame<T> {
    /// Set the Frame Control field values in the buffer, based on the given
    /// [`FrameControlRepr`].
    pub fn set_frame_control(&mut self, fc: &FrameControlRepr) {
        let mut w = FrameControl::new_unchecked(&mut self.buffer.as_mut()[..2]);
        w.set_frame_type(fc.frame_type);
        w.set_security_enabled(fc.security_enabled);
        w.set_frame_pending(fc.frame_pending);
        w.set_ack_request(fc.ack_request);
        w.set_pan_id_compression(fc.pan_id_compression);
        w.set_sequence_number_suppression(fc.sequence_number_suppression);
        w.set_information_elements_present(fc.information_elements_present);
        w.set_dst_addressing_mode(fc.dst_addressing_mode);
        w.set_src_addressing_mode(fc.src_addressing_mode);
        w.set_frame_version(fc.frame_version);
    }

    /// Set the Sequence Number field value in the buffer.
    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        let mut w = FrameControl::new_unchecked(&mut self.buffer.as_mut()[..2]);
        w.set_sequence_number_suppression(false);

        self.buffer.as_mut()[2] = sequence_number;
    }

    /// Set the Addressing field values in the buffer, based on the given
    /// [`AddressingFieldsRepr`].
    pub fn set_addressing_fields(&mut self, addressing_fields: &AddressingFieldsRepr) {
        let start = 2 + (!self.frame_control().sequence_number_suppression() as usize);

        let (fc, addressing) = self.buffer.as_mut().split_at_mut(start);
        let mut w = AddressingFields::new_unchecked(addressing, FrameControl::new_unchecked(fc));
        w.write_fields(addressing_fields);
    }

    /// Set the MAC payload of the frame. The first octet is the command
    /// identifier.
    pub fn set_payload(&mut self, payload: &[u8]) {
        let offset = self.payload_offset();
        self.buffer.as_mut()[offset..].copy_from_slice(payload);
    }
}
