use crate::FrameType;

use super::{DataFrame, Error, Frame, Result};

mod addressing;
pub use addressing::AddressingFieldsRepr;

mod aux_sec_header;
pub use aux_sec_header::AuxiliarySecurityHeaderRepr;

mod frame_control;
pub use frame_control::FrameControlRepr;

mod builder;
pub use builder::{Ack, Data, FrameBuilder};

/// A high-level representation of an IEEE 802.15.4 frame.
#[derive(Debug)]
pub struct FrameRepr<'p> {
    /// The frame control field.
    pub frame_control: FrameControlRepr,
    /// The sequence number.
    pub sequence_number: Option<u8>,
    /// The addressing fields.
    pub addressing_fields: Option<AddressingFieldsRepr>,
    /// The auxiliary security header.
    pub auxiliary_security_header: Option<AuxiliarySecurityHeaderRepr>,
    /// The payload.
    pub payload: Option<&'p [u8]>,
}

impl<'f> FrameRepr<'f> {
    /// Parse an IEEE 802.15.4 frame.
    pub fn parse(reader: &Frame<&'f [u8]>) -> Result<Self> {
        let frame_control = FrameControlRepr::parse(reader.frame_control())?;
        let addressing_fields = reader.addressing().map(AddressingFieldsRepr::parse);
        let auxiliary_security_header = reader
            .auxiliary_security_header()
            .map(|header| AuxiliarySecurityHeaderRepr::parse(&header));

        Ok(Self {
            frame_control,
            sequence_number: reader.sequence_number(),
            addressing_fields,
            auxiliary_security_header,
            payload: reader.payload(),
        })
    }

    /// Validate the frame.
    pub fn validate(&self) -> Result<()> {
        // If the frame type is data, then the addressing fields must be present.
        if self.frame_control.frame_type == FrameType::Data {
            if self.addressing_fields.is_none() {
                return Err(Error);
            }

            if self.payload.is_none() {
                return Err(Error);
            }
        }

        // The security enabled bit and the auxiliary security header must agree.
        if self.frame_control.security_enabled != self.auxiliary_security_header.is_some() {
            return Err(Error);
        }

        // If the addressing fields are present, they must be valid.
        if let Some(af) = &self.addressing_fields {
            af.validate(&self.frame_control)?;
        }

        Ok(())
    }

    /// Return the length of the frame when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        let mut len = 2; // Frame control

        if self.sequence_number.is_some() {
            len += 1;
        }

        if let Some(af) = &self.addressing_fields {
            len += af.buffer_len(&self.frame_control);
        }

        if let Some(header) = &self.auxiliary_security_header {
            len += header.buffer_len();
        }

        if let Some(payload) = self.payload {
            len += payload.len();
        }

        len
    }

    /// Emit the frame into a buffer.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, frame: &mut DataFrame<T>) {
        frame.set_frame_control(&self.frame_control);

        if let Some(sequence_number) = self.sequence_number {
            frame.set_sequence_number(sequence_number);
        }

        if let Some(af) = &self.addressing_fields {
            frame.set_addressing_fields(af);
        }

        if let Some(header) = &self.auxiliary_security_header {
            frame.set_aux_sec_header(header);
        }

        if let Some(payload) = self.payload {
            frame.set_payload(payload);
        }
    }
}
