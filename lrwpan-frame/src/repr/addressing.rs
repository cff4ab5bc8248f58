use super::FrameControlRepr;
use crate::{Address, AddressingFields, AddressingMode, Error, FrameType, Result};

/// A high-level representation of the IEEE 802.15.4 addressing fields.
#[derive(Debug, Default)]
pub struct AddressingFieldsRepr {
    /// The destination PAN ID.
    pub dst_pan_id: Option<u16>,
    /// The source PAN ID.
    pub src_pan_id: Option<u16>,
    /// The destination address.
    pub dst_address: Option<Address>,
    /// The source address.
    pub src_address: Option<Address>,
}

impl AddressingFieldsRepr {
    /// Parse the addressing fields.
    pub fn parse(addressing: AddressingFields<&[u8], &[u8]>) -> Self {
        Self {
            dst_pan_id: addressing.dst_pan_id(),
            src_pan_id: addressing.src_pan_id(),
            dst_address: addressing.dst_address(),
            src_address: addressing.src_address(),
        }
    }

    /// Validate the addressing fields against the frame control field.
    pub fn validate(&self, fc: &FrameControlRepr) -> Result<()> {
        // A data frame carries at least one address.
        if fc.frame_type == FrameType::Data
            && self.dst_address.is_none()
            && self.src_address.is_none()
        {
            return Err(Error);
        }

        Ok(())
    }

    /// Return the length of the addressing fields in bytes.
    pub fn buffer_len(&self, fc: &FrameControlRepr) -> usize {
        let mut len = 0;

        if self.dst_pan_id.is_some() {
            len += 2;
        }

        len += fc.dst_addressing_mode.size();

        if self.src_pan_id.is_some() {
            len += 2;
        }

        len += fc.src_addressing_mode.size();

        len
    }

    /// Return the addressing mode of the destination address.
    pub fn dst_addressing_mode(&self) -> AddressingMode {
        match self.dst_address {
            Some(addr) => addr.into(),
            None => AddressingMode::Absent,
        }
    }

    /// Return the addressing mode of the source address.
    pub fn src_addressing_mode(&self) -> AddressingMode {
        match self.src_address {
            Some(addr) => addr.into(),
            None => AddressingMode::Absent,
        }
    }
}
