//! High-level representation of IEEE 802.15.4 frames.

use crate::{Error, Result};

use crate::{AddressingFields, AuxiliarySecurityHeader, FrameControl, FrameType, FrameVersion};

pub(crate) mod ack;
pub(crate) mod command;
pub(crate) mod data;

pub use ack::*;
pub use command::*;
pub use data::*;

/// A high-level representation of an IEEE 802.15.4 frame with a Frame Check Sequence (FCS).
pub struct FrameWithFcs<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> FrameWithFcs<T> {
    /// Create a new [`FrameWithFcs`] from a given buffer.
    pub fn new(buffer: T) -> Result<Self> {
        let frame = Self::new_unchecked(buffer);

        if !frame.check_len() {
            return Err(Error);
        }

        if !frame.check_fcs() {
            return Err(Error);
        }

        Ok(frame)
    }

    /// Check the length of the frame.
    pub fn check_len(&self) -> bool {
        self.buffer.as_ref().len() >= 2
    }

    /// Calculate the Frame Check Sequence (FCS) of the frame.
    #[inline]
    pub fn calculate_fcs(&self) -> u16 {
        // The FCS field contains a 16-bit ITU-T CRC, using the x^16 + x^12 + x^5 + 1 polynomial.
        // Unlike most CRCs, the initial and final values are both 0x0000, instead of 0xFFFF as
        // defined by the ITU-T CRC-16 standard. The CRC is calculated over the entire frame,
        // excluding the FCS field itself.
        const CRC_16_IEEE802154: crc::Algorithm<u16> = crc::Algorithm {
            width: 16,
            poly: 0x1021,
            init: 0x0000,
            refin: true,
            refout: true,
            xorout: 0x0000,
            check: 0x2189,
            residue: 0x0000,
        };
        crc::Crc::<u16>::new(&CRC_16_IEEE802154).checksum(self.content())
    }

    /// Check the Frame Check Sequence (FCS) of the frame.
    #[inline]
    pub fn check_fcs(&self) -> bool {
        self.calculate_fcs() == self.fcs()
    }

    /// Create a new [`FrameWithFcs`] from a given buffer without checking the FCS.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the content of the frame, excluding the FCS.
    pub fn content(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.buffer.as_ref().len() - 2]
    }

    /// Return the Frame Check Sequence (FCS) of the frame.
    pub fn fcs(&self) -> u16 {
        let len = self.buffer.as_ref().len();
        u16::from_le_bytes([self.buffer.as_ref()[len - 2], self.buffer.as_ref()[len - 1]])
    }

    /// Return a high-level representation of the frame, excluding the FCS.
    pub fn frame(&self) -> Result<Frame<&'_ [u8]>> {
        Frame::new(self.content())
    }
}

/// A high-level representation of an IEEE 802.15.4 frame.
pub enum Frame<T: AsRef<[u8]>> {
    /// An acknowledgment frame.
    Ack(AckFrame<T>),
    /// A data frame.
    Data(DataFrame<T>),
    /// A MAC command frame.
    Command(CommandFrame<T>),
}

impl<T: AsRef<[u8]>> Frame<T> {
    /// Create a new [`Frame`] from a given buffer.
    pub fn new(buffer: T) -> Result<Self> {
        if buffer.as_ref().len() < 2 {
            return Err(Error);
        }

        let frame_control = FrameControl::new(&buffer.as_ref()[..2])?;

        match frame_control.frame_version() {
            FrameVersion::Ieee802154_2003 | FrameVersion::Ieee802154_2006 => {}
            _ => return Err(Error),
        }

        match frame_control.frame_type() {
            FrameType::Ack => Ok(Frame::Ack(AckFrame::new(buffer)?)),
            FrameType::Data => Ok(Frame::Data(DataFrame::new(buffer)?)),
            FrameType::MacCommand => Ok(Frame::Command(CommandFrame::new(buffer)?)),
            _ => Err(Error),
        }
    }

    /// Convert the [`Frame`] into an [`AckFrame`].
    ///
    /// # Panics
    /// Panics if the frame is not an ack.
    pub fn into_ack(self) -> AckFrame<T> {
        match self {
            Frame::Ack(frame) => frame,
            _ => panic!("not an ack"),
        }
    }

    /// Convert the [`Frame`] into a [`DataFrame`].
    ///
    /// # Panics
    /// Panics if the frame is not a data frame.
    pub fn into_data(self) -> DataFrame<T> {
        match self {
            Frame::Data(frame) => frame,
            _ => panic!("not a data frame"),
        }
    }

    /// Convert the [`Frame`] into a [`CommandFrame`].
    ///
    /// # Panics
    /// Panics if the frame is not a MAC command frame.
    pub fn into_command(self) -> CommandFrame<T> {
        match self {
            Frame::Command(frame) => frame,
            _ => panic!("not a MAC command frame"),
        }
    }

    /// Return the frame control field of the frame.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        match self {
            Frame::Ack(frame) => frame.frame_control(),
            Frame::Data(frame) => frame.frame_control(),
            Frame::Command(frame) => frame.frame_control(),
        }
    }

    /// Return the sequence number of the frame.
    pub fn sequence_number(&self) -> Option<u8> {
        match self {
            Frame::Ack(frame) => Some(frame.sequence_number()),
            Frame::Data(frame) => frame.sequence_number(),
            Frame::Command(frame) => frame.sequence_number(),
        }
    }

    /// Return the addressing field of the frame.
    pub fn addressing(&self) -> Option<AddressingFields<&'_ [u8], &'_ [u8]>> {
        match self {
            Frame::Ack(_) => None,
            Frame::Data(frame) => frame.addressing(),
            Frame::Command(frame) => frame.addressing(),
        }
    }

    /// Return the auxiliary security header of the frame.
    pub fn auxiliary_security_header(&self) -> Option<AuxiliarySecurityHeader<&'_ [u8]>> {
        match self {
            Frame::Ack(_) => None,
            Frame::Data(frame) => frame.auxiliary_security_header(),
            Frame::Command(frame) => frame.auxiliary_security_header(),
        }
    }
}

impl<'f, T: AsRef<[u8]> + ?Sized> Frame<&'f T> {
    /// Return the MAC payload of the frame.
    ///
    /// For MAC command frames, the payload starts with the command
    /// identifier.
    pub fn payload(&self) -> Option<&'f [u8]> {
        match self {
            Frame::Ack(_) => None,
            Frame::Data(frame) => frame.payload(),
            Frame::Command(frame) => frame.payload(),
        }
    }
}
