use crate::{Error, Result};

use crate::FrameControl;

/// A reader/writer for an IEEE 802.15.4 immediate Acknowledgment frame.
///
/// An immediate acknowledgment consists of the frame control field and a
/// sequence number, nothing more.
pub struct AckFrame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AckFrame<T> {
    /// Create a new [`AckFrame`] reader/writer from a given buffer.
    pub fn new(buffer: T) -> Result<Self> {
        let ack = Self::new_unchecked(buffer);

        if !ack.check_len() {
            return Err(Error);
        }

        Ok(ack)
    }

    /// Returns `false` if the buffer is too short to contain an acknowledgment frame.
    pub fn check_len(&self) -> bool {
        self.buffer.as_ref().len() == 3
    }

    /// Create a new [`AckFrame`] reader/writer from a given buffer without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Returns a [`FrameControl`] reader.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        FrameControl::new_unchecked(&self.buffer.as_ref()[..2])
    }

    /// Returns the sequence number field.
    pub fn sequence_number(&self) -> u8 {
        self.buffer.as_ref()[2]
    }
}
