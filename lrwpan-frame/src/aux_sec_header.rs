//! Auxiliary Security Header readers and writers.

use super::{Error, Result};

/// A reader/writer for the IEEE 802.15.4 Auxiliary Security Header.
///
/// The header consists of the Security Control field, the Frame Counter
/// field and, depending on the key identifier mode, a Key Identifier field.
#[derive(Debug)]
pub struct AuxiliarySecurityHeader<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AuxiliarySecurityHeader<T> {
    /// Create a new [`AuxiliarySecurityHeader`] reader/writer from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short to contain the header.
    pub fn new(buffer: T) -> Result<Self> {
        let header = Self::new_unchecked(buffer);

        if !header.check_len() {
            return Err(Error);
        }

        Ok(header)
    }

    /// Returns `false` if the buffer is too short to contain the header.
    fn check_len(&self) -> bool {
        let buffer = self.buffer.as_ref();

        if buffer.is_empty() {
            return false;
        }

        buffer.len() >= self.len()
    }

    /// Create a new [`AuxiliarySecurityHeader`] reader/writer from a given
    /// buffer without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the length of the Auxiliary Security Header in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + 4 + self.security_control().key_identifier_mode().len()
    }

    /// Return the Security Control field.
    pub fn security_control(&self) -> SecurityControl {
        SecurityControl::from(self.buffer.as_ref()[0])
    }

    /// Return the Frame Counter field.
    pub fn frame_counter(&self) -> u32 {
        let b = &self.buffer.as_ref()[1..5];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Return the key source part of the Key Identifier field, if present.
    pub fn key_source(&self) -> Option<&[u8]> {
        match self.security_control().key_identifier_mode() {
            KeyIdentifierMode::ShortSource => Some(&self.buffer.as_ref()[5..9]),
            KeyIdentifierMode::ExtendedSource => Some(&self.buffer.as_ref()[5..13]),
            _ => None,
        }
    }

    /// Return the key index part of the Key Identifier field, if present.
    pub fn key_index(&self) -> Option<u8> {
        match self.security_control().key_identifier_mode() {
            KeyIdentifierMode::Implicit => None,
            KeyIdentifierMode::Index => Some(self.buffer.as_ref()[5]),
            KeyIdentifierMode::ShortSource => Some(self.buffer.as_ref()[9]),
            KeyIdentifierMode::ExtendedSource => Some(self.buffer.as_ref()[13]),
            KeyIdentifierMode::Unknown => None,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> AuxiliarySecurityHeader<T> {
    /// Write the given Auxiliary Security Header into the buffer.
    pub fn write_fields(&mut self, fields: &super::repr::AuxiliarySecurityHeaderRepr) {
        let buffer = self.buffer.as_mut();

        buffer[0] = (fields.security_level & 0b111) | ((fields.key_identifier_mode & 0b11) << 3);
        buffer[1..5].copy_from_slice(&fields.frame_counter.to_le_bytes());

        match KeyIdentifierMode::from(fields.key_identifier_mode) {
            KeyIdentifierMode::Implicit | KeyIdentifierMode::Unknown => {}
            KeyIdentifierMode::Index => buffer[5] = fields.key_index,
            KeyIdentifierMode::ShortSource => {
                buffer[5..9].copy_from_slice(&fields.key_source[..4]);
                buffer[9] = fields.key_index;
            }
            KeyIdentifierMode::ExtendedSource => {
                buffer[5..13].copy_from_slice(&fields.key_source);
                buffer[13] = fields.key_index;
            }
        }
    }
}

/// A reader for the IEEE 802.15.4 Security Control field.
pub struct SecurityControl {
    buffer: u8,
}

impl SecurityControl {
    /// Create a new [`SecurityControl`] reader from the raw field value.
    pub fn from(buffer: u8) -> Self {
        Self { buffer }
    }

    /// Return the security level field.
    pub fn security_level(&self) -> SecurityLevel {
        SecurityLevel::from(self.buffer & 0b111)
    }

    /// Return the key identifier mode field.
    pub fn key_identifier_mode(&self) -> KeyIdentifierMode {
        KeyIdentifierMode::from((self.buffer >> 3) & 0b11)
    }
}

/// A Security Level field.
pub struct SecurityLevel {
    buffer: u8,
}

impl SecurityLevel {
    /// Create a new [`SecurityLevel`] reader from the raw field value.
    pub fn from(buffer: u8) -> Self {
        Self { buffer }
    }

    /// Return the raw security level value.
    pub fn value(&self) -> u8 {
        self.buffer
    }

    /// Return the used Security Attributes.
    pub fn security_attributes(&self) -> SecurityAttributes {
        match self.buffer {
            0 => SecurityAttributes::None,
            1 => SecurityAttributes::Mic32,
            2 => SecurityAttributes::Mic64,
            3 => SecurityAttributes::Mic128,
            5 => SecurityAttributes::EncMic32,
            6 => SecurityAttributes::EncMic64,
            7 => SecurityAttributes::EncMic128,
            _ => SecurityAttributes::Unknown,
        }
    }

    /// Return `true` when confidentiality is enabled.
    pub fn data_confidentiality(&self) -> bool {
        (self.buffer >> 2) & 0b1 == 1
    }

    /// Return `true` when authenticity is enabled.
    pub fn data_authenticity(&self) -> bool {
        self.buffer & 0b11 != 0
    }

    /// Return the MIC length implied by the security level.
    pub fn mic_length(&self) -> usize {
        match self.security_attributes() {
            SecurityAttributes::Mic32 | SecurityAttributes::EncMic32 => 4,
            SecurityAttributes::Mic64 | SecurityAttributes::EncMic64 => 8,
            SecurityAttributes::Mic128 | SecurityAttributes::EncMic128 => 16,
            _ => 0,
        }
    }
}

/// The protection a security level provides.
pub enum SecurityAttributes {
    /// No confidentiality and no authenticity.
    None,
    /// A 32-bit MIC.
    Mic32,
    /// A 64-bit MIC.
    Mic64,
    /// A 128-bit MIC.
    Mic128,
    /// Encryption and a 32-bit MIC.
    EncMic32,
    /// Encryption and a 64-bit MIC.
    EncMic64,
    /// Encryption and a 128-bit MIC.
    EncMic128,
    /// An unknown security level.
    Unknown,
}

/// A Key Identifier Mode field.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum KeyIdentifierMode {
    /// The key is determined implicitly.
    Implicit = 0b00,
    /// The key is determined from the key index.
    Index = 0b01,
    /// The key is determined from a 4-octet key source and the key index.
    ShortSource = 0b10,
    /// The key is determined from an 8-octet key source and the key index.
    ExtendedSource = 0b11,
    /// An unknown key identifier mode.
    Unknown,
}

impl KeyIdentifierMode {
    /// Return the length of the Key Identifier field in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::Implicit => 0,
            Self::Index => 1,
            Self::ShortSource => 5,
            Self::ExtendedSource => 9,
            Self::Unknown => 0,
        }
    }
}

impl From<u8> for KeyIdentifierMode {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Implicit,
            0b01 => Self::Index,
            0b10 => Self::ShortSource,
            0b11 => Self::ExtendedSource,
            _ => Self::Unknown,
        }
    }
}
