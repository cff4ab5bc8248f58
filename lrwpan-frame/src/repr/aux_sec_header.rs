use crate::{AuxiliarySecurityHeader, KeyIdentifierMode, SecurityLevel};

/// A high-level representation of the IEEE 802.15.4 Auxiliary Security Header.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuxiliarySecurityHeaderRepr {
    /// The security level, a value in `0..=7`.
    pub security_level: u8,
    /// The key identifier mode, a value in `0..=3`.
    pub key_identifier_mode: u8,
    /// The frame counter.
    pub frame_counter: u32,
    /// The key source. Only the first 4 octets are used in short source
    /// mode, and none in implicit or index mode.
    pub key_source: [u8; 8],
    /// The key index. Unused in implicit mode.
    pub key_index: u8,
}

impl AuxiliarySecurityHeaderRepr {
    /// Parse an Auxiliary Security Header.
    pub fn parse(header: &AuxiliarySecurityHeader<&[u8]>) -> Self {
        let control = header.security_control();

        let mut key_source = [0; 8];
        if let Some(source) = header.key_source() {
            key_source[..source.len()].copy_from_slice(source);
        }

        Self {
            security_level: control.security_level().value(),
            key_identifier_mode: control.key_identifier_mode() as u8,
            frame_counter: header.frame_counter(),
            key_source,
            key_index: header.key_index().unwrap_or(0),
        }
    }

    /// Return the length of the header when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        1 + 4 + KeyIdentifierMode::from(self.key_identifier_mode).len()
    }

    /// Return the length of the message integrity code appended to the
    /// payload at this security level.
    pub fn mic_length(&self) -> usize {
        SecurityLevel::from(self.security_level).mic_length()
    }
}
