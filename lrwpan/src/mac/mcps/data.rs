//! MCPS-DATA service primitives.

use bitflags::bitflags;
use lrwpan_frame::{
    Address, AddressingMode, AuxiliarySecurityHeaderRepr, DataFrame, FrameBuilder, FCS_LEN,
    MAX_MAC_PAYLOAD_SIZE, MAX_PHY_PACKET_SIZE, PHR_LEN,
};
use rand_core::RngCore;

use crate::mac::constants::BROADCAST_PAN_ID;
use crate::mac::{MacContext, Notification, Status};
use crate::phy::radio::Radio;
use crate::tal::{MessageType, TxFrame};
use crate::time::Instant;

bitflags! {
    /// Transmit options of an MCPS-DATA.request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TxOptions: u8 {
        /// Request an acknowledged transmission.
        const ACK = 0b0000_0001;
        /// Hold the frame in the transaction queue until the destination
        /// polls for it.
        const INDIRECT = 0b0000_0100;
    }
}

/// Requests the transfer of an MSDU to another device.
#[derive(Debug, Clone)]
pub struct DataRequest<'p> {
    /// The addressing mode this device uses as the source of the frame. The
    /// source address itself is taken from the PIB.
    pub src_addr_mode: AddressingMode,
    /// The identifier of the PAN of the destination.
    pub dst_pan_id: u16,
    /// The address of the destination. When absent, the frame carries no
    /// destination and is meant for the PAN coordinator.
    pub dst_addr: Address,
    /// The payload to transfer.
    pub msdu: &'p [u8],
    /// A handle for matching the confirm to this request.
    pub msdu_handle: u8,
    /// Transmission options.
    pub tx_options: TxOptions,
    /// The security level to apply to the frame. Zero leaves the frame
    /// unsecured.
    pub security_level: u8,
    /// The mode used to identify the key, when the frame is secured.
    pub key_identifier_mode: u8,
    /// The index of the key, when the key identifier mode carries one.
    pub key_index: u8,
}

impl Default for DataRequest<'_> {
    fn default() -> Self {
        Self {
            src_addr_mode: AddressingMode::Short,
            dst_pan_id: BROADCAST_PAN_ID,
            dst_addr: Address::Absent,
            msdu: &[],
            msdu_handle: 0,
            tx_options: TxOptions::empty(),
            security_level: 0,
            key_identifier_mode: 0,
            key_index: 0,
        }
    }
}

/// Reports the result of a request to transfer an MSDU to another device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataConfirm {
    /// The handle of the MSDU being confirmed.
    pub msdu_handle: u8,
    /// The result of the request.
    pub status: Status,
    /// The time the transmission reached its terminal state.
    pub timestamp: Instant,
}

/// Indicates the reception of an MSDU from another device.
///
/// PAN identifiers of elided addresses are reported as zero, as are the
/// addresses themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIndication {
    /// The PAN identifier of the source of the frame.
    pub src_pan_id: u16,
    /// The address of the source of the frame.
    pub src_addr: Address,
    /// The PAN identifier of the destination of the frame.
    pub dst_pan_id: u16,
    /// The address of the destination of the frame.
    pub dst_addr: Address,
    /// The received payload.
    pub msdu: heapless::Vec<u8, MAX_MAC_PAYLOAD_SIZE>,
    /// The link quality the frame was received with.
    pub mpdu_link_quality: u8,
    /// The sequence number of the frame.
    pub dsn: u8,
    /// The time the frame was received.
    pub timestamp: Instant,
}

impl<R: Radio, Rng: RngCore> MacContext<R, Rng> {
    /// Requests the transfer of an MSDU to another device.
    ///
    /// Every request is answered with exactly one [`DataConfirm`] on the
    /// notification queue: right away for parameter and capacity failures,
    /// otherwise once the transmission reaches a terminal state. A frame
    /// sent indirectly is confirmed when the destination has polled it or
    /// when it expires; purging it replaces the confirm with a
    /// [`PurgeConfirm`].
    ///
    /// [`PurgeConfirm`]: crate::mac::mcps::purge::PurgeConfirm
    pub fn data_request(&mut self, request: &DataRequest<'_>) {
        if let Err(status) = self.try_data_request(request) {
            let timestamp = self.now;
            self.notify(Notification::DataConfirm(DataConfirm {
                msdu_handle: request.msdu_handle,
                status,
                timestamp,
            }));
        }
    }

    fn try_data_request(&mut self, request: &DataRequest<'_>) -> Result<(), Status> {
        validate_data_request(request)?;
        let indirect = request.tx_options.contains(TxOptions::INDIRECT);
        // A busy transmitter rejects the request before a sequence number
        // is consumed.
        if !indirect && !self.tal.is_idle() {
            return Err(Status::ChannelAccessFailure);
        }
        let frame = self.build_data_frame(request)?;
        if indirect {
            self.queue_indirect(frame)
        } else {
            self.transmit_direct(frame)
        }
    }

    /// Build the MPDU of a data frame, consuming a sequence number.
    ///
    /// The sequence number counter advances even when the frame turns out
    /// too long to transmit.
    fn build_data_frame(&mut self, request: &DataRequest<'_>) -> Result<TxFrame, Status> {
        let dsn = self.next_sequence_number();

        let src_addr = match request.src_addr_mode {
            AddressingMode::Absent => Address::Absent,
            AddressingMode::Short => Address::Short(self.pib.short_address.to_be_bytes()),
            AddressingMode::Extended => match self.pib.extended_address {
                Some(addr) => Address::Extended(addr),
                None => return Err(Status::InvalidParameter),
            },
            AddressingMode::Unknown => return Err(Status::InvalidParameter),
        };

        let ack_request = request.tx_options.contains(TxOptions::ACK);
        let mut builder = FrameBuilder::new_data(request.msdu).set_sequence_number(dsn);
        if !matches!(request.dst_addr, Address::Absent) {
            builder = builder
                .set_dst_pan_id(request.dst_pan_id)
                .set_dst_address(request.dst_addr);
        }
        if !matches!(src_addr, Address::Absent) {
            builder = builder
                .set_src_pan_id(self.pib.pan_id)
                .set_src_address(src_addr);
        }
        if ack_request {
            builder = builder.set_ack_request(true);
        }

        let mut mic_length = 0;
        if request.security_level > 0 {
            let header = AuxiliarySecurityHeaderRepr {
                security_level: request.security_level,
                key_identifier_mode: request.key_identifier_mode,
                frame_counter: self.pib.frame_counter,
                key_source: [0; 8],
                key_index: request.key_index,
            };
            mic_length = header.mic_length();
            builder = builder.set_security(header);
            self.pib.frame_counter = self.pib.frame_counter.wrapping_add(1);
        }

        let repr = builder.finalize().map_err(|_| Status::InvalidParameter)?;

        // Room for the message integrity code is reserved even though the
        // payload goes out in the clear.
        if repr.buffer_len() + mic_length + FCS_LEN > MAX_PHY_PACKET_SIZE {
            return Err(Status::FrameTooLong);
        }

        let mut frame = TxFrame {
            buffer: heapless::Vec::new(),
            msg_type: MessageType::McpsData,
            msdu_handle: request.msdu_handle,
            expected_ack_dsn: ack_request.then_some(dsn),
        };
        frame
            .buffer
            .resize(PHR_LEN + repr.buffer_len() + FCS_LEN, 0)
            .map_err(|()| Status::FrameTooLong)?;
        frame.buffer[0] = (repr.buffer_len() + FCS_LEN) as u8;
        let end = frame.buffer.len() - FCS_LEN;
        repr.emit(&mut DataFrame::new_unchecked(
            &mut frame.buffer[PHR_LEN..end],
        ));
        Ok(frame)
    }
}

fn validate_data_request(request: &DataRequest<'_>) -> Result<(), Status> {
    // An acknowledged transmission to the broadcast address is meaningless.
    if request.dst_addr.is_broadcast() && request.tx_options.contains(TxOptions::ACK) {
        return Err(Status::InvalidParameter);
    }
    if matches!(request.src_addr_mode, AddressingMode::Unknown) {
        return Err(Status::InvalidParameter);
    }
    if matches!(request.src_addr_mode, AddressingMode::Absent)
        && matches!(request.dst_addr, Address::Absent)
    {
        return Err(Status::InvalidAddress);
    }
    if request.security_level > 7 || request.key_identifier_mode > 3 {
        return Err(Status::InvalidParameter);
    }
    Ok(())
}
