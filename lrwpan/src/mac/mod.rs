//! IEEE 802.15.4 MAC sublayer data path.
//!
//! The MAC sits between a higher layer issuing MCPS requests and the
//! transceiver abstraction layer driving the radio. A single
//! [`MacContext`] owns all protocol state and advances it one hardware
//! event at a time, so integrators run it from a plain event loop
//! instead of interrupt handlers touching shared globals.

pub mod constants;
mod dedup;
mod indirect;
pub mod mcps;
pub mod mlme;
mod persistence;
pub mod pib;

use lrwpan_frame::{
    Address, AddressingFields, CommandId, DataFrame, Frame, FrameBuilder, FrameWithFcs, FCS_LEN,
    MAX_PHY_PACKET_SIZE, PHR_LEN,
};
use rand_core::RngCore;

use crate::mac::constants::{
    BROADCAST_PAN_ID, BROADCAST_SHORT_ADDRESS, MAC_EVENT_QUEUE_CAPACITY,
    MAC_NOTIFICATION_QUEUE_CAPACITY, NO_SHORT_ADDRESS,
};
use crate::mac::dedup::DuplicateFilter;
use crate::mac::indirect::IndirectQueue;
use crate::mac::mcps::data::{DataConfirm, DataIndication};
use crate::mac::mcps::purge::PurgeConfirm;
use crate::mac::mlme::{CommStatusIndication, DisassociateConfirm};
use crate::mac::persistence::PersistenceTimer;
use crate::mac::pib::Pib;
use crate::phy::radio::Radio;
use crate::sync::EventChannel;
use crate::tal::{CsmaMode, MessageType, Transmitter, TxFrame, TxStatus};
use crate::time::Instant;

/// Result of a MAC service request, carried inside a confirm primitive
/// (section 8.2.5.2, excerpt of the status value set).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The request completed successfully.
    Success,
    /// Every CSMA-CA attempt found the channel busy, or the transmitter
    /// could not take the frame.
    ChannelAccessFailure,
    /// A request parameter was out of range or unsupported.
    InvalidParameter,
    /// Neither a source nor a destination address was given.
    InvalidAddress,
    /// The transaction queue has no room left.
    TransactionOverflow,
    /// The transaction was held longer than its persistence time without
    /// being polled.
    TransactionExpired,
    /// The frame would exceed the maximum PHY packet size.
    FrameTooLong,
    /// No pending transaction carries the given handle.
    InvalidHandle,
    /// No acknowledgment arrived, even after all retries.
    NoAck,
}

impl From<TxStatus> for Status {
    fn from(status: TxStatus) -> Self {
        match status {
            TxStatus::Success { .. } => Status::Success,
            TxStatus::ChannelAccessFailure => Status::ChannelAccessFailure,
            TxStatus::NoAck => Status::NoAck,
        }
    }
}

/// A frame delivered by the radio, FCS included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedFrame {
    /// The raw MPDU, including the two FCS octets.
    pub mpdu: heapless::Vec<u8, MAX_PHY_PACKET_SIZE>,
    /// The link quality indication measured during reception.
    pub link_quality: u8,
    /// The time reception completed.
    pub timestamp: Instant,
}

/// A hardware event feeding the MAC event loop.
///
/// Producers typically run in interrupt context and push into an
/// [`EventChannel`]; the event loop drains the channel with
/// [`MacContext::poll`].
#[derive(Debug, Clone)]
pub enum Event {
    /// The radio finished transmitting the frame it was handed.
    TxDone(Instant),
    /// The radio received a frame.
    RxDone(ReceivedFrame),
    /// A deadline reported by [`MacContext::next_deadline`] elapsed.
    TimerTick(Instant),
}

/// Event channel sized for the MAC event loop.
pub type MacEventChannel = EventChannel<Event, MAC_EVENT_QUEUE_CAPACITY>;

/// An upper layer primitive waiting to be drained.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Result of an MCPS-DATA.request.
    DataConfirm(DataConfirm),
    /// An MSDU arrived for this device.
    DataIndication(DataIndication),
    /// Result of an MCPS-PURGE.request.
    PurgeConfirm(PurgeConfirm),
    /// Fate of a command frame the MAC transmitted on its own behalf.
    CommStatus(CommStatusIndication),
    /// Fate of a disassociation notification held for a sleeping device.
    DisassociateConfirm(DisassociateConfirm),
}

/// The MAC data path of a single device.
///
/// One instance owns every piece of shared protocol state: the PIB, the
/// sequence number counter, the transaction queue, the duplicate filter
/// and the transmit state machine. Nothing in here blocks; waiting is
/// expressed as state and resolved by a later event.
pub struct MacContext<R: Radio, Rng: RngCore> {
    /// The radio driver transmissions go out on.
    radio: R,
    /// Source of CSMA backoff randomness.
    rng: Rng,
    /// The PAN information base.
    pub pib: Pib,
    /// The transmit state machine.
    pub(crate) tal: Transmitter,
    /// Transactions held for polling devices.
    pub(crate) indirect: IndirectQueue,
    persistence: PersistenceTimer,
    dedup: DuplicateFilter,
    /// Outgoing data sequence number counter.
    dsn: u8,
    /// Time of the most recently handled event.
    pub(crate) now: Instant,
    notifications: heapless::Deque<Notification, MAC_NOTIFICATION_QUEUE_CAPACITY>,
}

impl<R: Radio, Rng: RngCore> MacContext<R, Rng> {
    /// Create a MAC context around a radio driver.
    ///
    /// The data sequence number starts at a random value (section
    /// 8.4.3.1) and the extended address is taken from the radio when
    /// the PIB does not already carry one.
    pub fn new(radio: R, mut rng: Rng, mut pib: Pib) -> Self {
        if pib.extended_address.is_none() {
            pib.extended_address = Some(radio.ieee802154_address());
        }
        let dsn = (rng.next_u32() & 0xff) as u8;
        Self {
            radio,
            rng,
            pib,
            tal: Transmitter::new(),
            indirect: IndirectQueue::default(),
            persistence: PersistenceTimer::default(),
            dedup: DuplicateFilter::default(),
            dsn,
            now: Instant::from_us(0),
            notifications: heapless::Deque::new(),
        }
    }

    /// Advance the data path with one hardware event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::TxDone(timestamp) => {
                self.now = timestamp;
                if let Some((frame, status)) = self.tal.tx_done(&self.pib, timestamp) {
                    self.dispatch_tx_status(frame, status);
                }
            }
            Event::RxDone(frame) => {
                self.now = frame.timestamp;
                self.process_received_frame(&frame);
            }
            Event::TimerTick(now) => {
                self.now = now;
                self.handle_tick(now);
            }
        }
    }

    /// Drain the event channel, handling every queued event in order.
    pub fn poll<const N: usize>(&mut self, events: &EventChannel<Event, N>) {
        while let Some(event) = events.receive() {
            self.handle_event(event);
        }
    }

    /// Remove the oldest pending upper layer notification.
    pub fn pop_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    /// The earliest point in time a [`Event::TimerTick`] is expected.
    ///
    /// `None` means no timeout is pending and the context only needs to
    /// run again for a radio event.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tal.next_deadline(), self.persistence.deadline()) {
            (Some(tal), Some(persistence)) => Some(tal.min(persistence)),
            (tal, persistence) => tal.or(persistence),
        }
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        if self.notifications.push_back(notification).is_err() {
            error!("notification queue full, dropping notification");
        }
    }

    /// Allocate the next outgoing data sequence number.
    pub(crate) fn next_sequence_number(&mut self) -> u8 {
        let dsn = self.dsn;
        self.dsn = self.dsn.wrapping_add(1);
        dsn
    }

    /// Hold a frame until its destination polls for it, arming the
    /// persistence timer when the queue was empty.
    pub(crate) fn queue_indirect(&mut self, frame: TxFrame) -> Result<(), Status> {
        self.indirect
            .enqueue(frame, self.pib.transaction_persistence_time)
            .map_err(|_| Status::TransactionOverflow)?;
        self.persistence.start(self.now, self.pib.beacon_order);
        Ok(())
    }

    /// Disarm the persistence timer once the last transaction left the
    /// queue, so [`next_deadline`] stops reporting a wakeup with nothing
    /// to age.
    ///
    /// [`next_deadline`]: MacContext::next_deadline
    pub(crate) fn stop_persistence_when_idle(&mut self) {
        if self.indirect.is_empty() {
            self.persistence.stop();
        }
    }

    /// Hand a frame to the transmitter for immediate delivery.
    pub(crate) fn transmit_direct(&mut self, frame: TxFrame) -> Result<(), Status> {
        self.start_transmission(frame, CsmaMode::Unslotted, true)
            .map_err(|_| Status::ChannelAccessFailure)
    }

    /// Start a transmit session, dispatching a completion that is
    /// reached without any waiting. The frame comes back when the
    /// transmitter is busy.
    fn start_transmission(
        &mut self,
        frame: TxFrame,
        mode: CsmaMode,
        perform_frame_retry: bool,
    ) -> Result<(), TxFrame> {
        match self.tal.transmit(
            &mut self.radio,
            &mut self.rng,
            &self.pib,
            frame,
            mode,
            perform_frame_retry,
            self.now,
        )? {
            Some((frame, status)) => {
                self.dispatch_tx_status(frame, status);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Route a terminal transmit status to its consumer, based on the
    /// message type of the completed frame.
    fn dispatch_tx_status(&mut self, frame: TxFrame, status: TxStatus) {
        let delivered = matches!(status, TxStatus::Success { .. });
        let timestamp = self.now;
        match frame.msg_type {
            MessageType::McpsData => {
                if self.indirect.has_in_transit() {
                    self.indirect.finish_in_transit(delivered);
                    if delivered {
                        self.notify(Notification::DataConfirm(DataConfirm {
                            msdu_handle: frame.msdu_handle,
                            status: Status::Success,
                            timestamp,
                        }));
                    } else {
                        debug!("indirect delivery failed, the transaction stays queued");
                    }
                } else {
                    self.notify(Notification::DataConfirm(DataConfirm {
                        msdu_handle: frame.msdu_handle,
                        status: status.into(),
                        timestamp,
                    }));
                }
            }
            // Association responses only travel indirectly, so the in
            // transit flag is cleared without further checks.
            MessageType::AssociationResponse => {
                self.indirect.finish_in_transit(delivered);
                if delivered {
                    let dst_addr = frame_destination(&frame)
                        .map(|(_, addr)| addr)
                        .unwrap_or(Address::Absent);
                    let indication = CommStatusIndication {
                        pan_id: self.pib.pan_id,
                        src_addr: self.own_extended_address(),
                        dst_addr,
                        status: Status::Success,
                    };
                    self.notify(Notification::CommStatus(indication));
                }
            }
            MessageType::DisassociationNotification => {
                self.indirect.finish_in_transit(delivered);
                if delivered {
                    let (device_pan_id, device_addr) = frame_destination(&frame)
                        .unwrap_or((self.pib.pan_id, Address::Absent));
                    self.notify(Notification::DisassociateConfirm(DisassociateConfirm {
                        status: Status::Success,
                        device_pan_id,
                        device_addr,
                    }));
                }
            }
            // Null data frames only carry the frame pending bit and are
            // never reported upward.
            MessageType::NullFrame => {}
        }
        self.stop_persistence_when_idle();
    }

    /// Run a received frame through FCS verification, address filtering
    /// and dispatch.
    fn process_received_frame(&mut self, received: &ReceivedFrame) {
        let Ok(with_fcs) = FrameWithFcs::new(received.mpdu.as_slice()) else {
            debug!("dropping frame with invalid FCS");
            return;
        };
        let Ok(frame) = with_fcs.frame() else {
            debug!("dropping malformed frame");
            return;
        };

        // A pending channel assessment is parked while the frame is
        // handled and resumed with a fresh backoff afterwards.
        self.tal.defer();

        match &frame {
            Frame::Ack(ack) => {
                let frame_pending = ack.frame_control().frame_pending();
                if let Some((frame, status)) =
                    self.tal.handle_ack(ack.sequence_number(), frame_pending)
                {
                    self.dispatch_tx_status(frame, status);
                }
            }
            Frame::Data(data) => {
                if let Some(addressing) = data.addressing() {
                    if self.accepts(&addressing) {
                        self.process_data_frame(
                            data,
                            received.link_quality,
                            received.timestamp,
                        );
                    }
                }
            }
            Frame::Command(command) => {
                if let Some(addressing) = command.addressing() {
                    if self.accepts(&addressing) {
                        match command.command_id() {
                            CommandId::DataRequest => {
                                self.process_data_request_command(&addressing);
                            }
                            _ => trace!("ignoring unhandled MAC command"),
                        }
                    }
                }
            }
        }

        if let Some((frame, status)) = self.tal.continue_deferred(
            &mut self.radio,
            &mut self.rng,
            &self.pib,
            self.now,
        ) {
            self.dispatch_tx_status(frame, status);
        }
    }

    /// First level filtering of section 6.7.2: frames not addressed to
    /// this device are dropped, unless promiscuous mode is on.
    fn accepts(&self, addressing: &AddressingFields<&[u8], &[u8]>) -> bool {
        if self.pib.promiscuous_mode {
            return true;
        }
        let pan_id_matches = matches!(
            addressing.dst_pan_id(),
            Some(pan_id) if pan_id == self.pib.pan_id || pan_id == BROADCAST_PAN_ID
        );
        if !pan_id_matches {
            return false;
        }
        match addressing.dst_address() {
            Some(Address::Short(address)) => {
                address == self.pib.short_address.to_be_bytes()
                    || address == BROADCAST_SHORT_ADDRESS.to_be_bytes()
            }
            Some(Address::Extended(address)) => Some(address) == self.pib.extended_address,
            _ => false,
        }
    }

    fn process_data_frame(
        &mut self,
        frame: &DataFrame<&[u8]>,
        link_quality: u8,
        timestamp: Instant,
    ) {
        let payload = frame.payload().unwrap_or(&[]);
        if payload.is_empty() {
            // Null data frames are neither indicated nor remembered by
            // the duplicate filter.
            trace!("ignoring null data frame");
            return;
        }
        let Some(sequence_number) = frame.sequence_number() else {
            return;
        };
        let Some(addressing) = frame.addressing() else {
            return;
        };

        let src_addr = addressing.src_address().unwrap_or(Address::Absent);
        if self.dedup.is_duplicate(sequence_number, src_addr) {
            debug!("dropping retransmitted frame");
            return;
        }

        // An elided source PAN ID means the frame was sent with PAN ID
        // compression, carrying the identifier in the destination field.
        let src_pan_id = match src_addr {
            Address::Absent => 0,
            _ => addressing
                .src_pan_id()
                .or(addressing.dst_pan_id())
                .unwrap_or(0),
        };

        let mut msdu = heapless::Vec::new();
        if msdu.extend_from_slice(payload).is_err() {
            return;
        }
        self.notify(Notification::DataIndication(DataIndication {
            src_pan_id,
            src_addr,
            dst_pan_id: addressing.dst_pan_id().unwrap_or(0),
            dst_addr: addressing.dst_address().unwrap_or(Address::Absent),
            msdu,
            mpdu_link_quality: link_quality,
            dsn: sequence_number,
            timestamp,
        }));
    }

    /// Serve a data request command with a held transaction, or answer
    /// with a null data frame when nothing is pending for the poller.
    ///
    /// Transmission happens right after the acknowledgment of the
    /// command, so an interframe space is used instead of CSMA-CA, and
    /// a failed attempt is not retried (the device polls again).
    fn process_data_request_command(&mut self, addressing: &AddressingFields<&[u8], &[u8]>) {
        if !self.tal.is_idle() {
            debug!("transmitter busy, ignoring data request command");
            return;
        }
        let src_addr = addressing.src_address().unwrap_or(Address::Absent);
        if matches!(src_addr, Address::Absent) {
            return;
        }
        let Some(src_pan_id) = addressing.src_pan_id().or(addressing.dst_pan_id()) else {
            return;
        };

        if let Some(frame) = self.indirect.serve_poll(src_pan_id, src_addr) {
            if self
                .start_transmission(frame, CsmaMode::NoCsmaWithIfs, false)
                .is_err()
            {
                self.indirect.finish_in_transit(false);
            }
        } else if let Some(frame) = self.build_null_data_frame(src_pan_id, src_addr) {
            trace!("no pending data, answering with a null data frame");
            if self
                .start_transmission(frame, CsmaMode::NoCsmaWithIfs, false)
                .is_err()
            {
                debug!("transmitter busy, dropping null data frame");
            }
        }
    }

    /// A data frame without payload, telling a polling device that
    /// nothing is held for it.
    fn build_null_data_frame(&mut self, dst_pan_id: u16, dst_addr: Address) -> Option<TxFrame> {
        let dsn = self.next_sequence_number();
        let src_addr = if self.pib.short_address == BROADCAST_SHORT_ADDRESS
            || self.pib.short_address == NO_SHORT_ADDRESS
        {
            Address::Extended(self.pib.extended_address?)
        } else {
            Address::Short(self.pib.short_address.to_be_bytes())
        };

        let repr = FrameBuilder::new_data(&[])
            .set_sequence_number(dsn)
            .set_dst_pan_id(dst_pan_id)
            .set_dst_address(dst_addr)
            .set_src_pan_id(self.pib.pan_id)
            .set_src_address(src_addr)
            .finalize()
            .ok()?;

        let mut frame = TxFrame {
            buffer: heapless::Vec::new(),
            msg_type: MessageType::NullFrame,
            msdu_handle: 0,
            expected_ack_dsn: None,
        };
        frame
            .buffer
            .resize(PHR_LEN + repr.buffer_len() + FCS_LEN, 0)
            .ok()?;
        frame.buffer[0] = (repr.buffer_len() + FCS_LEN) as u8;
        let end = frame.buffer.len() - FCS_LEN;
        repr.emit(&mut DataFrame::new_unchecked(
            &mut frame.buffer[PHR_LEN..end],
        ));
        Some(frame)
    }

    fn handle_tick(&mut self, now: Instant) {
        if let Some((frame, status)) =
            self.tal.tick(&mut self.radio, &mut self.rng, &self.pib, now)
        {
            self.dispatch_tx_status(frame, status);
        }
        if self.persistence.poll(now) {
            self.age_indirect_transactions();
            if !self.indirect.is_empty() {
                self.persistence.start(now, self.pib.beacon_order);
            }
        }
    }

    /// One persistence period passed: count down every waiting
    /// transaction and report the ones whose time ran out.
    fn age_indirect_transactions(&mut self) {
        self.indirect.decrement_persistence();
        while let Some(frame) = self.indirect.take_expired() {
            debug!("transaction expired before its destination polled");
            self.dispatch_expiry(frame);
        }
    }

    fn dispatch_expiry(&mut self, frame: TxFrame) {
        let timestamp = self.now;
        match frame.msg_type {
            MessageType::McpsData => {
                self.notify(Notification::DataConfirm(DataConfirm {
                    msdu_handle: frame.msdu_handle,
                    status: Status::TransactionExpired,
                    timestamp,
                }));
            }
            MessageType::AssociationResponse => {
                let dst_addr = frame_destination(&frame)
                    .map(|(_, addr)| addr)
                    .unwrap_or(Address::Absent);
                let indication = CommStatusIndication {
                    pan_id: self.pib.pan_id,
                    src_addr: self.own_extended_address(),
                    dst_addr,
                    status: Status::TransactionExpired,
                };
                self.notify(Notification::CommStatus(indication));
            }
            MessageType::DisassociationNotification => {
                let (device_pan_id, device_addr) =
                    frame_destination(&frame).unwrap_or((self.pib.pan_id, Address::Absent));
                self.notify(Notification::DisassociateConfirm(DisassociateConfirm {
                    status: Status::TransactionExpired,
                    device_pan_id,
                    device_addr,
                }));
            }
            // Null frames are never queued.
            MessageType::NullFrame => {}
        }
    }

    fn own_extended_address(&self) -> Address {
        match self.pib.extended_address {
            Some(address) => Address::Extended(address),
            None => Address::Absent,
        }
    }
}

/// Destination PAN ID and address of a stored MPDU.
fn frame_destination(frame: &TxFrame) -> Option<(u16, Address)> {
    let parsed = Frame::new(frame.mpdu()).ok()?;
    let addressing = parsed.addressing()?;
    Some((addressing.dst_pan_id()?, addressing.dst_address()?))
}

#[cfg(test)]
mod tests {
    use lrwpan_frame::{AddressingMode, FrameRepr, FrameVersion};
    use rand::rngs::mock::StepRng;

    use super::mcps::data::{DataRequest, TxOptions};
    use super::*;
    use crate::phy::radio::tests::TestRadio;

    const OWN_PAN_ID: u16 = 0x1234;
    const OWN_SHORT_ADDRESS: u16 = 0xbabe;
    const OWN_EXTENDED_ADDRESS: [u8; 8] = [0xca; 8];
    const DEVICE_SHORT: Address = Address::Short([0x56, 0x78]);
    const DEVICE_EXTENDED: Address = Address::Extended([0x11; 8]);

    fn context() -> MacContext<TestRadio, StepRng> {
        context_with(StepRng::new(0, 0))
    }

    fn context_with(rng: StepRng) -> MacContext<TestRadio, StepRng> {
        let _ = env_logger::builder().is_test(true).try_init();
        let pib = Pib {
            pan_id: OWN_PAN_ID,
            short_address: OWN_SHORT_ADDRESS,
            ..Pib::default()
        };
        MacContext::new(TestRadio::default(), rng, pib)
    }

    fn at(us: i64) -> Instant {
        Instant::from_us(us)
    }

    fn short(address: u16) -> Address {
        Address::Short(address.to_be_bytes())
    }

    fn emit_mpdu(repr: &FrameRepr<'_>) -> heapless::Vec<u8, MAX_PHY_PACKET_SIZE> {
        let mut buffer = heapless::Vec::new();
        buffer.resize(repr.buffer_len(), 0).unwrap();
        repr.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));
        buffer
    }

    /// Wrap an MPDU into a receive event, appending a valid FCS.
    fn incoming(mpdu: &[u8], timestamp: Instant) -> Event {
        let mut with_fcs = heapless::Vec::new();
        with_fcs.extend_from_slice(mpdu).unwrap();
        with_fcs.extend_from_slice(&[0, 0]).unwrap();
        let fcs = FrameWithFcs::new_unchecked(with_fcs.as_slice()).calculate_fcs();
        let end = with_fcs.len();
        with_fcs[end - 2..].copy_from_slice(&fcs.to_le_bytes());
        Event::RxDone(ReceivedFrame {
            mpdu: with_fcs,
            link_quality: 0xff,
            timestamp,
        })
    }

    fn ack(sequence_number: u8, frame_pending: bool) -> heapless::Vec<u8, MAX_PHY_PACKET_SIZE> {
        let repr = FrameBuilder::new_imm_ack(sequence_number)
            .set_frame_pending(frame_pending)
            .finalize()
            .unwrap();
        emit_mpdu(&repr)
    }

    fn peer_data_to(
        sequence_number: u8,
        dst_pan_id: u16,
        dst_addr: Address,
        payload: &[u8],
    ) -> heapless::Vec<u8, MAX_PHY_PACKET_SIZE> {
        let repr = FrameBuilder::new_data(payload)
            .set_sequence_number(sequence_number)
            .set_dst_pan_id(dst_pan_id)
            .set_dst_address(dst_addr)
            .set_src_pan_id(OWN_PAN_ID)
            .set_src_address(DEVICE_SHORT)
            .finalize()
            .unwrap();
        emit_mpdu(&repr)
    }

    fn peer_data(
        sequence_number: u8,
        payload: &[u8],
    ) -> heapless::Vec<u8, MAX_PHY_PACKET_SIZE> {
        peer_data_to(
            sequence_number,
            OWN_PAN_ID,
            short(OWN_SHORT_ADDRESS),
            payload,
        )
    }

    fn poll_command(src_addr: Address) -> heapless::Vec<u8, MAX_PHY_PACKET_SIZE> {
        let repr = FrameBuilder::new_command(&[CommandId::DataRequest as u8])
            .set_sequence_number(17)
            .set_dst_pan_id(OWN_PAN_ID)
            .set_dst_address(short(OWN_SHORT_ADDRESS))
            .set_src_pan_id(OWN_PAN_ID)
            .set_src_address(src_addr)
            .set_ack_request(true)
            .finalize()
            .unwrap();
        emit_mpdu(&repr)
    }

    /// A command frame held in the transaction queue on the MAC's own
    /// behalf, as association handling would enqueue it.
    fn held_command(msg_type: MessageType, dst_addr: Address) -> TxFrame {
        let repr = FrameBuilder::new_command(&[CommandId::AssociationResponse as u8, 0, 0, 0])
            .set_sequence_number(9)
            .set_dst_pan_id(OWN_PAN_ID)
            .set_dst_address(dst_addr)
            .set_src_pan_id(OWN_PAN_ID)
            .set_src_address(Address::Extended(OWN_EXTENDED_ADDRESS))
            .set_ack_request(true)
            .finalize()
            .unwrap();
        let mut frame = TxFrame {
            buffer: heapless::Vec::new(),
            msg_type,
            msdu_handle: 0,
            expected_ack_dsn: Some(9),
        };
        frame
            .buffer
            .resize(PHR_LEN + repr.buffer_len() + FCS_LEN, 0)
            .unwrap();
        frame.buffer[0] = (repr.buffer_len() + FCS_LEN) as u8;
        let end = frame.buffer.len() - FCS_LEN;
        repr.emit(&mut DataFrame::new_unchecked(
            &mut frame.buffer[PHR_LEN..end],
        ));
        frame
    }

    fn transmitted_mpdu(ctx: &MacContext<TestRadio, StepRng>, index: usize) -> std::vec::Vec<u8> {
        let buffer = &ctx.radio.transmitted[index];
        buffer[PHR_LEN..buffer.len() - FCS_LEN].to_vec()
    }

    #[test]
    fn direct_request_is_confirmed_once_after_the_acknowledgment() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"hello",
            msdu_handle: 11,
            tx_options: TxOptions::ACK,
            ..Default::default()
        });

        assert_eq!(ctx.radio.transmitted.len(), 1);
        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(frame.sequence_number(), Some(0));
        assert!(frame.frame_control().ack_request());
        let addressing = frame.addressing().unwrap();
        assert_eq!(addressing.dst_pan_id(), Some(OWN_PAN_ID));
        assert_eq!(addressing.dst_address(), Some(DEVICE_SHORT));
        assert_eq!(addressing.src_address(), Some(short(OWN_SHORT_ADDRESS)));
        assert_eq!(frame.payload(), Some(&b"hello"[..]));
        assert!(ctx.pop_notification().is_none());

        ctx.handle_event(Event::TxDone(at(1_000)));
        assert!(ctx.pop_notification().is_none());

        ctx.handle_event(incoming(&ack(0, false), at(1_500)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 11,
                status: Status::Success,
                timestamp: at(1_500),
            }))
        );
        assert!(ctx.pop_notification().is_none());
    }

    #[test]
    fn unacknowledged_request_completes_on_transmit_done() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"fire and forget",
            msdu_handle: 2,
            ..Default::default()
        });

        assert!(ctx.pop_notification().is_none());
        ctx.handle_event(Event::TxDone(at(2_000)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 2,
                status: Status::Success,
                timestamp: at(2_000),
            }))
        );
    }

    #[test]
    fn acknowledgment_with_frame_pending_reports_success() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"more to come",
            msdu_handle: 8,
            tx_options: TxOptions::ACK,
            ..Default::default()
        });
        ctx.handle_event(Event::TxDone(at(1_000)));
        ctx.handle_event(incoming(&ack(0, true), at(1_500)));

        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 8,
                status: Status::Success,
                timestamp: at(1_500),
            }))
        );
    }

    #[test]
    fn sequence_numbers_advance_and_wrap() {
        let mut ctx = context();
        ctx.dsn = 255;

        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"a",
            msdu_handle: 1,
            ..Default::default()
        });
        ctx.handle_event(Event::TxDone(at(1_000)));
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"b",
            msdu_handle: 2,
            ..Default::default()
        });

        let first_mpdu = transmitted_mpdu(&ctx, 0);
        let first = Frame::new(&first_mpdu[..]).unwrap();
        let second_mpdu = transmitted_mpdu(&ctx, 1);
        let second = Frame::new(&second_mpdu[..]).unwrap();
        assert_eq!(first.sequence_number(), Some(255));
        assert_eq!(second.sequence_number(), Some(0));
    }

    #[test]
    fn validation_failures_do_not_consume_a_sequence_number() {
        let mut ctx = context();

        ctx.data_request(&DataRequest {
            dst_pan_id: BROADCAST_PAN_ID,
            dst_addr: short(BROADCAST_SHORT_ADDRESS),
            msdu: b"all",
            msdu_handle: 1,
            tx_options: TxOptions::ACK,
            ..Default::default()
        });
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 1,
                status: Status::InvalidParameter,
                timestamp: at(0),
            }))
        );

        ctx.data_request(&DataRequest {
            src_addr_mode: AddressingMode::Absent,
            dst_addr: Address::Absent,
            msdu_handle: 2,
            ..Default::default()
        });
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 2,
                status: Status::InvalidAddress,
                timestamp: at(0),
            }))
        );

        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"secured",
            msdu_handle: 3,
            security_level: 8,
            ..Default::default()
        });
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 3,
                status: Status::InvalidParameter,
                timestamp: at(0),
            }))
        );

        assert!(ctx.radio.transmitted.is_empty());
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"ok",
            msdu_handle: 4,
            ..Default::default()
        });
        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(frame.sequence_number(), Some(0));
    }

    #[test]
    fn overlong_frame_is_rejected_but_consumes_a_sequence_number() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: &[0xaa; 120],
            msdu_handle: 5,
            ..Default::default()
        });
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 5,
                status: Status::FrameTooLong,
                timestamp: at(0),
            }))
        );
        assert!(ctx.radio.transmitted.is_empty());

        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"short enough",
            msdu_handle: 6,
            ..Default::default()
        });
        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(frame.sequence_number(), Some(1));
    }

    #[test]
    fn long_payloads_upgrade_the_frame_version() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: &[0xbb; 103],
            msdu_handle: 1,
            ..Default::default()
        });

        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(
            frame.frame_control().frame_version(),
            FrameVersion::Ieee802154_2006
        );
    }

    #[test]
    fn same_pan_elides_the_source_pan_id() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: short(0xbeef),
            msdu: b"hi",
            msdu_handle: 1,
            ..Default::default()
        });

        let mpdu = transmitted_mpdu(&ctx, 0);
        // FCF, DSN, destination PAN ID, both short addresses, two payload
        // octets. No source PAN ID.
        assert_eq!(mpdu.len(), 2 + 1 + 2 + 2 + 2 + 2);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert!(frame.frame_control().pan_id_compression());
        assert_eq!(
            frame.frame_control().frame_version(),
            FrameVersion::Ieee802154_2003
        );
        let addressing = frame.addressing().unwrap();
        assert_eq!(addressing.src_pan_id(), None);
        assert_eq!(addressing.dst_pan_id(), Some(OWN_PAN_ID));
    }

    #[test]
    fn busy_transmitter_rejects_a_direct_request() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"first",
            msdu_handle: 1,
            tx_options: TxOptions::ACK,
            ..Default::default()
        });
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"second",
            msdu_handle: 2,
            ..Default::default()
        });

        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 2,
                status: Status::ChannelAccessFailure,
                timestamp: at(0),
            }))
        );

        ctx.handle_event(Event::TxDone(at(1_000)));
        ctx.handle_event(incoming(&ack(0, false), at(1_500)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 1,
                status: Status::Success,
                timestamp: at(1_500),
            }))
        );

        // The rejected request consumed no sequence number.
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"third",
            msdu_handle: 3,
            ..Default::default()
        });
        let mpdu = transmitted_mpdu(&ctx, 1);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(frame.sequence_number(), Some(1));
    }

    #[test]
    fn missing_acknowledgment_fails_after_all_retries() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"anyone there",
            msdu_handle: 4,
            tx_options: TxOptions::ACK,
            ..Default::default()
        });

        let mut now = 0;
        for transmission in 1..=4 {
            assert_eq!(ctx.radio.transmitted.len(), transmission);
            now += 1_000;
            ctx.handle_event(Event::TxDone(at(now)));
            now += 864;
            ctx.handle_event(Event::TimerTick(at(now)));
        }

        assert_eq!(ctx.radio.transmitted.len(), 4);
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 4,
                status: Status::NoAck,
                timestamp: at(now),
            }))
        );
        assert!(ctx.next_deadline().is_none());
    }

    #[test]
    fn indirect_request_waits_for_a_poll() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"wake up",
            msdu_handle: 3,
            tx_options: TxOptions::ACK | TxOptions::INDIRECT,
            ..Default::default()
        });

        assert!(ctx.radio.transmitted.is_empty());
        assert!(ctx.pop_notification().is_none());
        assert_eq!(ctx.indirect.len(), 1);

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000_000)));
        assert_eq!(ctx.radio.transmitted.len(), 1);
        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert_eq!(frame.payload(), Some(&b"wake up"[..]));
        assert!(!frame.frame_control().frame_pending());

        ctx.handle_event(Event::TxDone(at(1_000_500)));
        ctx.handle_event(incoming(&ack(0, false), at(1_001_000)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 3,
                status: Status::Success,
                timestamp: at(1_001_000),
            }))
        );
        assert!(ctx.indirect.is_empty());
        assert!(ctx.next_deadline().is_none());
    }

    #[test]
    fn failed_indirect_delivery_keeps_the_transaction_queued() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"try again",
            msdu_handle: 6,
            tx_options: TxOptions::ACK | TxOptions::INDIRECT,
            ..Default::default()
        });

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000_000)));
        ctx.handle_event(Event::TxDone(at(1_000_500)));
        // The acknowledgment stays out and retries are disabled for
        // indirect deliveries.
        ctx.handle_event(Event::TimerTick(at(1_001_364)));

        assert!(ctx.pop_notification().is_none());
        assert_eq!(ctx.indirect.len(), 1);
        assert_eq!(ctx.radio.transmitted.len(), 1);

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(2_000_000)));
        assert_eq!(ctx.radio.transmitted.len(), 2);
        ctx.handle_event(Event::TxDone(at(2_000_500)));
        ctx.handle_event(incoming(&ack(0, false), at(2_001_000)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 6,
                status: Status::Success,
                timestamp: at(2_001_000),
            }))
        );
        assert!(ctx.indirect.is_empty());
    }

    #[test]
    fn a_full_transaction_queue_overflows() {
        use crate::mac::constants::MAC_INDIRECT_QUEUE_CAPACITY;

        let mut ctx = context();
        for msdu_handle in 0..MAC_INDIRECT_QUEUE_CAPACITY as u8 {
            ctx.data_request(&DataRequest {
                dst_pan_id: OWN_PAN_ID,
                dst_addr: DEVICE_SHORT,
                msdu: b"held",
                msdu_handle,
                tx_options: TxOptions::INDIRECT,
                ..Default::default()
            });
            assert!(ctx.pop_notification().is_none());
        }

        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"one too many",
            msdu_handle: 0xaa,
            tx_options: TxOptions::INDIRECT,
            ..Default::default()
        });

        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 0xaa,
                status: Status::TransactionOverflow,
                timestamp: at(0),
            }))
        );
        assert_eq!(ctx.indirect.len(), MAC_INDIRECT_QUEUE_CAPACITY);
    }

    #[test]
    fn unmatched_poll_is_answered_with_a_null_data_frame() {
        let mut ctx = context();
        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000)));

        assert_eq!(ctx.radio.transmitted.len(), 1);
        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        assert!(matches!(frame, Frame::Data(_)));
        assert_eq!(frame.sequence_number(), Some(0));
        assert!(!frame.frame_control().ack_request());
        assert!(frame.payload().unwrap_or(&[]).is_empty());
        let addressing = frame.addressing().unwrap();
        assert_eq!(addressing.dst_address(), Some(DEVICE_SHORT));
        assert_eq!(addressing.dst_pan_id(), Some(OWN_PAN_ID));
        assert_eq!(addressing.src_address(), Some(short(OWN_SHORT_ADDRESS)));
        assert_eq!(addressing.src_pan_id(), None);

        ctx.handle_event(Event::TxDone(at(2_000)));
        assert!(ctx.pop_notification().is_none());
    }

    #[test]
    fn null_frame_falls_back_to_the_extended_address() {
        let mut ctx = context();
        ctx.pib.short_address = NO_SHORT_ADDRESS;
        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000)));

        let mpdu = transmitted_mpdu(&ctx, 0);
        let frame = Frame::new(&mpdu[..]).unwrap();
        let addressing = frame.addressing().unwrap();
        assert_eq!(
            addressing.src_address(),
            Some(Address::Extended(OWN_EXTENDED_ADDRESS))
        );
    }

    #[test]
    fn frame_pending_announces_more_held_data() {
        let mut ctx = context();
        for msdu_handle in [1, 2] {
            ctx.data_request(&DataRequest {
                dst_pan_id: OWN_PAN_ID,
                dst_addr: DEVICE_SHORT,
                msdu: b"queued",
                msdu_handle,
                tx_options: TxOptions::ACK | TxOptions::INDIRECT,
                ..Default::default()
            });
        }

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000_000)));
        let first_mpdu = transmitted_mpdu(&ctx, 0);
        let first = Frame::new(&first_mpdu[..]).unwrap();
        assert!(first.frame_control().frame_pending());

        ctx.handle_event(Event::TxDone(at(1_000_500)));
        ctx.handle_event(incoming(&ack(0, false), at(1_001_000)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 1,
                status: Status::Success,
                timestamp: at(1_001_000),
            }))
        );

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(2_000_000)));
        let second_mpdu = transmitted_mpdu(&ctx, 1);
        let second = Frame::new(&second_mpdu[..]).unwrap();
        assert!(!second.frame_control().frame_pending());
        assert_eq!(second.sequence_number(), Some(1));
    }

    #[test]
    fn transactions_expire_through_the_persistence_timer() {
        let mut ctx = context();
        ctx.pib.transaction_persistence_time = 2;
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"never polled",
            msdu_handle: 9,
            tx_options: TxOptions::INDIRECT,
            ..Default::default()
        });

        assert_eq!(ctx.next_deadline(), Some(at(15_360)));
        ctx.handle_event(Event::TimerTick(at(15_360)));
        assert!(ctx.pop_notification().is_none());
        assert_eq!(ctx.next_deadline(), Some(at(30_720)));

        ctx.handle_event(Event::TimerTick(at(30_720)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 9,
                status: Status::TransactionExpired,
                timestamp: at(30_720),
            }))
        );
        assert!(ctx.indirect.is_empty());
        // The timer is not re-armed for an empty queue.
        assert!(ctx.next_deadline().is_none());
    }

    #[test]
    fn transactions_in_transit_survive_the_persistence_sweep() {
        let mut ctx = context();
        ctx.pib.transaction_persistence_time = 1;
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"in flight",
            msdu_handle: 7,
            tx_options: TxOptions::ACK | TxOptions::INDIRECT,
            ..Default::default()
        });

        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(15_000)));
        assert_eq!(ctx.radio.transmitted.len(), 1);

        // The persistence period ends while the frame is on the air.
        ctx.handle_event(Event::TimerTick(at(15_360)));
        assert!(ctx.pop_notification().is_none());
        assert_eq!(ctx.indirect.len(), 1);

        ctx.handle_event(Event::TxDone(at(16_000)));
        // No acknowledgment; the transaction goes back to waiting.
        ctx.handle_event(Event::TimerTick(at(16_864)));
        assert!(ctx.pop_notification().is_none());
        assert_eq!(ctx.indirect.len(), 1);

        ctx.handle_event(Event::TimerTick(at(30_720)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 7,
                status: Status::TransactionExpired,
                timestamp: at(30_720),
            }))
        );
    }

    #[test]
    fn purge_cancels_a_held_transaction() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"changed my mind",
            msdu_handle: 7,
            tx_options: TxOptions::INDIRECT,
            ..Default::default()
        });

        ctx.purge_request(7);
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::PurgeConfirm(PurgeConfirm {
                msdu_handle: 7,
                status: Status::Success,
            }))
        );
        assert!(ctx.indirect.is_empty());
        assert!(ctx.next_deadline().is_none());

        ctx.purge_request(7);
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::PurgeConfirm(PurgeConfirm {
                msdu_handle: 7,
                status: Status::InvalidHandle,
            }))
        );
    }

    #[test]
    fn a_transaction_being_delivered_cannot_be_purged() {
        let mut ctx = context();
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"already leaving",
            msdu_handle: 5,
            tx_options: TxOptions::ACK | TxOptions::INDIRECT,
            ..Default::default()
        });
        ctx.handle_event(incoming(&poll_command(DEVICE_SHORT), at(1_000_000)));

        ctx.purge_request(5);
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::PurgeConfirm(PurgeConfirm {
                msdu_handle: 5,
                status: Status::InvalidHandle,
            }))
        );

        ctx.handle_event(Event::TxDone(at(1_000_500)));
        ctx.handle_event(incoming(&ack(0, false), at(1_001_000)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(DataConfirm {
                msdu_handle: 5,
                status: Status::Success,
                timestamp: at(1_001_000),
            }))
        );
    }

    #[test]
    fn received_data_is_indicated_with_addressing() {
        let mut ctx = context();
        ctx.handle_event(incoming(&peer_data(42, b"ping"), at(3_000)));

        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DataIndication(DataIndication {
                src_pan_id: OWN_PAN_ID,
                src_addr: DEVICE_SHORT,
                dst_pan_id: OWN_PAN_ID,
                dst_addr: short(OWN_SHORT_ADDRESS),
                msdu: heapless::Vec::from_slice(b"ping").unwrap(),
                mpdu_link_quality: 0xff,
                dsn: 42,
                timestamp: at(3_000),
            }))
        );
    }

    #[test]
    fn retransmissions_are_indicated_once() {
        let mut ctx = context();
        ctx.handle_event(incoming(&peer_data(42, b"ping"), at(1_000)));
        assert!(ctx.pop_notification().is_some());

        ctx.handle_event(incoming(&peer_data(42, b"ping"), at(2_000)));
        assert!(ctx.pop_notification().is_none());

        ctx.handle_event(incoming(&peer_data(43, b"ping"), at(3_000)));
        assert!(ctx.pop_notification().is_some());
    }

    #[test]
    fn frames_for_other_destinations_are_dropped() {
        let mut ctx = context();
        ctx.handle_event(incoming(
            &peer_data_to(1, OWN_PAN_ID, short(0xaaaa), b"not yours"),
            at(1_000),
        ));
        assert!(ctx.pop_notification().is_none());

        ctx.handle_event(incoming(
            &peer_data_to(2, 0x9999, short(OWN_SHORT_ADDRESS), b"wrong pan"),
            at(2_000),
        ));
        assert!(ctx.pop_notification().is_none());

        ctx.handle_event(incoming(
            &peer_data_to(3, OWN_PAN_ID, short(BROADCAST_SHORT_ADDRESS), b"everyone"),
            at(3_000),
        ));
        assert!(ctx.pop_notification().is_some());

        ctx.pib.promiscuous_mode = true;
        ctx.handle_event(incoming(
            &peer_data_to(4, OWN_PAN_ID, short(0xaaaa), b"overheard"),
            at(4_000),
        ));
        assert!(ctx.pop_notification().is_some());
    }

    #[test]
    fn null_data_frames_are_not_indicated() {
        let mut ctx = context();
        ctx.handle_event(incoming(&peer_data(7, b""), at(1_000)));
        assert!(ctx.pop_notification().is_none());

        // The empty frame must not have touched the duplicate filter.
        ctx.handle_event(incoming(&peer_data(7, b"real"), at(2_000)));
        assert!(ctx.pop_notification().is_some());
    }

    #[test]
    fn corrupted_frames_are_dropped() {
        let mut ctx = context();
        let Event::RxDone(mut frame) = incoming(&peer_data(9, b"x"), at(1_000)) else {
            unreachable!();
        };
        frame.mpdu[5] ^= 0x01;
        ctx.handle_event(Event::RxDone(frame));
        assert!(ctx.pop_notification().is_none());
    }

    #[test]
    fn expiry_reports_follow_the_message_type() {
        let mut ctx = context();
        ctx.indirect
            .enqueue(
                held_command(MessageType::AssociationResponse, DEVICE_EXTENDED),
                1,
            )
            .unwrap();
        ctx.indirect
            .enqueue(
                held_command(MessageType::DisassociationNotification, DEVICE_EXTENDED),
                1,
            )
            .unwrap();
        ctx.persistence.start(at(0), ctx.pib.beacon_order);

        ctx.handle_event(Event::TimerTick(at(15_360)));
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::CommStatus(CommStatusIndication {
                pan_id: OWN_PAN_ID,
                src_addr: Address::Extended(OWN_EXTENDED_ADDRESS),
                dst_addr: DEVICE_EXTENDED,
                status: Status::TransactionExpired,
            }))
        );
        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::DisassociateConfirm(DisassociateConfirm {
                status: Status::TransactionExpired,
                device_pan_id: OWN_PAN_ID,
                device_addr: DEVICE_EXTENDED,
            }))
        );
        assert!(ctx.indirect.is_empty());
    }

    #[test]
    fn delivered_association_response_reports_comm_status() {
        let mut ctx = context();
        ctx.indirect
            .enqueue(
                held_command(MessageType::AssociationResponse, DEVICE_EXTENDED),
                5,
            )
            .unwrap();

        ctx.handle_event(incoming(&poll_command(DEVICE_EXTENDED), at(1_000_000)));
        assert_eq!(ctx.radio.transmitted.len(), 1);
        ctx.handle_event(Event::TxDone(at(1_000_500)));
        ctx.handle_event(incoming(&ack(9, false), at(1_001_000)));

        assert_eq!(
            ctx.pop_notification(),
            Some(Notification::CommStatus(CommStatusIndication {
                pan_id: OWN_PAN_ID,
                src_addr: Address::Extended(OWN_EXTENDED_ADDRESS),
                dst_addr: DEVICE_EXTENDED,
                status: Status::Success,
            }))
        );
        assert!(ctx.indirect.is_empty());
    }

    #[test]
    fn reception_during_backoff_defers_the_transmission() {
        let mut ctx = context_with(StepRng::new(5, 0));
        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"patience",
            msdu_handle: 6,
            ..Default::default()
        });

        // Five unit backoff periods were drawn.
        assert!(ctx.radio.transmitted.is_empty());
        assert_eq!(ctx.next_deadline(), Some(at(1_600)));

        ctx.handle_event(incoming(&peer_data(20, b"mid backoff"), at(500)));
        assert!(matches!(
            ctx.pop_notification(),
            Some(Notification::DataIndication(_))
        ));
        // A fresh backoff runs from the time of the reception.
        assert_eq!(ctx.next_deadline(), Some(at(2_100)));
        assert!(ctx.radio.transmitted.is_empty());

        ctx.handle_event(Event::TimerTick(at(2_100)));
        assert_eq!(ctx.radio.transmitted.len(), 1);
    }

    #[test]
    fn events_drain_in_order_through_the_channel() {
        let mut ctx = context();
        let events: MacEventChannel = EventChannel::new();

        ctx.data_request(&DataRequest {
            dst_pan_id: OWN_PAN_ID,
            dst_addr: DEVICE_SHORT,
            msdu: b"queued event",
            msdu_handle: 1,
            ..Default::default()
        });
        assert!(events.send(Event::TxDone(at(5_000))));
        assert!(events.send(incoming(&peer_data(30, b"pong"), at(6_000))));

        ctx.poll(&events);
        assert!(matches!(
            ctx.pop_notification(),
            Some(Notification::DataConfirm(_))
        ));
        assert!(matches!(
            ctx.pop_notification(),
            Some(Notification::DataIndication(_))
        ));
        assert!(!events.has_item());
    }
}
