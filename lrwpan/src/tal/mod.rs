//! Transceiver abstraction layer.
//!
//! The [`Transmitter`] sits between the MAC and the radio and owns a single
//! frame at a time. It runs the unslotted CSMA-CA algorithm in software,
//! spaces frames that skip CSMA by the proper interframe period, matches
//! incoming acknowledgments against the pending frame and retries when none
//! arrives. It never blocks: every wait is expressed as a deadline which the
//! event loop turns into a [`TimerTick`].
//!
//! [`TimerTick`]: crate::mac::Event::TimerTick

use lrwpan_frame::{FCS_LEN, MAX_PHY_PACKET_SIZE, MAX_SIFS_FRAME_SIZE, PHR_LEN};
use rand_core::RngCore;

use crate::mac::constants::MAC_UNIT_BACKOFF_DURATION;
use crate::mac::pib::Pib;
use crate::phy::radio::Radio;
use crate::time::Instant;

/// Size of a transmit buffer: the PHY length octet plus the largest MPDU.
pub const FRAME_BUFFER_SIZE: usize = PHR_LEN + MAX_PHY_PACKET_SIZE;

/// The kind of frame handed to the transmit path, used to route its
/// completion to the right confirm primitive.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// An MSDU from an MCPS-DATA.request.
    McpsData,
    /// An association response command held for a polling device.
    AssociationResponse,
    /// A disassociation notification command.
    DisassociationNotification,
    /// A zero-payload data frame answering a poll with nothing pending.
    NullFrame,
}

/// Channel access mode used for a single transmission.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsmaMode {
    /// Transmit immediately, without CCA or interframe spacing.
    NoCsmaNoIfs,
    /// Transmit without CCA after the interframe space dictated by the
    /// length of the previous frame.
    NoCsmaWithIfs,
    /// Unslotted CSMA-CA.
    Unslotted,
    /// Slotted CSMA-CA. Executed as unslotted CSMA-CA, since backoff slot
    /// boundaries carry no meaning on a nonbeacon-enabled PAN.
    Slotted,
}

/// The terminal status of a transmit session.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// The frame went out and, when requested, was acknowledged.
    Success {
        /// The frame pending bit of the acknowledgment.
        frame_pending: bool,
    },
    /// Every CSMA-CA attempt found the channel busy.
    ChannelAccessFailure,
    /// No acknowledgment arrived, even after retrying.
    NoAck,
}

/// A frame ready for transmission.
#[derive(Debug, Clone)]
pub struct TxFrame {
    /// The on-air representation: `[PHY length octet][MPDU][FCS placeholder]`.
    /// The last two octets are filled in by the radio.
    pub buffer: heapless::Vec<u8, FRAME_BUFFER_SIZE>,
    /// What the frame is, for completion dispatch.
    pub msg_type: MessageType,
    /// The handle correlating a confirm with its request.
    pub msdu_handle: u8,
    /// The sequence number a matching acknowledgment carries. `None` when
    /// the frame does not request an acknowledgment.
    pub expected_ack_dsn: Option<u8>,
}

impl TxFrame {
    /// The MPDU without the PHY length octet and the FCS placeholder.
    pub fn mpdu(&self) -> &[u8] {
        &self.buffer[PHR_LEN..self.buffer.len() - FCS_LEN]
    }

    pub(crate) fn mpdu_mut(&mut self) -> &mut [u8] {
        let end = self.buffer.len() - FCS_LEN;
        &mut self.buffer[PHR_LEN..end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    /// No transmit session active.
    Idle,
    /// Waiting for the backoff or interframe period to elapse.
    Backoff,
    /// Assessing the channel.
    Cca,
    /// The radio is transmitting the frame.
    Tx,
    /// Waiting for the acknowledgment of the transmitted frame.
    WaitingForAck,
    /// A received frame interrupted the backoff; a fresh backoff is drawn
    /// once the frame has been processed.
    Defer,
}

/// Result of a single clear channel assessment.
enum Cca {
    Clear,
    Busy,
    Exhausted,
}

/// The transmit state machine.
///
/// All methods are synchronous. Methods that can finish a session return the
/// frame together with its [`TxStatus`]; the caller turns that into the
/// confirm primitive belonging to the frame's [`MessageType`]. A session
/// finishes exactly once.
pub struct Transmitter {
    state: TxState,
    frame: Option<TxFrame>,
    csma_mode: CsmaMode,
    /// Number of backoff attempts that found the channel busy.
    nb: u8,
    /// Current backoff exponent.
    be: u8,
    /// Number of retransmissions after a missing acknowledgment.
    retries: u8,
    deadline: Option<Instant>,
    /// End of the previous transmission, for interframe spacing.
    last_frame_end: Instant,
    /// MPDU length (without FCS) of the previous transmission.
    last_frame_length: usize,
}

impl Transmitter {
    pub fn new() -> Self {
        Self {
            state: TxState::Idle,
            frame: None,
            csma_mode: CsmaMode::Unslotted,
            nb: 0,
            be: 0,
            retries: 0,
            deadline: None,
            last_frame_end: Instant::from_us(0),
            last_frame_length: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TxState::Idle)
    }

    /// The next point in time the machine needs a [`tick`] call.
    ///
    /// [`tick`]: Transmitter::tick
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Accept a frame for transmission.
    ///
    /// With `perform_frame_retry` cleared the frame is transmitted at most
    /// once, even when the acknowledgment stays out.
    ///
    /// Returns the frame when a session is already running. A session that
    /// fails before any wait is needed is reported as `Ok(Some(..))` and
    /// must be dispatched by the caller like any other completion.
    pub fn transmit<R: Radio>(
        &mut self,
        radio: &mut R,
        rng: &mut impl RngCore,
        pib: &Pib,
        frame: TxFrame,
        mode: CsmaMode,
        perform_frame_retry: bool,
        now: Instant,
    ) -> Result<Option<(TxFrame, TxStatus)>, TxFrame> {
        if !matches!(self.state, TxState::Idle) {
            return Err(frame);
        }

        self.frame = Some(frame);
        self.csma_mode = mode;
        self.retries = if perform_frame_retry {
            0
        } else {
            pib.max_frame_retries
        };

        match mode {
            CsmaMode::Unslotted | CsmaMode::Slotted => Ok(self.start_csma(radio, rng, pib, now)),
            CsmaMode::NoCsmaWithIfs => {
                self.begin_ifs(radio, pib, now);
                Ok(None)
            }
            CsmaMode::NoCsmaNoIfs => {
                self.transmit_frame(radio);
                Ok(None)
            }
        }
    }

    /// Advance the machine when a deadline elapsed.
    pub fn tick<R: Radio>(
        &mut self,
        radio: &mut R,
        rng: &mut impl RngCore,
        pib: &Pib,
        now: Instant,
    ) -> Option<(TxFrame, TxStatus)> {
        let Some(deadline) = self.deadline else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.deadline = None;

        match self.state {
            TxState::Backoff => match self.csma_mode {
                CsmaMode::Unslotted | CsmaMode::Slotted => match self.assess_channel(radio, pib) {
                    Cca::Clear => {
                        self.transmit_frame(radio);
                        None
                    }
                    Cca::Busy => self.draw_backoff(radio, rng, pib, now),
                    Cca::Exhausted => self.complete(TxStatus::ChannelAccessFailure),
                },
                CsmaMode::NoCsmaWithIfs | CsmaMode::NoCsmaNoIfs => {
                    self.transmit_frame(radio);
                    None
                }
            },
            TxState::WaitingForAck => self.retry(radio, rng, pib, now),
            _ => None,
        }
    }

    /// Handle the completion of a transmission started on the radio.
    pub fn tx_done(&mut self, pib: &Pib, now: Instant) -> Option<(TxFrame, TxStatus)> {
        if !matches!(self.state, TxState::Tx) {
            warn!("unexpected TX done event");
            return None;
        }
        let Some(frame) = self.frame.as_ref() else {
            return None;
        };
        self.last_frame_end = now;
        self.last_frame_length = frame.buffer.len() - PHR_LEN - FCS_LEN;

        if frame.expected_ack_dsn.is_some() {
            self.state = TxState::WaitingForAck;
            self.deadline = Some(now + pib.ack_wait_duration);
            return None;
        }
        self.complete(TxStatus::Success {
            frame_pending: false,
        })
    }

    /// Match a received acknowledgment against the pending frame.
    pub fn handle_ack(
        &mut self,
        sequence_number: u8,
        frame_pending: bool,
    ) -> Option<(TxFrame, TxStatus)> {
        if !matches!(self.state, TxState::WaitingForAck) {
            return None;
        }
        match self.frame.as_ref() {
            Some(frame) if frame.expected_ack_dsn == Some(sequence_number) => {
                self.complete(TxStatus::Success { frame_pending })
            }
            _ => {
                trace!("ignoring acknowledgment with unexpected sequence number");
                None
            }
        }
    }

    /// Park a pending channel assessment while a received frame is being
    /// processed.
    pub fn defer(&mut self) {
        if matches!(self.state, TxState::Backoff | TxState::Cca)
            && matches!(self.csma_mode, CsmaMode::Unslotted | CsmaMode::Slotted)
        {
            self.state = TxState::Defer;
            self.deadline = None;
        }
    }

    /// Resume a deferred transmission by drawing a fresh backoff.
    pub fn continue_deferred<R: Radio>(
        &mut self,
        radio: &mut R,
        rng: &mut impl RngCore,
        pib: &Pib,
        now: Instant,
    ) -> Option<(TxFrame, TxStatus)> {
        if matches!(self.state, TxState::Defer) {
            self.draw_backoff(radio, rng, pib, now)
        } else {
            None
        }
    }

    fn start_csma(
        &mut self,
        radio: &mut impl Radio,
        rng: &mut impl RngCore,
        pib: &Pib,
        now: Instant,
    ) -> Option<(TxFrame, TxStatus)> {
        self.nb = 0;
        self.be = pib.min_be;
        self.draw_backoff(radio, rng, pib, now)
    }

    /// Draw a random number of unit backoff periods and wait them out. A
    /// draw of zero skips the wait and assesses the channel right away; a
    /// busy channel draws again until the attempts are used up.
    fn draw_backoff(
        &mut self,
        radio: &mut impl Radio,
        rng: &mut impl RngCore,
        pib: &Pib,
        now: Instant,
    ) -> Option<(TxFrame, TxStatus)> {
        loop {
            let periods = rng.next_u32() & ((1u32 << self.be) - 1);
            if periods > 0 {
                self.state = TxState::Backoff;
                self.deadline = Some(now + MAC_UNIT_BACKOFF_DURATION * periods as usize);
                return None;
            }
            match self.assess_channel(radio, pib) {
                Cca::Clear => {
                    self.transmit_frame(radio);
                    return None;
                }
                Cca::Busy => continue,
                Cca::Exhausted => return self.complete(TxStatus::ChannelAccessFailure),
            }
        }
    }

    /// Perform a single CCA, advancing the backoff bookkeeping when the
    /// channel is busy.
    fn assess_channel(&mut self, radio: &mut impl Radio, pib: &Pib) -> Cca {
        self.state = TxState::Cca;
        if radio.channel_clear() {
            return Cca::Clear;
        }
        self.nb += 1;
        if self.nb > pib.max_csma_backoffs {
            return Cca::Exhausted;
        }
        self.be = core::cmp::min(self.be + 1, pib.max_be);
        Cca::Busy
    }

    /// Wait the remainder of the interframe space dictated by the previous
    /// frame, then transmit.
    fn begin_ifs(&mut self, radio: &mut impl Radio, pib: &Pib, now: Instant) {
        let period = if self.last_frame_length > MAX_SIFS_FRAME_SIZE {
            pib.lifs_period
        } else {
            pib.sifs_period
        };
        let deadline = self.last_frame_end + period;
        if deadline <= now {
            self.transmit_frame(radio);
        } else {
            self.state = TxState::Backoff;
            self.deadline = Some(deadline);
        }
    }

    /// Retransmit after a missing acknowledgment, or give up.
    fn retry(
        &mut self,
        radio: &mut impl Radio,
        rng: &mut impl RngCore,
        pib: &Pib,
        now: Instant,
    ) -> Option<(TxFrame, TxStatus)> {
        if self.retries >= pib.max_frame_retries {
            return self.complete(TxStatus::NoAck);
        }
        self.retries += 1;
        debug!("no acknowledgment, retry {}", self.retries);
        match self.csma_mode {
            CsmaMode::Unslotted | CsmaMode::Slotted => self.start_csma(radio, rng, pib, now),
            CsmaMode::NoCsmaWithIfs => {
                self.begin_ifs(radio, pib, now);
                None
            }
            CsmaMode::NoCsmaNoIfs => {
                self.transmit_frame(radio);
                None
            }
        }
    }

    fn transmit_frame(&mut self, radio: &mut impl Radio) {
        self.state = TxState::Tx;
        self.deadline = None;
        if let Some(frame) = self.frame.as_ref() {
            radio.transmit(&frame.buffer);
        }
    }

    fn complete(&mut self, status: TxStatus) -> Option<(TxFrame, TxStatus)> {
        self.state = TxState::Idle;
        self.deadline = None;
        self.frame.take().map(|frame| (frame, status))
    }
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new()
    }
}
