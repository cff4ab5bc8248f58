//! Radio device interface.

/// An IEEE 802.15.4 transceiver driven by the MAC event loop.
///
/// The trait covers the half of the radio the MAC calls into directly: clear
/// channel assessment and starting a transmission. Completions travel the
/// other way round, as [`Event::TxDone`] and [`Event::RxDone`] pushed by the
/// driver onto the event channel.
///
/// The radio is expected to acknowledge received frames in hardware.
/// Acknowledgments sent by other devices are delivered like any other frame
/// and matched against the pending transmission in software.
///
/// [`Event::TxDone`]: crate::mac::Event::TxDone
/// [`Event::RxDone`]: crate::mac::Event::RxDone
pub trait Radio {
    /// Perform a single clear channel assessment.
    fn channel_clear(&mut self) -> bool;

    /// Start transmitting a frame.
    ///
    /// The buffer starts with the PHY length octet and ends with two octets
    /// in which the radio places the FCS. The driver reports completion with
    /// a `TxDone` event.
    fn transmit(&mut self, frame: &[u8]);

    /// Returns the IEEE802.15.4 8-octet MAC address of the radio device.
    fn ieee802154_address(&self) -> [u8; 8];
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::Radio;

    /// A scripted radio that records every transmission.
    pub struct TestRadio {
        pub ieee802154_address: [u8; 8],
        /// Scripted CCA verdicts, oldest first. An empty script reports a
        /// clear channel.
        pub cca_results: VecDeque<bool>,
        /// Every buffer handed to [`Radio::transmit`].
        pub transmitted: Vec<Vec<u8>>,
    }

    impl Default for TestRadio {
        fn default() -> Self {
            Self {
                ieee802154_address: [0xca; 8],
                cca_results: VecDeque::new(),
                transmitted: Vec::new(),
            }
        }
    }

    impl TestRadio {
        /// The MPDU of the most recent transmission, with the PHY length
        /// octet and the FCS placeholder stripped.
        pub fn last_mpdu(&self) -> &[u8] {
            let frame = self.transmitted.last().unwrap();
            &frame[1..frame.len() - 2]
        }
    }

    impl Radio for TestRadio {
        fn channel_clear(&mut self) -> bool {
            self.cca_results.pop_front().unwrap_or(true)
        }

        fn transmit(&mut self, frame: &[u8]) {
            self.transmitted.push(frame.to_vec());
        }

        fn ieee802154_address(&self) -> [u8; 8] {
            self.ieee802154_address
        }
    }
}
