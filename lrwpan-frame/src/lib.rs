//! Zero-copy read and write structures for handling IEEE 802.15.4 MAC frames.
//!
//! Each reader contains the following functions:
//! - [`new`]: Create a new reader.
//! - [`check_len`]: Check if the buffer is long enough to contain a valid
//!   frame.
//! - [`new_unchecked`]: Create a new reader without checking the buffer length.
//!
//! The most important reader is the [`Frame`] reader, which dispatches on the
//! frame type and is used to read a full IEEE 802.15.4 frame. The reader
//! provides the following functions:
//! - [`frame_control`]: returns a [`FrameControl`] reader.
//! - [`sequence_number`]: returns the sequence number if not suppressed.
//! - [`addressing`]: returns an [`AddressingFields`] reader.
//! - [`auxiliary_security_header`]: returns an [`AuxiliarySecurityHeader`]
//!   reader.
//! - [`payload`]: returns the MAC payload of the frame.
//!
//! Frames that still carry their Frame Check Sequence are handled by
//! [`FrameWithFcs`], which verifies the checksum before handing out a
//! [`Frame`] reader.
//!
//! ## Reading a frame
//! For an incoming frame, use the [`Frame`] structure to read its content.
//! ```
//! # use lrwpan_frame::{Address, DataFrame, Frame, FrameType};
//! let mpdu: [u8; 19] = [
//!     0x41, 0xc8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14,
//!     0x00, 0x4b, 0x12, 0x00, 0x2b, 0x00, 0x00, 0x00,
//! ];
//! let frame = Frame::new(&mpdu[..]).unwrap();
//! let fc = frame.frame_control();
//! assert_eq!(fc.frame_type(), FrameType::Data);
//!
//! let addressing = frame.addressing().unwrap();
//! assert_eq!(addressing.dst_pan_id(), Some(0xabcd));
//! assert_eq!(addressing.dst_address(), Some(Address::BROADCAST));
//! assert_eq!(
//!     addressing.src_address(),
//!     Some(Address::Extended([0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7]))
//! );
//!
//! assert_eq!(frame.payload(), Some(&[0x2b, 0x00, 0x00, 0x00][..]));
//! ```
//!
//! ## Writing a frame
//!
//! Outgoing frames are described by a [`FrameRepr`], most conveniently
//! constructed with the [`FrameBuilder`]. The builder resolves PAN ID
//! compression and the required frame version when it is finalized.
//! ```
//! # use lrwpan_frame::{Address, DataFrame, FrameBuilder};
//! let frame = FrameBuilder::new_data(&[0xde, 0xad])
//!     .set_sequence_number(42)
//!     .set_dst_pan_id(0x1234)
//!     .set_dst_address(Address::Short([0x56, 0x78]))
//!     .set_src_pan_id(0x1234)
//!     .set_src_address(Address::Short([0x9a, 0xbc]))
//!     .finalize()
//!     .unwrap();
//!
//! let mut buffer = vec![0; frame.buffer_len()];
//! frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));
//!
//! assert_eq!(
//!     buffer,
//!     [0x41, 0x88, 0x2a, 0x34, 0x12, 0x78, 0x56, 0xbc, 0x9a, 0xde, 0xad]
//! );
//! ```
//!
//! [`new`]: Frame::new
//! [`check_len`]: DataFrame::check_len
//! [`new_unchecked`]: DataFrame::new_unchecked
//! [`frame_control`]: Frame::frame_control
//! [`sequence_number`]: Frame::sequence_number
//! [`addressing`]: Frame::addressing
//! [`auxiliary_security_header`]: Frame::auxiliary_security_header
//! [`payload`]: Frame::payload
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(unused)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod constants;
pub use constants::*;

mod frames;
pub use frames::AckFrame;
pub use frames::CommandFrame;
pub use frames::CommandId;
pub use frames::DataFrame;
pub use frames::Frame;
pub use frames::FrameWithFcs;

mod frame_control;
pub use frame_control::*;

mod aux_sec_header;
pub use aux_sec_header::*;

mod addressing;
pub use addressing::*;

mod repr;
pub use repr::*;

/// An error that can occur when reading or writing an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy)]
pub struct Error;

/// A type alias for `Result<T, frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
