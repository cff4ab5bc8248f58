#![no_std]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
pub(crate) mod utils;

pub use lrwpan_frame as frame;

pub mod mac;
pub mod phy;
pub mod sync;
pub mod tal;
pub mod time;
