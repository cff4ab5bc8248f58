//! MAC common part sublayer data services.

pub mod data;
pub mod purge;
