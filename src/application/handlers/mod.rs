//! Application handlers, one module per bounded area.
//!
//! - `billing` - webhook reconciliation, billing portal, provider-side
//!   subscription lookup
//! - `orders` - checkout initiation and the local status projection

pub mod billing;
pub mod orders;
