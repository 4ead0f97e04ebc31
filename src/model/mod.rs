//! Data model for the scenario dashboard.
//!
//! - [`DataPoint`]: one row of the scenario dataset
//! - [`ChatMessage`], [`ChatContext`], [`ChatReply`]: assistant conversation
//!   types and the `/api/chat` wire format
//! - [`MapImage`]: opaque geospatial layer payload

pub mod chat;
pub mod data_point;
pub mod map;

pub use chat::*;
pub use data_point::*;
pub use map::*;
