//! Core types for the Mudlink message router.
//!
//! This crate provides the fundamental building blocks:
//! - `RawEvent` / `NormalizedEvent` - transport event classification
//! - `Envelope` - decoded logical messages and the decode chain
//! - Collaborator traits the dispatch and transport layers are written
//!   against

pub mod envelope;
pub mod event;
pub mod traits;

pub use envelope::{Envelope, MSG_KEY};
pub use event::{Channel, MessageKind, NormalizedEvent, RawEvent};
pub use traits::{
    ConnectionState, HandlerError, HandlerResult, Localizer, SendError, TextStyle, Transport,
};
