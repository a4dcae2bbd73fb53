//! Message dispatch for the Mudlink game client.
//!
//! Provides:
//! - `HandlerTable` - key → handler registration, read-only after startup
//! - `DispatchEngine` - decode + per-key fan-out with fault isolation
//! - `bindings` - the full key set wired to the UI collaborators

pub mod bindings;
pub mod engine;
pub mod registry;

pub use bindings::{UiHandles, build_table};
pub use engine::DispatchEngine;
pub use registry::{FallbackHandler, Handler, HandlerTable};
