//! Envelope routing with per-key fault isolation.

use mudlink_core::{Envelope, NormalizedEvent};

use crate::registry::HandlerTable;

/// Routes decoded envelopes to their key handlers.
///
/// Stateless between envelopes: each event is decoded, fanned out, and
/// forgotten. The only carried state is the read-only handler table.
pub struct DispatchEngine {
    table: HandlerTable,
}

impl DispatchEngine {
    /// Create an engine over a fully populated table.
    #[must_use]
    pub fn new(table: HandlerTable) -> Self {
        Self { table }
    }

    /// Decode and route one normalized event.
    ///
    /// Connection events carry nothing to decode and are ignored here;
    /// the transport adapter reports them to the UI shell directly.
    pub fn dispatch(&self, event: &NormalizedEvent) {
        if let NormalizedEvent::Message { kind, payload } = event {
            self.dispatch_envelope(&Envelope::decode(*kind, payload));
        }
    }

    /// Route every key of an envelope independently, in data order.
    ///
    /// A failing handler is logged with its key and value and skipped;
    /// the remaining keys still dispatch. Nothing escapes this loop.
    pub fn dispatch_envelope(&self, envelope: &Envelope) {
        let context = envelope.context.as_deref();
        for (key, value) in &envelope.data {
            tracing::debug!(%key, %value, "dispatch");
            if let Err(e) = self.table.invoke(key, value, context) {
                tracing::error!(%key, %value, "handler failed: {e}");
            }
        }
    }
}
