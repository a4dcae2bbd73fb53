//! Bridges raw connection events into the dispatch engine.

use std::{sync::Arc, time::Duration};

use mudlink_core::{
    NormalizedEvent, RawEvent,
    traits::{ConnectionState, Localizer, Transport, UiShell},
};
use mudlink_dispatch::DispatchEngine;
use thiserror::Error;

use crate::frame::IDLE_COMMAND;

/// Cadence of the idle keep-alive, a liveness measure against
/// intermediary idle timeouts.
pub const KEEPALIVE_PERIOD: Duration = Duration::from_secs(3 * 60);

/// Adapter startup error.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The transport was already closed when the adapter started.
    #[error("transport closed before initialization")]
    TransportClosed,
}

/// Normalizes transport events and feeds the dispatch engine.
///
/// Connection lifecycle goes straight to the UI shell; message events
/// run the decode/dispatch path. One background task sends the idle
/// marker while connected; it never re-enters dispatch and is aborted
/// when the adapter is dropped.
pub struct TransportAdapter {
    shell: Arc<dyn UiShell>,
    engine: Arc<DispatchEngine>,
    keepalive: tokio::task::JoinHandle<()>,
}

impl TransportAdapter {
    /// Start the adapter over an established transport.
    ///
    /// # Errors
    /// Returns [`AdapterError::TransportClosed`] when the transport is
    /// already closed, after raising a single user-visible alert.
    /// Nothing is initialized in that case; reconnection is the
    /// transport owner's responsibility.
    pub fn start(
        transport: Arc<dyn Transport>,
        engine: Arc<DispatchEngine>,
        shell: Arc<dyn UiShell>,
        lang: Arc<dyn Localizer>,
    ) -> Result<Self, AdapterError> {
        if transport.state() == ConnectionState::Closed {
            shell.popup_alert(&lang.tr("Can not connect to the server."));
            return Err(AdapterError::TransportClosed);
        }

        let keepalive = tokio::spawn(keepalive_loop(transport));

        Ok(Self {
            shell,
            engine,
            keepalive,
        })
    }

    /// Route one raw transport event.
    pub fn on_event(&self, event: RawEvent) {
        match event.normalize() {
            NormalizedEvent::ConnectionOpen => self.shell.on_connection_open(),
            NormalizedEvent::ConnectionClose => self.shell.on_connection_close(),
            message @ NormalizedEvent::Message { .. } => self.engine.dispatch(&message),
        }
    }
}

impl Drop for TransportAdapter {
    fn drop(&mut self) {
        self.keepalive.abort();
    }
}

async fn keepalive_loop(transport: Arc<dyn Transport>) {
    let mut interval = tokio::time::interval(KEEPALIVE_PERIOD);
    // The first tick completes immediately; consume it so the first
    // idle goes out one full period after startup.
    interval.tick().await;
    loop {
        interval.tick().await;
        if transport.state() == ConnectionState::Open {
            if let Err(e) = transport.send_command(IDLE_COMMAND) {
                tracing::debug!("keep-alive send failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use mudlink_core::{Channel, SendError};
    use mudlink_dispatch::HandlerTable;
    use serde_json::Value;
    use tokio_test::assert_ok;

    use super::*;

    #[derive(Default)]
    struct StubTransport {
        open: AtomicBool,
        sent: Mutex<Vec<String>>,
    }

    impl Transport for StubTransport {
        fn state(&self) -> ConnectionState {
            if self.open.load(Ordering::SeqCst) {
                ConnectionState::Open
            } else {
                ConnectionState::Closed
            }
        }

        fn send_command(&self, command: &str) -> Result<(), SendError> {
            if !self.open.load(Ordering::SeqCst) {
                return Err(SendError::NotConnected);
            }
            self.sent.lock().unwrap().push(command.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubShell {
        alerts: Mutex<Vec<String>>,
        opens: AtomicUsize,
        closes: AtomicUsize,
    }

    impl UiShell for StubShell {
        fn popup_alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
        fn popup_message(&self, _title: &str, _content: &str) {}
        fn object_moved_in(&self, _objects: &Value) {}
        fn object_moved_out(&self, _objects: &Value) {}
        fn player_online(&self, _player: &Value) {}
        fn player_offline(&self, _player: &Value) {}
        fn set_status(&self, _status: &Value) {}
        fn set_skill_cooldown(&self, _skill: &str, _cd: f64, _gcd: f64) {}
        fn set_skill_cast(&self, _cast: &Value) {}
        fn show_exp_gain(&self, _exp: i64) {}
        fn show_loot(&self, _result: &Value) {}
        fn show_combat(&self, _combat: &Value) {}
        fn on_login(&self, _info: &Value) {}
        fn on_logout(&self, _info: &Value) {}
        fn on_puppet(&self, _info: &Value) {}
        fn on_unpuppet(&self, _info: &Value) {}
        fn close_password_window(&self) {}
        fn is_combat_visible(&self) -> bool {
            false
        }
        fn on_connection_open(&self) {
            self.opens.fetch_add(1, Ordering::SeqCst);
        }
        fn on_connection_close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Identity;

    impl Localizer for Identity {
        fn tr(&self, key: &str) -> String {
            key.to_string()
        }
    }

    fn recording_engine() -> (Arc<DispatchEngine>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fallback_log = Arc::clone(&log);
        let mut table = HandlerTable::new(Box::new(move |value| {
            fallback_log
                .lock()
                .unwrap()
                .push(format!("fallback:{value}"));
            Ok(())
        }));
        let msg_log = Arc::clone(&log);
        table.register("msg", move |value: &Value, _| {
            msg_log.lock().unwrap().push(format!("msg:{value}"));
            Ok(())
        });
        (Arc::new(DispatchEngine::new(table)), log)
    }

    fn start_adapter(
        transport: &Arc<StubTransport>,
        shell: &Arc<StubShell>,
    ) -> (Result<TransportAdapter, AdapterError>, Arc<Mutex<Vec<String>>>) {
        let (engine, log) = recording_engine();
        let result = TransportAdapter::start(
            Arc::clone(transport) as Arc<dyn Transport>,
            engine,
            Arc::clone(shell) as Arc<dyn UiShell>,
            Arc::new(Identity),
        );
        (result, log)
    }

    #[tokio::test]
    async fn test_closed_transport_alerts_once_and_aborts() {
        let transport = Arc::new(StubTransport::default());
        let shell = Arc::new(StubShell::default());

        let (result, _) = start_adapter(&transport, &shell);

        assert!(matches!(result, Err(AdapterError::TransportClosed)));
        assert_eq!(
            *shell.alerts.lock().unwrap(),
            vec!["Can not connect to the server.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_connection_events_forward_to_shell() {
        let transport = Arc::new(StubTransport::default());
        transport.open.store(true, Ordering::SeqCst);
        let shell = Arc::new(StubShell::default());

        let (result, log) = start_adapter(&transport, &shell);
        let adapter = assert_ok!(result);

        adapter.on_event(RawEvent::connection_open());
        adapter.on_event(RawEvent::connection_close());

        assert_eq!(shell.opens.load(Ordering::SeqCst), 1);
        assert_eq!(shell.closes.load(Ordering::SeqCst), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_events_reach_the_engine() {
        let transport = Arc::new(StubTransport::default());
        transport.open.store(true, Ordering::SeqCst);
        let shell = Arc::new(StubShell::default());

        let (result, log) = start_adapter(&transport, &shell);
        let adapter = assert_ok!(result);

        adapter.on_event(RawEvent::message(Channel::Text, "hello there"));

        assert_eq!(*log.lock().unwrap(), vec![r#"msg:"hello there""#]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keepalive_sends_idle_while_open() {
        let transport = Arc::new(StubTransport::default());
        transport.open.store(true, Ordering::SeqCst);
        let shell = Arc::new(StubShell::default());

        let (result, _) = start_adapter(&transport, &shell);
        let adapter = assert_ok!(result);

        // Let the keep-alive task start its timer before moving the
        // clock.
        tokio::task::yield_now().await;
        tokio::time::advance(KEEPALIVE_PERIOD + Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(*transport.sent.lock().unwrap(), vec![IDLE_COMMAND]);

        // Nothing goes out while the connection is down.
        transport.open.store(false, Ordering::SeqCst);
        tokio::time::advance(KEEPALIVE_PERIOD).await;
        tokio::task::yield_now().await;
        assert_eq!(transport.sent.lock().unwrap().len(), 1);

        drop(adapter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_idle_before_the_first_period() {
        let transport = Arc::new(StubTransport::default());
        transport.open.store(true, Ordering::SeqCst);
        let shell = Arc::new(StubShell::default());

        let (result, _) = start_adapter(&transport, &shell);
        let _adapter = assert_ok!(result);

        tokio::task::yield_now().await;
        tokio::time::advance(KEEPALIVE_PERIOD / 2).await;
        tokio::task::yield_now().await;
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
