//! In-memory transport doubles for driving session logic deterministically.
//!
//! [`MockConnector`] satisfies the [`Connector`] seam without any I/O: every
//! `connect` call is recorded with its URL, and the test script drives the
//! resulting connection by injecting opened/message/closed/error events and
//! observing the commands the session issues.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::transport::{ConnectionCommand, ConnectionEvent, ConnectionHandle, Connector};

/// A connector handing out scripted in-memory connections.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    connections: Arc<Mutex<Vec<MockConnection>>>,
}

impl MockConnector {
    /// Creates the connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many connection attempts have been made.
    pub fn attempts(&self) -> usize {
        self.connections.lock().len()
    }

    /// The `index`th connection attempt, in creation order.
    pub fn connection(&self, index: usize) -> Option<MockConnection> {
        self.connections.lock().get(index).cloned()
    }

    /// The most recent connection attempt.
    pub fn last(&self) -> Option<MockConnection> {
        self.connections.lock().last().cloned()
    }

    /// The URLs dialled so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.connections
            .lock()
            .iter()
            .map(|conn| conn.url.clone())
            .collect()
    }
}

impl Connector for MockConnector {
    fn connect(&self, url: &str) -> ConnectionHandle {
        let (handle, cmd_rx, evt_tx) = ConnectionHandle::channel();
        self.connections.lock().push(MockConnection {
            url: url.to_string(),
            events: evt_tx,
            commands: Arc::new(Mutex::new(cmd_rx)),
        });
        handle
    }
}

/// The scripted side of one connection attempt.
#[derive(Debug, Clone)]
pub struct MockConnection {
    /// The URL the session dialled.
    pub url: String,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    commands: Arc<Mutex<mpsc::UnboundedReceiver<ConnectionCommand>>>,
}

impl MockConnection {
    /// Announces the connection as opened.
    pub fn open(&self) {
        let _ = self.events.send(ConnectionEvent::Opened);
    }

    /// Delivers a text frame.
    pub fn message(&self, text: impl Into<String>) {
        let _ = self.events.send(ConnectionEvent::Message(text.into()));
    }

    /// Closes the connection with the given code and reason.
    pub fn close(&self, code: Option<u16>, reason: Option<&str>) {
        let _ = self.events.send(ConnectionEvent::Closed {
            code,
            reason: reason.map(str::to_string),
        });
    }

    /// Signals an opaque transport error. Drivers always follow one with a
    /// close, and so should test scripts.
    pub fn error(&self) {
        let _ = self.events.send(ConnectionEvent::Error);
    }

    /// Drains the commands the session has issued so far.
    pub fn take_commands(&self) -> Vec<ConnectionCommand> {
        let mut commands = self.commands.lock();
        let mut taken = Vec::new();
        while let Ok(command) = commands.try_recv() {
            taken.push(command);
        }
        taken
    }

    /// Drains commands and returns the text frames among them.
    pub fn sent_texts(&self) -> Vec<String> {
        self.take_commands()
            .into_iter()
            .filter_map(|command| match command {
                ConnectionCommand::Send(text) => Some(text),
                ConnectionCommand::Close => None,
            })
            .collect()
    }

    /// Whether a close has been requested so far. Drains pending commands.
    pub fn close_requested(&self) -> bool {
        self.take_commands()
            .iter()
            .any(|command| matches!(command, ConnectionCommand::Close))
    }
}
