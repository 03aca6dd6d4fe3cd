//! Transport seam: the connector trait and the tokio-tungstenite binding.
//!
//! The session never constructs a socket itself. It asks a [`Connector`] for
//! a [`ConnectionHandle`] and drives everything through that handle's
//! command and event channels. Production binds the seam to a real WebSocket;
//! tests bind it to the in-memory double in [`crate::testing`].

use futures::{SinkExt as _, StreamExt as _};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tracing::{debug, warn};

/// Events a connection delivers to its owner, in transport order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection is open and traffic may flow.
    Opened,

    /// A text frame arrived.
    Message(String),

    /// The connection is gone. Always the final event for a handle.
    Closed {
        /// Close code from the peer, when one was sent.
        code: Option<u16>,
        /// Close reason from the peer, when one was sent.
        reason: Option<String>,
    },

    /// Something failed. Details are unavailable by design; a `Closed`
    /// always follows.
    Error,
}

/// Commands the session issues against a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCommand {
    /// Transmit a text frame.
    Send(String),
    /// Close the connection.
    Close,
}

/// Exclusive handle to one transport attempt.
///
/// Owned by the session supervisor; at most one exists at a time. Dropping
/// the handle tears the underlying connection down.
#[derive(Debug)]
pub struct ConnectionHandle {
    commands: mpsc::UnboundedSender<ConnectionCommand>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl ConnectionHandle {
    /// Creates a handle together with the command/event endpoints its driver
    /// holds. Connector implementations call this and hand the receiver and
    /// sender to whatever pumps the actual transport.
    pub fn channel() -> (
        Self,
        mpsc::UnboundedReceiver<ConnectionCommand>,
        mpsc::UnboundedSender<ConnectionEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        (
            Self {
                commands: cmd_tx,
                events: evt_rx,
            },
            cmd_rx,
            evt_tx,
        )
    }

    /// Queues a text frame for transmission.
    pub fn send(&self, text: String) {
        let _ = self.commands.send(ConnectionCommand::Send(text));
    }

    /// Requests the connection close. A `Closed` event follows once the
    /// close completes.
    pub fn close(&self) {
        let _ = self.commands.send(ConnectionCommand::Close);
    }

    /// Receives the next event, or `None` once the driver is gone.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }
}

/// Factory for transport connections - the one seam the session exposes.
///
/// `connect` must not block and must not fail: a handle comes back
/// immediately, and a dial failure arrives later as `Error` then `Closed`
/// events, exactly like a connection that dropped. The supervisor therefore
/// has a single failure path for "never connected" and "was connected".
pub trait Connector: Send + Sync + 'static {
    /// Opens a new connection attempt against `url`.
    fn connect(&self, url: &str) -> ConnectionHandle;
}

/// Production connector backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    /// Creates the connector.
    pub fn new() -> Self {
        Self
    }
}

impl Connector for WebSocketConnector {
    fn connect(&self, url: &str) -> ConnectionHandle {
        let (handle, cmd_rx, evt_tx) = ConnectionHandle::channel();
        tokio::spawn(run_socket(url.to_string(), cmd_rx, evt_tx));
        handle
    }
}

/// Dials the socket, then pumps frames and commands until either side closes.
async fn run_socket(
    url: String,
    mut commands: mpsc::UnboundedReceiver<ConnectionCommand>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!(url = %url, error = %e, "WebSocket connect failed");
            let _ = events.send(ConnectionEvent::Error);
            let _ = events.send(ConnectionEvent::Closed {
                code: None,
                reason: None,
            });
            return;
        }
    };
    debug!(url = %url, "WebSocket connected");
    let _ = events.send(ConnectionEvent::Opened);

    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(ConnectionCommand::Send(text)) => {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        warn!(error = %e, "WebSocket send failed");
                        let _ = events.send(ConnectionEvent::Error);
                    }
                }
                Some(ConnectionCommand::Close) => {
                    // Close frame out; the peer's close reply (or EOF) ends
                    // the read side and the loop with it.
                    let _ = sink.send(Message::Close(None)).await;
                }
                None => {
                    // Owner dropped the handle.
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(ConnectionEvent::Message(text.to_string()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(CloseFrame { code, reason }) => {
                            (Some(u16::from(code)), Some(reason.to_string()))
                        }
                        None => (None, None),
                    };
                    debug!(?code, "WebSocket closed by peer");
                    let _ = events.send(ConnectionEvent::Closed { code, reason });
                    break;
                }
                // Ping/pong are answered by tungstenite; binary frames carry
                // nothing for this protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket stream error");
                    let _ = events.send(ConnectionEvent::Error);
                    let _ = events.send(ConnectionEvent::Closed {
                        code: None,
                        reason: None,
                    });
                    break;
                }
                None => {
                    let _ = events.send(ConnectionEvent::Closed {
                        code: None,
                        reason: None,
                    });
                    break;
                }
            },
        }
    }
}
