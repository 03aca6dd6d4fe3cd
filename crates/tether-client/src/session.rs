//! The session itself: instruction dispatcher and connection supervisor.
//!
//! All state lives in one [`Session`] value owned by a single spawned task.
//! The task waits on four wake sources at a time - application directives,
//! the current connection's events, the stability deadline, and the
//! reconnect deadline - so no two handlers ever run concurrently and no
//! locking is needed. Clearing a deadline cancels its timer; a stale timer
//! can never fire against a superseded connection.

use serde_json::Value;
use tether_protocol::{ConnectionStatus, Directive, Envelope, close_invalidates_resumption};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::notifier::StatusNotifier;
use crate::transport::{ConnectionEvent, ConnectionHandle, Connector};
use crate::url::connection_url;

/// What the application holds: non-blocking directive entry points.
///
/// Cloneable; all clones feed the same session. Directives are queued and
/// never block, and failures come back on the event channel rather than as
/// return values.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    client_id: String,
}

impl SessionHandle {
    /// Acts on a directive: Open, Close, or Send.
    pub fn act(&self, directive: Directive) {
        let _ = self.commands.send(Command::Directive(directive));
    }

    /// Acts on the untyped `{instruction, url?, body?}` shape. An unknown
    /// instruction is signalled to the application as an error event.
    pub fn act_value(&self, value: Value) {
        match Directive::from_value(value) {
            Ok(directive) => self.act(directive),
            Err(_) => {
                let _ = self.commands.send(Command::Unrecognised);
            }
        }
    }

    /// Opens a connection to `url`, replacing any current connection.
    pub fn open(&self, url: impl Into<String>) {
        self.act(Directive::Open { url: url.into() });
    }

    /// Closes the current connection and suppresses reconnection.
    pub fn close(&self) {
        self.act(Directive::Close);
    }

    /// Serializes `body` and transmits it on the current connection.
    pub fn send(&self, body: Value) {
        self.act(Directive::Send { body });
    }

    /// The client identity generated when the session was created.
    ///
    /// The server may later assign a different identity via a Welcome
    /// envelope; reconnection URIs always carry the current one.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// What travels from the handle to the supervisor task.
#[derive(Debug)]
enum Command {
    Directive(Directive),
    Unrecognised,
}

/// One wake-up of the supervisor loop.
#[derive(Debug)]
enum Wake {
    Command(Option<Command>),
    Connection(ConnectionEvent),
    StabilityElapsed,
    ReconnectDue,
}

/// The session supervisor: owns the connection handle and all session state.
#[derive(Debug)]
pub struct Session<C> {
    config: SessionConfig,
    connector: C,
    commands: mpsc::UnboundedReceiver<Command>,
    to_app: mpsc::UnboundedSender<SessionEvent>,
    notifier: StatusNotifier,

    /// Generated at creation; replaced if the server assigns one.
    client_id: String,
    /// The endpoint to keep connected to. `Some` means an unexpected close
    /// triggers a reconnect; a deliberate Close clears it.
    base_url: Option<String>,
    /// URL queued by an Open that arrived while a connection still existed.
    next_open: Option<String>,
    /// Last sequence number observed, the resumption point.
    last_num: Option<u64>,
    /// The current transport attempt. At most one, ever.
    conn: Option<ConnectionHandle>,
    /// Opened but not yet confirmed stable.
    settling: bool,
    /// Pending stability confirmation, if a connection is settling.
    stability_deadline: Option<Instant>,
    /// Pending reconnect attempt, if one is backing off.
    reconnect_at: Option<Instant>,
    /// Zero-based index of the pending reconnect attempt.
    attempt: u32,
}

impl<C: Connector> Session<C> {
    /// Spawns the supervisor task.
    ///
    /// Returns the application's handle and the event channel the session
    /// reports through. The task runs until every handle is dropped; there
    /// is no destroy operation beyond [`SessionHandle::close`].
    pub fn spawn(
        config: SessionConfig,
        connector: C,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let client_id = Uuid::new_v4().to_string();

        let session = Self {
            config,
            connector,
            commands: cmd_rx,
            to_app: app_tx.clone(),
            notifier: StatusNotifier::new(app_tx),
            client_id: client_id.clone(),
            base_url: None,
            next_open: None,
            last_num: None,
            conn: None,
            settling: false,
            stability_deadline: None,
            reconnect_at: None,
            attempt: 0,
        };
        tokio::spawn(session.run());

        (
            SessionHandle {
                commands: cmd_tx,
                client_id,
            },
            app_rx,
        )
    }

    async fn run(mut self) {
        loop {
            match self.next_wake().await {
                Wake::Command(Some(command)) => self.handle_command(command),
                // Every handle dropped; the session dies with its owner.
                Wake::Command(None) => break,
                Wake::Connection(event) => self.handle_connection_event(event),
                Wake::StabilityElapsed => self.confirm_stable(),
                Wake::ReconnectDue => {
                    self.reconnect_at = None;
                    self.open_attempt();
                }
            }
        }
        debug!("session supervisor stopped");
    }

    async fn next_wake(&mut self) -> Wake {
        let stability = self.stability_deadline;
        let reconnect = self.reconnect_at;
        let commands = &mut self.commands;
        let conn = self.conn.as_mut();

        tokio::select! {
            biased;
            command = commands.recv() => Wake::Command(command),
            event = next_connection_event(conn) => Wake::Connection(event),
            () = wait_until(stability) => Wake::StabilityElapsed,
            () = wait_until(reconnect) => Wake::ReconnectDue,
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Directive(directive) => self.dispatch(directive),
            Command::Unrecognised => self.report(&SessionError::UnrecognisedInstruction),
        }
    }

    fn dispatch(&mut self, directive: Directive) {
        match directive {
            Directive::Open { url } => self.handle_open(url),
            Directive::Close => self.handle_close(),
            Directive::Send { body } => self.handle_send(&body),
        }
    }

    /// Open: connect fresh, or queue behind a connection still closing.
    fn handle_open(&mut self, url: String) {
        if let Some(conn) = &self.conn {
            // Line up the URL and close what we have. The close completion
            // dispatches the queued Open. Clearing base_url makes the close
            // deliberate rather than reconnect-worthy.
            debug!(%url, "open queued behind current connection");
            self.next_open = Some(url);
            self.base_url = None;
            conn.close();
            return;
        }
        self.last_num = None;
        self.attempt = 0;
        self.reconnect_at = None;
        self.base_url = Some(url);
        self.open_attempt();
    }

    /// Close: deliberate, so reconnection is suppressed.
    fn handle_close(&mut self) {
        self.base_url = None;
        if let Some(conn) = &self.conn {
            conn.close();
        } else if self.reconnect_at.take().is_some() {
            // Closed mid-backoff: there is no handle to close, just a
            // pending attempt to cancel.
            self.attempt = 0;
            self.last_num = None;
            self.notifier.announce(ConnectionStatus::Closed);
        }
        // No handle, no pending attempt: closing a closed session is fine.
    }

    fn handle_send(&mut self, body: &Value) {
        let Some(conn) = &self.conn else {
            self.report(&SessionError::NotConnected);
            return;
        };
        match serde_json::to_string(body) {
            Ok(text) => conn.send(text),
            Err(e) => warn!(error = %e, "outbound body could not be serialized"),
        }
    }

    fn handle_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => {
                debug!("connection opened, settling");
                self.settling = true;
                self.stability_deadline = Some(Instant::now() + self.config.stability_period);
                // A real open starts a new announcement cycle: if this
                // connection dies, the next `connecting` is news.
                self.notifier.reset();
            }
            ConnectionEvent::Message(text) => self.handle_message(&text),
            ConnectionEvent::Closed { code, reason } => self.handle_closed(code, reason.as_deref()),
            ConnectionEvent::Error => {
                // Errors carry no detail by design. While a reconnect is
                // intended, the coming close/retry cycle says it all.
                if self.base_url.is_none() {
                    self.report(&SessionError::Transport);
                } else {
                    debug!("transport error suppressed, reconnect pending");
                }
            }
        }
    }

    /// Stability confirmed: by timer expiry, or by first message arrival.
    fn confirm_stable(&mut self) {
        self.stability_deadline = None;
        if self.settling {
            self.settling = false;
            self.attempt = 0;
            self.notifier.announce(ConnectionStatus::Stable);
        }
    }

    fn handle_message(&mut self, text: &str) {
        // Message arrival is conclusive proof of stability, ahead of the
        // timer.
        self.confirm_stable();

        let envelope = match Envelope::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "inbound envelope rejected");
                self.report(&SessionError::Decode(e.to_string()));
                return;
            }
        };
        let body = match envelope.decode_body() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "envelope body rejected");
                self.report(&SessionError::Decode(e.to_string()));
                return;
            }
        };

        if let Some(id) = envelope.assigned_id() {
            debug!(id, "adopted server-assigned identity");
            self.client_id = id.to_string();
        }
        if let Some(num) = envelope.num {
            self.last_num = Some(num);
        }

        let _ = self.to_app.send(SessionEvent::Envelope { envelope, body });
    }

    fn handle_closed(&mut self, code: Option<u16>, reason: Option<&str>) {
        self.stability_deadline = None;
        self.settling = false;
        self.conn = None;

        if close_invalidates_resumption(code, reason) {
            info!(?code, ?reason, "server rejected resumption point");
            self.last_num = None;
        }

        if self.base_url.is_some() {
            if !self.config.reconnect.should_retry(self.attempt) {
                warn!(attempts = self.attempt, "reconnect attempts exhausted");
                self.notifier.announce(ConnectionStatus::Closed);
                self.report(&SessionError::ReconnectExhausted {
                    attempts: self.attempt,
                });
                self.base_url = None;
                self.last_num = None;
                self.attempt = 0;
                return;
            }
            // From the application's perspective the reconnect is a new
            // connecting phase, announced before the backoff wait.
            self.notifier.announce(ConnectionStatus::Connecting);
            let delay = self.config.reconnect.delay_for(self.attempt);
            debug!(attempt = self.attempt, ?delay, "reconnect scheduled");
            self.attempt += 1;
            self.reconnect_at = Some(Instant::now() + delay);
            return;
        }

        // Deliberate close: accept it, reset the resumption point, and run
        // any queued Open as a fresh cycle.
        self.notifier.announce(ConnectionStatus::Closed);
        self.last_num = None;
        self.attempt = 0;
        if let Some(url) = self.next_open.take() {
            self.dispatch(Directive::Open { url });
        }
    }

    /// Starts one transport attempt against the current base URL.
    fn open_attempt(&mut self) {
        let Some(base) = self.base_url.clone() else {
            // A Close won the race against the reconnect timer.
            return;
        };
        let url = connection_url(&base, Some(&self.client_id), self.last_num);
        info!(url = %url, "opening connection");
        self.notifier.announce(ConnectionStatus::Connecting);
        self.conn = Some(self.connector.connect(&url));
    }

    fn report(&self, error: &SessionError) {
        let _ = self.to_app.send(SessionEvent::Error {
            error: error.to_string(),
        });
    }
}

/// Resolves to the next event of the current connection, or never when no
/// connection exists. A driver that vanished without a close counts as
/// closed.
async fn next_connection_event(conn: Option<&mut ConnectionHandle>) -> ConnectionEvent {
    match conn {
        Some(conn) => match conn.next_event().await {
            Some(event) => event,
            None => ConnectionEvent::Closed {
                code: None,
                reason: None,
            },
        },
        None => std::future::pending().await,
    }
}

/// Sleeps until the deadline, or forever when there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
