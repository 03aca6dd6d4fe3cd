//! Status announcement deduplication.

use tether_protocol::ConnectionStatus;
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::SessionEvent;

/// Forwards connectivity statuses to the application, suppressing a status
/// equal to the last one announced.
///
/// The suppression keeps rapid successive reconnect attempts from flooding
/// the application with `connecting` over and over, while any actual
/// transition still surfaces exactly once. A successful open starts a new
/// announcement cycle (see [`StatusNotifier::reset`]): the close of a
/// connection that really opened is news, even when the status word repeats.
#[derive(Debug)]
pub struct StatusNotifier {
    last: Option<ConnectionStatus>,
    to_app: mpsc::UnboundedSender<SessionEvent>,
}

impl StatusNotifier {
    /// Creates a notifier announcing on the given channel.
    pub fn new(to_app: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { last: None, to_app }
    }

    /// Announces `status` unless it equals the last announced value.
    ///
    /// Returns whether an announcement actually went out.
    pub fn announce(&mut self, status: ConnectionStatus) -> bool {
        if self.last == Some(status) {
            debug!(%status, "status unchanged, announcement suppressed");
            return false;
        }
        self.last = Some(status);
        let _ = self.to_app.send(SessionEvent::Status { connection: status });
        true
    }

    /// Starts a new announcement cycle: the next status always fires.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The last status that actually went out, if any.
    pub fn last_announced(&self) -> Option<ConnectionStatus> {
        self.last
    }
}
