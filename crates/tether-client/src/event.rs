//! Events delivered to the application.

use tether_protocol::{ConnectionStatus, Envelope};

/// What the session forwards to the application: a connectivity status, a
/// decoded message envelope, or an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Connectivity changed.
    Status {
        /// The new status word.
        connection: ConnectionStatus,
    },

    /// A message arrived from the server.
    Envelope {
        /// The envelope as received; its `body` field is still encoded.
        envelope: Envelope,
        /// The decoded body, when the envelope carried one.
        body: Option<serde_json::Value>,
    },

    /// Something went wrong that the application should hear about.
    Error {
        /// Human-readable description.
        error: String,
    },
}

impl SessionEvent {
    /// The status word, if this is a status event.
    pub fn as_status(&self) -> Option<ConnectionStatus> {
        match self {
            Self::Status { connection } => Some(*connection),
            _ => None,
        }
    }

    /// The envelope, if this is a message event.
    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Envelope { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// The error text, if this is an error event.
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let status = SessionEvent::Status {
            connection: ConnectionStatus::Connecting,
        };
        assert_eq!(status.as_status(), Some(ConnectionStatus::Connecting));
        assert_eq!(status.as_error(), None);

        let error = SessionEvent::Error {
            error: "boom".to_string(),
        };
        assert_eq!(error.as_error(), Some("boom"));
        assert_eq!(error.as_status(), None);

        let envelope = SessionEvent::Envelope {
            envelope: Envelope::default(),
            body: None,
        };
        assert!(envelope.as_envelope().is_some());
    }
}
