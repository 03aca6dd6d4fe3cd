//! Canonical connection-status vocabulary.

use serde::{Deserialize, Serialize};

/// Connectivity status words announced to the application.
///
/// Serialized lowercase inside the `{connection: <status>}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// A connection attempt is underway - the first one or a reconnect.
    Connecting,
    /// The connection survived its stability period, or delivered a message.
    Stable,
    /// The session is closed and no reconnect is pending.
    Closed,
}

impl ConnectionStatus {
    /// Whether the session currently has a usable connection.
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }

    /// Whether the session is between connections.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Connecting)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Stable => write!(f, "stable"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ConnectionStatus::Connecting).unwrap(),
            "\"connecting\""
        );
        assert_eq!(
            serde_json::to_string(&ConnectionStatus::Stable).unwrap(),
            "\"stable\""
        );
        assert_eq!(
            serde_json::to_string(&ConnectionStatus::Closed).unwrap(),
            "\"closed\""
        );
    }

    #[test]
    fn test_status_display_matches_wire_form() {
        assert_eq!(ConnectionStatus::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn test_status_checks() {
        assert!(ConnectionStatus::Stable.is_stable());
        assert!(!ConnectionStatus::Connecting.is_stable());
        assert!(ConnectionStatus::Connecting.is_transitioning());
        assert!(!ConnectionStatus::Closed.is_transitioning());
    }
}
