//! Session error taxonomy.

use thiserror::Error;

/// Errors surfaced to the application.
///
/// None of these are returned across the directive boundary: `act` always
/// succeeds, and failures arrive as `{error}` events on the application
/// channel. Nothing here is fatal to the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// A Send directive arrived while no connection exists.
    #[error("Send: not connected")]
    NotConnected,

    /// An untyped directive carried an unknown instruction word.
    #[error("Unrecognised instruction")]
    UnrecognisedInstruction,

    /// The transport failed. Details are unavailable by design of the
    /// underlying socket; a close (and reconnect, if one is due) follows.
    #[error("Transport error")]
    Transport,

    /// The configured retry ceiling was reached without a stable connection.
    #[error("Reconnect attempts exhausted after {attempts} tries")]
    ReconnectExhausted {
        /// How many attempts were made.
        attempts: u32,
    },

    /// An inbound envelope could not be decoded.
    #[error("Envelope rejected: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(SessionError::NotConnected.to_string(), "Send: not connected");
        assert_eq!(
            SessionError::UnrecognisedInstruction.to_string(),
            "Unrecognised instruction"
        );
        assert_eq!(
            SessionError::ReconnectExhausted { attempts: 5 }.to_string(),
            "Reconnect attempts exhausted after 5 tries"
        );
    }
}
