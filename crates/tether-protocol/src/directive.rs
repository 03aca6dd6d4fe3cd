//! Application directives.
//!
//! The application drives the session with three instructions. On the wire
//! (and at the untyped dispatch boundary) they take the shape
//! `{instruction: 'Open'|'Close'|'Send', url?, body?}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An instruction from the application to the session client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "instruction")]
pub enum Directive {
    /// Connect to the given endpoint, replacing any current connection.
    Open {
        /// The endpoint to open.
        url: String,
    },
    /// Close the current connection and stay closed.
    Close,
    /// Serialize and transmit a message body on the current connection.
    Send {
        /// The message body, serialized as JSON before transmission.
        body: serde_json::Value,
    },
}

/// The `instruction` word of an untyped directive was not recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unrecognised instruction")]
pub struct UnrecognisedInstruction;

impl Directive {
    /// Parses the untyped `{instruction, url?, body?}` shape.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognisedInstruction`] when the value does not carry a
    /// known instruction word (or the fields that instruction requires).
    pub fn from_value(value: serde_json::Value) -> Result<Self, UnrecognisedInstruction> {
        serde_json::from_value(value).map_err(|_| UnrecognisedInstruction)
    }
}
