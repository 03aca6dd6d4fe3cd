//! Inbound message envelopes.
//!
//! Every frame the server sends is a JSON envelope. The client inspects a
//! few fields (sequence number, welcome/identity marker) and forwards the
//! rest untouched. Bodies arrive base64-encoded and carry nested JSON.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Intent carried by the server greeting that assigns the client an identity.
pub const WELCOME_INTENT: &str = "Welcome";

/// One structured message unit exchanged over the transport.
///
/// All fields are optional on the wire; servers omit what does not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Clients the message originated from.
    #[serde(rename = "From", default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<String>,

    /// Clients the message is addressed to. For a Welcome, `to[0]` is the
    /// identity the server has assigned to this client.
    #[serde(rename = "To", default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,

    /// Sequence number of this envelope, used as the resumption point.
    #[serde(rename = "Num", default, skip_serializing_if = "Option::is_none")]
    pub num: Option<u64>,

    /// Server timestamp, forwarded untouched.
    #[serde(rename = "Time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,

    /// What the envelope means: `Welcome`, `Peer`, `Joiner`, etc.
    #[serde(rename = "Intent", default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// Base64-encoded JSON body, when the envelope carries one.
    #[serde(rename = "Body", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Failures while interpreting an inbound envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The frame was not a JSON envelope at all.
    #[error("envelope is not valid JSON: {0}")]
    Json(serde_json::Error),

    /// The body field was present but not valid base64.
    #[error("envelope body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The body decoded to bytes that are not valid JSON.
    #[error("decoded envelope body is not valid JSON: {0}")]
    Body(serde_json::Error),
}

impl Envelope {
    /// Parses an envelope from the raw text of a transport frame.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Json`] if the text is not a JSON envelope.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(text).map_err(EnvelopeError::Json)
    }

    /// Whether this envelope is the server's Welcome greeting.
    pub fn is_welcome(&self) -> bool {
        self.intent.as_deref() == Some(WELCOME_INTENT)
    }

    /// The identity the server assigned us, if this is a Welcome envelope.
    pub fn assigned_id(&self) -> Option<&str> {
        if self.is_welcome() {
            self.to.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Decodes the nested body, if any: base64 to bytes, bytes to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Base64`] or [`EnvelopeError::Body`] when the
    /// nested decode fails.
    pub fn decode_body(&self) -> Result<Option<serde_json::Value>, EnvelopeError> {
        let Some(encoded) = &self.body else {
            return Ok(None);
        };
        let bytes = BASE64.decode(encoded)?;
        let value = serde_json::from_slice(&bytes).map_err(EnvelopeError::Body)?;
        Ok(Some(value))
    }
}
