//! # Tether Protocol
//!
//! Wire-visible types shared between the tether session client and the
//! servers it talks to: the inbound [`Envelope`], the application-facing
//! [`Directive`] shape, the canonical [`ConnectionStatus`] vocabulary, and
//! the session-resumption conventions (query parameter names and the
//! invalid-resumption close signal).
//!
//! This crate is deliberately thin: serde types and a handful of helpers,
//! no async, no I/O. The session logic lives in `tether-client`.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod directive;
pub mod envelope;
pub mod resumption;
pub mod status;

pub use directive::{Directive, UnrecognisedInstruction};
pub use envelope::{Envelope, EnvelopeError, WELCOME_INTENT};
pub use resumption::{
    CLOSE_INVALID_RESUMPTION, PARAM_CLIENT_ID, PARAM_LAST_NUM, RESUMPTION_REJECTED_MARKER,
    close_invalidates_resumption,
};
pub use status::ConnectionStatus;
