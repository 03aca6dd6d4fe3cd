//! # Tether Client
//!
//! A resilient session client over a message-oriented duplex transport.
//! It keeps one logical session alive across transport connects, drops, and
//! reconnects, shielding the application from the churn: reconnection URIs
//! carry session-resumption parameters, retries back off with jitter, a
//! freshly opened connection is only announced once it proves stable, and
//! repeated status words are deduplicated.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether_client::{Session, SessionConfig, WebSocketConnector};
//!
//! # async fn example() {
//! let (handle, mut events) = Session::spawn(SessionConfig::default(), WebSocketConnector::new());
//!
//! handle.open("wss://example.com/g/room-1");
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! tether-client/
//! ├── config.rs    # Session and reconnection configuration
//! ├── session.rs   # Dispatcher + connection supervisor (the state machine)
//! ├── transport.rs # Connector seam and the tokio-tungstenite binding
//! ├── url.rs       # Connection URL construction with resumption parameters
//! ├── notifier.rs  # Status announcement deduplication
//! ├── event.rs     # Events delivered to the application
//! ├── error.rs     # Error taxonomy
//! └── testing.rs   # In-memory transport doubles
//! ```
//!
//! The supervisor is a single task owning all session state; directives and
//! transport events reach it through channels, so handlers never race and
//! the public entry points never block.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod event;
pub mod notifier;
pub mod session;
pub mod testing;
pub mod transport;
pub mod url;

pub use config::{ReconnectConfig, SessionConfig};
pub use error::SessionError;
pub use event::SessionEvent;
pub use session::{Session, SessionHandle};
pub use transport::{
    ConnectionCommand, ConnectionEvent, ConnectionHandle, Connector, WebSocketConnector,
};

// Re-export the wire types for convenience
pub use tether_protocol as protocol;
pub use tether_protocol::{ConnectionStatus, Directive, Envelope};
