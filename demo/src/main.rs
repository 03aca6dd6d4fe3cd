//! Tether demo - keep one session alive against a server and narrate it.
//!
//! Opens a session against the given endpoint, prints every status change
//! and envelope, and sends a greeting once the connection proves stable.
//! Kill the server and watch the session reconnect and resume; Ctrl-C quits.
//!
//! ```text
//! cargo run -p tether-demo -- wss://example.com/g/demo-room
//! ```

use anyhow::Context as _;
use serde_json::json;
use tether_client::{Session, SessionConfig, SessionEvent, WebSocketConnector};
use tether_protocol::ConnectionStatus;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tether_client=debug,info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .context("usage: tether-demo <wss://host/g/room>")?;

    let (handle, mut events) = Session::spawn(SessionConfig::default(), WebSocketConnector::new());
    info!(client_id = handle.client_id(), %url, "opening session");
    handle.open(url.as_str());

    let mut greeted = false;
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Status { connection } => {
                println!("status: {connection}");
                if connection == ConnectionStatus::Stable && !greeted {
                    greeted = true;
                    handle.send(json!({"words": "hello from tether-demo"}));
                }
            }
            SessionEvent::Envelope { envelope, body } => {
                println!(
                    "envelope: intent={:?} num={:?} from={:?} body={}",
                    envelope.intent,
                    envelope.num,
                    envelope.from,
                    body.map_or_else(|| "-".to_string(), |b| b.to_string()),
                );
            }
            SessionEvent::Error { error } => {
                eprintln!("error: {error}");
            }
        }
    }

    Ok(())
}
