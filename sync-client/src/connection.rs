use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// What the transport tells the session. `Up` fires on every (re)connect and
/// is the trigger for a full resync; `Down` fires when an established stream
/// drops.
#[derive(Debug)]
pub enum Signal {
    Up,
    Event { event_type: String, data: Value },
    Down,
}

/// Owns the SSE transport for one session: a background task that holds the
/// stream open, reconnects with capped exponential backoff after a drop, and
/// forwards lifecycle and event signals over a channel.
pub struct ConnectionManager {
    signal_rx: mpsc::UnboundedReceiver<Signal>,
    handle: tokio::task::JoinHandle<()>,
}

impl ConnectionManager {
    /// Start the transport task against `{base_url}/sse`, authenticated with
    /// the session cookie from login.
    pub fn connect(base_url: &str, session_cookie: &str) -> Self {
        let url = format!("{base_url}/sse");
        let cookie = format!("id={session_cookie}");
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_transport(url, cookie, tx));

        Self {
            signal_rx: rx,
            handle,
        }
    }

    pub async fn next_signal(&mut self) -> Option<Signal> {
        self.signal_rx.recv().await
    }

    /// Explicit teardown (page unload). Stops the retry loop; no further
    /// signals are delivered.
    pub fn disconnect(self) {
        self.handle.abort();
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_transport(url: String, cookie: String, tx: mpsc::UnboundedSender<Signal>) {
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let client = match es::ClientBuilder::for_url(&url)
            .and_then(|builder| builder.header("Cookie", &cookie))
        {
            Ok(builder) => builder
                // The reconnect loop below owns retry policy.
                .reconnect(es::ReconnectOptions::reconnect(false).build())
                .build(),
            Err(e) => {
                error!("Failed to build SSE client for {url}: {e}");
                return;
            }
        };

        let mut stream = client.stream();
        let mut connected = false;

        while let Some(item) = stream.next().await {
            match item {
                Ok(es::SSE::Event(event)) => {
                    if !connected {
                        connected = true;
                        backoff = INITIAL_BACKOFF;
                        if tx.send(Signal::Up).is_err() {
                            return;
                        }
                    }
                    match serde_json::from_str(&event.data) {
                        Ok(data) => {
                            let signal = Signal::Event {
                                event_type: event.event_type,
                                data,
                            };
                            if tx.send(signal).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!("Dropping SSE event with undecodable payload: {e}");
                        }
                    }
                }
                Ok(es::SSE::Comment(_)) => {
                    // Keep-alive; also the first sign a fresh stream is open.
                    if !connected {
                        connected = true;
                        backoff = INITIAL_BACKOFF;
                        if tx.send(Signal::Up).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("SSE transport error: {e}");
                    break;
                }
            }
        }

        if connected && tx.send(Signal::Down).is_err() {
            return;
        }

        debug!("Reconnecting SSE in {backoff:?}");
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}
