//! Moonraker JSON-RPC over WebSocket.
//!
//! A fresh connection is opened for every command, the request is written,
//! and the socket is closed after a short delay so the controller has time to
//! pick the script up.

use crate::sink::CommandSink;
use async_trait::async_trait;
use chrono::Utc;
use futures::SinkExt;
use labkit_core::CommandError;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Default Moonraker API port
pub const DEFAULT_PORT: u16 = 7125;

/// Default delay before the per-command socket is closed
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(1000);

/// `printer.gcode.script` request for `script`
pub fn gcode_script_request(script: &str, id: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "printer.gcode.script",
        "params": { "script": script },
        "id": id,
    })
}

/// Sends commands to a Moonraker instance
#[derive(Debug, Clone)]
pub struct MoonrakerSink {
    url: String,
    close_delay: Duration,
}

impl MoonrakerSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }

    /// `ws://<host>:7125/websocket`
    pub fn for_host(host: &str) -> Self {
        Self::new(format!("ws://{host}:{DEFAULT_PORT}/websocket"))
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CommandSink for MoonrakerSink {
    async fn send(&self, command: &str) -> Result<(), CommandError> {
        let (mut ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| CommandError::Connection {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let request = gcode_script_request(command, Utc::now().timestamp_millis());
        ws.send(Message::Text(request.to_string()))
            .await
            .map_err(|e| CommandError::Send(e.to_string()))?;
        info!("Sent command '{}' to {}", command, self.url);

        tokio::time::sleep(self.close_delay).await;
        if let Err(e) = ws.close(None).await {
            warn!("Closing connection to {} failed: {}", self.url, e);
        } else {
            debug!("Closed connection to {}", self.url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = gcode_script_request("WASH_ON", 1700000000000);
        assert_eq!(
            request,
            json!({
                "jsonrpc": "2.0",
                "method": "printer.gcode.script",
                "params": { "script": "WASH_ON" },
                "id": 1700000000000i64
            })
        );
    }

    #[test]
    fn test_url_for_host() {
        let sink = MoonrakerSink::for_host("voron.local");
        assert_eq!(sink.url(), "ws://voron.local:7125/websocket");
    }
}
