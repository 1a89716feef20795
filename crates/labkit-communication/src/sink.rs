//! The command channel abstraction.

use async_trait::async_trait;
use labkit_core::CommandError;
use parking_lot::Mutex;
use tracing::debug;

/// Sends one text command to the motion controller.
///
/// Each send is independent: no acknowledgment, no retry, no queueing.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send(&self, command: &str) -> Result<(), CommandError>;
}

/// Discards every command
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

#[async_trait]
impl CommandSink for NoOpSink {
    async fn send(&self, command: &str) -> Result<(), CommandError> {
        debug!("Dropping command '{}'", command);
        Ok(())
    }
}

/// Keeps every command it is given, in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send(&self, command: &str) -> Result<(), CommandError> {
        self.commands.lock().push(command.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.send("G28").await.unwrap();
        sink.send("WASH_ON").await.unwrap();
        assert_eq!(sink.commands(), ["G28", "WASH_ON"]);

        sink.clear();
        assert!(sink.commands().is_empty());
    }

    #[tokio::test]
    async fn test_noop_sink_accepts_anything() {
        assert!(NoOpSink.send("M112").await.is_ok());
    }
}
