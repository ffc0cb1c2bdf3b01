use std::time::Duration;

use async_trait::async_trait;
use device_client::{DeviceError, IndicatorDevice};
use shared::domain::Command;
use tokio::sync::mpsc;

pub(crate) struct RecordingDevice {
    tx: mpsc::UnboundedSender<Command>,
    fail: bool,
}

impl RecordingDevice {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, fail: false }, rx)
    }

    pub(crate) fn unreachable() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, fail: true }, rx)
    }
}

#[async_trait]
impl IndicatorDevice for RecordingDevice {
    async fn initialize(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn apply(&self, command: &Command) -> Result<(), DeviceError> {
        let _ = self.tx.send(*command);
        if self.fail {
            return Err(DeviceError::InvalidEndpoint("unreachable.invalid".into()));
        }
        Ok(())
    }
}

pub(crate) async fn next_command(rx: &mut mpsc::UnboundedReceiver<Command>) -> Command {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("command within timeout")
        .expect("channel open")
}
