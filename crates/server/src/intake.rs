use std::sync::Arc;

use device_client::IndicatorDevice;
use shared::{domain::Command, protocol::PipelineEvent};
use tracing::{error, info};
use translator::Translator;

/// Device I/O runs on its own task; failures there are logged and go no
/// further.
#[derive(Clone)]
pub(crate) struct EventIntake {
    translator: Translator,
    device: Arc<dyn IndicatorDevice>,
}

impl EventIntake {
    pub(crate) fn new(translator: Translator, device: Arc<dyn IndicatorDevice>) -> Self {
        Self { translator, device }
    }

    pub(crate) fn accept(&self, event: &PipelineEvent) -> Option<Command> {
        let Some(command) = self.translator.translate(event) else {
            info!(kind = event.name(), "Other event");
            return None;
        };

        info!(
            event = event.name(),
            stage = event.stage().unwrap_or_default(),
            ring = %command.ring,
            color = %command.color,
            "dispatching command"
        );
        let device = self.device.clone();
        tokio::spawn(async move {
            if let Err(error) = device.apply(&command).await {
                error!(%error, ring = %command.ring, "error while sending request to UFO");
            }
        });
        Some(command)
    }
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
