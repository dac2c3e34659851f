//! Fire-and-forget remote control commands.
//!
//! A command runs as its own task; its outcome comes back to the engine as
//! [`EngineEvent::CommandFinished`], where success triggers one refresh and
//! failure is only logged.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::EngineEvent;
use crate::remote::{Command, PlaybackService};

pub struct CommandDispatcher {
    service: Arc<dyn PlaybackService>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl CommandDispatcher {
    pub fn new(service: Arc<dyn PlaybackService>, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { service, events }
    }

    pub fn skip_next(&self, device_id: &str) {
        self.dispatch(Command::SkipNext, device_id);
    }

    pub fn skip_previous(&self, device_id: &str) {
        self.dispatch(Command::SkipPrevious, device_id);
    }

    pub fn pause(&self, device_id: &str) {
        self.dispatch(Command::Pause, device_id);
    }

    pub fn resume(&self, device_id: &str) {
        self.dispatch(Command::Resume, device_id);
    }

    pub fn dispatch(&self, command: Command, device_id: &str) {
        tracing::info!("Sending {} to device {:?}", command, device_id);

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let device_id = device_id.to_string();
        tokio::spawn(async move {
            let result = service.send_command(command, &device_id).await;
            let _ = events.send(EngineEvent::CommandFinished { command, result });
        });
    }
}
