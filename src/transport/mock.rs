use std::collections::VecDeque;

use crate::transport::{Transport, TransportEvent};
use crate::utils::{Result, SpacebrewError};

/// In-memory transport that records what the core asked of it.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub connects: Vec<String>,
    pub writes: Vec<String>,
    pub queued: VecDeque<TransportEvent>,
    pub fail_writes: bool,
}

impl MockTransport {
    pub fn push(&mut self, event: TransportEvent) {
        self.queued.push_back(event);
    }

    pub fn take_writes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.writes)
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, url: &str) {
        self.connects.push(url.to_string());
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if self.fail_writes {
            return Err(SpacebrewError::Transport("write refused".to_string()));
        }
        self.writes.push(text.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        self.queued.drain(..).collect()
    }
}
