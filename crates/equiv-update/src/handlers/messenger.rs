use std::sync::Arc;

use chrono::Utc;
use equiv_core::models::{EquivalenceAssertionMessage, EquivalenceResults};
use equiv_core::traits::IMessageSender;
use equiv_core::{EquivResult, Publisher};
use tracing::debug;

/// Announces a changed graph to downstream consumers.
pub struct AssertionMessenger {
    sender: Arc<dyn IMessageSender>,
    publishers: Vec<Publisher>,
}

impl AssertionMessenger {
    pub fn new(sender: Arc<dyn IMessageSender>, publishers: impl IntoIterator<Item = Publisher>) -> Self {
        Self {
            sender,
            publishers: publishers.into_iter().collect(),
        }
    }

    pub fn send(&self, results: &EquivalenceResults) -> EquivResult<()> {
        let message =
            EquivalenceAssertionMessage::from_results(results, self.publishers.clone(), Utc::now());
        self.sender.send(&message)?;
        debug!(
            message_id = %message.message_id,
            subject = %message.subject.uri,
            assertions = message.assertions.len(),
            "assertion sent"
        );
        Ok(())
    }
}
