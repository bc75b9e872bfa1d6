//! Notification consumer: resolve the subject, run its updater, and when the
//! subject needs its container equivalated first, do that and retry once.

use std::sync::Arc;

use equiv_core::errors::UpdateError;
use equiv_core::models::EquivalenceNotification;
use equiv_core::traits::{IContentResolver, ILookupEntryStore};
use equiv_core::{Content, EquivError, EquivResult};
use tracing::{debug, info, warn};

use crate::configuration::EquivalenceUpdaters;
use crate::outcome::UpdateOutcome;
use crate::recent::RecentlyProcessed;
use crate::slot_locks::SlotLocks;
use crate::worker_span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Seen inside the dedupe window.
    RecentlyProcessed,
    /// No content behind the id.
    Unresolved,
    /// No updater for the subject's publisher and shape.
    NotConfigured,
    /// The container still blocked the subject after one retry.
    ContainerUnresolved { container_uri: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkOutcome {
    Skipped(SkipReason),
    Updated(UpdateOutcome),
}

impl WorkOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, WorkOutcome::Updated(outcome) if outcome.changed())
    }
}

pub struct EquivalenceUpdatingWorker {
    content: Arc<dyn IContentResolver>,
    lookups: Arc<dyn ILookupEntryStore>,
    updaters: Arc<EquivalenceUpdaters>,
    recent: RecentlyProcessed,
    slots: Arc<SlotLocks>,
}

impl EquivalenceUpdatingWorker {
    pub fn new(
        content: Arc<dyn IContentResolver>,
        lookups: Arc<dyn ILookupEntryStore>,
        updaters: Arc<EquivalenceUpdaters>,
        recent: RecentlyProcessed,
        slots: Arc<SlotLocks>,
    ) -> Self {
        Self {
            content,
            lookups,
            updaters,
            recent,
            slots,
        }
    }

    /// Handle one notification. Repeats inside the dedupe window are skipped
    /// and notifications sharing a slot run one at a time.
    pub fn process(&self, notification: &EquivalenceNotification) -> EquivResult<WorkOutcome> {
        let span = worker_span!(notification.message_id, notification.subject_id);
        let _enter = span.enter();
        let id = notification.subject_id;

        if !self.recent.mark(id) {
            debug!(subject_id = id, "recently processed, skipping");
            return Ok(WorkOutcome::Skipped(SkipReason::RecentlyProcessed));
        }
        let _slot = self.slots.acquire(&notification.slot())?;

        match self.process_subject(id) {
            Ok(outcome) => Ok(outcome),
            Err(EquivError::UpdateError(UpdateError::DependencyUnresolved { subject, container })) => {
                warn!(subject = %subject, container = %container, "dropping update, container still unresolved");
                Ok(WorkOutcome::Skipped(SkipReason::ContainerUnresolved {
                    container_uri: container,
                }))
            }
            Err(e) => {
                self.recent.forget(id);
                Err(e)
            }
        }
    }

    /// Run the subject now, ignoring the dedupe window. A container that is
    /// still missing after its own run is an error.
    pub fn process_subject(&self, id: u64) -> EquivResult<WorkOutcome> {
        let Some(subject) = self.resolve(id)? else {
            warn!(subject_id = id, "no content for id");
            return Ok(WorkOutcome::Skipped(SkipReason::Unresolved));
        };
        if !self.updaters.handles(&subject) {
            debug!(subject = %subject.canonical_uri, publisher = %subject.publisher, shape = %subject.shape, "no updater configured");
            return Ok(WorkOutcome::Skipped(SkipReason::NotConfigured));
        }

        let container_uri = match self.updaters.update(subject.clone())? {
            UpdateOutcome::DependencyMissing { container_uri } => container_uri,
            outcome => return Ok(WorkOutcome::Updated(outcome)),
        };

        info!(subject = %subject.canonical_uri, container = %container_uri, "equivalating container first");
        match self.content.resolve_uri(&container_uri)? {
            Some(container) => {
                if let Err(e) = self.updaters.update(container) {
                    warn!(container = %container_uri, error = %e, "container update failed");
                }
            }
            None => warn!(container = %container_uri, "container not found"),
        }

        match self.updaters.update(subject.clone())? {
            UpdateOutcome::DependencyMissing { container_uri } => Err(UpdateError::DependencyUnresolved {
                subject: subject.canonical_uri.clone(),
                container: container_uri,
            }
            .into()),
            retried => Ok(WorkOutcome::Updated(retried)),
        }
    }

    /// Id → lookup entry → content, falling back to the content store's own ids.
    fn resolve(&self, id: u64) -> EquivResult<Option<Arc<Content>>> {
        if let Some(entry) = self.lookups.entries_for_ids(&[id])?.into_iter().next() {
            if let Some(content) = self.content.resolve_uri(&entry.uri)? {
                return Ok(Some(content));
            }
        }
        Ok(self.content.resolve_ids(&[id])?.into_iter().next())
    }
}
