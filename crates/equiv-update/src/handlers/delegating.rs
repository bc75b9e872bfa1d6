use equiv_core::models::{EquivalenceResults, HandleOutcome, HandlerFailure};
use equiv_core::traits::IResultHandler;
use equiv_core::EquivResult;
use tracing::warn;

/// Runs every handler in order.
///
/// A failing handler is recorded and the rest still run; nothing already
/// done is rolled back. A dependency-missing outcome stops the chain.
pub struct DelegatingHandler {
    handlers: Vec<Box<dyn IResultHandler>>,
}

impl DelegatingHandler {
    pub fn new(handlers: Vec<Box<dyn IResultHandler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl IResultHandler for DelegatingHandler {
    fn name(&self) -> &str {
        "delegating"
    }

    fn handle(&self, results: &EquivalenceResults) -> EquivResult<HandleOutcome> {
        let mut changed = false;
        let mut failures = Vec::new();
        for handler in &self.handlers {
            match handler.handle(results) {
                Ok(HandleOutcome::Handled {
                    changed: c,
                    failures: f,
                }) => {
                    changed |= c;
                    failures.extend(f);
                }
                Ok(missing @ HandleOutcome::DependencyMissing { .. }) => return Ok(missing),
                Err(e) => {
                    warn!(
                        handler = handler.name(),
                        subject = %results.subject.canonical_uri,
                        error = %e,
                        "result handler failed"
                    );
                    failures.push(HandlerFailure {
                        handler: handler.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(HandleOutcome::Handled { changed, failures })
    }
}
