use serde::{Deserialize, Serialize};

/// A handler that failed while the rest of the chain carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerFailure {
    pub handler: String,
    pub reason: String,
}

/// What the handler stage did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Handlers ran; `changed` is true when the graph was mutated.
    Handled {
        changed: bool,
        failures: Vec<HandlerFailure>,
    },
    /// The subject needs its container equivalated first. Nothing was written.
    DependencyMissing { container_uri: String },
}

impl HandleOutcome {
    pub fn unchanged() -> Self {
        HandleOutcome::Handled {
            changed: false,
            failures: Vec::new(),
        }
    }

    pub fn changed(changed: bool) -> Self {
        HandleOutcome::Handled {
            changed,
            failures: Vec::new(),
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, HandleOutcome::Handled { changed: true, .. })
    }
}
