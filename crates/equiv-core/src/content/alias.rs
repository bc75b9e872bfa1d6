use std::fmt;

use serde::{Deserialize, Serialize};

/// A namespaced external identifier, e.g. `gb:amazon:asin` / `B00XYZ`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Alias {
    pub namespace: String,
    pub value: String,
}

impl Alias {
    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            value: value.into(),
        }
    }

    /// Same value under a different namespace.
    pub fn in_namespace(&self, namespace: &str) -> Alias {
        Alias::new(namespace, self.value.clone())
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}
