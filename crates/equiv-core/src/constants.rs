//! Constants shared across the workspace.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stable source names. Audit records and gating combiners refer to these.
pub mod sources {
    pub const ALIAS: &str = "Alias";
    pub const TITLE_SEARCH: &str = "Title Search";
    pub const BROADCAST: &str = "Broadcast";
    pub const CONTAINER_CHILD: &str = "Item";
    pub const CONTAINER_CANDIDATES: &str = "Container";
    pub const TITLE: &str = "Title";
    pub const SEQUENCE: &str = "Sequence";
    pub const HIERARCHY: &str = "Hierarchy";
    pub const FILM: &str = "Film";
    pub const EXACT_TITLE: &str = "Exact Title";
    pub const DESCRIPTION: &str = "Description";
    pub const DESCRIPTION_TITLE: &str = "Description Title";
    pub const BROADCAST_TITLE: &str = "Broadcast Title";
}

/// Name of the combined set when nothing was there to combine.
pub const EMPTY_COMBINATION: &str = "empty combination";

/// Name given to combiner output.
pub const COMBINED: &str = "combined";
