use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use equiv_core::constants::sources;
use equiv_core::content::Alias;
use equiv_core::errors::ConfigError;
use equiv_core::traits::{IContentResolver, IEquivalenceGenerator, ILookupEntryStore};
use equiv_core::{AuditTrail, Content, EquivResult, Publisher, Score, ScoredCandidates};
use tracing::debug;

/// Proposes content sharing an alias with the subject.
///
/// Namespaces in the same group are interchangeable: an alias in one is also
/// looked up under every other namespace of its group.
pub struct AliasResolvingGenerator {
    lookups: Arc<dyn ILookupEntryStore>,
    resolver: Arc<dyn IContentResolver>,
    publishers: BTreeSet<Publisher>,
    namespace_groups: Vec<BTreeSet<String>>,
    score: Score,
    include_unpublished: bool,
}

impl AliasResolvingGenerator {
    pub fn new(
        lookups: Arc<dyn ILookupEntryStore>,
        resolver: Arc<dyn IContentResolver>,
        publishers: impl IntoIterator<Item = Publisher>,
        score: f64,
    ) -> Self {
        Self {
            lookups,
            resolver,
            publishers: publishers.into_iter().collect(),
            namespace_groups: Vec::new(),
            score: Score::value(score),
            include_unpublished: false,
        }
    }

    /// Declare interchangeable namespace groups. Fails when a namespace sits
    /// in more than one group.
    pub fn with_namespace_groups(mut self, groups: &[Vec<String>]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for group in groups {
            for namespace in group {
                if !seen.insert(namespace.as_str()) {
                    return Err(ConfigError::OverlappingNamespaces {
                        namespace: namespace.clone(),
                    });
                }
            }
        }
        self.namespace_groups = groups
            .iter()
            .map(|g| g.iter().cloned().collect())
            .collect();
        Ok(self)
    }

    pub fn including_unpublished(mut self) -> Self {
        self.include_unpublished = true;
        self
    }

    /// The subject's aliases plus their counterparts in grouped namespaces.
    fn expanded_aliases(&self, subject: &Content) -> Vec<Alias> {
        let mut expanded: BTreeSet<Alias> = BTreeSet::new();
        for alias in &subject.aliases {
            expanded.insert(alias.clone());
            if let Some(group) = self
                .namespace_groups
                .iter()
                .find(|g| g.contains(&alias.namespace))
            {
                expanded.extend(group.iter().map(|ns| alias.in_namespace(ns)));
            }
        }
        expanded.into_iter().collect()
    }
}

impl IEquivalenceGenerator for AliasResolvingGenerator {
    fn name(&self) -> &str {
        sources::ALIAS
    }

    fn generate(&self, subject: &Content, trail: &mut AuditTrail) -> EquivResult<ScoredCandidates> {
        let mut found = ScoredCandidates::new(sources::ALIAS);
        if subject.aliases.is_empty() {
            trail.append("subject has no aliases");
            return Ok(found);
        }

        let aliases = self.expanded_aliases(subject);
        let uris: Vec<String> = self
            .lookups
            .entries_for_aliases(&aliases)?
            .into_iter()
            .filter(|e| e.uri != subject.canonical_uri)
            .filter(|e| self.publishers.contains(&e.self_ref.publisher))
            .map(|e| e.uri)
            .collect();

        for candidate in self.resolver.resolve_uris(&uris)? {
            if candidate.shape.is_container() != subject.shape.is_container() {
                continue;
            }
            if !candidate.actively_published && !self.include_unpublished {
                continue;
            }
            trail.append(format!("{} shares an alias", candidate.canonical_uri));
            found.add(candidate, self.score);
        }
        debug!(
            subject = %subject.canonical_uri,
            aliases = aliases.len(),
            candidates = found.len(),
            "alias resolution"
        );
        Ok(found)
    }
}
