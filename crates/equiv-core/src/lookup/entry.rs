use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EquivRefs, LookupRef};
use crate::content::{Alias, Content};

/// One node of the equivalence graph.
///
/// `direct` holds automatically computed edges, `explicit` curated ones,
/// `blacklisted` curated vetoes. `equivalents` caches the transitive closure
/// over `direct ∪ explicit` and may lag behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub uri: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "self")]
    pub self_ref: LookupRef,
    #[serde(default)]
    pub alias_uris: BTreeSet<String>,
    #[serde(default)]
    pub aliases: BTreeSet<Alias>,
    pub direct: EquivRefs,
    pub explicit: EquivRefs,
    #[serde(default)]
    pub blacklisted: EquivRefs,
    pub equivalents: BTreeSet<LookupRef>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub transitives_updated: DateTime<Utc>,
    pub actively_published: bool,
}

impl LookupEntry {
    /// Fresh entry for first ingest: self-edges only, closure `{self}`.
    pub fn for_content(content: &Content, now: DateTime<Utc>) -> Self {
        let self_ref = LookupRef::from_content(content);
        let mut equivalents = BTreeSet::new();
        equivalents.insert(self_ref.clone());
        Self {
            uri: content.canonical_uri.clone(),
            id: content.id,
            direct: EquivRefs::self_only(&self_ref),
            explicit: EquivRefs::self_only(&self_ref),
            blacklisted: EquivRefs::new(),
            self_ref,
            alias_uris: content.alias_uris.clone(),
            aliases: content.aliases.clone(),
            equivalents,
            created: now,
            updated: now,
            transitives_updated: now,
            actively_published: content.actively_published,
        }
    }

    pub fn lookup_ref(&self) -> &LookupRef {
        &self.self_ref
    }

    /// Whether `uri` is vetoed by this entry's curated blacklist.
    pub fn blacklists(&self, uri: &str) -> bool {
        self.blacklisted.contains(uri)
    }

    /// Uris of every other node this entry asserted directly.
    pub fn outgoing_direct_uris(&self) -> BTreeSet<String> {
        self.direct
            .outgoing()
            .filter(|r| r.uri != self.uri)
            .map(|r| r.uri.clone())
            .collect()
    }

    pub fn equivalent_uris(&self) -> BTreeSet<String> {
        self.equivalents.iter().map(|r| r.uri.clone()).collect()
    }

    /// No neighbours at all: one self-edge in `direct` and `explicit`, closure `{self}`.
    pub fn is_solo(&self) -> bool {
        self.equivalents.len() == 1
            && self.direct.len() == 1
            && self.explicit.len() == 1
            && self.blacklisted.is_empty()
    }

    /// Whether any ref held by this entry still lacks an id.
    pub fn has_missing_ids(&self) -> bool {
        self.id.is_none()
            || self.self_ref.id.is_none()
            || self.direct.has_missing_ids()
            || self.explicit.has_missing_ids()
            || self.blacklisted.has_missing_ids()
            || self.equivalents.iter().any(|r| r.id.is_none())
    }

    /// Fill null ids in every ref set from `resolve`. Never changes which edges exist.
    pub fn fill_ids(&mut self, resolve: impl Fn(&str) -> Option<u64>) -> bool {
        let mut changed = false;
        if self.self_ref.id.is_none() {
            if let Some(id) = resolve(&self.uri) {
                self.self_ref.id = Some(id);
                changed = true;
            }
        }
        if self.id.is_none() && self.self_ref.id.is_some() {
            self.id = self.self_ref.id;
            changed = true;
        }
        changed |= self.direct.fill_ids(&resolve);
        changed |= self.explicit.fill_ids(&resolve);
        changed |= self.blacklisted.fill_ids(&resolve);
        if self.equivalents.iter().any(|r| r.id.is_none()) {
            let filled: BTreeSet<LookupRef> = self
                .equivalents
                .iter()
                .map(|r| match (r.id, resolve(&r.uri)) {
                    (None, Some(id)) => {
                        changed = true;
                        r.with_id(id)
                    }
                    _ => r.clone(),
                })
                .collect();
            self.equivalents = filled;
        }
        changed
    }
}
