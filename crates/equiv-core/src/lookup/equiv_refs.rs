use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::LookupRef;

/// Which side asserted an edge, seen from the entry that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// This entry asserted equivalence to the target.
    Outgoing,
    /// The target asserted equivalence to this entry.
    Incoming,
    Bidirectional,
}

impl Direction {
    /// The direction the mirror edge carries on the other entry.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Bidirectional => Direction::Bidirectional,
        }
    }

    pub fn merge(self, other: Direction) -> Direction {
        if self == other {
            self
        } else {
            Direction::Bidirectional
        }
    }

    /// Whether `self` covers `other`.
    pub fn includes(self, other: Direction) -> bool {
        self == Direction::Bidirectional || self == other
    }

    /// `self` with `other` taken away; `None` when nothing is left.
    pub fn without(self, other: Direction) -> Option<Direction> {
        match (self, other) {
            (_, Direction::Bidirectional) => None,
            (Direction::Bidirectional, Direction::Outgoing) => Some(Direction::Incoming),
            (Direction::Bidirectional, Direction::Incoming) => Some(Direction::Outgoing),
            (current, removed) if current == removed => None,
            (current, _) => Some(current),
        }
    }
}

/// One edge: target ref plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivRef {
    #[serde(rename = "ref")]
    pub target: LookupRef,
    pub direction: Direction,
}

/// A set of directed edges keyed by target uri.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EquivRef>", into = "Vec<EquivRef>")]
pub struct EquivRefs {
    refs: BTreeMap<String, EquivRef>,
}

impl EquivRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The minimal set every entry starts from: itself, both ways.
    pub fn self_only(self_ref: &LookupRef) -> Self {
        let mut refs = Self::new();
        refs.insert(self_ref.clone(), Direction::Bidirectional);
        refs
    }

    /// Add an edge, merging with any existing direction. Returns true on change.
    pub fn insert(&mut self, target: LookupRef, direction: Direction) -> bool {
        match self.refs.get_mut(&target.uri) {
            Some(existing) => {
                let merged = existing.direction.merge(direction);
                let filled = fill_id(&mut existing.target, &target);
                let changed = filled || merged != existing.direction;
                existing.direction = merged;
                changed
            }
            None => {
                self.refs
                    .insert(target.uri.clone(), EquivRef { target, direction });
                true
            }
        }
    }

    /// Take `direction` away from the edge to `uri`. Returns true on change.
    pub fn remove_direction(&mut self, uri: &str, direction: Direction) -> bool {
        let Some(existing) = self.refs.get_mut(uri) else {
            return false;
        };
        match existing.direction.without(direction) {
            Some(remaining) if remaining == existing.direction => false,
            Some(remaining) => {
                existing.direction = remaining;
                true
            }
            None => {
                self.refs.remove(uri);
                true
            }
        }
    }

    pub fn remove(&mut self, uri: &str) -> Option<EquivRef> {
        self.refs.remove(uri)
    }

    pub fn get(&self, uri: &str) -> Option<&EquivRef> {
        self.refs.get(uri)
    }

    pub fn direction(&self, uri: &str) -> Option<Direction> {
        self.refs.get(uri).map(|r| r.direction)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.refs.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquivRef> {
        self.refs.values()
    }

    pub fn refs(&self) -> impl Iterator<Item = &LookupRef> {
        self.refs.values().map(|r| &r.target)
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.refs.keys().map(String::as_str)
    }

    /// Targets this entry asserted (outgoing or bidirectional).
    pub fn outgoing(&self) -> impl Iterator<Item = &LookupRef> {
        self.refs
            .values()
            .filter(|r| r.direction.includes(Direction::Outgoing))
            .map(|r| &r.target)
    }

    pub fn has_missing_ids(&self) -> bool {
        self.refs.values().any(|r| r.target.id.is_none())
    }

    /// Fill null ids via `resolve`. Never adds or removes edges. Returns true on change.
    pub fn fill_ids(&mut self, resolve: impl Fn(&str) -> Option<u64>) -> bool {
        let mut changed = false;
        for r in self.refs.values_mut() {
            if r.target.id.is_none() {
                if let Some(id) = resolve(&r.target.uri) {
                    r.target.id = Some(id);
                    changed = true;
                }
            }
        }
        changed
    }
}

fn fill_id(existing: &mut LookupRef, incoming: &LookupRef) -> bool {
    if existing.id.is_none() && incoming.id.is_some() {
        existing.id = incoming.id;
        true
    } else {
        false
    }
}

impl From<Vec<EquivRef>> for EquivRefs {
    fn from(refs: Vec<EquivRef>) -> Self {
        let mut set = EquivRefs::new();
        for r in refs {
            set.insert(r.target, r.direction);
        }
        set
    }
}

impl From<EquivRefs> for Vec<EquivRef> {
    fn from(refs: EquivRefs) -> Self {
        refs.refs.into_values().collect()
    }
}

impl FromIterator<(LookupRef, Direction)> for EquivRefs {
    fn from_iter<T: IntoIterator<Item = (LookupRef, Direction)>>(iter: T) -> Self {
        let mut set = EquivRefs::new();
        for (target, direction) in iter {
            set.insert(target, direction);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Publisher;
    use crate::lookup::ContentCategory;

    fn r(uri: &str) -> LookupRef {
        LookupRef::new(uri, None, Publisher::new("p"), ContentCategory::TopLevelItem)
    }

    #[test]
    fn outgoing_and_incoming_merge_to_bidirectional() {
        let mut refs = EquivRefs::new();
        assert!(refs.insert(r("a"), Direction::Outgoing));
        assert!(refs.insert(r("a"), Direction::Incoming));
        assert_eq!(refs.direction("a"), Some(Direction::Bidirectional));
        assert!(!refs.insert(r("a"), Direction::Outgoing));
    }

    #[test]
    fn removing_one_side_of_bidirectional_keeps_the_other() {
        let mut refs = EquivRefs::new();
        refs.insert(r("a"), Direction::Bidirectional);
        assert!(refs.remove_direction("a", Direction::Outgoing));
        assert_eq!(refs.direction("a"), Some(Direction::Incoming));
        assert!(!refs.remove_direction("a", Direction::Outgoing));
        assert!(refs.remove_direction("a", Direction::Incoming));
        assert!(!refs.contains("a"));
    }

    #[test]
    fn insert_backfills_missing_id_without_changing_direction() {
        let mut refs = EquivRefs::new();
        refs.insert(r("a"), Direction::Outgoing);
        assert!(refs.insert(r("a").with_id(4), Direction::Outgoing));
        assert_eq!(refs.get("a").unwrap().target.id, Some(4));
    }

    #[test]
    fn serde_uses_edge_list() {
        let mut refs = EquivRefs::new();
        refs.insert(r("a"), Direction::Incoming);
        let json = serde_json::to_value(&refs).unwrap();
        assert_eq!(json[0]["direction"], "INCOMING");
        let back: EquivRefs = serde_json::from_value(json).unwrap();
        assert_eq!(back, refs);
    }
}
