//! Connected components of the equivalence graph.
//!
//! Components are loaded from the store by breadth-first expansion, then
//! rebuilt as an undirected petgraph graph over `direct ∪ explicit` edges.
//! An edge vetoed by either endpoint's blacklist is left out.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use equiv_core::traits::ILookupEntryStore;
use equiv_core::{EquivResult, LookupEntry, LookupRef};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;

/// Load every entry reachable from `seeds`, keyed by uri.
///
/// Edges pointing at uris with no entry are ignored.
pub fn load_component(
    store: &dyn ILookupEntryStore,
    seeds: impl IntoIterator<Item = String>,
) -> EquivResult<BTreeMap<String, LookupEntry>> {
    let mut loaded: BTreeMap<String, LookupEntry> = BTreeMap::new();
    let mut queued: BTreeSet<String> = BTreeSet::new();
    let mut frontier: VecDeque<String> = VecDeque::new();
    for seed in seeds {
        if queued.insert(seed.clone()) {
            frontier.push_back(seed);
        }
    }

    while !frontier.is_empty() {
        let batch: Vec<String> = frontier.drain(..).collect();
        for entry in store.entries_for_uris(&batch)? {
            for uri in neighbour_uris(&entry) {
                if queued.insert(uri.clone()) {
                    frontier.push_back(uri);
                }
            }
            loaded.insert(entry.uri.clone(), entry);
        }
    }
    Ok(loaded)
}

/// Uris an entry holds an edge to, self excluded.
fn neighbour_uris(entry: &LookupEntry) -> Vec<String> {
    entry
        .direct
        .uris()
        .chain(entry.explicit.uris())
        .filter(|uri| *uri != entry.uri)
        .map(str::to_string)
        .collect()
}

/// Undirected view over a set of loaded entries.
pub struct ComponentGraph {
    graph: UnGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ComponentGraph {
    pub fn build(entries: &BTreeMap<String, LookupEntry>) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::with_capacity(entries.len());
        for uri in entries.keys() {
            index.insert(uri.clone(), graph.add_node(uri.clone()));
        }
        for entry in entries.values() {
            let Some(&from) = index.get(&entry.uri) else {
                continue;
            };
            for uri in neighbour_uris(entry) {
                let (Some(&to), Some(other)) = (index.get(&uri), entries.get(&uri)) else {
                    continue;
                };
                if entry.blacklists(&uri) || other.blacklists(&entry.uri) {
                    continue;
                }
                if graph.find_edge(from, to).is_none() {
                    graph.add_edge(from, to, ());
                }
            }
        }
        Self { graph, index }
    }

    /// Every component, each as a sorted uri set, in order of first member.
    pub fn components(&self) -> Vec<BTreeSet<String>> {
        let mut seen: BTreeSet<NodeIndex> = BTreeSet::new();
        let mut components = Vec::new();
        let mut starts: Vec<(&String, &NodeIndex)> = self.index.iter().collect();
        starts.sort();
        for (_, &start) in starts {
            if seen.contains(&start) {
                continue;
            }
            let mut members = BTreeSet::new();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(node) = bfs.next(&self.graph) {
                seen.insert(node);
                members.insert(self.graph[node].clone());
            }
            components.push(members);
        }
        components
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Outcome of recomputing closures over loaded entries.
#[derive(Debug, Default)]
pub struct ClosureUpdate {
    /// Uris whose `equivalents` changed.
    pub changed: BTreeSet<String>,
    /// Components left stale because they exceed the size limit.
    pub deferred: Vec<BTreeSet<String>>,
}

/// Recompute `equivalents` for every entry in `entries`.
///
/// Components larger than `max_size` keep their current closure and are
/// reported as deferred. `None` lifts the limit.
pub fn recompute_closures(
    entries: &mut BTreeMap<String, LookupEntry>,
    max_size: Option<usize>,
    now: chrono::DateTime<chrono::Utc>,
) -> ClosureUpdate {
    let mut update = ClosureUpdate::default();
    for component in ComponentGraph::build(entries).components() {
        if max_size.is_some_and(|max| component.len() > max) {
            update.deferred.push(component);
            continue;
        }
        let refs: BTreeSet<LookupRef> = component
            .iter()
            .filter_map(|uri| entries.get(uri).map(|e| e.self_ref.clone()))
            .collect();
        for uri in &component {
            let Some(entry) = entries.get_mut(uri) else {
                continue;
            };
            if !same_refs(&entry.equivalents, &refs) {
                entry.equivalents = refs.clone();
                entry.transitives_updated = now;
                update.changed.insert(uri.clone());
            }
        }
    }
    update
}

/// Equal as uri sets and as ids.
fn same_refs(a: &BTreeSet<LookupRef>, b: &BTreeSet<LookupRef>) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.uri == y.uri && x.id == y.id)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use equiv_core::{Content, Direction};

    use super::*;

    fn entry(uri: &str) -> LookupEntry {
        LookupEntry::for_content(&Content::item(uri, "p"), Utc::now())
    }

    fn link(entries: &mut BTreeMap<String, LookupEntry>, a: &str, b: &str) {
        let (ra, rb) = (entries[a].self_ref.clone(), entries[b].self_ref.clone());
        if let Some(e) = entries.get_mut(a) {
            e.direct.insert(rb, Direction::Outgoing);
        }
        if let Some(e) = entries.get_mut(b) {
            e.direct.insert(ra, Direction::Incoming);
        }
    }

    fn set(uris: &[&str]) -> BTreeSet<String> {
        uris.iter().map(|u| u.to_string()).collect()
    }

    fn loaded(uris: &[&str]) -> BTreeMap<String, LookupEntry> {
        uris.iter().map(|u| (u.to_string(), entry(u))).collect()
    }

    #[test]
    fn chains_close_transitively() {
        let mut entries = loaded(&["a", "b", "c", "d"]);
        link(&mut entries, "a", "b");
        link(&mut entries, "b", "c");
        let update = recompute_closures(&mut entries, None, Utc::now());
        assert_eq!(entries["a"].equivalent_uris(), set(&["a", "b", "c"]));
        assert_eq!(entries["d"].equivalent_uris(), set(&["d"]));
        assert_eq!(update.changed.len(), 3);
    }

    #[test]
    fn blacklist_cuts_the_edge() {
        let mut entries = loaded(&["a", "b"]);
        link(&mut entries, "a", "b");
        let rb = entries["b"].self_ref.clone();
        if let Some(e) = entries.get_mut("a") {
            e.blacklisted.insert(rb, Direction::Outgoing);
        }
        recompute_closures(&mut entries, None, Utc::now());
        assert_eq!(entries["a"].equivalents.len(), 1);
    }

    #[test]
    fn oversized_components_are_deferred() {
        let mut entries = loaded(&["a", "b", "c"]);
        link(&mut entries, "a", "b");
        link(&mut entries, "b", "c");
        let update = recompute_closures(&mut entries, Some(2), Utc::now());
        assert_eq!(update.deferred.len(), 1);
        assert!(update.changed.is_empty());
        assert_eq!(entries["a"].equivalents.len(), 1);
    }
}
