//! Parent/subtask hierarchy using petgraph.
//!
//! Edges point from parent to child. A `StableDiGraph` keeps node indices
//! valid across removals, so `node_map` never needs re-indexing.

use crate::domain::IssueId;
use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct Hierarchy {
    graph: StableDiGraph<IssueId, ()>,
    node_map: HashMap<IssueId, NodeIndex>,
}

impl Hierarchy {
    /// Register an issue as a node. No-op if already present.
    pub(crate) fn add_issue(&mut self, id: IssueId) {
        if !self.node_map.contains_key(&id) {
            let node = self.graph.add_node(id);
            self.node_map.insert(id, node);
        }
    }

    /// Drop an issue and every edge touching it.
    pub(crate) fn remove_issue(&mut self, id: &IssueId) {
        if let Some(node) = self.node_map.remove(id) {
            self.graph.remove_node(node);
        }
    }

    /// Whether making `parent` the parent of `child` would close a loop.
    ///
    /// True for self-parenting and whenever `parent` is already a descendant
    /// of `child`. Unknown ids never form a loop.
    pub(crate) fn would_create_cycle(&self, child: &IssueId, parent: &IssueId) -> bool {
        if child == parent {
            return true;
        }
        match (self.node_map.get(child), self.node_map.get(parent)) {
            (Some(&c), Some(&p)) => has_path_connecting(&self.graph, c, p, None),
            _ => false,
        }
    }

    /// Replace the parent edge of `child`. Both nodes must already exist.
    pub(crate) fn set_parent(&mut self, child: &IssueId, parent: Option<&IssueId>) {
        let Some(&child_node) = self.node_map.get(child) else {
            return;
        };
        let incoming: Vec<_> = self
            .graph
            .edges_directed(child_node, Direction::Incoming)
            .map(|edge| edge.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
        if let Some(&parent_node) = parent.and_then(|p| self.node_map.get(p)) {
            self.graph.add_edge(parent_node, child_node, ());
        }
    }

    /// Every transitive child of `id`, breadth first, excluding `id` itself.
    pub(crate) fn descendants(&self, id: &IssueId) -> Vec<IssueId> {
        let Some(&start) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut found = Vec::new();
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                found.push(self.graph[node]);
            }
        }
        found
    }

    /// Rebuild from `(issue, parent)` pairs.
    ///
    /// Parent links that point at unknown issues or would close a loop are
    /// skipped and returned so the caller can report them.
    pub(crate) fn rebuild<I>(pairs: I) -> (Self, Vec<(IssueId, IssueId)>)
    where
        I: IntoIterator<Item = (IssueId, Option<IssueId>)>,
    {
        let pairs: Vec<_> = pairs.into_iter().collect();
        let mut hierarchy = Self::default();
        for (id, _) in &pairs {
            hierarchy.add_issue(*id);
        }

        let mut rejected = Vec::new();
        for (id, parent) in pairs {
            let Some(parent) = parent else { continue };
            if !hierarchy.node_map.contains_key(&parent)
                || hierarchy.would_create_cycle(&id, &parent)
            {
                rejected.push((id, parent));
                continue;
            }
            hierarchy.set_parent(&id, Some(&parent));
        }
        (hierarchy, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> (Hierarchy, Vec<IssueId>) {
        let ids: Vec<IssueId> = (0..n).map(|_| IssueId::new()).collect();
        let mut h = Hierarchy::default();
        for id in &ids {
            h.add_issue(*id);
        }
        for pair in ids.windows(2) {
            h.set_parent(&pair[1], Some(&pair[0]));
        }
        (h, ids)
    }

    #[test]
    fn descendants_are_transitive() {
        let (h, ids) = chain(4);
        let desc = h.descendants(&ids[0]);
        assert_eq!(desc, ids[1..].to_vec());
        assert!(h.descendants(&ids[3]).is_empty());
    }

    #[test]
    fn cycle_detection() {
        let (h, ids) = chain(3);
        assert!(h.would_create_cycle(&ids[0], &ids[2]));
        assert!(h.would_create_cycle(&ids[1], &ids[1]));
        assert!(!h.would_create_cycle(&ids[2], &ids[0]));
    }

    #[test]
    fn reparent_replaces_old_edge() {
        let (mut h, ids) = chain(3);
        h.set_parent(&ids[2], Some(&ids[0]));
        assert_eq!(h.descendants(&ids[1]), Vec::<IssueId>::new());

        h.set_parent(&ids[2], None);
        assert_eq!(h.descendants(&ids[0]), vec![ids[1]]);
    }

    #[test]
    fn removal_keeps_other_nodes_valid() {
        let (mut h, ids) = chain(4);
        h.remove_issue(&ids[1]);
        // ids[2] lost its parent edge but still knows its own child
        assert_eq!(h.descendants(&ids[2]), vec![ids[3]]);
        assert!(h.descendants(&ids[0]).is_empty());
    }

    #[test]
    fn rebuild_rejects_loops_and_orphans() {
        let a = IssueId::new();
        let b = IssueId::new();
        let ghost = IssueId::new();
        let (h, rejected) =
            Hierarchy::rebuild([(a, Some(b)), (b, Some(a)), (IssueId::new(), Some(ghost))]);

        assert_eq!(rejected.len(), 2);
        assert_eq!(h.descendants(&b), vec![a]);
    }
}
