// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use super::node::{Node, NodeId, WhichTree};

/// The loaded part of one search trace, keyed by node id.
///
/// Nodes reference their children by id, so the map is the single owner of every node. It is
/// kept ancestor-closed: whatever is loaded can always walk its parent chain back to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeMap {
    nodes: BTreeMap<NodeId, Node>,
}

impl TreeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>, tree_id: WhichTree) -> Self {
        let mut map = Self::new();
        map.insert_nodes(nodes, tree_id);
        map
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.get(NodeId::ROOT)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Merges fetched nodes into the map and returns how many were new.
    ///
    /// Ids already present are left untouched, including their collapse state and tree tag.
    /// New nodes take `tree_id` and are linked below their parent when the parent is loaded,
    /// whether it was loaded before or arrives in the same batch.
    pub fn insert_nodes(&mut self, nodes: impl IntoIterator<Item = Node>, tree_id: WhichTree) -> usize {
        let mut inserted = BTreeSet::new();
        for mut node in nodes {
            let id = node.id();
            if self.nodes.contains_key(&id) {
                continue;
            }
            node.set_tree_id(tree_id);
            self.nodes.insert(id, node);
            inserted.insert(id);
        }

        if inserted.is_empty() {
            return 0;
        }

        let links = self
            .nodes
            .values()
            .filter(|node| inserted.contains(&node.id()) || inserted.contains(&node.parent_id()))
            .map(|node| (node.parent_id(), node.id(), node.is_left_child()))
            .collect::<Vec<_>>();
        for (parent_id, child_id, is_left_child) in links {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.link_child(child_id, is_left_child);
            }
        }

        inserted.len()
    }

    /// Ancestors of `id`, nearest first, ending at the root. Empty when `id` is not loaded.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(mut current) = self.get(id) else {
            return out;
        };
        while let Some(parent) = self.get(current.parent_id()) {
            if out.contains(&parent.id()) {
                break;
            }
            out.push(parent.id());
            current = parent;
        }
        out
    }

    /// Every loaded descendant of `id` in depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(start) = self.get(id) else {
            return out;
        };
        let mut stack = start.children().iter().rev().copied().collect::<Vec<_>>();
        let mut seen = BTreeSet::from([id]);
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            let Some(node) = self.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children().iter().rev().copied());
        }
        out
    }

    /// Tags `id` and its whole loaded subtree. Returns `false` when `id` is not loaded.
    pub fn tag_subtree(&mut self, id: NodeId, tree_id: WhichTree) -> bool {
        if !self.contains(id) {
            return false;
        }
        for member in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(node) = self.nodes.get_mut(&member) {
                node.set_tree_id(tree_id);
            }
        }
        true
    }

    /// Expands every ancestor of `id` so that `id` is visible. Unknown ids are ignored.
    pub fn show_all_ancestors(&mut self, id: NodeId) {
        for ancestor in self.ancestors(id) {
            if let Some(node) = self.nodes.get_mut(&ancestor) {
                node.set_collapsed(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TreeMap;
    use crate::model::fixtures::{chain_tree, small_tree};
    use crate::model::{Node, NodeId, WhichTree};

    fn id(value: i64) -> NodeId {
        NodeId::new(value)
    }

    #[test]
    fn insert_links_children_in_left_first_order() {
        let map = small_tree();
        let root = map.root().expect("root");
        assert_eq!(root.children(), &[id(1), id(4)]);
        assert_eq!(map.get(id(1)).expect("node 1").children(), &[id(2), id(3)]);
    }

    #[test]
    fn insert_accepts_children_before_parents() {
        let nodes = vec![
            Node::new(id(2), id(1)).with_left_child(true),
            Node::new(id(1), id(0)).with_left_child(true),
            Node::new(id(0), NodeId::NONE),
        ];
        let map = TreeMap::from_nodes(nodes, WhichTree::Left);
        assert_eq!(map.root().expect("root").children(), &[id(1)]);
        assert_eq!(map.get(id(1)).expect("node 1").children(), &[id(2)]);
        assert!(map.iter().all(|node| node.tree_id() == WhichTree::Left));
    }

    #[test]
    fn insert_never_overwrites_existing_entries() {
        let mut map = small_tree();
        map.get_mut(id(1)).expect("node 1").set_collapsed(true);

        let replacement = Node::new(id(1), id(0)).with_label("changed");
        let inserted = map.insert_nodes([replacement], WhichTree::Right);

        assert_eq!(inserted, 0);
        let node = map.get(id(1)).expect("node 1");
        assert!(node.is_collapsed());
        assert_eq!(node.label(), "n1");
        assert_eq!(node.tree_id(), WhichTree::Both);
    }

    #[test]
    fn ancestors_walk_to_root_nearest_first() {
        let map = chain_tree(5);
        assert_eq!(map.ancestors(id(4)), vec![id(3), id(2), id(1), id(0)]);
        assert!(map.ancestors(id(0)).is_empty());
        assert!(map.ancestors(id(99)).is_empty());
    }

    #[test]
    fn descendants_exclude_the_start_node() {
        let map = small_tree();
        assert_eq!(map.descendants(id(0)), vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(map.descendants(id(1)), vec![id(2), id(3)]);
        assert!(map.descendants(id(4)).is_empty());
    }

    #[test]
    fn show_all_ancestors_expands_the_path_only() {
        let mut map = small_tree();
        for node_id in [0, 1, 3, 4] {
            map.get_mut(id(node_id)).expect("node").set_collapsed(true);
        }

        map.show_all_ancestors(id(3));

        assert!(!map.get(id(0)).expect("root").is_collapsed());
        assert!(!map.get(id(1)).expect("node 1").is_collapsed());
        assert!(map.get(id(3)).expect("node 3").is_collapsed());
        assert!(map.get(id(4)).expect("node 4").is_collapsed());
    }

    #[test]
    fn tag_subtree_covers_node_and_descendants() {
        let mut map = small_tree();
        assert!(map.tag_subtree(id(1), WhichTree::Right));
        assert!(!map.tag_subtree(id(42), WhichTree::Right));

        let tags = map.iter().map(|node| (node.id().get(), node.tree_id())).collect::<Vec<_>>();
        assert_eq!(
            tags,
            vec![
                (0, WhichTree::Both),
                (1, WhichTree::Right),
                (2, WhichTree::Right),
                (3, WhichTree::Right),
                (4, WhichTree::Both),
            ]
        );
    }
}
