// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node inside one search trace.
///
/// Ids are assigned by the solver in exploration order, so `id + 1` is the next node the search
/// visited and `id - 1` the previous one. Negative values are sentinels only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    /// The root of every trace.
    pub const ROOT: NodeId = NodeId(0);
    /// Parent of a root node; also the "not found" answer of id searches.
    pub const NONE: NodeId = NodeId(-1);
    /// Parent of the synthetic root that joins two disjoint traces.
    pub const VIRTUAL_PARENT: NodeId = NodeId(-2);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two compared traces a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhichTree {
    Left,
    Right,
    #[default]
    Both,
}

/// One node of a search trace as served by the backend, plus client-side display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    parent_id: NodeId,
    #[serde(default)]
    label: String,
    #[serde(default)]
    pretty_label: String,
    #[serde(default)]
    desc_count: u64,
    #[serde(default)]
    is_left_child: bool,
    #[serde(default)]
    child_count: u64,
    #[serde(default)]
    is_solution: bool,
    #[serde(skip)]
    children: Vec<NodeId>,
    #[serde(skip)]
    tree_id: WhichTree,
    #[serde(skip)]
    collapsed: bool,
}

impl Node {
    pub fn new(id: NodeId, parent_id: NodeId) -> Self {
        Self {
            id,
            parent_id,
            label: String::new(),
            pretty_label: String::new(),
            desc_count: 0,
            is_left_child: false,
            child_count: 0,
            is_solution: false,
            children: Vec::new(),
            tree_id: WhichTree::Both,
            collapsed: false,
        }
    }

    /// The root that joins two disjoint traces in a merged view.
    pub fn virtual_root() -> Self {
        let mut node = Self::new(NodeId::NONE, NodeId::VIRTUAL_PARENT);
        node.is_left_child = true;
        node.child_count = 2;
        node
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_pretty_label(mut self, pretty_label: impl Into<String>) -> Self {
        self.pretty_label = pretty_label.into();
        self
    }

    pub fn with_left_child(mut self, is_left_child: bool) -> Self {
        self.is_left_child = is_left_child;
        self
    }

    pub fn with_child_count(mut self, child_count: u64) -> Self {
        self.child_count = child_count;
        self
    }

    pub fn with_desc_count(mut self, desc_count: u64) -> Self {
        self.desc_count = desc_count;
        self
    }

    pub fn with_solution(mut self, is_solution: bool) -> Self {
        self.is_solution = is_solution;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent_id(&self) -> NodeId {
        self.parent_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == NodeId::NONE
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pretty_label(&self) -> &str {
        &self.pretty_label
    }

    pub fn desc_count(&self) -> u64 {
        self.desc_count
    }

    pub fn is_left_child(&self) -> bool {
        self.is_left_child
    }

    pub fn child_count(&self) -> u64 {
        self.child_count
    }

    pub fn is_solution(&self) -> bool {
        self.is_solution
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn tree_id(&self) -> WhichTree {
        self.tree_id
    }

    pub fn set_tree_id(&mut self, tree_id: WhichTree) {
        self.tree_id = tree_id;
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// The node as the backend serves it: no links, no client-side display state.
    pub fn to_record(&self) -> Self {
        Self {
            children: Vec::new(),
            tree_id: WhichTree::Both,
            collapsed: false,
            label: self.label.clone(),
            pretty_label: self.pretty_label.clone(),
            ..*self
        }
    }

    /// Links `child` below this node. Returns `false` when it was already linked.
    ///
    /// Left children go in front of the existing children; everything else is appended.
    pub(crate) fn link_child(&mut self, child: NodeId, is_left_child: bool) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        if is_left_child {
            self.children.insert(0, child);
        } else {
            self.children.push(child);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeId, WhichTree};

    #[test]
    fn deserializes_backend_node_with_client_defaults() {
        let json = r#"{
            "id": 4,
            "parentId": 1,
            "label": "x = 3",
            "prettyLabel": "x := 3",
            "descCount": 12,
            "isLeftChild": false,
            "childCount": 2,
            "isSolution": false
        }"#;

        let node: Node = serde_json::from_str(json).expect("node");
        assert_eq!(node.id(), NodeId::new(4));
        assert_eq!(node.parent_id(), NodeId::new(1));
        assert_eq!(node.label(), "x = 3");
        assert_eq!(node.pretty_label(), "x := 3");
        assert_eq!(node.desc_count(), 12);
        assert_eq!(node.child_count(), 2);
        assert!(node.children().is_empty());
        assert_eq!(node.tree_id(), WhichTree::Both);
        assert!(!node.is_collapsed());
    }

    #[test]
    fn virtual_root_hangs_below_the_virtual_parent() {
        let root = Node::virtual_root();
        assert_eq!(root.id(), NodeId::NONE);
        assert_eq!(root.parent_id(), NodeId::VIRTUAL_PARENT);
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.tree_id(), WhichTree::Both);
    }

    #[test]
    fn link_child_keeps_left_child_first_and_skips_duplicates() {
        let mut node = Node::new(NodeId::ROOT, NodeId::NONE);
        assert!(node.link_child(NodeId::new(5), false));
        assert!(node.link_child(NodeId::new(1), true));
        assert!(!node.link_child(NodeId::new(5), false));
        assert_eq!(node.children(), &[NodeId::new(1), NodeId::new(5)]);
    }
}
