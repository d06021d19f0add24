// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg_attr(not(test), allow(dead_code))]

use super::node::{Node, NodeId, WhichTree};
use super::tree_map::TreeMap;

fn node(id: i64, parent: i64, left: bool) -> Node {
    Node::new(NodeId::new(id), NodeId::new(parent))
        .with_left_child(left)
        .with_label(format!("n{id}"))
}

/// ```text
/// 0
/// ├─ 1
/// │  ├─ 2
/// │  └─ 3
/// └─ 4
/// ```
pub(crate) fn small_tree_nodes() -> Vec<Node> {
    vec![node(0, -1, true), node(1, 0, true), node(2, 1, true), node(3, 1, false), node(4, 0, false)]
}

pub(crate) fn small_tree() -> TreeMap {
    TreeMap::from_nodes(small_tree_nodes(), WhichTree::Both)
}

/// A search that fails twice before finding its solution at node 7.
///
/// ```text
/// 0            (solution path: 0, 3, 7)
/// ├─ 1
/// │  └─ 2
/// └─ 3
///    ├─ 4
///    │  ├─ 5
///    │  └─ 6
///    └─ 7      solution
/// ```
pub(crate) fn search_tree_nodes() -> Vec<Node> {
    vec![
        node(0, -1, true).with_child_count(2),
        node(1, 0, true).with_child_count(1),
        node(2, 1, true),
        node(3, 0, false).with_child_count(2),
        node(4, 3, true).with_child_count(2),
        node(5, 4, true),
        node(6, 4, false),
        node(7, 3, false).with_solution(true),
    ]
}

pub(crate) fn search_tree() -> TreeMap {
    TreeMap::from_nodes(search_tree_nodes(), WhichTree::Both)
}

pub(crate) fn search_solution_path() -> Vec<NodeId> {
    [0, 3, 7].into_iter().map(NodeId::new).collect()
}

/// Only the given ids of [`search_tree_nodes`].
pub(crate) fn partial_search_tree(ids: &[i64]) -> TreeMap {
    let nodes = search_tree_nodes().into_iter().filter(|node| ids.contains(&node.id().get()));
    TreeMap::from_nodes(nodes, WhichTree::Both)
}

/// `0 -> 1 -> ... -> len-1`, every node a left child.
pub(crate) fn chain_tree(len: i64) -> TreeMap {
    let nodes = (0..len).map(|id| node(id, id - 1, true));
    TreeMap::from_nodes(nodes, WhichTree::Both)
}
