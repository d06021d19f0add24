// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Merging two traces into one tree for side-by-side comparison.
//!
//! Both traces are loaded independently. [`merge_maps`] tags every node with the trace it comes
//! from and grafts the right-only branches onto the left tree at their divergence points. When
//! the traces share nothing, the two roots hang below a synthetic root instead. [`MergedView`]
//! keeps both traces around so the merged tree can be walked and grown one side at a time.

use std::collections::{BTreeMap, BTreeSet};

use crate::loader::{fetch_ancestors, LoadError, NodeSource};
use crate::model::{traces_are_disjoint, DiffPoint, Node, NodeId, TraceCore, TreeMap, WhichTree};

mod view;

pub use view::MergedView;

#[derive(Debug, Clone, PartialEq, Eq)]
struct MergedNode {
    node: Node,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// The trace a merged node was taken from. Shared nodes count as left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn of(tree_id: WhichTree) -> Self {
        match tree_id {
            WhichTree::Right => Self::Right,
            WhichTree::Left | WhichTree::Both => Self::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Identifies a merged node: ids are only unique per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergedKey {
    pub side: Side,
    pub id: NodeId,
}

impl MergedKey {
    pub fn new(side: Side, id: NodeId) -> Self {
        Self { side, id }
    }

    pub fn left(id: NodeId) -> Self {
        Self::new(Side::Left, id)
    }

    pub fn right(id: NodeId) -> Self {
        Self::new(Side::Right, id)
    }
}

/// A merged view of two traces.
///
/// Nodes live in an arena and link to their children by arena slot. The id index covers the left
/// trace only (or just the synthetic root, keyed `0`, for disjoint traces); grafted right-trace
/// nodes are reachable through `children` alone, since their ids may collide with left ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTree {
    arena: Vec<MergedNode>,
    index: BTreeMap<NodeId, usize>,
    root: Option<usize>,
}

/// A borrowed node of a [`MergedTree`].
#[derive(Debug, Clone, Copy)]
pub struct MergedRef<'a> {
    tree: &'a MergedTree,
    slot: usize,
}

impl<'a> MergedRef<'a> {
    pub fn node(&self) -> &'a Node {
        &self.tree.arena[self.slot].node
    }

    pub fn id(&self) -> NodeId {
        self.node().id()
    }

    pub fn tree_id(&self) -> WhichTree {
        self.node().tree_id()
    }

    pub fn key(&self) -> MergedKey {
        MergedKey::new(Side::of(self.tree_id()), self.id())
    }

    pub fn parent(&self) -> Option<MergedRef<'a>> {
        let tree = self.tree;
        tree.arena[self.slot].parent.map(|slot| MergedRef { tree, slot })
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children().map(|child| child.id()).collect()
    }

    pub fn children(&self) -> impl Iterator<Item = MergedRef<'a>> + 'a {
        let tree = self.tree;
        tree.arena[self.slot].children.iter().map(move |slot| MergedRef { tree, slot: *slot })
    }
}

/// One visible line of a merged tree.
#[derive(Debug, Clone, Copy)]
pub struct MergedRow<'a> {
    pub depth: usize,
    pub node: MergedRef<'a>,
}

impl MergedTree {
    /// Entries in the id index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<MergedRef<'_>> {
        self.index.get(&id).map(|slot| MergedRef { tree: self, slot: *slot })
    }

    pub fn root(&self) -> Option<MergedRef<'_>> {
        self.root.map(|slot| MergedRef { tree: self, slot })
    }

    /// Every node, indexed or grafted.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Depth-first rows from the root, skipping the children of collapsed nodes.
    pub fn flatten(&self) -> Vec<MergedRow<'_>> {
        let mut rows = Vec::new();
        let Some(root) = self.root() else {
            return rows;
        };
        let mut stack = vec![(0usize, root)];
        while let Some((depth, node)) = stack.pop() {
            rows.push(MergedRow { depth, node });
            if node.node().is_collapsed() {
                continue;
            }
            let children = node.children().collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
        }
        rows
    }

    /// Looks a node up by id and side, grafted nodes included.
    pub fn find(&self, key: MergedKey) -> Option<MergedRef<'_>> {
        self.arena
            .iter()
            .position(|entry| {
                entry.node.id() == key.id && Side::of(entry.node.tree_id()) == key.side
            })
            .map(|slot| MergedRef { tree: self, slot })
    }

    /// `key` followed by its merged ancestors up to the root. Empty when `key` is unknown.
    ///
    /// The chain of a grafted right node continues into the left anchor it hangs from.
    pub fn ancestors(&self, key: MergedKey) -> Vec<MergedRef<'_>> {
        let mut chain = Vec::new();
        let mut current = self.find(key);
        while let Some(node) = current {
            if chain.len() > self.arena.len() {
                break;
            }
            chain.push(node);
            current = node.parent();
        }
        chain
    }

    /// Position of `key` in [`MergedTree::flatten`], if visible.
    pub fn row_of(&self, key: MergedKey) -> Option<usize> {
        self.flatten().iter().position(|row| row.node.key() == key)
    }

    fn push(&mut self, node: Node) -> usize {
        self.arena.push(MergedNode { node, parent: None, children: Vec::new() });
        self.arena.len() - 1
    }

    fn link(&mut self, parent: usize, child: usize) {
        self.arena[child].parent = Some(parent);
        self.arena[parent].children.push(child);
    }

    /// Copies `root` and its loaded subtree out of `map`, returning the new slot.
    fn graft(&mut self, map: &TreeMap, root: NodeId) -> Option<usize> {
        let root_slot = self.push(map.get(root)?.clone());
        let mut seen = BTreeSet::from([root]);
        let mut stack = vec![(root_slot, root)];
        while let Some((slot, id)) = stack.pop() {
            let Some(node) = map.get(id) else {
                continue;
            };
            for child in node.children() {
                if !seen.insert(*child) {
                    continue;
                }
                let Some(child_node) = map.get(*child) else {
                    continue;
                };
                let child_slot = self.push(child_node.clone());
                self.link(slot, child_slot);
                stack.push((child_slot, *child));
            }
        }
        Some(root_slot)
    }

    fn from_map(map: &TreeMap) -> Self {
        let mut tree = Self::default();
        for node in map.iter() {
            let slot = tree.push(node.clone());
            tree.index.insert(node.id(), slot);
        }
        for node in map.iter() {
            let Some(slot) = tree.index.get(&node.id()).copied() else {
                continue;
            };
            let children = node
                .children()
                .iter()
                .filter_map(|child| tree.index.get(child).copied())
                .collect::<Vec<_>>();
            for child in children {
                tree.link(slot, child);
            }
        }
        tree.root = tree.index.get(&NodeId::ROOT).copied();
        tree
    }
}

/// Tags the nodes of both traces with the side they belong to.
///
/// Disjoint traces are tagged wholesale. Otherwise each highlighted branch root and its loaded
/// descendants get tagged on its own side; untouched nodes keep their tag.
pub fn assign_tree_ids(left: &mut TreeMap, right: &mut TreeMap, diff_points: &[DiffPoint]) {
    if traces_are_disjoint(diff_points) {
        left.tag_subtree(NodeId::ROOT, WhichTree::Left);
        right.tag_subtree(NodeId::ROOT, WhichTree::Right);
        return;
    }

    for diff_point in diff_points {
        for id in &diff_point.highlight_left {
            left.tag_subtree(*id, WhichTree::Left);
        }
        for id in &diff_point.highlight_right {
            right.tag_subtree(*id, WhichTree::Right);
        }
    }
}

/// Builds the merged view of two traces. The inputs are not modified.
pub fn merge_maps(left: &TreeMap, right: &TreeMap, diff_points: &[DiffPoint]) -> MergedTree {
    let mut left = left.clone();
    let mut right = right.clone();
    assign_tree_ids(&mut left, &mut right, diff_points);

    if traces_are_disjoint(diff_points) {
        let mut tree = MergedTree::default();
        let root = tree.push(Node::virtual_root());
        for side in [&left, &right] {
            if let Some(slot) = tree.graft(side, NodeId::ROOT) {
                tree.link(root, slot);
            }
        }
        tree.index.insert(NodeId::ROOT, root);
        tree.root = Some(root);
        tracing::debug!(nodes = tree.node_count(), "merged disjoint traces");
        return tree;
    }

    for diff_point in diff_points {
        for id in &diff_point.highlight_left {
            if let Some(node) = left.get_mut(*id) {
                node.set_tree_id(WhichTree::Left);
            }
        }
    }

    let mut tree = MergedTree::from_map(&left);
    let mut grafted = 0usize;
    for diff_point in diff_points {
        let Some(anchor) = tree.index.get(&diff_point.left_tree_id).copied() else {
            continue;
        };
        for id in &diff_point.highlight_right {
            let Some(node) = right.get_mut(*id) else {
                continue;
            };
            node.set_tree_id(WhichTree::Right);
            if let Some(slot) = tree.graft(&right, *id) {
                tree.link(anchor, slot);
                grafted += 1;
            }
        }
    }

    tracing::debug!(
        diff_points = diff_points.len(),
        grafted,
        nodes = tree.node_count(),
        "merged traces"
    );
    tree
}

/// Loads the ancestor chains of one diff point into both traces.
///
/// Besides the anchor, every highlighted branch root that is not loaded yet gets its chain
/// fetched on its own side, so the divergent branches have something to graft.
pub async fn load_diff<S: NodeSource>(
    source: &S,
    paths: [&str; 2],
    maps: &mut [TreeMap; 2],
    diff_point: &DiffPoint,
) -> Result<(), LoadError> {
    let anchors = [diff_point.left_tree_id, diff_point.right_tree_id];
    let highlights = [&diff_point.highlight_left, &diff_point.highlight_right];
    for (((path, map), anchor), highlight) in
        paths.into_iter().zip(maps.iter_mut()).zip(anchors).zip(highlights)
    {
        if anchor.is_none() {
            continue;
        }
        let ancestors = fetch_ancestors(source, path, anchor).await?;
        map.insert_nodes(ancestors, WhichTree::Both);
        for id in highlight {
            if map.contains(*id) {
                continue;
            }
            let chain = fetch_ancestors(source, path, *id).await?;
            map.insert_nodes(chain, WhichTree::Both);
        }
    }
    Ok(())
}

/// Builds both traces from their cores and loads every diff point into them, in order.
pub async fn load_all_diffs<S: NodeSource>(
    source: &S,
    paths: [&str; 2],
    cores: [&TraceCore; 2],
    diff_points: &[DiffPoint],
) -> Result<[TreeMap; 2], LoadError> {
    let mut maps = cores.map(TraceCore::to_map);
    for diff_point in diff_points {
        load_diff(source, paths, &mut maps, diff_point).await?;
    }
    Ok(maps)
}
