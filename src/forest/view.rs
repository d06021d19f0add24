// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{load_all_diffs, merge_maps, MergedKey, MergedTree, Side};
use crate::loader::{fetch_ancestors, fetch_descendants, LoadError, NodeSource};
use crate::model::{DiffPoint, NodeId, TraceCore, TreeMap};
use crate::nav::Intent;

/// A navigable merge of two traces.
///
/// Both traces are kept apart and grow independently: a move that needs nodes the merged tree
/// does not show yet loads them into the trace of the selected node, then merges again.
#[derive(Debug)]
pub struct MergedView<S> {
    source: S,
    paths: [String; 2],
    maps: [TreeMap; 2],
    diff_points: Vec<DiffPoint>,
    load_depth: u32,
    tree: MergedTree,
    selected: MergedKey,
}

impl<S: NodeSource> MergedView<S> {
    pub fn new(
        source: S,
        paths: [String; 2],
        maps: [TreeMap; 2],
        diff_points: Vec<DiffPoint>,
        load_depth: u32,
    ) -> Self {
        let tree = merge_maps(&maps[0], &maps[1], &diff_points);
        let selected =
            tree.root().map(|root| root.key()).unwrap_or(MergedKey::left(NodeId::ROOT));
        Self { source, paths, maps, diff_points, load_depth, tree, selected }
    }

    /// Loads the top `load_depth` levels of both traces plus every diff point.
    pub async fn load(
        source: S,
        paths: [String; 2],
        diff_points: Vec<DiffPoint>,
        load_depth: u32,
    ) -> Result<Self, LoadError> {
        let mut cores = Vec::with_capacity(2);
        for path in &paths {
            let nodes = source.load_nodes(path, NodeId::ROOT, load_depth).await?;
            cores.push(TraceCore::new(nodes, Vec::new()));
        }
        let maps = load_all_diffs(
            &source,
            [paths[0].as_str(), paths[1].as_str()],
            [&cores[0], &cores[1]],
            &diff_points,
        )
        .await?;
        tracing::info!(
            left = maps[0].len(),
            right = maps[1].len(),
            diff_points = diff_points.len(),
            "loaded merged traces"
        );
        Ok(Self::new(source, paths, maps, diff_points, load_depth))
    }

    pub fn tree(&self) -> &MergedTree {
        &self.tree
    }

    pub fn selected(&self) -> MergedKey {
        self.selected
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.tree.row_of(self.selected)
    }

    pub fn map(&self, side: Side) -> &TreeMap {
        &self.maps[side.index()]
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Selects `key`, unfolding its merged ancestors. Returns `false` when it is not in the tree.
    pub fn select(&mut self, key: MergedKey) -> bool {
        let hidden = self
            .tree
            .ancestors(key)
            .iter()
            .skip(1)
            .filter(|node| node.node().is_collapsed())
            .map(|node| node.key())
            .collect::<Vec<_>>();
        if self.tree.find(key).is_none() {
            return false;
        }

        let mut unfolded = false;
        for ancestor in hidden {
            if let Some(node) = self.maps[ancestor.side.index()].get_mut(ancestor.id) {
                node.set_collapsed(false);
                unfolded = true;
            }
        }
        if unfolded {
            self.rebuild();
        }
        self.selected = key;
        true
    }

    /// Applies `intent` to the merged tree. Returns whether anything visible changed.
    ///
    /// Jumps that only make sense on a single trace (failures, solution path) are ignored.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<bool, LoadError> {
        tracing::debug!(?intent, selected = ?self.selected, "merged navigation");
        match intent {
            Intent::Up => {
                let parent = self.tree.find(self.selected).and_then(|node| node.parent());
                Ok(parent.map(|node| node.key()).is_some_and(|key| self.select(key)))
            }
            Intent::Right => {
                let child = self.tree.find(self.selected).and_then(|node| node.children().nth(1));
                Ok(child.map(|node| node.key()).is_some_and(|key| self.select(key)))
            }
            Intent::Left => self.go_left().await,
            Intent::Prev => self.go_prev().await,
            Intent::Collapse => Ok(self.set_collapsed(Some(true))),
            Intent::Expand => Ok(self.set_collapsed(Some(false))),
            Intent::Toggle => Ok(self.set_collapsed(None)),
            Intent::NextFailed
            | Intent::PrevFailed
            | Intent::NextSol
            | Intent::PrevSol
            | Intent::NextSolBranch
            | Intent::PrevSolBranch => Ok(false),
        }
    }

    /// Moves to the next explored node of the selected node's trace.
    async fn go_left(&mut self) -> Result<bool, LoadError> {
        let Some(current) = self.tree.find(self.selected) else {
            return Ok(false);
        };
        let tree_id = current.tree_id();
        let side = self.selected.side;
        let target = MergedKey::new(side, self.selected.id.next());

        let map = &self.maps[side.index()];
        if !map.contains(target.id) {
            let path = self.paths[side.index()].as_str();
            let mut staged = map.clone();
            let loaded = async {
                let mut added = fetch_descendants(
                    &self.source,
                    self.selected.id,
                    &mut staged,
                    path,
                    self.load_depth,
                    tree_id,
                )
                .await?;
                if !staged.contains(target.id) {
                    let chain = fetch_ancestors(&self.source, path, target.id).await?;
                    added += staged.insert_nodes(chain, tree_id);
                }
                Ok::<usize, LoadError>(added)
            }
            .await;
            let added = loaded.map_err(|err| {
                tracing::warn!(path, ?side, error = %err, "failed to load merged nodes");
                err
            })?;
            tracing::debug!(?side, added, "loaded merged nodes");
            self.maps[side.index()] = staged;
            self.rebuild();
        }
        Ok(self.select(target))
    }

    /// Moves to the previous explored node of the selected node's trace.
    async fn go_prev(&mut self) -> Result<bool, LoadError> {
        if self.selected.id <= NodeId::ROOT {
            return Ok(false);
        }
        let side = self.selected.side;
        let target = MergedKey::new(side, self.selected.id.prev());
        let Some(tree_id) = self.tree.find(self.selected).map(|node| node.tree_id()) else {
            return Ok(false);
        };

        if !self.maps[side.index()].contains(target.id) {
            let path = self.paths[side.index()].as_str();
            let chain = fetch_ancestors(&self.source, path, target.id).await.map_err(|err| {
                tracing::warn!(path, ?side, error = %err, "failed to load merged nodes");
                err
            })?;
            self.maps[side.index()].insert_nodes(chain, tree_id);
            self.rebuild();
        }
        Ok(self.select(target))
    }

    fn set_collapsed(&mut self, collapsed: Option<bool>) -> bool {
        let key = self.selected;
        let Some(node) = self.maps[key.side.index()].get_mut(key.id) else {
            return false;
        };
        let collapsed = collapsed.unwrap_or(!node.is_collapsed());
        if node.is_collapsed() == collapsed {
            return false;
        }
        node.set_collapsed(collapsed);
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.tree = merge_maps(&self.maps[0], &self.maps[1], &self.diff_points);
        tracing::debug!(nodes = self.tree.node_count(), "rebuilt merged tree");
    }
}
