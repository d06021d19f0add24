// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation over a partially loaded search tree.
//!
//! Everything here is pure: [`step`] looks at the current [`NavState`] and an [`Intent`] and
//! answers with a [`Step`]. Applying a step (and performing the fetch a step may ask for) is the
//! job of [`crate::container::TreeContainer`].
//!
//! Node ids follow exploration order, so "left"/"prev" are `id + 1`/`id - 1`, and the solution
//! path (`sol_ancestor_ids`) splits the tree into the branch that led to the solution and the
//! failed branches around it.

use crate::model::{Node, NodeId, TraceCore, TreeMap, WhichTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Up,
    Left,
    Right,
    Prev,
    NextFailed,
    PrevFailed,
    NextSol,
    PrevSol,
    NextSolBranch,
    PrevSolBranch,
    Collapse,
    Expand,
    Toggle,
}

/// The selection together with the tree it points into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    selected: NodeId,
    id2node: TreeMap,
    solveable: bool,
}

impl NavState {
    pub fn new(selected: NodeId, id2node: TreeMap, solveable: bool) -> Self {
        Self { selected, id2node, solveable }
    }

    pub fn from_core(core: &TraceCore, selected: NodeId) -> Self {
        Self::new(selected, core.to_map(), core.solveable())
    }

    pub fn selected(&self) -> NodeId {
        self.selected
    }

    pub fn map(&self) -> &TreeMap {
        &self.id2node
    }

    pub fn solveable(&self) -> bool {
        self.solveable
    }

    pub(crate) fn map_mut(&mut self) -> &mut TreeMap {
        &mut self.id2node
    }

    /// Merges freshly fetched nodes; the selection is left alone.
    pub fn merge_nodes(&mut self, nodes: impl IntoIterator<Item = Node>, tree_id: WhichTree) -> usize {
        self.id2node.insert_nodes(nodes, tree_id)
    }

    /// Moves the selection, consuming the previous state.
    pub fn select(mut self, selection: Selection) -> Self {
        if selection.reveal {
            self.id2node.show_all_ancestors(selection.target);
        }
        if let Some(collapse) = selection.collapse {
            if let Some(node) = self.id2node.get_mut(collapse) {
                node.set_collapsed(true);
            }
        }
        self.selected = selection.target;
        self
    }

    pub fn set_collapsed(mut self, id: NodeId, collapsed: bool) -> Self {
        if let Some(node) = self.id2node.get_mut(id) {
            node.set_collapsed(collapsed);
        }
        self
    }
}

/// Per-trace inputs that navigation reads but never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavContext {
    pub sol_ancestor_ids: Vec<NodeId>,
    /// Replay mode: the viewer is stepping through the search on its own.
    pub playing: bool,
    pub collapse_as_exploring: bool,
    pub load_depth: u32,
}

impl NavContext {
    pub fn new(sol_ancestor_ids: Vec<NodeId>, load_depth: u32) -> Self {
        Self { sol_ancestor_ids, playing: false, collapse_as_exploring: false, load_depth }
    }

    fn collapses_while_exploring(&self) -> bool {
        self.playing && self.collapse_as_exploring
    }

    fn on_solution_path(&self, id: NodeId) -> bool {
        self.sol_ancestor_ids.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub target: NodeId,
    /// Expand every ancestor of the target.
    pub reveal: bool,
    /// Collapse this node as part of the move.
    pub collapse: Option<NodeId>,
}

impl Selection {
    pub fn plain(target: NodeId) -> Self {
        Self { target, reveal: false, collapse: None }
    }

    pub fn revealed(target: NodeId) -> Self {
        Self { target, reveal: true, collapse: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Descendants { node_id: NodeId, depth: u32 },
    Ancestors { node_id: NodeId },
}

/// The target is not loaded yet: load `request`, then ask again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetch {
    pub request: FetchRequest,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stay,
    Select(Selection),
    SetCollapsed { id: NodeId, collapsed: bool },
    Fetch(Fetch),
}

pub fn step(state: &NavState, ctx: &NavContext, intent: Intent) -> Step {
    match intent {
        Intent::Up => go_up(state),
        Intent::Left => go_left(state, ctx),
        Intent::Right => go_right(state),
        Intent::Prev => go_to_previous(state, ctx),
        Intent::NextFailed => next_failed(state, ctx),
        Intent::PrevFailed => prev_failed(state, ctx),
        Intent::NextSol => next_sol(state, ctx),
        Intent::PrevSol => prev_sol(state, ctx),
        Intent::NextSolBranch => next_sol_branch(state, ctx),
        Intent::PrevSolBranch => prev_sol_branch(state, ctx),
        Intent::Collapse => set_selected_collapsed(state, Some(true)),
        Intent::Expand => set_selected_collapsed(state, Some(false)),
        Intent::Toggle => set_selected_collapsed(state, None),
    }
}

fn reveal_or_fetch(state: &NavState, target: NodeId) -> Step {
    if state.id2node.contains(target) {
        Step::Select(Selection::revealed(target))
    } else {
        Step::Fetch(Fetch { request: FetchRequest::Ancestors { node_id: target }, target })
    }
}

pub fn go_up(state: &NavState) -> Step {
    let Some(current) = state.id2node.get(state.selected) else {
        return Step::Stay;
    };
    if current.parent_id() == NodeId::NONE {
        return Step::Stay;
    }
    Step::Select(Selection::plain(current.parent_id()))
}

/// The node "right" of `selected`: its second child, or `selected` itself when there is none.
pub fn go_right_in(map: &TreeMap, selected: NodeId) -> NodeId {
    map.get(selected)
        .and_then(|current| current.children().get(1))
        .copied()
        .unwrap_or(selected)
}

pub fn go_right(state: &NavState) -> Step {
    let target = go_right_in(&state.id2node, state.selected);
    if target == state.selected {
        return Step::Stay;
    }
    Step::Select(Selection::plain(target))
}

/// Steps to the next explored node, `selected + 1`.
///
/// In replay mode moving into a right branch collapses the left sibling that was just finished.
pub fn go_left(state: &NavState, ctx: &NavContext) -> Step {
    let target = state.selected.next();
    let Some(next) = state.id2node.get(target) else {
        return Step::Fetch(Fetch {
            request: FetchRequest::Descendants { node_id: state.selected, depth: ctx.load_depth },
            target,
        });
    };

    let collapse = if ctx.collapses_while_exploring() {
        state
            .id2node
            .get(next.parent_id())
            .and_then(|parent| parent.children().first())
            .copied()
            .filter(|first| *first != target)
    } else {
        None
    };

    Step::Select(Selection { target, reveal: true, collapse })
}

/// Steps back to `start - 1` (or `selected - 1`). The root has nothing before it.
pub fn go_prev(state: &NavState, start: Option<NodeId>) -> Step {
    let current = start.unwrap_or(state.selected);
    if current.get() <= NodeId::ROOT.get() {
        return Step::Stay;
    }
    reveal_or_fetch(state, current.prev())
}

/// [`go_prev`], collapsing the node it lands on while replaying.
pub fn go_to_previous(state: &NavState, ctx: &NavContext) -> Step {
    match go_prev(state, None) {
        Step::Select(mut selection) if ctx.collapses_while_exploring() => {
            selection.collapse = Some(selection.target);
            Step::Select(selection)
        }
        other => other,
    }
}

pub fn next_failed(state: &NavState, ctx: &NavContext) -> Step {
    if !state.solveable {
        return go_left(state, ctx);
    }

    let from = if ctx.on_solution_path(state.selected) {
        state.selected
    } else if ctx.on_solution_path(state.selected.next()) {
        state.selected.next()
    } else {
        return go_left(state, ctx);
    };

    let target = next_failed_id(from, &ctx.sol_ancestor_ids);
    if target.is_none() {
        return Step::Stay;
    }
    reveal_or_fetch(state, target)
}

pub fn prev_failed(state: &NavState, ctx: &NavContext) -> Step {
    if !state.solveable {
        return go_to_previous(state, ctx);
    }

    let from = if ctx.on_solution_path(state.selected) {
        state.selected
    } else if ctx.on_solution_path(state.selected.prev()) {
        state.selected.prev()
    } else {
        return go_prev(state, None);
    };

    let target = prev_failed_id(from, &ctx.sol_ancestor_ids);
    if target.is_none() {
        return Step::Stay;
    }
    if state.id2node.contains(target) {
        return Step::Select(Selection::revealed(target));
    }
    // `go_prev` steps back one, landing on the failed node itself.
    go_prev(state, Some(target.next()))
}

pub fn next_sol(state: &NavState, ctx: &NavContext) -> Step {
    let target = next_sol_id(state.selected, &ctx.sol_ancestor_ids);
    if target.is_none() {
        return Step::Stay;
    }
    reveal_or_fetch(state, target)
}

pub fn prev_sol(state: &NavState, ctx: &NavContext) -> Step {
    let target = prev_sol_id(state.selected, &ctx.sol_ancestor_ids);
    if target.is_none() {
        return Step::Stay;
    }
    reveal_or_fetch(state, target)
}

pub fn next_sol_branch(state: &NavState, ctx: &NavContext) -> Step {
    if !state.solveable {
        return Step::Stay;
    }
    let sol = &ctx.sol_ancestor_ids;

    if let Some(index) = sol.iter().position(|id| *id == state.selected) {
        return match sol.get(index + 1) {
            Some(next) => reveal_or_fetch(state, *next),
            None => Step::Stay,
        };
    }

    // A zero minimum counts as "nothing found", like an empty candidate set.
    match sol.iter().copied().filter(|id| *id > state.selected).min() {
        Some(target) if target != NodeId::ROOT => reveal_or_fetch(state, target),
        _ => Step::Stay,
    }
}

pub fn prev_sol_branch(state: &NavState, ctx: &NavContext) -> Step {
    if !state.solveable {
        return Step::Stay;
    }
    let sol = &ctx.sol_ancestor_ids;

    if let Some(index) = sol.iter().position(|id| *id == state.selected) {
        return match index.checked_sub(1).and_then(|prev| sol.get(prev)) {
            Some(prev) => reveal_or_fetch(state, *prev),
            None => Step::Stay,
        };
    }

    // The root is the usual maximum here and is treated as "nothing found".
    match sol.iter().copied().filter(|id| *id < state.selected).max() {
        Some(target) if target != NodeId::ROOT => reveal_or_fetch(state, target),
        _ => Step::Stay,
    }
}

fn set_selected_collapsed(state: &NavState, collapsed: Option<bool>) -> Step {
    let Some(current) = state.id2node.get(state.selected) else {
        return Step::Stay;
    };
    let collapsed = collapsed.unwrap_or(!current.is_collapsed());
    if collapsed == current.is_collapsed() {
        return Step::Stay;
    }
    Step::SetCollapsed { id: state.selected, collapsed }
}

/// Smallest id after `id` that is off the solution path, or [`NodeId::NONE`].
///
/// Only ids up to the end of the solution path are considered; nothing is explored past the
/// solution.
pub fn next_failed_id(id: NodeId, sol_ancestor_ids: &[NodeId]) -> NodeId {
    let Some(last) = sol_ancestor_ids.iter().copied().max() else {
        return NodeId::NONE;
    };
    let mut candidate = id.next();
    while candidate <= last {
        if !sol_ancestor_ids.contains(&candidate) {
            return candidate;
        }
        candidate = candidate.next();
    }
    NodeId::NONE
}

/// Largest non-negative id before `id` that is off the solution path, or [`NodeId::NONE`].
pub fn prev_failed_id(id: NodeId, sol_ancestor_ids: &[NodeId]) -> NodeId {
    let mut candidate = id.prev();
    while candidate >= NodeId::ROOT {
        if !sol_ancestor_ids.contains(&candidate) {
            return candidate;
        }
        candidate = candidate.prev();
    }
    NodeId::NONE
}

pub fn next_sol_id(id: NodeId, sol_ancestor_ids: &[NodeId]) -> NodeId {
    sol_ancestor_ids.iter().copied().filter(|sol| *sol > id).min().unwrap_or(NodeId::NONE)
}

pub fn prev_sol_id(id: NodeId, sol_ancestor_ids: &[NodeId]) -> NodeId {
    sol_ancestor_ids.iter().copied().filter(|sol| *sol < id).max().unwrap_or(NodeId::NONE)
}
