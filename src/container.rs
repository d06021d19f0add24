// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Owner of one trace's navigation state.
//!
//! The container turns an [`Intent`] into a [`Step`] and applies it. Steps that need nodes the
//! map does not hold yet are loaded first; the selection only moves once the merge is done, and a
//! failed load leaves the state as it was.

use crate::loader::{fetch_ancestors, fetch_descendants, LoadError, NodeSource};
use crate::model::{NodeId, TraceCore, WhichTree};
use crate::nav::{self, FetchRequest, Intent, NavContext, NavState, Step};

#[derive(Debug)]
pub struct TreeContainer<S> {
    source: S,
    path: String,
    tree_id: WhichTree,
    ctx: NavContext,
    state: NavState,
}

impl<S: NodeSource> TreeContainer<S> {
    pub fn new(source: S, path: impl Into<String>, core: &TraceCore, ctx: NavContext) -> Self {
        Self {
            source,
            path: path.into(),
            tree_id: WhichTree::Both,
            ctx,
            state: NavState::from_core(core, NodeId::ROOT),
        }
    }

    /// Tag given to every node this container loads.
    pub fn with_tree_id(mut self, tree_id: WhichTree) -> Self {
        self.tree_id = tree_id;
        self
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn ctx(&self) -> &NavContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut NavContext {
        &mut self.ctx
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replaces the whole tree, e.g. after the trace was re-run.
    pub fn reset(&mut self, core: &TraceCore) {
        self.ctx.sol_ancestor_ids = core.sol_ancestor_ids.clone();
        self.state = NavState::from_core(core, NodeId::ROOT);
    }

    /// Loads the root and the first `load_depth` levels below it.
    pub async fn load_initial(&mut self) -> Result<usize, LoadError> {
        let mut nodes = self.source.load_ancestors(&self.path, NodeId::ROOT).await?;
        nodes.extend(
            self.source.load_nodes(&self.path, NodeId::ROOT, self.ctx.load_depth).await?,
        );
        Ok(self.state.merge_nodes(nodes, self.tree_id))
    }

    /// Applies `intent`. Returns whether anything visible changed.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<bool, LoadError> {
        let step = nav::step(&self.state, &self.ctx, intent);
        tracing::debug!(?intent, ?step, selected = %self.state.selected(), "navigation step");

        match step {
            Step::Stay => Ok(false),
            Step::Select(selection) => {
                self.state = std::mem::take(&mut self.state).select(selection);
                Ok(true)
            }
            Step::SetCollapsed { id, collapsed } => {
                self.state = std::mem::take(&mut self.state).set_collapsed(id, collapsed);
                Ok(true)
            }
            Step::Fetch(fetch) => {
                // Loads go into a copy that replaces the state only once every request succeeded.
                let mut staged = self.state.clone();
                let mut added = self.fetch(&mut staged, fetch.request).await?;
                if !staged.map().contains(fetch.target)
                    && matches!(fetch.request, FetchRequest::Descendants { .. })
                {
                    let request = FetchRequest::Ancestors { node_id: fetch.target };
                    added += self.fetch(&mut staged, request).await?;
                }
                self.state = staged;

                match nav::step(&self.state, &self.ctx, intent) {
                    Step::Select(selection) => {
                        self.state = std::mem::take(&mut self.state).select(selection);
                        Ok(true)
                    }
                    _ => {
                        tracing::debug!(target_id = %fetch.target, "target not found after load");
                        Ok(added > 0)
                    }
                }
            }
        }
    }

    async fn fetch(&self, staged: &mut NavState, request: FetchRequest) -> Result<usize, LoadError> {
        let loaded = match request {
            FetchRequest::Descendants { node_id, depth } => {
                fetch_descendants(
                    &self.source,
                    node_id,
                    staged.map_mut(),
                    &self.path,
                    depth,
                    self.tree_id,
                )
                .await
            }
            FetchRequest::Ancestors { node_id } => fetch_ancestors(&self.source, &self.path, node_id)
                .await
                .map(|nodes| staged.merge_nodes(nodes, self.tree_id)),
        };
        loaded.map_err(|err| {
            tracing::warn!(path = %self.path, ?request, error = %err, "failed to load nodes");
            err
        })
    }
}
