// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A place where two compared traces diverge.
///
/// `left_tree_id`/`right_tree_id` are the last nodes the traces share; the highlight sets are the
/// roots of the branches that only exist on one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPoint {
    pub left_tree_id: NodeId,
    pub right_tree_id: NodeId,
    #[serde(default)]
    pub highlight_left: BTreeSet<NodeId>,
    #[serde(default)]
    pub highlight_right: BTreeSet<NodeId>,
}

impl DiffPoint {
    pub fn new(left_tree_id: NodeId, right_tree_id: NodeId) -> Self {
        Self {
            left_tree_id,
            right_tree_id,
            highlight_left: BTreeSet::new(),
            highlight_right: BTreeSet::new(),
        }
    }

    /// The marker for "the traces share nothing, show both roots side by side".
    pub fn disjoint() -> Self {
        Self::new(NodeId::NONE, NodeId::NONE)
    }

    pub fn with_highlight_left(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.highlight_left.extend(ids);
        self
    }

    pub fn with_highlight_right(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.highlight_right.extend(ids);
        self
    }

    pub fn is_disjoint(&self) -> bool {
        self.left_tree_id == NodeId::NONE && self.right_tree_id == NodeId::NONE
    }
}

/// Only the first diff point can carry the disjoint marker.
pub fn traces_are_disjoint(diff_points: &[DiffPoint]) -> bool {
    diff_points.first().is_some_and(DiffPoint::is_disjoint)
}
