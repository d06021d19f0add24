// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId, WhichTree};
use super::tree_map::TreeMap;

/// What the viewer knows about a trace before any navigation: the initially loaded nodes and the
/// root-to-solution id path (empty when the search found no solution).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceCore {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub sol_ancestor_ids: Vec<NodeId>,
}

impl TraceCore {
    pub fn new(nodes: Vec<Node>, sol_ancestor_ids: Vec<NodeId>) -> Self {
        Self { nodes, sol_ancestor_ids }
    }

    pub fn solveable(&self) -> bool {
        !self.sol_ancestor_ids.is_empty()
    }

    pub fn to_map(&self) -> TreeMap {
        TreeMap::from_nodes(self.nodes.iter().cloned(), WhichTree::Both)
    }
}
