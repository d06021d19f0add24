// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{LoadError, NodeSource};
use crate::model::{Node, NodeId, TraceCore, TreeMap};

/// Serves fully known traces from memory, answering like the backend would.
#[derive(Debug, Default)]
pub struct MemoryNodeSource {
    traces: BTreeMap<String, TreeMap>,
    requests: AtomicUsize,
}

impl MemoryNodeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, path: impl Into<String>, trace: TreeMap) -> Self {
        self.traces.insert(path.into(), trace);
        self
    }

    /// Requests answered so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn trace(&self, path: &str) -> Result<&TreeMap, LoadError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.traces.get(path).ok_or_else(|| LoadError::UnknownTrace { path: path.to_owned() })
    }
}

impl NodeSource for MemoryNodeSource {
    async fn load_nodes(
        &self,
        path: &str,
        node_id: NodeId,
        depth: u32,
    ) -> Result<Vec<Node>, LoadError> {
        let trace = self.trace(path)?;
        let mut out = Vec::new();
        let mut queue = VecDeque::from([(node_id, 0u32)]);
        while let Some((id, level)) = queue.pop_front() {
            let Some(node) = trace.get(id) else {
                continue;
            };
            out.push(node.to_record());
            if level < depth {
                queue.extend(node.children().iter().map(|child| (*child, level + 1)));
            }
        }
        Ok(out)
    }

    async fn load_ancestors(&self, path: &str, node_id: NodeId) -> Result<Vec<Node>, LoadError> {
        let trace = self.trace(path)?;
        let Some(node) = trace.get(node_id) else {
            return Ok(Vec::new());
        };
        let mut chain = trace
            .ancestors(node_id)
            .into_iter()
            .rev()
            .filter_map(|id| trace.get(id).map(Node::to_record))
            .collect::<Vec<_>>();
        chain.push(node.to_record());
        Ok(chain)
    }
}

/// Trace name [`demo_trace`] is served under.
pub const DEMO_PATH: &str = "demo";

/// A complete binary search of `depth` decisions with one solution leaf.
///
/// Ids are assigned in preorder. The solution path takes the left branch on even levels and the
/// right branch on odd ones, so the walk hits several failures before reaching it.
pub fn demo_trace(depth: u32) -> TraceCore {
    let mut nodes = Vec::new();
    let mut solution = Vec::new();
    let mut next = NodeId::ROOT;
    let mut stack = vec![(NodeId::NONE, 0u32, true, true)];

    while let Some((parent, level, is_left, on_path)) = stack.pop() {
        let id = next;
        next = next.next();
        let is_leaf = level == depth;
        let label = if level == 0 {
            "root".to_owned()
        } else {
            format!("x{level} = {}", if is_left { 0 } else { 1 })
        };
        nodes.push(
            Node::new(id, parent)
                .with_label(label)
                .with_left_child(is_left)
                .with_child_count(if is_leaf { 0 } else { 2 })
                .with_desc_count(2u64.pow(depth - level + 1) - 2)
                .with_solution(is_leaf && on_path),
        );
        if on_path {
            solution.push(id);
        }
        if !is_leaf {
            let left_on_path = on_path && level % 2 == 0;
            let right_on_path = on_path && level % 2 == 1;
            stack.push((id, level + 1, false, right_on_path));
            stack.push((id, level + 1, true, left_on_path));
        }
    }

    TraceCore::new(nodes, solution)
}
