// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Incremental loading of trace nodes.
//!
//! The backend serves two endpoints, both `POST` with a JSON body and a JSON array of nodes in
//! response:
//!
//! - `/loadNodes` `{ path, nodeId, depth }`: the subtree below `nodeId`, `depth` levels deep.
//! - `/loadAncestors` `{ path, nodeId }`: the chain from the root down to `nodeId`.
//!
//! [`NodeSource`] abstracts over the transport so navigation can be driven from memory as well.

use std::fmt;

use serde::Serialize;

use crate::config::ServerConfig;
use crate::model::{Node, NodeId, TreeMap, WhichTree};

mod memory;

pub use memory::{demo_trace, MemoryNodeSource, DEMO_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    LoadNodes,
    LoadAncestors,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::LoadNodes => "loadNodes",
            Self::LoadAncestors => "loadAncestors",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug)]
pub enum LoadError {
    Http { endpoint: Endpoint, source: reqwest::Error },
    Status { endpoint: Endpoint, status: u16 },
    Decode { endpoint: Endpoint, source: serde_json::Error },
    UnknownTrace { path: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { endpoint, source } => write!(f, "request to /{endpoint} failed: {source}"),
            Self::Status { endpoint, status } => {
                write!(f, "/{endpoint} answered with status {status}")
            }
            Self::Decode { endpoint, source } => {
                write!(f, "/{endpoint} returned malformed nodes: {source}")
            }
            Self::UnknownTrace { path } => write!(f, "unknown trace '{path}'"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Status { .. } | Self::UnknownTrace { .. } => None,
        }
    }
}

/// Where trace nodes come from.
#[allow(async_fn_in_trait)]
pub trait NodeSource {
    /// The subtree below `node_id`, at most `depth` levels deep.
    async fn load_nodes(&self, path: &str, node_id: NodeId, depth: u32)
        -> Result<Vec<Node>, LoadError>;

    /// The chain from the root to `node_id`, root first.
    async fn load_ancestors(&self, path: &str, node_id: NodeId) -> Result<Vec<Node>, LoadError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadNodesRequest<'a> {
    path: &'a str,
    node_id: NodeId,
    depth: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadAncestorsRequest<'a> {
    path: &'a str,
    node_id: NodeId,
}

/// [`NodeSource`] backed by the visualisation server.
#[derive(Debug, Clone)]
pub struct HttpNodeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNodeSource {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ServerConfig) -> Self {
        Self { client, base_url: config.base_url() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<Vec<Node>, LoadError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| LoadError::Http { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status { endpoint, status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(|source| LoadError::Http { endpoint, source })?;
        let nodes: Vec<Node> =
            serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode { endpoint, source })?;
        tracing::debug!(%endpoint, nodes = nodes.len(), "loaded nodes");
        Ok(nodes)
    }
}

impl NodeSource for HttpNodeSource {
    async fn load_nodes(
        &self,
        path: &str,
        node_id: NodeId,
        depth: u32,
    ) -> Result<Vec<Node>, LoadError> {
        tracing::debug!(path, %node_id, depth, "requesting subtree");
        self.post(Endpoint::LoadNodes, &LoadNodesRequest { path, node_id, depth }).await
    }

    async fn load_ancestors(&self, path: &str, node_id: NodeId) -> Result<Vec<Node>, LoadError> {
        tracing::debug!(path, %node_id, "requesting ancestors");
        self.post(Endpoint::LoadAncestors, &LoadAncestorsRequest { path, node_id }).await
    }
}

/// The root-to-`node_id` chain of trace `path`.
pub async fn fetch_ancestors<S: NodeSource>(
    source: &S,
    path: &str,
    node_id: NodeId,
) -> Result<Vec<Node>, LoadError> {
    source.load_ancestors(path, node_id).await
}

/// Loads the subtree below `selected` and merges it into `map` tagged with `tree_id`.
///
/// Returns how many nodes were new. `map` is untouched when the request fails.
pub async fn fetch_descendants<S: NodeSource>(
    source: &S,
    selected: NodeId,
    map: &mut TreeMap,
    path: &str,
    depth: u32,
    tree_id: WhichTree,
) -> Result<usize, LoadError> {
    let nodes = source.load_nodes(path, selected, depth).await?;
    Ok(map.insert_nodes(nodes, tree_id))
}

#[cfg(test)]
mod tests;
