// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dualtree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dualtree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Viewer configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::{DiffPoint, NodeId};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOAD_DEPTH: u32 = 3;

/// Where the visualisation server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// What to show and how to step through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub server: ServerConfig,
    pub path: String,
    /// Second trace; set together with `diff_points_file` for the merged view.
    pub right_path: Option<String>,
    pub diff_points_file: Option<PathBuf>,
    pub load_depth: u32,
    pub solution: Vec<NodeId>,
    pub playing: bool,
    pub collapse_as_exploring: bool,
    pub log_file: Option<PathBuf>,
}

impl ViewConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            path: path.into(),
            right_path: None,
            diff_points_file: None,
            load_depth: DEFAULT_LOAD_DEPTH,
            solution: Vec::new(),
            playing: false,
            collapse_as_exploring: false,
            log_file: None,
        }
    }

    pub fn is_dual(&self) -> bool {
        self.right_path.is_some()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Usage(String),
    ReadDiffPoints { path: PathBuf, source: std::io::Error },
    ParseDiffPoints { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(message) => f.write_str(message),
            Self::ReadDiffPoints { path, source } => {
                write!(f, "failed to read diff points {}: {source}", path.display())
            }
            Self::ParseDiffPoints { path, source } => {
                write!(f, "invalid diff points in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(_) => None,
            Self::ReadDiffPoints { source, .. } => Some(source),
            Self::ParseDiffPoints { source, .. } => Some(source),
        }
    }
}

/// Parses `0,3,7` into node ids.
pub fn parse_id_list(raw: &str) -> Result<Vec<NodeId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map(NodeId::new)
                .map_err(|_| ConfigError::Usage(format!("invalid node id '{part}'")))
        })
        .collect()
}

/// Reads a JSON array of diff points.
pub fn load_diff_points(path: &Path) -> Result<Vec<DiffPoint>, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadDiffPoints { path: path.to_owned(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| ConfigError::ParseDiffPoints { path: path.to_owned(), source })
}

#[cfg(test)]
mod tests {
    use super::{load_diff_points, parse_id_list, ConfigError, ServerConfig};
    use crate::model::NodeId;

    #[test]
    fn base_url_uses_host_and_port() {
        let config = ServerConfig { host: "127.0.0.1".to_owned(), port: 8123 };
        assert_eq!(config.base_url(), "http://127.0.0.1:8123");
        assert_eq!(ServerConfig::default().base_url(), "http://localhost:5000");
    }

    #[test]
    fn parses_id_lists() {
        assert_eq!(
            parse_id_list("0, 3,7").expect("ids"),
            vec![NodeId::new(0), NodeId::new(3), NodeId::new(7)]
        );
        assert!(parse_id_list("").expect("ids").is_empty());
        assert!(matches!(parse_id_list("1,x"), Err(ConfigError::Usage(_))));
    }

    #[test]
    fn missing_diff_points_file_is_reported() {
        let path = std::env::temp_dir().join("dualtree-no-such-diff-points.json");
        let err = load_diff_points(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadDiffPoints { .. }));
    }
}
