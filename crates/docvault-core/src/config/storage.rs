//! File mirror and upload staging configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration for the physical mirror tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory the folder hierarchy is mirrored into.
    #[serde(default = "default_tree_root")]
    pub tree_root: String,
    /// Directory holding staged uploads awaiting commit.
    #[serde(default = "default_staging_root")]
    pub staging_root: String,
    /// Maximum upload size in bytes (default 5 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// File extensions accepted by the staging area.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tree_root: default_tree_root(),
            staging_root: default_staging_root(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_tree_root() -> String {
    "./data/uploads/tree".to_string()
}

fn default_staging_root() -> String {
    "./data/uploads/temp".to_string()
}

fn default_max_upload() -> u64 {
    5_000_000 // 5 MB
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "docx".to_string()]
}
