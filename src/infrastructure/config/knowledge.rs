//! Knowledge base (retrieval) configuration.

use serde::{Deserialize, Serialize};

/// Retrieval settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnowledgeConfig {
    /// Embedding dimension of the hashing embedder.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Chunks retrieved per ticker.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Rebuild the index when the data directory changes.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            top_k: default_top_k(),
            auto_refresh: default_auto_refresh(),
        }
    }
}

const fn default_dimension() -> usize {
    384
}

const fn default_top_k() -> usize {
    3
}

const fn default_auto_refresh() -> bool {
    true
}
