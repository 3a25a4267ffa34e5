//! Taxonomy tree model, lookup helpers, and the cached document loader.

pub mod loader;
pub mod node;
pub mod wire;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{FetchOptions, LoaderConfig, TaxonomyLoader, DEFAULT_TAXONOMY_URL};
pub use node::{Node, PreOrder, Taxonomy};
pub use wire::decode;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Taxonomy source is empty")]
    EmptySource,
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to fetch taxonomy from {location}: {error}")]
    Fetch {
        location: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("Failed to fetch taxonomy from {location}: HTTP status {status}")]
    Status { location: String, status: u16 },
    #[error("Failed to read taxonomy file {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("Malformed taxonomy document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Taxonomy has no root categories")]
    Empty,
}

impl TaxonomyError {
    /// Network, status, and file-read failures, as opposed to decode failures.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            TaxonomyError::Fetch { .. } | TaxonomyError::Status { .. } | TaxonomyError::Io { .. }
        )
    }
}
