use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Literal prefix every taxonomy category id starts with.
pub const ID_PREFIX: &str = "gid://shopify/TaxonomyCategory/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryIdError {
    #[error("Taxonomy ID is empty")]
    Empty,
    #[error("Taxonomy ID {0:?} does not use expected prefix")]
    MissingPrefix(String),
    #[error("Taxonomy ID {0:?} is missing identifier")]
    MissingIdentifier(String),
    #[error("Invalid taxonomy segment {segment:?} in {id:?}")]
    InvalidSegment { id: String, segment: String },
}

/// A decoded category id: the two-letter vertical code plus its numeric segments.
///
/// `gid://shopify/TaxonomyCategory/aa-1-13-8` decodes to vertical `aa` and
/// segments `[1, 13, 8]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryId {
    vertical: String,
    segments: Vec<u64>,
}

impl CategoryId {
    pub fn parse(id: &str) -> Result<Self, CategoryIdError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CategoryIdError::Empty);
        }
        let body = trimmed
            .strip_prefix(ID_PREFIX)
            .ok_or_else(|| CategoryIdError::MissingPrefix(trimmed.to_string()))?;
        if body.is_empty() {
            return Err(CategoryIdError::MissingIdentifier(trimmed.to_string()));
        }

        let mut tokens = body.split('-');
        // split always yields at least one token
        let vertical = tokens.next().unwrap_or_default().to_string();
        let segments = tokens
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| CategoryIdError::InvalidSegment {
                        id: trimmed.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CategoryId { vertical, segments })
    }

    pub fn vertical(&self) -> &str {
        &self.vertical
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

/// Number of hyphen-delimited segments in a raw id; 0 for an empty id.
///
/// Works on the raw string so that synthetic roots and ids outside the
/// expected grammar still get a depth.
pub fn id_depth(id: &str) -> usize {
    if id.is_empty() {
        0
    } else {
        id.split('-').count()
    }
}

/// Fingerprint of a taxonomy source, used as its cache key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_source(source: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());

        let hash = hasher.finalize();
        CacheKey(hex::encode(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
