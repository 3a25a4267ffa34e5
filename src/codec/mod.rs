//! Stateless conversion between taxonomy ids and dotted numeric paths.
//!
//! `gid://shopify/TaxonomyCategory/aa-1-13-8` encodes to `1.1.13.8`: the
//! vertical code becomes its table number and each segment is kept as is.

pub mod verticals;

use thiserror::Error;

use crate::taxonomy::Taxonomy;
use crate::types::{CategoryId, CategoryIdError};
pub use verticals::{vertical_number, VERTICALS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error(transparent)]
    Parse(#[from] CategoryIdError),
    #[error("Unknown taxonomy prefix {0:?}")]
    UnknownPrefix(String),
    #[error("Taxonomy category {0:?} not found")]
    NotFound(String),
}

pub fn decode(id: &str) -> Result<CategoryId, PathError> {
    Ok(CategoryId::parse(id)?)
}

/// Vertical number followed by every segment, in id order.
fn numbers(id: &CategoryId) -> Result<Vec<u64>, PathError> {
    let root = vertical_number(id.vertical())
        .ok_or_else(|| PathError::UnknownPrefix(id.vertical().to_string()))?;
    let mut numbers = Vec::with_capacity(id.segments().len() + 1);
    numbers.push(root);
    numbers.extend_from_slice(id.segments());
    Ok(numbers)
}

pub fn path(id: &str) -> Result<String, PathError> {
    let parts: Vec<String> = numbers(&decode(id)?)?
        .iter()
        .map(u64::to_string)
        .collect();
    Ok(parts.join("."))
}

/// Like [`path`], but only for ids present in `taxonomy`.
pub fn path_for_known(taxonomy: &Taxonomy, id: &str) -> Result<String, PathError> {
    if taxonomy.find_by_id(id).is_none() {
        return Err(PathError::NotFound(id.trim().to_string()));
    }
    path(id)
}

/// Largest number used in any encoded path of the taxonomy.
///
/// Synthetic roots (empty id) are skipped; the first malformed id aborts
/// the walk.
pub fn maximum(taxonomy: &Taxonomy) -> Result<u64, PathError> {
    let mut max = 0;
    for node in taxonomy.iter().filter(|node| !node.id.is_empty()) {
        let largest = numbers(&decode(&node.id)?)?.into_iter().max().unwrap_or(0);
        max = max.max(largest);
    }
    Ok(max)
}
