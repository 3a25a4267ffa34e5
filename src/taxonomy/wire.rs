use serde::Deserialize;

use super::node::{Node, Taxonomy};
use super::TaxonomyError;

#[derive(Debug, Deserialize)]
struct RawTaxonomy {
    #[serde(default)]
    version: String,
    #[serde(default)]
    verticals: Vec<RawVertical>,
}

#[derive(Debug, Deserialize)]
struct RawVertical {
    #[serde(default)]
    name: String,
    #[serde(default)]
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    id: String,
    // `level` in the published document is ignored; depth comes from `id`.
    #[serde(default)]
    name: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    children: Vec<RawCategory>,
}

/// Decode the published taxonomy JSON document.
///
/// Each vertical becomes a synthetic root with an empty id whose name and
/// full name are the vertical's name. Document order is preserved.
pub fn decode(bytes: &[u8]) -> Result<Taxonomy, TaxonomyError> {
    let raw: RawTaxonomy = serde_json::from_slice(bytes)?;

    let roots: Vec<Node> = raw
        .verticals
        .into_iter()
        .map(|vertical| Node {
            id: String::new(),
            full_name: vertical.name.clone(),
            name: vertical.name,
            children: vertical.categories.into_iter().map(convert).collect(),
        })
        .collect();

    if roots.is_empty() {
        return Err(TaxonomyError::Empty);
    }
    Ok(Taxonomy::new(raw.version, roots))
}

fn convert(raw: RawCategory) -> Node {
    Node {
        id: raw.id,
        name: raw.name,
        full_name: raw.full_name,
        children: raw.children.into_iter().map(convert).collect(),
    }
}
