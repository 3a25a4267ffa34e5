//! Product taxonomy classification, one level at a time.
//!
//! `taxowalk` loads the Shopify product taxonomy (with a 24 hour disk
//! cache for network sources), then walks it from the vertical roots down,
//! asking an external [`oracle::Oracle`] to pick one candidate per level
//! until a leaf is reached or the oracle answers "none of these". The
//! [`codec`] module converts category ids to compact dotted paths.

pub mod cache;
pub mod classify;
pub mod codec;
pub mod history;
pub mod oracle;
pub mod taxonomy;
pub mod types;

pub use classify::{Classifier, ClassifierConfig, ClassifyError};
pub use taxonomy::{FetchOptions, LoaderConfig, Node, Taxonomy, TaxonomyError, TaxonomyLoader};
pub use types::{Category, Classification, Usage};
