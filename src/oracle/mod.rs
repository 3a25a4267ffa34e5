//! The external decision-maker consulted once per taxonomy level.

pub mod openai;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{OracleChoice, OracleRequest};
pub use openai::{OpenAiConfig, OpenAiOracle};

/// The synthetic choice every oracle offers after the real candidates.
pub const NONE_OF_THESE: &str = "none of these";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Oracle API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Oracle returned no choices")]
    NoChoices,
    #[error("Oracle API key is empty")]
    MissingApiKey,
    #[error("{0}")]
    Other(String),
}

/// Picks one candidate (or declines) for a single taxonomy level.
///
/// Implementations present `request.candidates` in order followed by
/// [`NONE_OF_THESE`] and return the raw answer text; interpretation is
/// the classifier's job.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn choose_option(&self, request: &OracleRequest) -> Result<OracleChoice, OracleError>;
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for Arc<O> {
    async fn choose_option(&self, request: &OracleRequest) -> Result<OracleChoice, OracleError> {
        (**self).choose_option(request).await
    }
}
