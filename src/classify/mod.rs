//! Level-by-level classification: one oracle call per taxonomy level until a
//! leaf is reached or the oracle declines.

pub mod choice;
pub mod filtering;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::oracle::{Oracle, OracleError};
use crate::taxonomy::{Node, Taxonomy};
use crate::types::{CandidateOption, Category, Classification, OracleChoice, OracleRequest, Usage};
use choice::Decision;
pub use filtering::next_level;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Deadline for each oracle call. `None` leaves cancellation to the caller.
    pub turn_timeout_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Product description is empty")]
    InvalidInput,
    #[error("Taxonomy has no root categories")]
    EmptyTaxonomy,
    #[error("Oracle call failed: {source}")]
    Oracle {
        #[source]
        source: OracleError,
        last_confirmed: Option<Category>,
    },
    #[error("Oracle selected unknown option {choice:?}")]
    UnmatchedChoice {
        choice: String,
        last_confirmed: Option<Category>,
    },
    #[error("Oracle call cancelled after {after_secs}s")]
    Cancelled {
        after_secs: u64,
        last_confirmed: Option<Category>,
    },
}

impl ClassifyError {
    /// Deepest category confirmed before the walk failed, if any.
    pub fn last_confirmed(&self) -> Option<&Category> {
        match self {
            ClassifyError::Oracle { last_confirmed, .. }
            | ClassifyError::UnmatchedChoice { last_confirmed, .. }
            | ClassifyError::Cancelled { last_confirmed, .. } => last_confirmed.as_ref(),
            ClassifyError::InvalidInput | ClassifyError::EmptyTaxonomy => None,
        }
    }
}

enum Failure {
    Oracle(OracleError),
    Unmatched(String),
    Cancelled(u64),
}

impl Failure {
    fn into_error(self, last_confirmed: Option<Category>) -> ClassifyError {
        match self {
            Failure::Oracle(source) => ClassifyError::Oracle {
                source,
                last_confirmed,
            },
            Failure::Unmatched(choice) => ClassifyError::UnmatchedChoice {
                choice,
                last_confirmed,
            },
            Failure::Cancelled(after_secs) => ClassifyError::Cancelled {
                after_secs,
                last_confirmed,
            },
        }
    }
}

enum Walk<'t> {
    Searching {
        current: Option<&'t Node>,
        candidates: &'t [Node],
    },
    Terminated(Option<&'t Node>),
    Failed(Option<&'t Node>, Failure),
}

/// Drives the walk for one oracle over one shared taxonomy.
///
/// Several classifiers may share the same `Arc<Taxonomy>`; each owns its
/// own usage total.
pub struct Classifier<O> {
    oracle: O,
    taxonomy: Arc<Taxonomy>,
    config: ClassifierConfig,
    usage: Usage,
}

impl<O> Classifier<O>
where
    O: Oracle,
{
    pub fn new(oracle: O, taxonomy: Arc<Taxonomy>) -> Result<Self, ClassifyError> {
        Self::with_config(oracle, taxonomy, ClassifierConfig::default())
    }

    pub fn with_config(
        oracle: O,
        taxonomy: Arc<Taxonomy>,
        config: ClassifierConfig,
    ) -> Result<Self, ClassifyError> {
        if taxonomy.is_empty() {
            return Err(ClassifyError::EmptyTaxonomy);
        }
        Ok(Self {
            oracle,
            taxonomy,
            config,
            usage: Usage::default(),
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Usage summed over the most recent `classify` call, including the
    /// turns completed before a failure.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub async fn classify(&mut self, description: &str) -> Result<Classification, ClassifyError> {
        self.usage = Usage::default();
        if description.trim().is_empty() {
            return Err(ClassifyError::InvalidInput);
        }

        let taxonomy = Arc::clone(&self.taxonomy);
        let mut path: Vec<String> = Vec::new();
        let mut turns = 0;
        let mut state = Walk::Searching {
            current: None,
            candidates: taxonomy.roots(),
        };
        debug!("Starting classification with {} root options", taxonomy.roots().len());

        loop {
            state = match state {
                Walk::Searching {
                    current,
                    candidates,
                } => {
                    let offered = next_level(current.map_or(0, Node::depth), candidates);
                    if offered.is_empty() {
                        Walk::Terminated(current)
                    } else {
                        turns += 1;
                        self.turn(description, &mut path, current, offered).await
                    }
                }
                Walk::Terminated(node) => {
                    match node {
                        Some(node) => debug!("Final classification: {} ({})", node.full_name, node.id),
                        None => debug!("No matching category identified"),
                    }
                    return Ok(Classification {
                        category: node.map(|node| Category::from_node(node, &path)),
                        usage: self.usage,
                        turns,
                    });
                }
                Walk::Failed(node, failure) => {
                    return Err(failure.into_error(node.map(|node| Category::from_node(node, &path))));
                }
            };
        }
    }

    async fn turn<'t>(
        &mut self,
        description: &str,
        path: &mut Vec<String>,
        current: Option<&'t Node>,
        offered: Vec<&'t Node>,
    ) -> Walk<'t> {
        if path.is_empty() {
            debug!("Current path: <root>");
        } else {
            debug!("Current path: {}", path.join(" > "));
        }

        let request = OracleRequest {
            description: description.to_string(),
            path: path.clone(),
            candidates: offered.iter().map(|node| CandidateOption::from(*node)).collect(),
        };
        let summaries: Vec<String> = offered
            .iter()
            .map(|node| format!("{} ({})", node.full_name, node.id))
            .collect();
        debug!("Candidate options: {}", summaries.join("; "));

        let result = match self.ask(&request).await {
            Ok(result) => result,
            Err(failure) => return Walk::Failed(current, failure),
        };
        self.usage += result.usage;
        debug!(
            "Oracle returned choice {:?} (prompt tokens: {}, completion tokens: {}, total: {}; running total: {})",
            result.choice,
            result.usage.prompt_tokens,
            result.usage.completion_tokens,
            result.usage.total_tokens,
            self.usage.total_tokens
        );

        match choice::interpret(&result.choice, &offered) {
            Decision::Decline => {
                debug!("Oracle selected 'none of these'; stopping classification");
                Walk::Terminated(current)
            }
            Decision::Unmatched => {
                debug!("Oracle choice {:?} did not match any candidate option", result.choice);
                Walk::Failed(current, Failure::Unmatched(result.choice))
            }
            Decision::Select(node) => {
                path.push(node.name.clone());
                debug!(
                    "Descending to {} ({}) with {} child options",
                    node.full_name,
                    node.id,
                    node.children.len()
                );
                Walk::Searching {
                    current: Some(node),
                    candidates: &node.children,
                }
            }
        }
    }

    async fn ask(&self, request: &OracleRequest) -> Result<OracleChoice, Failure> {
        match self.config.turn_timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), self.oracle.choose_option(request)).await {
                    Ok(result) => result.map_err(Failure::Oracle),
                    Err(_) => Err(Failure::Cancelled(secs)),
                }
            }
            None => self.oracle.choose_option(request).await.map_err(Failure::Oracle),
        }
    }
}
