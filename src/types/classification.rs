use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::taxonomy::Node;

/// Token accounting reported by the oracle for one call, or summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, other: Usage) {
        // Counts come from remote responses; clamp instead of overflowing.
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// One candidate as presented to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOption {
    pub name: String,
    pub full_name: String,
    pub id: String,
}

impl From<&Node> for CandidateOption {
    fn from(node: &Node) -> Self {
        CandidateOption {
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            id: node.id.clone(),
        }
    }
}

/// The question asked of the oracle for one tree level.
///
/// The trailing "none of these" choice is implicit: it is not part of
/// `candidates`, every oracle implementation must offer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub description: String,
    /// Names of the confirmed ancestors, root first.
    pub path: Vec<String>,
    pub candidates: Vec<CandidateOption>,
}

/// Free-text answer from the oracle plus what it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleChoice {
    pub choice: String,
    pub usage: Usage,
}

/// A confirmed taxonomy category, detached from the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub full_name: String,
    /// Names from the first confirmed ancestor down to this category.
    pub path: Vec<String>,
}

impl Category {
    pub(crate) fn from_node(node: &Node, path: &[String]) -> Self {
        Category {
            id: node.id.clone(),
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            path: path.to_vec(),
        }
    }
}

/// Outcome of a completed classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// `None` when the oracle declined at the first level.
    pub category: Option<Category>,
    pub usage: Usage,
    /// Number of oracle calls made.
    pub turns: usize,
}
