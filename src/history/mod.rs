//! Sinks for completed classifications.

pub mod jsonl;

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, Classification};
pub use jsonl::JsonlHistory;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt history record on line {line}: {error}")]
    Corrupt {
        line: usize,
        #[source]
        error: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One completed classification. Uncategorised runs store empty name and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub timestamp: DateTime<Utc>,
    pub product_description: String,
    pub category_full_name: String,
    pub category_id: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ClassificationRecord {
    pub fn new(description: &str, classification: &Classification, timestamp: DateTime<Utc>) -> Self {
        let (category_full_name, category_id) = match &classification.category {
            Some(Category { full_name, id, .. }) => (full_name.clone(), id.clone()),
            None => (String::new(), String::new()),
        };
        Self {
            timestamp,
            product_description: description.to_string(),
            category_full_name,
            category_id,
            prompt_tokens: classification.usage.prompt_tokens,
            completion_tokens: classification.usage.completion_tokens,
            total_tokens: classification.usage.total_tokens,
        }
    }
}

pub trait HistorySink {
    fn record(&self, record: &ClassificationRecord) -> Result<(), HistoryError>;
}

#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<ClassificationRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in insertion order.
    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistorySink for MemoryHistory {
    fn record(&self, record: &ClassificationRecord) -> Result<(), HistoryError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
