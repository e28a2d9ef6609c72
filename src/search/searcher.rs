//! Searcher trait defining the interface the HTTP layer queries through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error};

use super::engine::{normalize_query, search_normalized, SearchResponse};
use crate::dataset::Dataset;
use crate::error::ServiceError;

/// Trait defining the interface for organization lookups.
///
/// Implementations must be safe to call from many request tasks at once.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Find every organization whose legal or trade name contains `query`,
    /// ignoring case and diacritics.
    ///
    /// # Returns
    /// Matches ordered by legal name; no matches is still `Ok`.
    async fn search(&self, query: &str) -> Result<SearchResponse, ServiceError>;

    /// Number of records available to search.
    fn record_count(&self) -> usize;

    /// Description of where the records were loaded from.
    fn source(&self) -> &str;

    /// When the records were loaded.
    fn loaded_at(&self) -> DateTime<Utc>;

    /// Check if the searcher is ready to handle requests.
    ///
    /// `GET /health` answers 503 while this is false.
    fn is_ready(&self) -> bool;
}

/// Searcher over a shared, immutable `Dataset`.
#[derive(Debug, Clone)]
pub struct DatasetSearcher {
    dataset: Arc<Dataset>,
}

impl DatasetSearcher {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Searcher for DatasetSearcher {
    async fn search(&self, query: &str) -> Result<SearchResponse, ServiceError> {
        let key = normalize_query(query)?;

        debug!(key = %key, records = self.dataset.len(), "Scanning dataset");

        // A panic inside the scan is contained to this request.
        let dataset = Arc::clone(&self.dataset);
        let matches = tokio::task::spawn_blocking(move || search_normalized(&dataset, &key))
            .await
            .map_err(|e| {
                error!(error = %e, query = %query, "Search task failed");
                ServiceError::InternalSearch(format!("Task error: {}", e))
            })?;

        Ok(SearchResponse::from_matches(matches))
    }

    fn record_count(&self) -> usize {
        self.dataset.len()
    }

    fn source(&self) -> &str {
        self.dataset.source()
    }

    fn loaded_at(&self) -> DateTime<Utc> {
        self.dataset.loaded_at()
    }

    // The dataset is fully loaded before the searcher exists.
    fn is_ready(&self) -> bool {
        true
    }
}
