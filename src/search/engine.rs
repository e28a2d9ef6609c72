//! Match pipeline over a `Dataset`.

use serde::Serialize;
use std::cmp::Ordering;

use crate::dataset::{fold_diacritics, Dataset, Organization};
use crate::error::ServiceError;

/// Message used when nothing matches.
pub const NO_RESULTS_MESSAGE: &str = "Nenhuma empresa encontrada";

/// Body of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    /// Full matched records ordered by legal name
    pub results: Vec<Organization>,
}

impl SearchResponse {
    pub fn from_matches(results: Vec<Organization>) -> Self {
        let message = if results.is_empty() {
            NO_RESULTS_MESSAGE.to_string()
        } else {
            format!("Encontradas {} empresas", results.len())
        };
        Self {
            success: true,
            message,
            results,
        }
    }
}

/// Trim, lowercase and fold a raw query into the key matched against names.
///
/// # Errors
/// `ServiceError::InvalidQuery` when the query is blank.
pub fn normalize_query(query: &str) -> Result<String, ServiceError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidQuery);
    }
    Ok(fold_diacritics(&trimmed.to_lowercase()))
}

/// Absent legal names sort after present ones.
fn by_legal_name(a: &Organization, b: &Organization) -> Ordering {
    match (&a.legal_name, &b.legal_name) {
        (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Collect the records whose legal or trade name contains `key`.
///
/// `key` must come from [`normalize_query`]. Results are stably sorted by
/// legal name, so rows with equal names keep their dataset order.
pub fn search_normalized(dataset: &Dataset, key: &str) -> Vec<Organization> {
    let contains = |name: &Option<String>| name.as_deref().is_some_and(|n| n.contains(key));

    let mut matches: Vec<&Organization> = dataset
        .entries()
        .filter(|(_, keys)| contains(&keys.legal_name) || contains(&keys.trade_name))
        .map(|(record, _)| record)
        .collect();

    matches.sort_by(|a, b| by_legal_name(a, b));
    matches.into_iter().cloned().collect()
}

/// Run a query against the dataset.
///
/// # Errors
/// `ServiceError::InvalidQuery` when the query is blank. An empty match is
/// not an error.
pub fn search(dataset: &Dataset, query: &str) -> Result<SearchResponse, ServiceError> {
    let key = normalize_query(query)?;
    Ok(SearchResponse::from_matches(search_normalized(dataset, &key)))
}
