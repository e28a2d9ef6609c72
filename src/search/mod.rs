//! Organization search.
//!
//! This module provides the match pipeline and a `Searcher` trait:
//! - `engine` - Query normalization, substring matching and ordering
//! - `DatasetSearcher` - `Searcher` over a loaded `Dataset`

mod engine;
mod searcher;

pub use engine::{normalize_query, search, search_normalized, SearchResponse, NO_RESULTS_MESSAGE};
pub use searcher::{DatasetSearcher, Searcher};
