//! In-memory CADOP dataset.
//!
//! This module provides:
//! - `normalize` - Diacritic folding for names and queries
//! - `record` - `Organization` rows and `FieldValue` cells
//! - `loader` - Semicolon-delimited CSV ingestion
//! - `sample` - Built-in sample data for local runs and tests
//!
//! A `Dataset` is built once and never mutated; share it behind an `Arc`.

mod loader;
mod normalize;
mod record;
mod sample;

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::error::ServiceError;

pub use loader::{load_csv, read_table};
pub use normalize::{fold_diacritics, normalize, normalize_field, normalize_tax_id};
pub use record::{columns, FieldValue, Organization};
pub use sample::sample_dataset;

/// Rows as they come out of the source, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
}

/// Lowercased folded names used for matching.
#[derive(Debug, Clone)]
pub(crate) struct MatchKey {
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
}

/// Immutable, ordered table of organizations.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<Organization>,
    keys: Vec<MatchKey>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Build a dataset from already-normalized records, keeping their order.
    pub fn from_records(records: Vec<Organization>, source: impl Into<String>) -> Self {
        let keys = records
            .iter()
            .map(|record| MatchKey {
                legal_name: record.legal_name.as_deref().map(str::to_lowercase),
                trade_name: record.trade_name.as_deref().map(str::to_lowercase),
            })
            .collect();

        Self {
            records,
            keys,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[Organization] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Where the rows came from (file path or `sample://`).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Organization, &MatchKey)> {
        self.records.iter().zip(self.keys.iter())
    }
}

/// Normalize raw rows into a `Dataset`.
///
/// Folds the five name/address columns, stringifies the tax id and keeps
/// every other column as-is. Row order is preserved.
///
/// # Errors
/// `ServiceError::DataLoad` when a required column is missing, a header is
/// duplicated, or a row's width differs from the header's.
pub fn build_dataset(table: RawTable, source: impl Into<String>) -> Result<Dataset, ServiceError> {
    let source = source.into();
    let RawTable { headers, rows } = table;

    let mut seen = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(ServiceError::DataLoad(format!(
            "duplicate column '{}'",
            duplicate
        )));
    }

    let missing: Vec<&str> = columns::REQUIRED
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::DataLoad(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ServiceError::DataLoad(format!("missing required column '{}'", name)))
    };
    let legal_name = position(columns::LEGAL_NAME)?;
    let trade_name = position(columns::TRADE_NAME)?;
    let city = position(columns::CITY)?;
    let street = position(columns::STREET)?;
    let district = position(columns::DISTRICT)?;
    let tax_id = position(columns::TAX_ID)?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        if row.len() != headers.len() {
            return Err(ServiceError::DataLoad(format!(
                "row {} has {} fields, expected {}",
                idx + 1,
                row.len(),
                headers.len()
            )));
        }

        let mut extra = BTreeMap::new();
        for (col, value) in row.iter().enumerate() {
            if ![legal_name, trade_name, city, street, district, tax_id].contains(&col) {
                extra.insert(headers[col].clone(), value.clone());
            }
        }

        records.push(Organization {
            legal_name: normalize_field(&row[legal_name]),
            trade_name: normalize_field(&row[trade_name]),
            city: normalize_field(&row[city]),
            street: normalize_field(&row[street]),
            district: normalize_field(&row[district]),
            tax_id: normalize_tax_id(&row[tax_id]),
            extra,
        });
    }

    debug!(columns = headers.len(), "Normalized dataset rows");

    let dataset = Dataset::from_records(records, source);
    info!(
        source = %dataset.source(),
        records = dataset.len(),
        "Dataset built"
    );
    Ok(dataset)
}
