//! Organization records and the cell values they are made of.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Source column names the service depends on.
pub mod columns {
    pub const LEGAL_NAME: &str = "Razao_Social";
    pub const TRADE_NAME: &str = "Nome_Fantasia";
    pub const CITY: &str = "Cidade";
    pub const STREET: &str = "Logradouro";
    pub const DISTRICT: &str = "Bairro";
    pub const TAX_ID: &str = "CNPJ";

    /// Columns every source must provide.
    pub const REQUIRED: [&str; 6] = [LEGAL_NAME, TRADE_NAME, CITY, STREET, DISTRICT, TAX_ID];
}

/// A single cell. Every flavour of "missing" collapses into `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Display form of a cell as the export tooling renders it: absent cells
/// print as `None`, integral floats keep a trailing `.0`.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("None"),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(x) if x.is_nan() => f.write_str("nan"),
            FieldValue::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            FieldValue::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            FieldValue::Float(x) => write!(f, "{}", x),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Integer(n) => serializer.serialize_i64(*n),
            FieldValue::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            FieldValue::Float(_) => serializer.serialize_none(),
        }
    }
}

/// One registered organization, with its name fields already folded.
///
/// Serializes as a flat object keyed by the source column names, so the
/// response carries every column of the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "Razao_Social")]
    pub legal_name: Option<String>,
    #[serde(rename = "Nome_Fantasia")]
    pub trade_name: Option<String>,
    #[serde(rename = "Cidade")]
    pub city: Option<String>,
    #[serde(rename = "Logradouro")]
    pub street: Option<String>,
    #[serde(rename = "Bairro")]
    pub district: Option<String>,
    #[serde(rename = "CNPJ")]
    pub tax_id: String,
    /// Remaining columns, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}
