//! CSV ingestion for the CADOP export.
//!
//! The export is semicolon-delimited UTF-8 with a header row. Column types
//! are inferred the way the export tooling does it: a column whose filled
//! cells all parse as integers is numeric, likewise for floats, otherwise text.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{error, info, warn};

use super::record::FieldValue;
use super::{build_dataset, Dataset, RawTable};
use crate::error::ServiceError;

/// Cell spellings treated as missing values.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

fn is_missing(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    for cell in cells.filter(|c| !is_missing(c)) {
        if kind == ColumnKind::Integer && cell.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && cell.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }
    kind
}

fn to_value(cell: &str, kind: ColumnKind) -> FieldValue {
    if is_missing(cell) {
        return FieldValue::Absent;
    }
    match kind {
        ColumnKind::Integer => cell
            .parse()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::Text(cell.to_string())),
        ColumnKind::Float => match cell.parse::<f64>() {
            Ok(x) if x.is_nan() => FieldValue::Absent,
            Ok(x) => FieldValue::Float(x),
            Err(_) => FieldValue::Text(cell.to_string()),
        },
        ColumnKind::Text => FieldValue::Text(cell.to_string()),
    }
}

/// Parse semicolon-delimited CSV into a typed `RawTable`.
///
/// # Errors
/// `ServiceError::DataLoad` for unreadable input, invalid UTF-8, a missing
/// header row or rows whose width differs from the header.
pub fn read_table<R: Read>(input: R) -> Result<RawTable, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ServiceError::DataLoad(format!("failed to read header: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ServiceError::DataLoad("missing header row".to_string()));
    }

    let mut cells: Vec<csv::StringRecord> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result
            .map_err(|e| ServiceError::DataLoad(format!("failed to read row {}: {}", idx + 1, e)))?;
        cells.push(row);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_kind(cells.iter().map(|row| row.get(col).unwrap_or(""))))
        .collect();

    let rows: Vec<Vec<FieldValue>> = cells
        .iter()
        .map(|row| {
            row.iter()
                .zip(kinds.iter())
                .map(|(cell, kind)| to_value(cell, *kind))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

/// Load and normalize the export at `path`.
///
/// # Errors
/// - `ServiceError::DataFileNotFound` when the file does not exist
/// - `ServiceError::DataLoad` when it cannot be parsed into records
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, ServiceError> {
    let path = path.as_ref();

    info!(path = %path.display(), "Loading dataset");

    if !path.exists() {
        error!(path = %path.display(), "Data file not found");
        return Err(ServiceError::DataFileNotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to open data file");
        ServiceError::DataLoad(e.to_string())
    })?;

    let table = read_table(file).map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to parse data file");
        e
    })?;

    if table.rows.is_empty() {
        warn!(path = %path.display(), "Data file has no rows");
    }

    build_dataset(table, path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Registro_ANS;CNPJ;Razao_Social;Nome_Fantasia;Logradouro;Bairro;Cidade;UF;DDD";

    fn csv_of(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_read_table_infers_column_kinds() {
        let input = csv_of(&[
            "419761;12345678000199;Hospital São Lucas;;Rua A;Centro;São Paulo;SP;11",
            "326305;98765432000110;Clínica Lucas;Lucas;Rua B;;Recife;PE;",
        ]);

        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 9);
        assert_eq!(table.rows[0][0], FieldValue::Integer(419761));
        assert_eq!(table.rows[0][2], FieldValue::Text("Hospital São Lucas".into()));
        assert_eq!(table.rows[0][3], FieldValue::Absent);
        assert_eq!(table.rows[1][5], FieldValue::Absent);
        assert_eq!(table.rows[0][8], FieldValue::Integer(11));
        assert_eq!(table.rows[1][8], FieldValue::Absent);
    }

    #[test]
    fn test_read_table_float_and_text_columns() {
        let input = "a;b;c\n1;1.5;x\n2;2;3\n";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.rows[0][0], FieldValue::Integer(1));
        assert_eq!(table.rows[0][1], FieldValue::Float(1.5));
        assert_eq!(table.rows[1][1], FieldValue::Float(2.0));
        assert_eq!(table.rows[1][2], FieldValue::Text("3".into()));
    }

    #[test]
    fn test_na_tokens_become_absent() {
        let input = "a;b\nNULL;x\nn/a;NaN\n";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.rows[0][0], FieldValue::Absent);
        assert_eq!(table.rows[1][0], FieldValue::Absent);
        assert_eq!(table.rows[1][1], FieldValue::Absent);
        assert_eq!(table.rows[0][1], FieldValue::Text("x".into()));
    }

    #[test]
    fn test_read_table_strips_bom_from_header() {
        let input = "\u{feff}CNPJ;Razao_Social\n1;A\n";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "CNPJ");
    }

    #[test]
    fn test_read_table_rejects_ragged_rows() {
        let input = "a;b;c\n1;2;3\n4;5\n";
        let err = read_table(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ServiceError::DataLoad(msg) if msg.contains("row 2")));
    }

    #[test]
    fn test_read_table_rejects_invalid_utf8() {
        let input: &[u8] = b"a;b\n\xff\xfe;x\n";
        let err = read_table(input).unwrap_err();
        assert!(matches!(err, ServiceError::DataLoad(_)));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv("/nonexistent/Relatorio_cadop.csv").unwrap_err();
        assert!(matches!(err, ServiceError::DataFileNotFound(path) if path.contains("Relatorio_cadop")));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            csv_of(&["419761;12345678000199;Hospital São Lucas;;Rua A;Centro;São Paulo;SP;11"])
        )
        .unwrap();

        let dataset = load_csv(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        let org = &dataset.records()[0];
        assert_eq!(org.legal_name.as_deref(), Some("Hospital Sao Lucas"));
        assert_eq!(org.trade_name, None);
        assert_eq!(org.tax_id, "12345678000199");
        assert_eq!(org.extra.get("Registro_ANS"), Some(&FieldValue::Integer(419761)));
        assert_eq!(dataset.source(), file.path().display().to_string());
    }

    #[test]
    fn test_load_csv_rejects_missing_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Registro_ANS;CNPJ\n1;2\n").unwrap();

        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, ServiceError::DataLoad(_)));
    }
}
