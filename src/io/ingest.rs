//! Transaction CSV ingest and validation.
//!
//! Two entry points mirror the two-step upload flow: `validate_csv` checks the
//! header only (so a bad export is rejected before anyone reads a row), and
//! `load_transactions` parses every row, collecting row-level errors instead of
//! stopping at the first. Imports are all-or-nothing; the caller refuses the
//! whole file when any row error exists.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{ItemKind, TransactionRecord};
use crate::error::AppError;

/// Columns a transaction export must carry. `customer_id` is optional.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "transaction_time",
    "location_name",
    "item_type",
    "item_identifier",
    "quantity",
    "net_price",
];

/// Header check result.
#[derive(Debug, Clone)]
pub struct CsvValidation {
    pub missing: Vec<String>,
    pub found: Vec<String>,
}

impl CsvValidation {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based CSV line number; the header is line 1.
    pub line: usize,
    pub column: Option<&'static str>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(col) => write!(f, "Row {}: {} ({col})", self.line, self.message),
            None => write!(f, "Row {}: {}", self.line, self.message),
        }
    }
}

/// Ingest output: parsed records plus everything that went wrong.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub records: Vec<TransactionRecord>,
    pub errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Check only the header of `path` against [`REQUIRED_COLUMNS`].
pub fn validate_csv(path: &Path) -> Result<CsvValidation, AppError> {
    let headers = read_headers(path)?;
    let found: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !found.iter().any(|f| f == *c))
        .map(|c| c.to_string())
        .collect();
    Ok(CsvValidation { missing, found })
}

/// Parse every row of `path` into [`TransactionRecord`]s.
///
/// A missing required column fails the whole load; a bad value fails only its
/// row, recorded in `errors` with the line number and offending column.
pub fn load_transactions(path: &Path) -> Result<IngestOutcome, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::data(format!(
            "CSV is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(RowError {
                    line,
                    column: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(r) => records.push(r),
            Err((column, message)) => errors.push(RowError {
                line,
                column,
                message,
            }),
        }
    }

    Ok(IngestOutcome {
        records,
        errors,
        rows_read,
    })
}

fn read_headers(path: &Path) -> Result<StringRecord, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel sometimes emits a BOM prefix on the first header; without the
    // strip the schema check reports a phantom missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

type RowResult = Result<TransactionRecord, (Option<&'static str>, String)>;

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> RowResult {
    let transaction_time = parse_datetime(get_required(record, header_map, "transaction_time")?)
        .map_err(|m| (Some("transaction_time"), m))?;

    let location_name = get_required(record, header_map, "location_name")?.to_string();
    let item_identifier = get_required(record, header_map, "item_identifier")?.to_string();

    let item_type = parse_item_type(get_required(record, header_map, "item_type")?)
        .map_err(|m| (Some("item_type"), m))?;

    let quantity_raw = get_required(record, header_map, "quantity")?;
    let quantity: u32 = quantity_raw
        .parse()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            (
                Some("quantity"),
                format!("Invalid quantity '{quantity_raw}' (expected a positive integer)."),
            )
        })?;

    let net_price_raw = get_required(record, header_map, "net_price")?;
    let net_price: f64 = net_price_raw
        .parse()
        .ok()
        .filter(|p: &f64| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| {
            (
                Some("net_price"),
                format!("Invalid net_price '{net_price_raw}' (expected a non-negative number)."),
            )
        })?;

    // Optional column; absent or blank means no discount, but a present value
    // must still be a valid amount.
    let discount_amount = match get_optional(record, header_map, "discount_amount") {
        Some(raw) => raw
            .parse()
            .ok()
            .filter(|d: &f64| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                (
                    Some("discount_amount"),
                    format!("Invalid discount_amount '{raw}' (expected a non-negative number)."),
                )
            })?,
        None => 0.0,
    };

    let customer_id = get_optional(record, header_map, "customer_id").map(str::to_string);

    Ok(TransactionRecord {
        transaction_time,
        location_name,
        item_type,
        item_identifier,
        quantity,
        net_price,
        discount_amount,
        customer_id,
    })
}

fn parse_item_type(s: &str) -> Result<ItemKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "service" => Ok(ItemKind::Service),
        "product" => Ok(ItemKind::Product),
        other => Err(format!(
            "Unknown item_type '{other}' (expected 'service' or 'product')."
        )),
    }
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    // POS exports use a space separator; some tools re-save with a 'T'. A
    // bare date is accepted as midnight.
    const FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.into());
    }
    Err(format!(
        "Invalid transaction_time '{s}'. Expected YYYY-MM-DD HH:MM:SS (or a bare date)."
    ))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &'static str,
) -> Result<&'a str, (Option<&'static str>, String)> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| (Some(name), format!("Missing required column: `{name}`")))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| (Some(name), format!("Missing required value: `{name}`")))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const GOOD: &str = "\
transaction_time,location_name,item_type,item_identifier,quantity,net_price,customer_id
2024-03-01 10:15:00,Downtown Napa,service,Signature Facial,1,185.00,CUST-0012
2024-03-01 11:00:00,St. Helena,product,SKU-SPF-30,2,84.00,
";

    #[test]
    fn loads_well_formed_rows() {
        let f = write_csv(GOOD);
        let out = load_transactions(f.path()).unwrap();
        assert_eq!(out.rows_read, 2);
        assert_eq!(out.records.len(), 2);
        assert!(out.errors.is_empty());

        let first = &out.records[0];
        assert_eq!(first.item_type, ItemKind::Service);
        assert_eq!(first.quantity, 1);
        assert_eq!(first.customer_id.as_deref(), Some("CUST-0012"));
        assert!(out.records[1].customer_id.is_none());
    }

    #[test]
    fn validate_reports_missing_columns() {
        let f = write_csv("transaction_time,location_name,quantity\n");
        let v = validate_csv(f.path()).unwrap();
        assert!(!v.is_valid());
        assert_eq!(
            v.missing,
            vec!["item_type", "item_identifier", "net_price"]
        );
    }

    #[test]
    fn validate_strips_bom() {
        let f = write_csv(
            "\u{feff}transaction_time,location_name,item_type,item_identifier,quantity,net_price\n",
        );
        let v = validate_csv(f.path()).unwrap();
        assert!(v.is_valid(), "missing: {:?}", v.missing);
    }

    #[test]
    fn missing_column_fails_whole_load() {
        let f = write_csv("transaction_time,location_name\n2024-01-01,Napa\n");
        let err = load_transactions(f.path()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("item_type"));
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let csv = "\
transaction_time,location_name,item_type,item_identifier,quantity,net_price
2024-03-01 10:15:00,Napa,service,Facial,1,185.00
not-a-date,Napa,service,Facial,1,185.00
2024-03-01 10:15:00,Napa,membership,Gold,1,99.00
2024-03-01 10:15:00,Napa,product,SKU-1,0,10.00
2024-03-01 10:15:00,Napa,product,SKU-1,1,-5.00
";
        let f = write_csv(csv);
        let out = load_transactions(f.path()).unwrap();
        assert_eq!(out.rows_read, 5);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.errors.len(), 4);

        // First data row is CSV line 2.
        assert_eq!(out.errors[0].line, 3);
        assert_eq!(out.errors[0].column, Some("transaction_time"));
        assert_eq!(out.errors[1].line, 4);
        assert!(out.errors[1].message.contains("membership"));
        assert_eq!(out.errors[2].column, Some("quantity"));
        assert_eq!(out.errors[3].column, Some("net_price"));
    }

    #[test]
    fn discount_column_is_optional_but_validated() {
        let f = write_csv(GOOD);
        let out = load_transactions(f.path()).unwrap();
        assert_eq!(out.records[0].discount_amount, 0.0);

        let csv = "\
transaction_time,location_name,item_type,item_identifier,quantity,net_price,discount_amount
2024-03-01 10:15:00,Napa,service,Facial,1,166.50,18.50
2024-03-01 11:00:00,Napa,product,SKU-1,1,42.00,
2024-03-01 12:00:00,Napa,service,Massage,1,150.00,-3.00
";
        let f = write_csv(csv);
        let out = load_transactions(f.path()).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].discount_amount, 18.50);
        assert_eq!(out.records[1].discount_amount, 0.0);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].column, Some("discount_amount"));
    }

    #[test]
    fn accepts_t_separator_and_bare_dates() {
        let csv = "\
transaction_time,location_name,item_type,item_identifier,quantity,net_price
2024-03-01T10:15:00,Napa,service,Facial,1,185.00
2024-03-02,Napa,product,SKU-1,1,42.00
";
        let f = write_csv(csv);
        let out = load_transactions(f.path()).unwrap();
        assert!(out.errors.is_empty());
        assert_eq!(out.records[1].transaction_time.time(), chrono::NaiveTime::MIN);
    }
}
