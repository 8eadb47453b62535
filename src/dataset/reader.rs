use anyhow::{Context, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::categorical::{Blacklist, Compliance, FiscalStatus};
use super::schema::{self, Rating, Schema};
use super::{Dataset, VendorRecord};
use crate::error::DatasetError;

/// Load the vendor table from a CSV file.
pub fn read_dataset(path: &Path, delimiter: u8) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file at {}", path.display()))?;

    let dataset = read_dataset_from_reader(file, delimiter)
        .with_context(|| format!("Failed to load vendor table from {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        labeled = dataset.labeled_count(),
        "loaded vendor table"
    );
    Ok(dataset)
}

/// Parse a vendor table from any CSV source.
///
/// The header row is validated against the schema before any data row is read.
/// Rows whose cells are all empty (trailing spreadsheet rows) are skipped.
pub fn read_dataset_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let schema = Schema::resolve(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;
        if record.iter().all(str::is_empty) {
            tracing::debug!(row, "skipping blank row");
            continue;
        }
        records.push(parse_row(&schema, &record, row, headers.len())?);
    }

    let dataset = Dataset {
        headers,
        records,
        has_label_column: schema.perceived_value.is_some(),
    };
    for unknown in dataset.unrecognized_values() {
        tracing::warn!(
            row = unknown.row,
            column = unknown.column,
            value = %unknown.value,
            "unrecognized category scored as 0"
        );
    }
    Ok(dataset)
}

fn parse_row(
    schema: &Schema,
    record: &StringRecord,
    row: usize,
    width: usize,
) -> Result<VendorRecord, DatasetError> {
    let mut ratings = [0.0; 6];
    for rating in Rating::ALL {
        let column = rating.column();
        let value = number(record, schema.ratings[rating.index()], column, row)?;
        if !(Rating::MIN..=Rating::MAX).contains(&value) {
            return Err(DatasetError::RatingOutOfRange { row, column, value });
        }
        ratings[rating.index()] = value;
    }

    let perceived_value = match schema.perceived_value {
        Some(idx) => optional_number(record, idx, schema::PERCEIVED_VALUE, row)?,
        None => None,
    };

    if let Some(extra) = record.iter().skip(width).position(|cell| !cell.is_empty()) {
        return Err(DatasetError::CellOutsideHeader {
            row,
            position: width + extra + 1,
            columns: width,
        });
    }
    // Short rows are padded, trailing empty cells past the header dropped
    let mut cells: Vec<String> = record.iter().take(width).map(String::from).collect();
    cells.resize(width, String::new());

    Ok(VendorRecord {
        name: required(record, schema.name, schema::NAME, row)?.to_string(),
        price: number(record, schema.price, schema::PRICE, row)?,
        lead_time_days: number(record, schema.lead_time, schema::LEAD_TIME, row)?,
        compliance: Compliance::parse(required(record, schema.compliance, schema::COMPLIANCE, row)?),
        fiscal_status: FiscalStatus::parse(required(
            record,
            schema.fiscal_status,
            schema::FISCAL_STATUS,
            row,
        )?),
        blacklist: Blacklist::parse(required(record, schema.blacklist, schema::BLACKLIST, row)?),
        ratings,
        perceived_value,
        cells,
        source_row: row,
    })
}

fn required<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<&'r str, DatasetError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DatasetError::MissingValue { row, column }),
    }
}

fn number(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, DatasetError> {
    let raw = required(record, idx, column, row)?;
    parse_number(raw).ok_or_else(|| DatasetError::InvalidNumber {
        row,
        column,
        value: raw.to_string(),
    })
}

fn optional_number(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<Option<f64>, DatasetError> {
    match record.get(idx) {
        None | Some("") => Ok(None),
        Some(raw) => parse_number(raw).map(Some).ok_or_else(|| DatasetError::InvalidNumber {
            row,
            column,
            value: raw.to_string(),
        }),
    }
}

/// Parse a finite number, accepting a decimal comma ("12,5") when no period is present.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let parsed = s.parse::<f64>().ok().or_else(|| {
        if s.contains(',') && !s.contains('.') {
            s.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::required_columns;

    fn header() -> String {
        required_columns().join(",")
    }

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut out = header();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    const ROW_A: &str = "Acme,100,10,Sí,Al día,No,8,7,9,6,5,8";
    const ROW_B: &str = "Globex,200,5,No,No al día,Sí,4,5,3,6,7,2";

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" 12,5 "), Some(12.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1,234.5"), None);
    }

    #[test]
    fn test_reads_rows_in_order() {
        let input = csv_with_rows(&[ROW_A, ROW_B]);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.has_label_column);

        let acme = &dataset.records[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.price, 100.0);
        assert_eq!(acme.lead_time_days, 10.0);
        assert_eq!(acme.compliance, Compliance::Compliant);
        assert_eq!(acme.fiscal_status, FiscalStatus::Current);
        assert_eq!(acme.blacklist, Blacklist::Clear);
        assert_eq!(acme.rating(Rating::ServiceQuality), 8.0);
        assert_eq!(acme.rating(Rating::ExternalReputation), 8.0);
        assert_eq!(acme.cells.len(), dataset.headers.len());

        let globex = &dataset.records[1];
        assert_eq!(globex.blacklist, Blacklist::Listed);
        assert_eq!(globex.fiscal_status, FiscalStatus::NotCurrent);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let dataset = read_dataset_from_reader(header().as_bytes(), b',').unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = read_dataset_from_reader("".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DatasetError::NoHeader));
    }

    #[test]
    fn test_missing_column_fails_before_rows() {
        let input = "Proveedor,Precio\nAcme,100";
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        match err {
            DatasetError::MissingColumns(missing) => assert_eq!(missing.len(), 10),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_bom_on_first_header_is_ignored() {
        let input = format!("\u{feff}{}\n{}", header(), ROW_A);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.headers[0], "Proveedor");
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_semicolon_delimiter_with_decimal_comma() {
        let input = format!(
            "{}\nAcme;99,5;10;Sí;Al día;No;8;7;9;6;5;8",
            required_columns().join(";")
        );
        let dataset = read_dataset_from_reader(input.as_bytes(), b';').unwrap();
        assert_eq!(dataset.records[0].price, 99.5);
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let input = csv_with_rows(&["Acme,100,10,Sí,Al día,No,11,7,9,6,5,8"]);
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        match err {
            DatasetError::RatingOutOfRange { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Calidad del servicio");
                assert_eq!(value, 11.0);
            }
            other => panic!("expected RatingOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rating_below_one_is_rejected() {
        let input = csv_with_rows(&[ROW_A, "Initech,100,10,Sí,Al día,No,8,7,9,6,0,8"]);
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DatasetError::RatingOutOfRange { row: 2, .. }));
    }

    #[test]
    fn test_non_numeric_price_names_row_and_column() {
        let input = csv_with_rows(&["Acme,cheap,10,Sí,Al día,No,8,7,9,6,5,8"]);
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 1: column 'Precio' has non-numeric value 'cheap'"
        );
    }

    #[test]
    fn test_missing_required_cell() {
        let input = csv_with_rows(&["Acme,100,,Sí,Al día,No,8,7,9,6,5,8"]);
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingValue { row: 1, column: "Tiempo de entrega (días)" }
        ));
    }

    #[test]
    fn test_optional_label_column() {
        let input = format!(
            "{},Valor percibido\n{},7.5\n{},",
            header(),
            ROW_A,
            ROW_B
        );
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert!(dataset.has_label_column);
        assert_eq!(dataset.records[0].perceived_value, Some(7.5));
        assert_eq!(dataset.records[1].perceived_value, None);
        assert_eq!(dataset.labeled_count(), 1);
    }

    #[test]
    fn test_unrecognized_category_is_kept() {
        let input = csv_with_rows(&["Acme,100,10,En trámite,Al día,No,8,7,9,6,5,8"]);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        let unknown = dataset.unrecognized_values();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].column, "Cumple normativa");
        assert_eq!(unknown[0].value, "En trámite");
    }

    #[test]
    fn test_blank_trailing_rows_are_skipped() {
        let input = csv_with_rows(&[ROW_A, ",,,,,,,,,,,"]);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_unrecognized_row_counts_skipped_blank_rows() {
        let input = csv_with_rows(&[
            ROW_A,
            ",,,,,,,,,,,",
            "Initech,100,10,En trámite,Al día,No,8,7,9,6,5,8",
        ]);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[1].source_row, 3);
        assert_eq!(dataset.unrecognized_values()[0].row, 3);
    }

    #[test]
    fn test_value_beyond_header_is_rejected() {
        let input = csv_with_rows(&[ROW_A, &format!("{},suelto", ROW_B)]);
        let err = read_dataset_from_reader(input.as_bytes(), b',').unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 2: cell 13 has a value but the header has only 12 columns"
        );
    }

    #[test]
    fn test_trailing_empty_cells_are_dropped() {
        let input = csv_with_rows(&[&format!("{},,", ROW_A)]);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.records[0].cells.len(), dataset.headers.len());
    }

    #[test]
    fn test_extra_columns_are_preserved() {
        let input = format!("{},Notas\n{},revisar contrato", header(), ROW_A);
        let dataset = read_dataset_from_reader(input.as_bytes(), b',').unwrap();
        assert_eq!(dataset.headers.last().map(String::as_str), Some("Notas"));
        assert_eq!(dataset.records[0].cells.last().map(String::as_str), Some("revisar contrato"));
    }
}
