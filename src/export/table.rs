use std::io::Write;

use anyhow::{Context, Result};

use crate::dataset::schema;
use crate::pipeline::Analysis;
use crate::scoring::Criterion;

/// Header row of the exported table.
///
/// The original headers, then one column per criterion score, the total and,
/// when imputation ran, the estimated label.
pub fn export_headers(analysis: &Analysis) -> Vec<String> {
    let mut headers = analysis.dataset.headers.clone();
    headers.extend(Criterion::ALL.iter().map(|c| c.score_column().to_string()));
    headers.push(schema::TOTAL.to_string());
    if analysis.imputation.ran() {
        headers.push(schema::ESTIMATED_VALUE.to_string());
    }
    headers
}

/// Write the augmented table as delimited text, one row per vendor in input order.
pub fn write_csv<W: Write>(analysis: &Analysis, writer: W, delimiter: u8) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv.write_record(export_headers(analysis))
        .context("Failed to write header row")?;

    let with_estimate = analysis.imputation.ran();
    for vendor in &analysis.scored {
        let Some(record) = analysis.dataset.records.get(vendor.row) else {
            continue;
        };
        let mut row = record.cells.clone();
        row.extend(vendor.scores.as_slice().iter().map(|s| s.to_string()));
        row.push(vendor.total.to_string());
        if with_estimate {
            row.push(
                analysis
                    .imputation
                    .estimate(vendor.row)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        csv.write_record(&row)
            .with_context(|| format!("Failed to write row {}", vendor.row + 1))?;
    }

    csv.flush().context("Failed to flush exported table")?;
    Ok(())
}
