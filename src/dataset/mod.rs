mod categorical;
mod reader;
pub mod schema;

pub use categorical::{fold, Blacklist, Compliance, FiscalStatus};
pub use reader::{parse_number, read_dataset, read_dataset_from_reader};
pub use schema::{Rating, Schema};

/// One vendor row of the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRecord {
    pub name: String,
    pub price: f64,
    pub lead_time_days: f64,
    pub compliance: Compliance,
    pub fiscal_status: FiscalStatus,
    pub blacklist: Blacklist,
    /// Indexed by `Rating::index()`
    pub ratings: [f64; 6],
    /// Historical "Valor percibido" label, when known
    pub perceived_value: Option<f64>,
    /// Original cells, aligned with `Dataset::headers`
    pub cells: Vec<String>,
    /// 1-based data row in the source file, counting skipped blank rows
    pub source_row: usize,
}

impl VendorRecord {
    pub fn rating(&self, rating: Rating) -> f64 {
        self.ratings[rating.index()]
    }
}

/// A categorical cell that did not match any known answer. `row` is the record's `source_row`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedValue {
    pub row: usize,
    pub column: &'static str,
    pub value: String,
}

/// The loaded input table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Header row exactly as read (BOM stripped)
    pub headers: Vec<String>,
    pub records: Vec<VendorRecord>,
    /// Whether the optional "Valor percibido" column exists
    pub has_label_column: bool,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn labeled_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.perceived_value.is_some())
            .count()
    }

    pub fn unrecognized_values(&self) -> Vec<UnrecognizedValue> {
        let mut found = Vec::new();
        for record in &self.records {
            let row = record.source_row;
            if !record.compliance.is_recognized() {
                found.push(UnrecognizedValue {
                    row,
                    column: schema::COMPLIANCE,
                    value: record.compliance.to_string(),
                });
            }
            if !record.fiscal_status.is_recognized() {
                found.push(UnrecognizedValue {
                    row,
                    column: schema::FISCAL_STATUS,
                    value: record.fiscal_status.to_string(),
                });
            }
            if !record.blacklist.is_recognized() {
                found.push(UnrecognizedValue {
                    row,
                    column: schema::BLACKLIST,
                    value: record.blacklist.to_string(),
                });
            }
        }
        found
    }
}
