use serde::Serialize;

use crate::dataset::VendorRecord;
use crate::scoring::Criterion;

/// One bar of a criterion chart: a vendor and its raw column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub row: usize,
    pub name: String,
    pub value: f64,
}

/// Top and bottom vendors of one criterion, each sorted ascending for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub criterion: Criterion,
    pub top: Vec<Bar>,
    pub bottom: Vec<Bar>,
}

fn bars(records: &[VendorRecord], criterion: Criterion) -> Vec<Bar> {
    records
        .iter()
        .enumerate()
        .filter_map(|(row, record)| {
            criterion.raw_value(record).map(|value| Bar {
                row,
                name: record.name.clone(),
                value,
            })
        })
        .collect()
}

/// The `n` largest raw values, earlier rows first among equals, shown ascending.
pub fn top_n(records: &[VendorRecord], criterion: Criterion, n: usize) -> Vec<Bar> {
    let mut all = bars(records, criterion);
    all.sort_by(|a, b| b.value.total_cmp(&a.value));
    all.truncate(n);
    all.sort_by(|a, b| a.value.total_cmp(&b.value));
    all
}

/// The `n` smallest raw values, earlier rows first among equals, shown ascending.
pub fn bottom_n(records: &[VendorRecord], criterion: Criterion, n: usize) -> Vec<Bar> {
    let mut all = bars(records, criterion);
    all.sort_by(|a, b| a.value.total_cmp(&b.value));
    all.truncate(n);
    all
}

pub fn chart_series(records: &[VendorRecord], criterion: Criterion, n: usize) -> ChartSeries {
    ChartSeries {
        criterion,
        top: top_n(records, criterion, n),
        bottom: bottom_n(records, criterion, n),
    }
}

/// Charts for every visualized criterion, in display order.
pub fn criterion_charts(records: &[VendorRecord], n: usize) -> Vec<ChartSeries> {
    Criterion::VISUALIZED
        .into_iter()
        .map(|criterion| chart_series(records, criterion, n))
        .collect()
}
