use serde::Serialize;

use crate::dataset::VendorRecord;
use crate::scoring::ScoredVendor;

/// A vendor at one end of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub row: usize,
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// None for an empty table
    pub mean_total: Option<f64>,
    pub best: Option<Extreme>,
    pub worst: Option<Extreme>,
}

impl Summary {
    /// Summarize `scored`, whose rows index into `records`.
    ///
    /// On ties the first vendor in row order wins, for both best and worst.
    pub fn of(records: &[VendorRecord], scored: &[ScoredVendor]) -> Self {
        let count = scored.len();
        let mean_total =
            (count > 0).then(|| scored.iter().map(|v| v.total).sum::<f64>() / count as f64);

        let mut best: Option<&ScoredVendor> = None;
        let mut worst: Option<&ScoredVendor> = None;
        for vendor in scored {
            if best.map_or(true, |b| vendor.total > b.total) {
                best = Some(vendor);
            }
            if worst.map_or(true, |w| vendor.total < w.total) {
                worst = Some(vendor);
            }
        }

        let extreme = |v: &ScoredVendor| Extreme {
            row: v.row,
            name: records
                .get(v.row)
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            total: v.total,
        };

        Self {
            count,
            mean_total,
            best: best.map(extreme),
            worst: worst.map(extreme),
        }
    }
}
