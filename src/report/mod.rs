pub mod slices;
pub mod summary;

pub use slices::{bottom_n, chart_series, criterion_charts, top_n, Bar, ChartSeries};
pub use summary::{Extreme, Summary};
