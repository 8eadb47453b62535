pub mod formatter;

pub use formatter::{
    format_breakdown, format_chart, format_imputation, format_ranking_table, format_score,
    format_summary, format_tsv, format_unrecognized, format_value, score_bar, should_use_colors,
};
