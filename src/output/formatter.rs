use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::dataset::UnrecognizedValue;
use crate::impute::{ImputationOutcome, ValidationReport};
use crate::pipeline::Analysis;
use crate::report::{Bar, ChartSeries, Summary};
use crate::scoring::ScoreBreakdown;

const BAR_WIDTH: usize = 10;
const CHART_WIDTH: usize = 30;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a [0,1] score with three decimals
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

/// Format a chart value compactly (1.5k, 2.3M, 847, 7.5)
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    let formatted = if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// Fixed-width bar for a [0,1] fraction
pub fn score_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn fit_name(name: &str, fixed_width: usize, term_width: Option<usize>) -> String {
    match term_width {
        Some(width) if width > fixed_width + 10 => truncate_name(name, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_name(name, 20),
        // No terminal (pipe), don't truncate
        None => name.to_string(),
    }
}

/// Ranking as one line per vendor: index, score, bar, name and any estimate.
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_ranking_table(analysis: &Analysis, use_colors: bool) -> String {
    if analysis.ranking.is_empty() {
        return "No vendors found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";
    // index + space + score + bar
    let fixed_width = 4 + 5 + separator.len() * 2 + BAR_WIDTH;

    analysis
        .ranked()
        .map(|ranked| {
            let index_str = format!("{:>2}.", ranked.rank);
            let score_str = format_score(ranked.vendor.total);
            let bar = score_bar(ranked.vendor.total, BAR_WIDTH);
            let name = fit_name(ranked.name, fixed_width, term_width);
            let estimate = ranked
                .estimate
                .map(|v| format!("{}(est. {:.2})", separator, v))
                .unwrap_or_default();

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    bar.cyan(),
                    separator,
                    name,
                    estimate.yellow()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str, score_str, separator, bar, separator, name, estimate
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranking as tab-separated values for scripting
/// Columns: rank, total, name, estimate (no headers, no colors)
pub fn format_tsv(analysis: &Analysis) -> String {
    analysis
        .ranked()
        .map(|ranked| {
            format!(
                "{}\t{}\t{}\t{}",
                ranked.rank,
                ranked.vendor.total,
                ranked.name,
                ranked.estimate.map(|v| v.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut lines = vec![format!("Vendors: {}", summary.count)];
    if let Some(mean) = summary.mean_total {
        lines.push(format!("Mean score: {}", format_score(mean)));
    }
    if let Some(best) = &summary.best {
        let text = format!("Best: {} ({})", best.name, format_score(best.total));
        lines.push(if use_colors { text.green().to_string() } else { text });
    }
    if let Some(worst) = &summary.worst {
        let text = format!("Worst: {} ({})", worst.name, format_score(worst.total));
        lines.push(if use_colors { text.red().to_string() } else { text });
    }
    lines.join("\n")
}

/// Per-criterion score, weight and contribution for one vendor.
pub fn format_breakdown(name: &str, breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let label_width = breakdown
        .contributions
        .iter()
        .map(|c| c.criterion.column().chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![if use_colors {
        name.bold().to_string()
    } else {
        name.to_string()
    }];
    for c in &breakdown.contributions {
        let label = c.criterion.column();
        let pad = label_width - label.chars().count();
        lines.push(format!(
            "  {}{}  {}  x {:.2}  = {}",
            label,
            " ".repeat(pad),
            format_score(c.score),
            c.weight,
            format_score(c.contribution)
        ));
    }
    lines.push(format!("  Total {}", format_score(breakdown.total())));
    lines.join("\n")
}

fn format_bars(bars: &[Bar], scale: f64, use_colors: bool, top: bool) -> Vec<String> {
    let name_width = bars
        .iter()
        .map(|b| b.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    bars.iter()
        .map(|b| {
            let name = truncate_name(&b.name, name_width);
            let pad = name_width - name.chars().count();
            let fraction = if scale > 0.0 { b.value.abs() / scale } else { 0.0 };
            let filled = ((fraction * CHART_WIDTH as f64).round() as usize).min(CHART_WIDTH);
            let bar = "█".repeat(filled);
            let bar = match (use_colors, top) {
                (false, _) => bar,
                (true, true) => bar.green().to_string(),
                (true, false) => bar.red().to_string(),
            };
            format!("  {}{} {} {}", name, " ".repeat(pad), bar, format_value(b.value))
        })
        .collect()
}

/// Horizontal bar charts of the top and bottom vendors for one criterion.
pub fn format_chart(series: &ChartSeries, use_colors: bool) -> String {
    let scale = series
        .top
        .iter()
        .chain(&series.bottom)
        .map(|b| b.value.abs())
        .fold(0.0, f64::max);

    let title = series.criterion.column();
    let mut lines = Vec::new();
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    });
    if series.top.is_empty() {
        lines.push("  (no data)".to_string());
        return lines.join("\n");
    }

    lines.push(format!("  Top {}", series.top.len()));
    lines.extend(format_bars(&series.top, scale, use_colors, true));
    lines.push(format!("  Bottom {}", series.bottom.len()));
    lines.extend(format_bars(&series.bottom, scale, use_colors, false));
    lines.join("\n")
}

fn format_validation(report: &ValidationReport) -> String {
    let r2 = report
        .r2
        .map(|r| format!(", R² {:.3}", r))
        .unwrap_or_default();
    format!(
        "  Validation on {} row(s): MAE {:.3}, RMSE {:.3}{}",
        report.rows, report.mae, report.rmse, r2
    )
}

pub fn format_imputation(outcome: &ImputationOutcome) -> String {
    match outcome {
        ImputationOutcome::Skipped(reason) => format!("Imputation skipped: {}", reason),
        ImputationOutcome::NothingToImpute { labeled } => {
            format!("Imputation not needed: all {} rows are labeled", labeled)
        }
        ImputationOutcome::Imputed(imputation) => {
            let mut lines = vec![format!(
                "Imputed {} value(s) from {} training row(s)",
                imputation.predictions.len(),
                imputation.train_rows
            )];
            if let Some(report) = &imputation.validation {
                lines.push(format_validation(report));
            }
            lines.join("\n")
        }
    }
}

pub fn format_unrecognized(values: &[UnrecognizedValue]) -> String {
    values
        .iter()
        .map(|u| {
            format!(
                "row {}: '{}' in '{}' not recognized, scored as 0",
                u.row, u.value, u.column
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
