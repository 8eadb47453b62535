use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use vendor_rank::config::Config;
use vendor_rank::export::ExportFormat;
use vendor_rank::impute::ImputationParams;
use vendor_rank::pipeline::Analysis;
use vendor_rank::scoring::{Criterion, WeightTable};
use vendor_rank::{output, report};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATASET: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoreFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FileFormat {
    Csv,
    Json,
}

impl From<FileFormat> for ExportFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => ExportFormat::Csv,
            FileFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank the vendors of a table
    Score {
        /// Input CSV table (export spreadsheets as CSV first)
        input: PathBuf,
        /// Also write the augmented table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format for stdout
        #[arg(long, value_enum, default_value = "table")]
        format: ScoreFormat,
        /// Skip estimating missing perceived values
        #[arg(long)]
        no_impute: bool,
        /// Print the per-criterion breakdown of every vendor
        #[arg(long)]
        breakdown: bool,
    },
    /// Print top/bottom bar charts per criterion
    Charts {
        /// Input CSV table (export spreadsheets as CSV first)
        input: PathBuf,
        /// Only chart this criterion (e.g. "Precio")
        #[arg(long)]
        criterion: Option<String>,
        /// Vendors per chart (defaults to charts.top_n)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Browse the ranking and charts interactively
    View {
        /// Input CSV table (export spreadsheets as CSV first)
        input: PathBuf,
        /// File written by the export key
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the augmented table to a file
    Export {
        /// Input CSV table (export spreadsheets as CSV first)
        input: PathBuf,
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
        /// File format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<FileFormat>,
        /// Skip estimating missing perceived values
        #[arg(long)]
        no_impute: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "vendor-rank")]
#[command(about = "Weighted scoring and ranking of RFP vendors")]
#[command(long_about = "Weighted scoring and ranking of RFP vendors.\n\n\
Input is a CSV table. Spreadsheet files (.xlsx, .ods) are not read directly: \
export the sheet as CSV first (e.g. Save As > CSV UTF-8). A semicolon-separated \
export is read by setting input.delimiter to \";\" in the config file.")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file (defaults to ~/.config/vendor-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Print an error chain and exit.
fn fail(context: &str, err: anyhow::Error, code: i32) -> ! {
    eprintln!("{}: {:#}", context, err);
    std::process::exit(code);
}

fn load(input: &Path, config: &Config, no_impute: bool) -> Analysis {
    let delimiter = config.input.delimiter_byte().unwrap_or(b',');
    let dataset = match vendor_rank::dataset::read_dataset(input, delimiter) {
        Ok(d) => d,
        Err(e) => fail("Input error", e, EXIT_DATASET),
    };

    let imputation = ImputationParams {
        enabled: config.imputation.enabled && !no_impute,
        ..config.imputation.clone()
    };
    match vendor_rank::pipeline::analyze(dataset, &WeightTable::default(), &imputation) {
        Ok(a) => a,
        Err(e) => fail("Analysis error", e, EXIT_DATASET),
    }
}

fn write_export(analysis: &Analysis, path: &Path, format: ExportFormat, config: &Config) {
    let delimiter = config.input.delimiter_byte().unwrap_or(b',');
    if let Err(e) = vendor_rank::export::export(analysis, path, format, delimiter) {
        fail("Export error", e, EXIT_IO);
    }
}

fn print_report(analysis: &Analysis, breakdown: bool, use_colors: bool) {
    println!("{}", output::format_ranking_table(analysis, use_colors));
    println!();
    println!("{}", output::format_summary(&analysis.summary, use_colors));
    println!("{}", output::format_imputation(&analysis.imputation));

    if !analysis.unrecognized.is_empty() {
        eprintln!("{}", output::format_unrecognized(&analysis.unrecognized));
    }

    if breakdown {
        for ranked in analysis.ranked() {
            if let Some(b) = analysis.breakdown(ranked.vendor.row) {
                println!();
                println!("{}", output::format_breakdown(ranked.name, &b, use_colors));
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    vendor_rank::logging::init_logging(cli.verbose);
    let start_time = Instant::now();

    if let Commands::Init = cli.command {
        let default_path = cli.config.map(PathBuf::from);
        if let Err(e) = vendor_rank::config::init::run_init_wizard(default_path) {
            fail("Init error", e, EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config_path = cli.config.map(PathBuf::from);
    let config = match vendor_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail("Config error", e, EXIT_CONFIG),
    };

    match cli.command {
        Commands::Score {
            input,
            output: out,
            format,
            no_impute,
            breakdown,
        } => {
            let analysis = load(&input, &config, no_impute);
            match format {
                ScoreFormat::Table => {
                    print_report(&analysis, breakdown, output::should_use_colors())
                }
                ScoreFormat::Tsv => {
                    let tsv = output::format_tsv(&analysis);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                ScoreFormat::Json => match vendor_rank::export::to_json_string(&analysis) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail("Output error", e, EXIT_IO),
                },
            }
            if let Some(path) = out {
                write_export(&analysis, &path, ExportFormat::from_path(&path), &config);
                eprintln!("Wrote {}", path.display());
            }
        }
        Commands::Charts {
            input,
            criterion,
            top,
        } => {
            let analysis = load(&input, &config, true);
            let n = top.unwrap_or(config.charts.top_n).max(1);
            let use_colors = output::should_use_colors();
            let records = &analysis.dataset.records;

            let charts = match criterion {
                Some(name) => match Criterion::from_name(&name) {
                    Some(c) if Criterion::VISUALIZED.contains(&c) => vec![report::chart_series(records, c, n)],
                    Some(c) => {
                        eprintln!("'{}' has no numeric column to chart", c);
                        std::process::exit(EXIT_CONFIG);
                    }
                    None => {
                        eprintln!("Unknown criterion '{}'. Charted criteria:", name);
                        for c in Criterion::VISUALIZED {
                            eprintln!("  {}", c);
                        }
                        std::process::exit(EXIT_CONFIG);
                    }
                },
                None => report::criterion_charts(records, n),
            };

            let text = charts
                .iter()
                .map(|series| output::format_chart(series, use_colors))
                .collect::<Vec<_>>()
                .join("\n\n");
            println!("{}", text);
        }
        Commands::View { input, output: out } => {
            let analysis = load(&input, &config, false);
            let theme = vendor_rank::tui::resolve_theme(config.theme);
            let app = vendor_rank::tui::App::new(
                analysis,
                config.charts.top_n,
                out,
                config.input.delimiter_byte().unwrap_or(b','),
                theme,
            );
            if let Err(e) = vendor_rank::tui::run_tui(app) {
                fail("Terminal error", e, EXIT_IO);
            }
        }
        Commands::Export {
            input,
            output: out,
            format,
            no_impute,
        } => {
            let analysis = load(&input, &config, no_impute);
            let format = format
                .map(ExportFormat::from)
                .unwrap_or_else(|| ExportFormat::from_path(&out));
            write_export(&analysis, &out, format, &config);
            println!("{}", output::format_imputation(&analysis.imputation));
            println!("Wrote {} vendors to {}", analysis.scored.len(), out.display());
        }
        Commands::Init => {}
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_help_tells_spreadsheet_users_to_export_csv() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        let long_about = cmd.get_long_about().map(|s| s.to_string()).unwrap_or_default();
        assert!(long_about.contains("export the sheet as CSV first"));

        let score = cmd.find_subcommand("score").unwrap();
        let input = score
            .get_arguments()
            .find(|a| a.get_id() == "input")
            .unwrap();
        let help = input.get_help().map(|s| s.to_string()).unwrap_or_default();
        assert!(help.contains("export spreadsheets as CSV first"));
    }
}
