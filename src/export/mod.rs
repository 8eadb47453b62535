mod json;
mod table;

pub use json::{to_json_string, write_json};
pub use table::{export_headers, write_csv};

use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::pipeline::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Write the analysis to `path`, replacing any existing file atomically.
pub fn export(analysis: &Analysis, path: &Path, format: ExportFormat, delimiter: u8) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    match format {
        ExportFormat::Csv => write_csv(analysis, &mut file, delimiter)?,
        ExportFormat::Json => write_json(analysis, &mut file)?,
    }

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = analysis.scored.len(), "exported");
    Ok(())
}
