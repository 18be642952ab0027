use std::path::Path;

use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::record::Record;

pub const DEFAULT_OUTPUT_FILE: &str = "artifacts/books_data.txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// One block of `key: value` lines per record, blocks separated by a blank line
    #[default]
    Text,
    /// A JSON array of records
    Json,
}

/// Writes the records of a crawl to `destination`, replacing its content.
///
/// Missing parent directories are created.
pub fn persist(records: &[Record], destination: &Path, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(dir) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let content = render(records, format)?;
    fs::write(destination, content)
        .with_context(|| format!("Couldn't persist {} records", records.len()))?;

    log::info!(
        "Saved {} records to {}",
        records.len(),
        destination.display()
    );
    Ok(())
}

pub fn render(records: &[Record], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)? + "\n"),
    }
}

pub fn render_text(records: &[Record]) -> String {
    let mut out = records
        .iter()
        .map(Record::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
