use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use scout_core::DisplayRecord;

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_EXPORT_FILENAME: &str = "youtube_channels.csv";

const HEADER: [&str; 6] = [
    "Channel Name",
    "Nationality",
    "Joined On",
    "Subscribers",
    "Videos",
    "Total Views",
];

/// How field values are wrapped in the CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvQuoting {
    /// Wrap in `"` without escaping anything inside. Embedded quotes or
    /// commas produce ambiguous output; kept for compatibility with
    /// existing consumers of the file.
    #[default]
    Verbatim,
    /// Wrap in `"` and double any embedded `"`.
    Escaped,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_filename: String,
    pub quoting: CsvQuoting,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            quoting: CsvQuoting::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub record_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Encodes records as CSV text: header first, one row per record in input
/// order, rows joined by `\n` without a trailing newline.
pub fn encode_csv(records: &[DisplayRecord], quoting: CsvQuoting) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(encode_row(HEADER.iter().copied(), quoting));
    for record in records {
        let videos = record.videos.to_string();
        let fields = [
            record.name.as_str(),
            record.nationality.as_str(),
            record.joined_on.as_str(),
            record.subscribers.as_str(),
            videos.as_str(),
            record.total_views.as_str(),
        ];
        rows.push(encode_row(fields.into_iter(), quoting));
    }
    rows.join("\n")
}

fn encode_row<'a>(fields: impl Iterator<Item = &'a str>, quoting: CsvQuoting) -> String {
    fields
        .map(|value| match quoting {
            CsvQuoting::Verbatim => format!("\"{value}\""),
            CsvQuoting::Escaped => format!("\"{}\"", value.replace('"', "\"\"")),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes the CSV artifact for `records` into `output_dir`.
pub fn write_csv_export(
    output_dir: &Path,
    records: &[DisplayRecord],
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let content = encode_csv(records, options.quoting);
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let output_path = writer.write(&options.output_filename, content)?;
    engine_info!(
        "Exported {} records to {}",
        records.len(),
        output_path.display()
    );
    Ok(ExportSummary {
        record_count: records.len(),
        output_path,
    })
}
