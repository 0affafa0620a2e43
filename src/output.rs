//! Persistence of annotated datasets and summary tables.

use crate::error::{Error, Result};
use crate::rule::Summary;
use crate::types::Dataset;
use crate::Format;
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build the output path `{output_folder}/{base}{suffix}.{ext}` for an input file.
pub fn output_path(
    output_folder: impl AsRef<Path>,
    input_filename: &str,
    suffix: &str,
    format: Format,
) -> Result<PathBuf> {
    let stem = Path::new(input_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::UnsupportedFormat(input_filename.to_string()))?;

    Ok(output_folder
        .as_ref()
        .join(format!("{}{}.{}", stem, suffix, format.extension())))
}

/// Save the annotated dataset next to its siblings in `output_folder`,
/// creating the folder if needed. Returns the written path.
pub fn save_output(
    dataset: &Dataset,
    output_folder: impl AsRef<Path>,
    input_filename: &str,
    suffix: &str,
    format: Format,
) -> Result<PathBuf> {
    fs::create_dir_all(output_folder.as_ref())?;

    let path = output_path(output_folder, input_filename, suffix, format)?;
    let mut file = File::create(&path)?;
    dataset.write_to(&mut file, format)?;

    info!(path = %path.display(), rows = dataset.height(), "saved annotated dataset");
    Ok(path)
}

/// Write the `Rule,PASS,FAIL,ERROR` summary table.
pub fn write_summaries<W: Write>(summaries: &[Summary], writer: &mut W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    if summaries.is_empty() {
        csv_writer.write_record(["Rule", "PASS", "FAIL", "ERROR"])?;
    }
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}
