//! CSV export of collected records.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use gsscrape_core::Record;

/// Column names, in the field order of [`Record`].
const HEADER: [&str; 4] = ["id", "name", "price", "url"];

/// Writes a header row (`id,name,price,url`) and one row per record.
///
/// The header is written even when `records` is empty.
///
/// # Errors
///
/// Returns any serialization or I/O error from the underlying writer.
pub(crate) fn write_records<W: io::Write>(records: &[Record], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes `records` to it as CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub(crate) fn write_csv(records: &[Record], path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create CSV file: {}", path.display()))?;
    write_records(records, io::BufWriter::new(file))
        .with_context(|| format!("failed to write CSV file: {}", path.display()))
}
