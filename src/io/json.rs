use std::io::Write;
use std::path::Path;

use crate::error::SimResult;
use crate::sim::ResponseSummary;

/// Write a response summary as pretty-printed JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &ResponseSummary) -> SimResult<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a response summary as JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &ResponseSummary) -> SimResult<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
