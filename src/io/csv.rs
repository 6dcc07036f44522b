use std::io::{self, Write};
use std::path::Path;

use crate::sim::SimulationRecord;

/// Write a run to CSV format.
///
/// Columns: time, reference, angle, velocity, acceleration, command
pub fn write_record<W: Write>(writer: &mut W, record: &SimulationRecord) -> io::Result<()> {
    writeln!(writer, "time,reference,angle,velocity,acceleration,command")?;

    for s in record {
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.time, s.reference, s.angle, s.velocity, s.acceleration, s.command,
        )?;
    }

    Ok(())
}

/// Write a run to a CSV file at the given path.
pub fn write_record_file(path: impl AsRef<Path>, record: &SimulationRecord) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_record(&mut file, record)?;
    file.flush()
}
