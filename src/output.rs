use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a table as a pretty-printed JSON array of row objects
///
/// Missing coordinates are written as `null`.
///
/// # Arguments
/// * `path` - Output file path
/// * `table` - Any serializable table (`PlaceTable`, `CoordinateTable`)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, table: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, table)
        .with_context(|| format!("Failed to serialize table to {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
