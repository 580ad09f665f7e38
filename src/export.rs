//! CSV export of inspection records
//!
//! UTF-8 with a byte-order mark, `\n` line endings, and no quoting. A comma
//! inside a value (multi-label auth methods, server-role notes) is written
//! as-is.

use crate::record::InspectionRecord;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HEADER: &str = "ConnectionName,Type,Server,Port,AuthMethod,Notes";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("Failed to write export: {0}")]
    Write(#[from] io::Error),
}

pub fn write_csv<W: Write>(records: &[InspectionRecord], mut out: W) -> io::Result<()> {
    out.write_all(UTF8_BOM)?;
    out.write_all(HEADER.as_bytes())?;
    out.write_all(b"\n")?;
    for record in records {
        out.write_all(record.fields().join(",").as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Write `records` to `path`, replacing any existing file
pub fn export_csv(records: &[InspectionRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(records, BufWriter::new(file))?;
    Ok(())
}
