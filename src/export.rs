// src/export.rs

use anyhow::{Context, Result};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};
use serde::Serialize;
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use crate::table::ObservationTable;

/// `<dir>/.<name>.tmp`, next to the final file so the rename stays on one filesystem.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write the observations as a single Snappy-compressed Parquet file.
/// Returns the file size in bytes.
pub fn write_parquet(table: &ObservationTable, path: &Path) -> Result<u64> {
    ensure_parent(path)?;
    let batch = table.to_record_batch()?;
    let tmp = tmp_path(path);

    let file = File::create(&tmp).with_context(|| format!("creating file {}", tmp.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(
        BufWriter::new(file),
        Arc::new(ObservationTable::schema()),
        Some(props),
    )
    .context("creating parquet writer")?;
    writer.write(&batch).context("writing observations")?;
    writer.close().context("closing parquet writer")?;

    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;

    let bytes = fs::metadata(path).context("getting file metadata")?.len();
    info!(path = %path.display(), rows = table.len(), bytes, "wrote parquet");
    Ok(bytes)
}

pub fn read_parquet(path: &Path) -> Result<ObservationTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {}", path.display()))?
        .build()?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("decoding parquet batches")?;
    ObservationTable::from_record_batches(&batches)
}

/// Pretty-print `value` as JSON with a trailing newline, atomically.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let tmp = tmp_path(path);
    let mut out = BufWriter::new(
        File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?,
    );
    serde_json::to_writer_pretty(&mut out, value).context("serializing JSON")?;
    out.write_all(b"\n")?;
    out.flush()?;
    drop(out);

    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    info!(path = %path.display(), "wrote json");
    Ok(())
}
