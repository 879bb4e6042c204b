//! Writing a table to its final destination.

use gwdata_types::RecordTable;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::info;

use crate::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

/// Writes `table` to `writer` in the given format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub async fn write_table<W>(
    format: OutputFormat,
    table: &RecordTable,
    writer: W,
) -> Result<(), FormatError>
where
    W: AsyncWrite + Unpin + Send,
{
    match format {
        OutputFormat::Csv => CsvFormatter::new().write_table(table, writer).await,
        OutputFormat::Tsv => CsvFormatter::tsv().write_table(table, writer).await,
        OutputFormat::Json => JsonFormatter::new().write_table(table, writer).await,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_table(table, writer).await,
    }
}

/// Creates (or truncates) `path` and writes `table` to it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub async fn write_table_to_path(
    format: OutputFormat,
    table: &RecordTable,
    path: &Path,
) -> Result<(), FormatError> {
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);
    write_table(format, table, &mut writer).await?;
    writer.flush().await?;
    writer.into_inner().sync_all().await?;

    info!(path = %path.display(), records = table.len(), %format, "output written");
    Ok(())
}
