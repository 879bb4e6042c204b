//! Delimited-text decoding of response bodies.

use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use gwdata_types::{Record, RecordTable};
use thiserror::Error;

/// Errors that can occur while decoding a response body.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The body is not well-formed delimited text.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv_async::Error),
}

/// Decodes a CSV body into a [`RecordTable`].
///
/// The first row is the header. An empty body or a header-only body decodes
/// to a table with zero records. Rows whose width differs from the header
/// are rejected.
///
/// # Errors
///
/// Returns an error if the body is not valid UTF-8 CSV.
pub async fn decode_csv(body: &[u8]) -> Result<RecordTable, ParseError> {
    let mut reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .create_reader(body);

    let columns: Vec<String> = reader
        .headers()
        .await?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RecordTable::new(columns);
    let mut rows = std::pin::pin!(reader.records());
    while let Some(row) = rows.next().await {
        let row = row?;
        table.push(row.iter().collect::<Record>());
    }

    Ok(table)
}
