//! CSV output format.

use async_trait::async_trait;
use csv_async::AsyncWriterBuilder;
use gwdata_types::RecordTable;
use tokio::io::AsyncWrite;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter(b'\t')
    }
}

#[async_trait]
impl Formatter for CsvFormatter {
    async fn write_table<W>(&self, table: &RecordTable, writer: W) -> Result<(), FormatError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut csv = AsyncWriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .create_writer(writer);

        if self.include_header && !table.columns().is_empty() {
            csv.write_record(table.columns()).await?;
        }

        for record in table.records() {
            csv.write_record(record.values()).await?;
        }

        csv.flush().await?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }
}
