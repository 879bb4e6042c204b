//! JSON output format.

use async_trait::async_trait;
use gwdata_types::{Record, RecordTable};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Each record becomes an object keyed by column name, keys in column order.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self::new().with_style(JsonStyle::Ndjson)
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

/// Serializes one record as an ordered object.
struct RowObject<'a> {
    columns: &'a [String],
    record: &'a Record,
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.record.values()) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Serializes a whole table as an array of ordered objects.
struct TableArray<'a>(&'a RecordTable);

impl Serialize for TableArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0.records() {
            seq.serialize_element(&RowObject {
                columns: self.0.columns(),
                record,
            })?;
        }
        seq.end()
    }
}

#[async_trait]
impl Formatter for JsonFormatter {
    async fn write_table<W>(&self, table: &RecordTable, mut writer: W) -> Result<(), FormatError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut buf = Vec::new();
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut buf, &TableArray(table))?;
                } else {
                    serde_json::to_writer(&mut buf, &TableArray(table))?;
                }
                buf.push(b'\n');
            }
            JsonStyle::Ndjson => {
                for record in table.records() {
                    serde_json::to_writer(
                        &mut buf,
                        &RowObject {
                            columns: table.columns(),
                            record,
                        },
                    )?;
                    buf.push(b'\n');
                }
            }
        }

        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
