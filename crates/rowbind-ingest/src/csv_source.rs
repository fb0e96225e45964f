//! CSV-backed row source.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::StringRecord;
use rowbind_map::Record;

use crate::decoder::StreamingDecoder;
use crate::error::RowError;
use crate::options::CsvOptions;
use crate::source::{Row, RowSource};

/// Reads delimited text one row at a time.
///
/// Every physical row, the header included, is handed to the decoder
/// as-is. Tokenizer failures such as a cell-count mismatch are reported
/// per row and reading continues with the next row.
pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl<R: io::Read> CsvRowSource<R> {
    pub fn from_reader(reader: R, options: &CsvOptions) -> Self {
        Self {
            reader: options.reader_builder().from_reader(reader),
            record: StringRecord::new(),
        }
    }

    /// Consumes the source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl CsvRowSource<File> {
    pub fn from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self, RowError> {
        let path = path.as_ref();
        let reader = options.reader_builder().from_path(path)?;
        tracing::debug!(path = %path.display(), "Opened CSV row source");
        Ok(Self {
            reader,
            record: StringRecord::new(),
        })
    }
}

impl<R: io::Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self) -> Option<Result<Row, RowError>> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self.record.iter().map(str::to_owned).collect())),
            Ok(false) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}

impl<R> std::fmt::Debug for CsvRowSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRowSource").finish_non_exhaustive()
    }
}

impl<R: io::Read, T: Record> StreamingDecoder<CsvRowSource<R>, T> {
    /// Decoder over CSV text whose first row is the header.
    pub fn from_csv_reader(reader: R, options: &CsvOptions) -> Self {
        Self::new(CsvRowSource::from_reader(reader, options))
    }
}
