//! Streaming record decoder.
//!
//! [`StreamingDecoder`] pulls rows from a [`RowSource`] and yields one typed
//! record per data row. The header row is either supplied up front or read
//! lazily on the first advance; in both cases the record's bindings are
//! resolved and validated exactly once.
//!
//! # Example
//!
//! ```
//! use rowbind_ingest::{CsvOptions, StreamingDecoder};
//! use rowbind_map::{FieldBinding, Record};
//!
//! #[derive(Debug, Default)]
//! struct Sample {
//!     name: String,
//!     count: u32,
//! }
//!
//! impl Record for Sample {
//!     fn bindings() -> Vec<FieldBinding<Self>> {
//!         vec![
//!             FieldBinding::coerce("name", "name", |s: &mut Self| &mut s.name),
//!             FieldBinding::coerce("count", "count", |s: &mut Self| &mut s.count),
//!         ]
//!     }
//! }
//!
//! let input = "name,count\nalpha,3\nbeta,5\n";
//! let decoder =
//!     StreamingDecoder::<_, Sample>::from_csv_reader(input.as_bytes(), &CsvOptions::default());
//! let samples = decoder.collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(samples.len(), 2);
//! assert_eq!(samples[1].count, 5);
//! # Ok::<(), rowbind_ingest::IngestError>(())
//! ```

use std::any::type_name;
use std::iter::FusedIterator;

use rowbind_map::{HeaderIndex, MappingEngine, Record};

use crate::error::{IngestError, Result};
use crate::logging::redact_value;
use crate::options::DecoderOptions;
use crate::source::{Row, RowSource};

/// Lifecycle of a [`StreamingDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No header row has been read yet.
    Uninitialized,
    /// Headers are known; data rows are being decoded.
    Ready,
    /// End of input was reached or configuration failed; no more records.
    Exhausted,
}

enum Stage<T> {
    Uninitialized,
    Ready(MappingEngine<T>),
    Exhausted(Option<MappingEngine<T>>),
}

/// Decodes records of type `T` from rows pulled off a source.
pub struct StreamingDecoder<S, T> {
    source: S,
    stage: Stage<T>,
    options: DecoderOptions,
    rows_read: u64,
}

impl<S: RowSource, T: Record> StreamingDecoder<S, T> {
    /// Decoder that treats the first row from `source` as the header.
    pub fn new(source: S) -> Self {
        Self {
            source,
            stage: Stage::Uninitialized,
            options: DecoderOptions::default(),
            rows_read: 0,
        }
    }

    /// Decoder with caller-supplied headers; every row from `source` is data.
    ///
    /// Fails with [`IngestError::Config`] when `headers` is empty or the
    /// record's bindings cannot be resolved against it.
    pub fn with_headers<H: AsRef<str>>(source: S, headers: &[H]) -> Result<Self> {
        let engine = MappingEngine::from_headers(headers)?;
        tracing::debug!(
            columns = headers.len(),
            record = type_name::<T>(),
            "Using explicit headers"
        );
        Ok(Self {
            source,
            stage: Stage::Ready(engine),
            options: DecoderOptions::default(),
            rows_read: 0,
        })
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Advances the stream.
    ///
    /// Returns `None` at end of input, and on every call after that. Row and
    /// decode errors are yielded in place of the affected record and the
    /// stream continues with the next row. A configuration error found while
    /// reading the header row is yielded once, after which the stream ends.
    pub fn next_record(&mut self) -> Option<Result<T>> {
        if matches!(self.stage, Stage::Uninitialized) {
            match self.discover_headers() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
        if !matches!(self.stage, Stage::Ready(_)) {
            return None;
        }

        let row = match self.next_row()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };

        let Stage::Ready(engine) = &self.stage else {
            return None;
        };
        let mut record = T::default();
        match engine.decode(&row, &mut record) {
            Ok(()) => {
                tracing::trace!(row = self.rows_read, "Decoded record");
                Some(Ok(record))
            }
            Err(source) => {
                tracing::warn!(
                    row = self.rows_read,
                    field = source.field(),
                    column = source.column(),
                    value = redact_value(source.value(), self.options.log_values),
                    error = %source.kind(),
                    "Failed to decode row"
                );
                Some(Err(IngestError::Decode {
                    row: self.rows_read,
                    source,
                }))
            }
        }
    }

    /// Borrowing iterator over the remaining records.
    pub fn records(&mut self) -> Records<'_, S, T> {
        Records { decoder: self }
    }

    pub fn state(&self) -> DecoderState {
        match self.stage {
            Stage::Uninitialized => DecoderState::Uninitialized,
            Stage::Ready(_) => DecoderState::Ready,
            Stage::Exhausted(_) => DecoderState::Exhausted,
        }
    }

    /// Header index in use, once known.
    pub fn headers(&self) -> Option<&HeaderIndex> {
        match &self.stage {
            Stage::Ready(engine) | Stage::Exhausted(Some(engine)) => Some(engine.headers()),
            Stage::Uninitialized | Stage::Exhausted(None) => None,
        }
    }

    /// Physical rows pulled from the source so far, header row included.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Reads the header row and builds the mapping engine.
    ///
    /// Returns `Ok(false)` when the source is empty.
    fn discover_headers(&mut self) -> Result<bool> {
        let headers = match self.next_row() {
            None => {
                tracing::debug!(record = type_name::<T>(), "No header row in source");
                return Ok(false);
            }
            Some(Err(err)) => return Err(err),
            Some(Ok(headers)) => headers,
        };

        match MappingEngine::from_headers(&headers) {
            Ok(engine) => {
                tracing::debug!(
                    columns = headers.len(),
                    bound = engine.bound_fields().count(),
                    record = type_name::<T>(),
                    "Discovered header row"
                );
                self.stage = Stage::Ready(engine);
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(record = type_name::<T>(), error = %err, "Header row rejected");
                self.stage = Stage::Exhausted(None);
                Err(err.into())
            }
        }
    }

    /// Pulls the next row, skipping blank rows when configured.
    ///
    /// Reaching the end of input moves the decoder to the exhausted state.
    fn next_row(&mut self) -> Option<Result<Row>> {
        loop {
            let Some(next) = self.source.read_row() else {
                self.finish();
                return None;
            };
            self.rows_read += 1;
            match next {
                Ok(row) if self.options.skip_blank_rows && is_blank(&row) => {
                    tracing::trace!(row = self.rows_read, "Skipping blank row");
                }
                Ok(row) => return Some(Ok(row)),
                Err(source) => {
                    tracing::warn!(row = self.rows_read, error = %source, "Failed to read row");
                    return Some(Err(IngestError::Row {
                        row: self.rows_read,
                        source,
                    }));
                }
            }
        }
    }

    fn finish(&mut self) {
        let stage = std::mem::replace(&mut self.stage, Stage::Exhausted(None));
        self.stage = match stage {
            Stage::Ready(engine) => Stage::Exhausted(Some(engine)),
            Stage::Uninitialized => Stage::Exhausted(None),
            exhausted @ Stage::Exhausted(_) => exhausted,
        };
        tracing::debug!(rows = self.rows_read, "Row source exhausted");
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

impl<S: RowSource, T: Record> Iterator for StreamingDecoder<S, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

impl<S: RowSource, T: Record> FusedIterator for StreamingDecoder<S, T> {}

impl<S, T> std::fmt::Debug for StreamingDecoder<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match &self.stage {
            Stage::Uninitialized => "uninitialized",
            Stage::Ready(_) => "ready",
            Stage::Exhausted(_) => "exhausted",
        };
        f.debug_struct("StreamingDecoder")
            .field("stage", &stage)
            .field("options", &self.options)
            .field("rows_read", &self.rows_read)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`StreamingDecoder::records`].
pub struct Records<'a, S, T> {
    decoder: &'a mut StreamingDecoder<S, T>,
}

impl<S: RowSource, T: Record> Iterator for Records<'_, S, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_record()
    }
}

impl<S: RowSource, T: Record> FusedIterator for Records<'_, S, T> {}
