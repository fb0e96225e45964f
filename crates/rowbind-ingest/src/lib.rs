//! Streaming ingestion of tabular text into typed records.
//!
//! Rows come from any [`RowSource`]; [`CsvRowSource`] reads delimited text
//! with the `csv` crate and [`IterSource`] adapts in-memory rows. A
//! [`StreamingDecoder`] binds the header row to a [`rowbind_map::Record`]
//! type once and then yields one record per data row.
//!
//! Errors are reported per row. A bad row or a bad cell surfaces as an
//! [`IngestError`] in place of that record and decoding continues; an
//! unusable header ends the stream.

mod csv_source;
mod decoder;
mod error;
mod logging;
mod options;
mod source;

pub use csv_source::CsvRowSource;
pub use decoder::{DecoderState, Records, StreamingDecoder};
pub use error::{IngestError, Result, RowError};
pub use logging::{REDACTED_VALUE, redact_value};
pub use options::{CsvOptions, DecoderOptions};
pub use source::{IterSource, Row, RowSource};
