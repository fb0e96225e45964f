//! Reader and decoder options.

use serde::{Deserialize, Serialize};

/// Tokenizer settings for [`CsvRowSource`](crate::CsvRowSource).
///
/// The header row is never consumed by the tokenizer; the decoder reads
/// it as an ordinary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter byte.
    /// Defaults to `,`.
    pub delimiter: u8,

    /// Quote byte.
    /// Defaults to `"`.
    pub quote: u8,

    /// Accept rows whose cell count differs from the first row.
    /// Defaults to false, so such rows surface as row errors.
    pub flexible: bool,

    /// Trim surrounding whitespace from every cell.
    /// Defaults to false.
    pub trim: bool,

    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            flexible: false,
            trim: false,
            comment: None,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .flexible(self.flexible)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .comment(self.comment);
        builder
    }
}

/// Behavior of [`StreamingDecoder`](crate::StreamingDecoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Skip rows whose cells are all empty or whitespace, header included.
    /// Defaults to false.
    pub skip_blank_rows: bool,

    /// Include raw cell values in log events.
    /// Defaults to false; values are replaced with a redaction marker.
    pub log_values: bool,
}

impl DecoderOptions {
    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }

    pub fn with_log_values(mut self, log_values: bool) -> Self {
        self.log_values = log_values;
        self
    }
}
