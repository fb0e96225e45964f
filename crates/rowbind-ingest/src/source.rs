//! Row source boundary.

use crate::error::RowError;

/// One record's raw cells, in column order.
pub type Row = Vec<String>;

/// Produces raw rows one at a time.
///
/// `None` signals end-of-input and is distinct from a row error. A source
/// may keep producing rows after returning an error.
pub trait RowSource {
    fn read_row(&mut self) -> Option<Result<Row, RowError>>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn read_row(&mut self) -> Option<Result<Row, RowError>> {
        (**self).read_row()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn read_row(&mut self) -> Option<Result<Row, RowError>> {
        (**self).read_row()
    }
}

/// Adapts an iterator of rows into a [`RowSource`].
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    rows: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Row, RowError>>,
{
    pub fn new(rows: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl IterSource<std::vec::IntoIter<Result<Row, RowError>>> {
    /// In-memory source over rows that never fail.
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let rows: Vec<Result<Row, RowError>> = rows
            .into_iter()
            .map(|row| Ok(row.into_iter().map(Into::into).collect()))
            .collect();
        Self::new(rows)
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = Result<Row, RowError>>,
{
    fn read_row(&mut self) -> Option<Result<Row, RowError>> {
        self.rows.next()
    }
}
