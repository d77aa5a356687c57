use crate::{Result, SqlType, Value};
use std::future::Future;

/// Name and declared type of one cursor column. The pair is all the
/// deserializer needs: plans are keyed on it and rebuilt when it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub ty: SqlType,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A forward-only cursor over one or more ordered result sets, as produced by
/// the execution collaborator. No random access, no rewinding.
///
/// The cursor starts positioned before the first row of the first result set;
/// `advance` moves to the next row and reports whether one exists. Field
/// reads address the current row by ordinal. `next_result` moves to the
/// following result set (suspending for I/O) and reports whether one exists.
pub trait RowCursor: Send {
    /// Layout of the current result set.
    fn columns(&self) -> &[ColumnInfo];

    /// Read one field of the current row by ordinal position. NULL comes back
    /// as a null-carrying [`Value`] variant.
    fn value(&self, index: usize) -> Result<Value>;

    fn advance(&mut self) -> impl Future<Output = Result<bool>> + Send;

    fn next_result(&mut self) -> impl Future<Output = Result<bool>> + Send;
}
