use crate::{Result, RowCursor, RowsAffected, SqlCommand, Value};
use std::future::Future;

/// The execution collaborator: an already-open connection (or transaction)
/// that can run a composed command. Everything network-level — retries,
/// timeouts, backpressure — lives behind this boundary, not in this crate.
pub trait Executor: Send {
    type Cursor: RowCursor;

    /// Stable identity of the underlying connection, used to key cached
    /// deserializer plans so plans never leak across differently-shaped
    /// connections.
    fn connection_id(&self) -> &str;

    /// Run a statement and report how many rows it touched.
    fn execute(
        &mut self,
        command: &SqlCommand,
    ) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Run a statement and return the first column of its first row.
    fn execute_scalar(&mut self, command: &SqlCommand) -> impl Future<Output = Result<Value>> + Send;

    /// Run a statement and open a cursor over its result set(s).
    fn open_cursor(
        &mut self,
        command: &SqlCommand,
    ) -> impl Future<Output = Result<Self::Cursor>> + Send;
}
