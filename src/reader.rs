use crate::{
    CardinalityError, FromRow, Identity, ProtocolError, Result, RowCursor, RowNames, Value,
    deserializer_for,
};
use async_stream::try_stream;
use futures::Stream;
use std::any::TypeId;

#[derive(Clone, Copy)]
struct RowDemand {
    required: bool,
    unique: bool,
}

/// Sequential reader over a cursor that may expose several ordered result
/// sets (e.g. from a batched statement).
///
/// Result sets must be consumed strictly in order and at most once each; a
/// read marks the current result consumed the moment it starts, even if it
/// later fails. Once the last result has been consumed the cursor is
/// released, any completion callback runs, and further reads fail with a
/// disposed-reader error.
///
/// Reads suspend only at row-fetch and result-advance points; dropping the
/// returned future or stream there abandons the read and the cursor is
/// released when the reader itself drops.
pub struct QueryReader<C: RowCursor> {
    cursor: Option<C>,
    identity: Identity,
    result_set_index: usize,
    consumed: bool,
    on_complete: Option<Box<dyn FnOnce() + Send>>,
}

impl<C: RowCursor> QueryReader<C> {
    pub fn new(cursor: C, identity: Identity) -> Self {
        Self {
            cursor: Some(cursor),
            identity,
            result_set_index: 0,
            consumed: false,
            on_complete: None,
        }
    }

    /// Register a callback to run once every result has been consumed and
    /// the cursor released.
    pub fn on_complete(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn is_disposed(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn result_set_index(&self) -> usize {
        self.result_set_index
    }

    /// Read the current result set fully buffered, then advance to the next
    /// one. The advance happens even when a row fails to decode.
    pub async fn read<T: FromRow>(&mut self) -> Result<Vec<T>> {
        let grid = self.begin::<T>()?;
        let outcome = {
            let cursor = match self.cursor.as_mut() {
                Some(cursor) => cursor,
                None => return Err(ProtocolError::ReaderDisposed.into()),
            };
            let plan = deserializer_for::<T>(&grid, cursor.columns());
            let names = cursor_names(cursor);
            let mut buffer = Vec::new();
            loop {
                match cursor.advance().await {
                    Ok(true) => {
                        let item = read_raw(cursor)
                            .and_then(|raw| T::from_row(&plan.materialize(&names, raw)));
                        match item {
                            Ok(item) => buffer.push(item),
                            Err(error) => break Err(error),
                        }
                    }
                    Ok(false) => break Ok(buffer),
                    Err(error) => break Err(error),
                }
            }
        };
        let advanced = self.advance_result().await;
        let items = outcome?;
        advanced?;
        Ok(items)
    }

    /// Read the current result set as a lazy, single-pass stream.
    ///
    /// The stream must be enumerated to completion: the advance to the next
    /// result set happens when the last row has been yielded. Dropping it
    /// part-way leaves the current result marked consumed and the reader
    /// unable to progress to subsequent results.
    pub fn read_stream<T: FromRow>(&mut self) -> impl Stream<Item = Result<T>> + Send + '_ {
        try_stream! {
            let grid = self.begin::<T>()?;
            {
                let cursor = self
                    .cursor
                    .as_mut()
                    .ok_or(ProtocolError::ReaderDisposed)?;
                let plan = deserializer_for::<T>(&grid, cursor.columns());
                let names = cursor_names(cursor);
                while cursor.advance().await? {
                    let raw = read_raw(cursor)?;
                    yield T::from_row(&plan.materialize(&names, raw))?;
                }
            }
            self.advance_result().await?;
        }
    }

    /// Read the first row; fails when the result is empty.
    pub async fn read_first<T: FromRow>(&mut self) -> Result<T> {
        self.read_row(RowDemand {
            required: true,
            unique: false,
        })
        .await?
        .ok_or_else(|| CardinalityError::NoRows.into())
    }

    pub async fn read_first_or_none<T: FromRow>(&mut self) -> Result<Option<T>> {
        self.read_row(RowDemand {
            required: false,
            unique: false,
        })
        .await
    }

    /// Read exactly one row; fails when the result is empty or has more.
    pub async fn read_single<T: FromRow>(&mut self) -> Result<T> {
        self.read_row(RowDemand {
            required: true,
            unique: true,
        })
        .await?
        .ok_or_else(|| CardinalityError::NoRows.into())
    }

    pub async fn read_single_or_none<T: FromRow>(&mut self) -> Result<Option<T>> {
        self.read_row(RowDemand {
            required: false,
            unique: true,
        })
        .await
    }

    async fn read_row<T: FromRow>(&mut self, demand: RowDemand) -> Result<Option<T>> {
        let grid = self.begin::<T>()?;
        let mut result = None;
        {
            let cursor = match self.cursor.as_mut() {
                Some(cursor) => cursor,
                None => return Err(ProtocolError::ReaderDisposed.into()),
            };
            if cursor.advance().await? && !cursor.columns().is_empty() {
                let plan = deserializer_for::<T>(&grid, cursor.columns());
                let names = cursor_names(cursor);
                let raw = read_raw(cursor)?;
                result = Some(T::from_row(&plan.materialize(&names, raw))?);
                if demand.unique && cursor.advance().await? {
                    return Err(CardinalityError::TooManyRows.into());
                }
                // drain the rest so the cursor sits at the result boundary
                while cursor.advance().await? {}
            } else if demand.required {
                return Err(CardinalityError::NoRows.into());
            }
        }
        self.advance_result().await?;
        Ok(result)
    }

    /// Validate the consumption protocol and mark the current result
    /// consumed, handing back its cache identity.
    fn begin<T: FromRow>(&mut self) -> Result<Identity> {
        if self.cursor.is_none() {
            return Err(ProtocolError::ReaderDisposed.into());
        }
        if self.consumed {
            return Err(ProtocolError::OutOfOrderConsumption.into());
        }
        self.consumed = true;
        Ok(self
            .identity
            .for_result_set(TypeId::of::<T>(), self.result_set_index))
    }

    async fn advance_result(&mut self) -> Result<()> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(());
        };
        if cursor.next_result().await? {
            self.result_set_index += 1;
            self.consumed = false;
        } else {
            self.cursor = None;
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
        Ok(())
    }
}

fn cursor_names<C: RowCursor>(cursor: &C) -> RowNames {
    cursor
        .columns()
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>()
        .into()
}

fn read_raw<C: RowCursor>(cursor: &C) -> Result<Vec<Value>> {
    (0..cursor.columns().len())
        .map(|i| cursor.value(i))
        .collect()
}
