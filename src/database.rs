use crate::{
    ArgumentError, AsValue, CommandFactory, Conditions, Dialect, Entity, Executor, FromRow,
    Identity, KeyValue, Page, PagedList, QueryReader, Result, RowsAffected, SqlCommand,
};
use log::Level;
use std::{any::TypeId, sync::Arc};

/// Thin per-operation facade: assembles a command through the
/// [`CommandFactory`] and delegates execution and materialization.
///
/// All SQL generation and cache lookups are synchronous; the only suspension
/// points are the executor's row-fetch and result-advance calls.
pub struct Database<Ex: Executor> {
    executor: Ex,
    commands: CommandFactory,
}

impl<Ex: Executor> Database<Ex> {
    pub fn new(executor: Ex, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            executor,
            commands: CommandFactory::new(dialect),
        }
    }

    pub fn with_command_factory(executor: Ex, commands: CommandFactory) -> Self {
        Self { executor, commands }
    }

    pub fn commands(&self) -> &CommandFactory {
        &self.commands
    }

    pub fn executor(&mut self) -> &mut Ex {
        &mut self.executor
    }

    pub fn into_executor(self) -> Ex {
        self.executor
    }

    /// Number of rows matching `conditions`.
    pub async fn count<E: Entity, C: Conditions>(&mut self, conditions: &C) -> Result<i64> {
        let command = self.commands.make_count_command::<E, C>(conditions)?;
        log::debug!("count: {}", command);
        let value = self.executor.execute_scalar(&command).await?;
        i64::try_from_value(&value)
    }

    /// The entity with the given primary key, if it exists.
    pub async fn find<E: Entity>(&mut self, key: impl Into<KeyValue>) -> Result<Option<E>> {
        let command = self.commands.make_find_command::<E>(key.into())?;
        self.open_reader::<E, KeyValue>(command)
            .await?
            .read_first_or_none()
            .await
    }

    /// The entity with the given primary key; fails when there is none.
    pub async fn get<E: Entity>(&mut self, key: impl Into<KeyValue>) -> Result<E> {
        let command = self.commands.make_find_command::<E>(key.into())?;
        self.open_reader::<E, KeyValue>(command)
            .await?
            .read_first()
            .await
    }

    /// The first entity matching `conditions` under `order_by`, if any.
    /// The ordering is mandatory: "first" is meaningless without one.
    pub async fn get_first_or_none<E: Entity, C: Conditions>(
        &mut self,
        order_by: &str,
        conditions: &C,
    ) -> Result<Option<E>> {
        require_order_by(order_by)?;
        let command = self
            .commands
            .make_get_top_n_command::<E, C>(1, order_by, conditions)?;
        self.open_reader::<E, C>(command)
            .await?
            .read_first_or_none()
            .await
    }

    /// The first entity matching `conditions` under `order_by`; fails when
    /// nothing matches.
    pub async fn get_first<E: Entity, C: Conditions>(
        &mut self,
        order_by: &str,
        conditions: &C,
    ) -> Result<E> {
        require_order_by(order_by)?;
        let command = self
            .commands
            .make_get_top_n_command::<E, C>(1, order_by, conditions)?;
        self.open_reader::<E, C>(command).await?.read_first().await
    }

    /// The only entity matching `conditions`, if any; fails when more than
    /// one matches.
    pub async fn get_single_or_none<E: Entity, C: Conditions>(
        &mut self,
        conditions: &C,
    ) -> Result<Option<E>> {
        let command = self.commands.make_get_range_command::<E, C>(conditions)?;
        self.open_reader::<E, C>(command)
            .await?
            .read_single_or_none()
            .await
    }

    /// The exactly-one entity matching `conditions`.
    pub async fn get_single<E: Entity, C: Conditions>(&mut self, conditions: &C) -> Result<E> {
        let command = self.commands.make_get_range_command::<E, C>(conditions)?;
        self.open_reader::<E, C>(command).await?.read_single().await
    }

    /// All entities matching `conditions`.
    pub async fn get_range<E: Entity, C: Conditions>(&mut self, conditions: &C) -> Result<Vec<E>> {
        let command = self.commands.make_get_range_command::<E, C>(conditions)?;
        self.open_reader::<E, C>(command).await?.read().await
    }

    /// At most `take` entities matching `conditions`, ordered by `order_by`
    /// when given.
    pub async fn get_top_n<E: Entity, C: Conditions>(
        &mut self,
        take: i64,
        order_by: &str,
        conditions: &C,
    ) -> Result<Vec<E>> {
        let command = self
            .commands
            .make_get_top_n_command::<E, C>(take, order_by, conditions)?;
        self.open_reader::<E, C>(command).await?.read().await
    }

    /// Every row of the table.
    pub async fn get_all<E: Entity>(&mut self) -> Result<Vec<E>> {
        self.get_range::<E, ()>(&()).await
    }

    /// One page of the entities matching `conditions`, with the total count.
    ///
    /// Runs the count query first; when the requested window lies beyond the
    /// total the items query is skipped entirely and an empty page comes
    /// back carrying the already-known count.
    pub async fn get_page<E: Entity, C: Conditions>(
        &mut self,
        page_number: i64,
        page_size: i64,
        order_by: &str,
        conditions: &C,
    ) -> Result<PagedList<E>> {
        let total_count = self.count::<E, C>(conditions).await?;
        let page = Page::compute(total_count, page_number, page_size)?;
        if page.is_empty() {
            return Ok(PagedList::empty(total_count, page));
        }
        let command = self
            .commands
            .make_get_page_command::<E, C>(&page, order_by, conditions)?;
        let items = self.open_reader::<E, C>(command).await?.read().await?;
        Ok(PagedList::new(items, total_count, page))
    }

    /// Insert one entity, verifying exactly one row was affected.
    pub async fn insert<E: Entity>(&mut self, entity: &E) -> Result<()> {
        let command = self.commands.make_insert_command::<E>(entity);
        let affected = self.execute(command).await?;
        verify_affected(affected, 1)
    }

    /// Insert one entity and return the database-generated primary key.
    pub async fn insert_returning_key<E: Entity>(&mut self, entity: &E) -> Result<i64> {
        let command = self.commands.make_insert_returning_key_command::<E>(entity)?;
        log::debug!("insert_returning_key: {}", command);
        let value = self.executor.execute_scalar(&command).await?;
        i64::try_from_value(&value)
    }

    /// Insert each entity in turn, without per-row verification. Returns the
    /// total number of rows affected.
    pub async fn insert_many<'a, E, It>(&mut self, entities: It) -> Result<u64>
    where
        E: Entity + 'a,
        It: IntoIterator<Item = &'a E>,
    {
        let mut total = 0;
        for entity in entities {
            let command = self.commands.make_insert_command::<E>(entity);
            total += self.execute(command).await?.rows_affected;
        }
        Ok(total)
    }

    /// Update the row with `entity`'s primary key, verifying exactly one row
    /// was affected.
    pub async fn update<E: Entity>(&mut self, entity: &E) -> Result<()> {
        let command = self.commands.make_update_command::<E>(entity)?;
        let affected = self.execute(command).await?;
        verify_affected(affected, 1)
    }

    /// Delete the row with `entity`'s primary key.
    pub async fn delete<E: Entity>(&mut self, entity: &E) -> Result<()> {
        let command = self.commands.make_delete_command::<E>(entity)?;
        let affected = self.execute(command).await?;
        verify_affected(affected, 1)
    }

    /// Delete the row with the given primary key.
    pub async fn delete_by_key<E: Entity>(&mut self, key: impl Into<KeyValue>) -> Result<()> {
        let command = self.commands.make_delete_by_key_command::<E>(key.into())?;
        let affected = self.execute(command).await?;
        verify_affected(affected, 1)
    }

    /// Delete the rows matching `conditions`; refuses an empty condition
    /// set. Returns the number of rows deleted.
    pub async fn delete_range<E: Entity, C: Conditions>(&mut self, conditions: &C) -> Result<u64> {
        let command = self.commands.make_delete_range_command::<E, C>(conditions)?;
        Ok(self.execute(command).await?.rows_affected)
    }

    /// Delete every row of the table. Returns the number of rows deleted.
    pub async fn delete_all<E: Entity>(&mut self) -> Result<u64> {
        let command = self.commands.make_delete_all_command::<E>();
        Ok(self.execute(command).await?.rows_affected)
    }

    pub async fn create_temp_table<E: Entity>(&mut self) -> Result<()> {
        let command = self.commands.make_create_temp_table_command::<E>()?;
        self.execute(command).await?;
        Ok(())
    }

    pub async fn drop_temp_table<E: Entity>(&mut self) -> Result<()> {
        let command = self.commands.make_drop_temp_table_command::<E>();
        self.execute(command).await?;
        Ok(())
    }

    /// Run an arbitrary statement and materialize its first result set.
    pub async fn query<T: FromRow>(&mut self, command: impl Into<SqlCommand>) -> Result<Vec<T>> {
        self.query_multiple(command).await?.read().await
    }

    /// Run a (possibly batched) statement and hand back the sequential
    /// reader over its result sets.
    pub async fn query_multiple(
        &mut self,
        command: impl Into<SqlCommand>,
    ) -> Result<QueryReader<Ex::Cursor>> {
        self.open_reader::<crate::RowLabeled, ()>(command.into())
            .await
    }

    async fn open_reader<T: FromRow, P: 'static>(
        &mut self,
        command: SqlCommand,
    ) -> Result<QueryReader<Ex::Cursor>> {
        log::debug!("query: {}", command);
        let cursor = self.executor.open_cursor(&command).await?;
        let identity = Identity::new(
            &command.text,
            command.kind,
            TypeId::of::<T>(),
            TypeId::of::<P>(),
            self.executor.connection_id(),
        );
        Ok(QueryReader::new(cursor, identity))
    }

    async fn execute(&mut self, command: SqlCommand) -> Result<RowsAffected> {
        log::debug!("execute: {}", command);
        self.executor.execute(&command).await
    }
}

fn require_order_by(order_by: &str) -> Result<()> {
    if order_by.trim().is_empty() {
        return Err(ArgumentError::new("order_by cannot be empty").into());
    }
    Ok(())
}

fn verify_affected(affected: RowsAffected, expected: u64) -> Result<()> {
    if let Err(error) = affected.expecting(expected) {
        log::log!(
            if affected.rows_affected == 0 {
                Level::Info
            } else {
                Level::Error
            },
            "{}",
            error
        );
        return Err(error.into());
    }
    Ok(())
}
