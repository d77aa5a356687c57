use crate::{
    ArgumentError, Conditions, Dialect, Entity, Page, Params, Result, SchemaError, SchemaFactory,
    SqlCommand, TableSchema, Value,
};
use std::{borrow::Cow, sync::Arc};

/// A primary key value, matched positionally against the schema's primary
/// key columns.
#[derive(Debug, Clone)]
pub enum KeyValue {
    One(Value),
    Composite(Vec<Value>),
}

impl KeyValue {
    fn into_values(self) -> Vec<Value> {
        match self {
            KeyValue::One(value) => vec![value],
            KeyValue::Composite(values) => values,
        }
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        KeyValue::One(value)
    }
}

impl From<Vec<Value>> for KeyValue {
    fn from(values: Vec<Value>) -> Self {
        KeyValue::Composite(values)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for KeyValue {
    fn from((a, b): (A, B)) -> Self {
        KeyValue::Composite(vec![a.into(), b.into()])
    }
}

macro_rules! impl_key_from {
    ($ty:ty) => {
        impl From<$ty> for KeyValue {
            fn from(value: $ty) -> Self {
                KeyValue::One(value.into())
            }
        }
    };
}

impl_key_from!(i16);
impl_key_from!(i32);
impl_key_from!(i64);
impl_key_from!(&str);
impl_key_from!(String);
impl_key_from!(uuid::Uuid);

/// Composes schema, dialect and caller arguments into ready-to-run
/// (SQL text, parameter set) pairs. Pure and cache-backed: never talks to a
/// connection, and the same inputs always produce the same command.
pub struct CommandFactory {
    dialect: Arc<dyn Dialect>,
    schemas: SchemaFactory,
}

impl CommandFactory {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            schemas: SchemaFactory::new(dialect.clone()),
            dialect,
        }
    }

    pub fn with_schema_factory(dialect: Arc<dyn Dialect>, schemas: SchemaFactory) -> Self {
        Self { dialect, schemas }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    pub fn schemas(&self) -> &SchemaFactory {
        &self.schemas
    }

    pub fn make_count_command<E: Entity, C: Conditions>(
        &self,
        conditions: &C,
    ) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let (where_clause, params) = self.where_clause::<E, C>(conditions)?;
        let text = self.dialect.make_count_statement(&schema, &where_clause);
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_find_command<E: Entity>(&self, key: KeyValue) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let text = self.dialect.make_find_statement(&schema)?;
        let params = key_params(&schema, key)?;
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_get_range_command<E: Entity, C: Conditions>(
        &self,
        conditions: &C,
    ) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let (where_clause, params) = self.where_clause::<E, C>(conditions)?;
        let text = self
            .dialect
            .make_get_range_statement(&schema, &where_clause);
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_get_top_n_command<E: Entity, C: Conditions>(
        &self,
        take: i64,
        order_by: &str,
        conditions: &C,
    ) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let (where_clause, params) = self.where_clause::<E, C>(conditions)?;
        let text = self
            .dialect
            .make_get_top_n_statement(&schema, take, &where_clause, order_by);
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_get_page_command<E: Entity, C: Conditions>(
        &self,
        page: &Page,
        order_by: &str,
        conditions: &C,
    ) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let (where_clause, params) = self.where_clause::<E, C>(conditions)?;
        let text = self
            .dialect
            .make_get_page_statement(&schema, page, &where_clause, order_by)?;
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_insert_command<E: Entity>(&self, entity: &E) -> SqlCommand {
        let schema = self.schemas.table_schema::<E>();
        let text = self.dialect.make_insert_statement(&schema);
        let params = entity_params(&schema, entity, |c| c.usage.include_in_insert());
        SqlCommand::with_params(text, params)
    }

    pub fn make_insert_returning_key_command<E: Entity>(&self, entity: &E) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        if !schema.can_generate_primary_key() {
            return Err(SchemaError::CannotGeneratePrimaryKey {
                table: schema.name.clone(),
            }
            .into());
        }
        let text = self.dialect.make_insert_returning_key_statement(&schema)?;
        let params = entity_params(&schema, entity, |c| c.usage.include_in_insert());
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_update_command<E: Entity>(&self, entity: &E) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let text = self.dialect.make_update_statement(&schema)?;
        let params = entity_params(&schema, entity, |c| {
            c.usage.include_in_update() || c.usage.is_primary_key()
        });
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_delete_command<E: Entity>(&self, entity: &E) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let text = self.dialect.make_delete_by_key_statement(&schema)?;
        let params = entity_params(&schema, entity, |c| c.usage.is_primary_key());
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_delete_by_key_command<E: Entity>(&self, key: KeyValue) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let text = self.dialect.make_delete_by_key_statement(&schema)?;
        let params = key_params(&schema, key)?;
        Ok(SqlCommand::with_params(text, params))
    }

    /// Delete the rows matching `conditions`. Refuses an empty condition set;
    /// deleting everything takes the explicit [`make_delete_all_command`].
    ///
    /// [`make_delete_all_command`]: CommandFactory::make_delete_all_command
    pub fn make_delete_range_command<E: Entity, C: Conditions>(
        &self,
        conditions: &C,
    ) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        let (where_clause, params) = self.where_clause::<E, C>(conditions)?;
        if where_clause.is_empty() {
            return Err(ArgumentError::new(
                "delete_range must have a WHERE clause; use delete_all to delete everything",
            )
            .into());
        }
        let text = self
            .dialect
            .make_delete_range_statement(&schema, &where_clause);
        Ok(SqlCommand::with_params(text, params))
    }

    pub fn make_delete_all_command<E: Entity>(&self) -> SqlCommand {
        let schema = self.schemas.table_schema::<E>();
        SqlCommand::new(self.dialect.make_delete_range_statement(&schema, ""))
    }

    pub fn make_create_temp_table_command<E: Entity>(&self) -> Result<SqlCommand> {
        let schema = self.schemas.table_schema::<E>();
        Ok(SqlCommand::new(
            self.dialect.make_create_temp_table_statement(&schema)?,
        ))
    }

    pub fn make_drop_temp_table_command<E: Entity>(&self) -> SqlCommand {
        let schema = self.schemas.table_schema::<E>();
        SqlCommand::new(self.dialect.make_drop_temp_table_statement(&schema))
    }

    /// Resolve `conditions` against `E` and render the WHERE clause together
    /// with the parameters for its non-null values.
    fn where_clause<E: Entity, C: Conditions>(
        &self,
        conditions: &C,
    ) -> Result<(String, Params)> {
        let resolved = self.schemas.conditions_schema::<E, C>(conditions)?;
        let values = conditions.condition_values();
        let clause = self.dialect.make_where_clause(&resolved, &values);
        let params = resolved
            .iter()
            .filter_map(|condition| {
                let value = values.iter().find(|v| v.name == condition.field_name)?;
                if value.value.is_null() {
                    return None;
                }
                Some((
                    Cow::Owned(condition.column.parameter_name.clone()),
                    value.value.clone(),
                ))
            })
            .collect();
        Ok((clause, params))
    }
}

fn key_params(schema: &TableSchema, key: KeyValue) -> Result<Params> {
    let keys = schema.get_primary_keys()?;
    let values = key.into_values();
    if keys.len() != values.len() {
        return Err(ArgumentError::new(format!(
            "table {} has {} primary key columns but {} key values were supplied",
            schema.name,
            keys.len(),
            values.len()
        ))
        .into());
    }
    Ok(keys
        .into_iter()
        .zip(values)
        .map(|(column, value)| (Cow::Owned(column.parameter_name.clone()), value))
        .collect())
}

fn entity_params<E: Entity>(
    schema: &TableSchema,
    entity: &E,
    include: impl Fn(&crate::ColumnSchema) -> bool,
) -> Params {
    entity
        .values()
        .into_iter()
        .filter_map(|(name, value)| {
            let column = schema.columns.iter().find(|c| c.parameter_name == name)?;
            if !include(column) {
                return None;
            }
            Some((Cow::Owned(column.parameter_name.clone()), value))
        })
        .collect()
}
