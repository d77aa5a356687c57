use crate::{
    ColumnSchema, ColumnUsage, ConditionColumnSchema, ConditionValue, Conditions, Dialect, Entity,
    FieldDef, Generation, Link, Result, SchemaError, SqlTypeEx, TableSchema,
};
use std::{any::TypeId, sync::Arc};

/// Defines how to get a table name from an entity's type name. The result is
/// a logical name; the dialect quotes it afterwards.
pub trait TableNameConvention: Send + Sync {
    fn table_name(&self, entity_name: &str) -> String;
}

/// Uses the entity type name verbatim.
pub struct DefaultTableNameConvention;

impl TableNameConvention for DefaultTableNameConvention {
    fn table_name(&self, entity_name: &str) -> String {
        entity_name.to_owned()
    }
}

/// Defines how to get a column name from a field definition.
pub trait ColumnNameConvention: Send + Sync {
    fn column_name(&self, field: &FieldDef) -> String;
}

/// Uses the field's explicit column override, falling back to its name.
pub struct DefaultColumnNameConvention;

impl ColumnNameConvention for DefaultColumnNameConvention {
    fn column_name(&self, field: &FieldDef) -> String {
        field.column_name.unwrap_or(field.name).to_owned()
    }
}

/// Derives [`TableSchema`]s from entity descriptions and resolves condition
/// shapes onto them, memoizing both per type so repeated calls hand back the
/// same immutable schema.
pub struct SchemaFactory {
    dialect: Arc<dyn Dialect>,
    table_names: Box<dyn TableNameConvention>,
    column_names: Box<dyn ColumnNameConvention>,
    schemas: Link<TypeId, Arc<TableSchema>>,
    condition_schemas: Link<(TypeId, TypeId), Arc<[ConditionColumnSchema]>>,
}

impl SchemaFactory {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            table_names: Box::new(DefaultTableNameConvention),
            column_names: Box::new(DefaultColumnNameConvention),
            schemas: Link::new(),
            condition_schemas: Link::new(),
        }
    }

    /// A new factory generating table names with `convention`. The schema
    /// caches start empty; schemas built by the old factory keep their names.
    pub fn with_table_names(self, convention: impl TableNameConvention + 'static) -> Self {
        Self {
            dialect: self.dialect,
            table_names: Box::new(convention),
            column_names: self.column_names,
            schemas: Link::new(),
            condition_schemas: Link::new(),
        }
    }

    /// A new factory generating column names with `convention`.
    pub fn with_column_names(self, convention: impl ColumnNameConvention + 'static) -> Self {
        Self {
            dialect: self.dialect,
            table_names: self.table_names,
            column_names: Box::new(convention),
            schemas: Link::new(),
            condition_schemas: Link::new(),
        }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    /// The memoized schema for `E`; the same `Arc` on every call.
    pub fn table_schema<E: Entity>(&self) -> Arc<TableSchema> {
        let key = TypeId::of::<E>();
        if let Some(schema) = self.schemas.get(key) {
            return schema;
        }
        self.schemas.insert(key, Arc::new(self.make_table_schema::<E>()))
    }

    /// The memoized condition column resolution for shape `C` against `E`.
    pub fn conditions_schema<E: Entity, C: Conditions>(
        &self,
        conditions: &C,
    ) -> Result<Arc<[ConditionColumnSchema]>> {
        let key = (TypeId::of::<C>(), TypeId::of::<E>());
        if let Some(resolved) = self.condition_schemas.get(key) {
            return Ok(resolved);
        }
        let table = self.table_schema::<E>();
        let resolved = Self::make_conditions_schema(&table, &conditions.condition_values())?;
        Ok(self.condition_schemas.insert(key, resolved.into()))
    }

    /// Build the schema for `E` without touching the cache.
    pub fn make_table_schema<E: Entity>(&self) -> TableSchema {
        let logical_name = match E::table_name() {
            Some(name) => name.to_owned(),
            None => self.table_names.table_name(E::entity_name()),
        };
        let name = match E::schema_name() {
            Some(schema) => self
                .dialect
                .make_qualified_table_name(schema, &logical_name),
            None => self.dialect.make_table_name(&logical_name),
        };

        let fields: Vec<&FieldDef> = E::fields().iter().filter(|f| !f.excluded).collect();
        let explicit_key = fields.iter().any(|f| f.key);
        let columns = fields
            .iter()
            .map(|field| self.make_column_schema(field, column_usage(explicit_key, field)))
            .collect();
        TableSchema::new(name, columns)
    }

    fn make_column_schema(&self, field: &FieldDef, usage: ColumnUsage) -> ColumnSchema {
        ColumnSchema {
            column_name: self
                .dialect
                .make_column_name(&self.column_names.column_name(field)),
            select_name: self.dialect.make_column_name(field.name),
            parameter_name: field.name.to_owned(),
            usage,
            ty: SqlTypeEx {
                ty: field.ty,
                nullable: field.nullable,
                max_length: field.max_length,
            },
        }
    }

    fn make_conditions_schema(
        table: &TableSchema,
        values: &[ConditionValue],
    ) -> Result<Vec<ConditionColumnSchema>> {
        values
            .iter()
            .map(|value| Self::make_condition_schema(table, value.name))
            .collect()
    }

    /// Resolve one condition field to exactly one column: case-insensitive
    /// match first, narrowed to exact case only to break ambiguity.
    fn make_condition_schema(
        table: &TableSchema,
        field_name: &'static str,
    ) -> Result<ConditionColumnSchema> {
        let mut candidates: Vec<&ColumnSchema> = table
            .columns
            .iter()
            .filter(|c| c.parameter_name.eq_ignore_ascii_case(field_name))
            .collect();
        if candidates.len() > 1 {
            candidates.retain(|c| c.parameter_name == field_name);
            if candidates.len() > 1 {
                return Err(SchemaError::AmbiguousConditionField {
                    field: field_name.to_owned(),
                    table: table.name.clone(),
                }
                .into());
            }
        }
        let Some(column) = candidates.first() else {
            return Err(SchemaError::UnknownConditionField {
                field: field_name.to_owned(),
                table: table.name.clone(),
            }
            .into());
        };
        Ok(ConditionColumnSchema {
            field_name,
            column: (*column).clone(),
        })
    }
}

/// Classify a field into its column role.
///
/// When any field carries an explicit key marker, only marked fields qualify
/// as keys; otherwise a field named "id" (case-insensitive) is the inferred
/// sole key. A non-writable field is always computed. A writable key with no
/// generation marker is assumed database-generated.
fn column_usage(explicit_key: bool, field: &FieldDef) -> ColumnUsage {
    let is_key = if explicit_key {
        field.key
    } else {
        field.name.eq_ignore_ascii_case("id")
    };
    if field.readonly {
        return if is_key {
            ColumnUsage::ComputedPrimaryKey
        } else {
            ColumnUsage::ComputedColumn
        };
    }
    match (is_key, field.generated) {
        (true, None) => ColumnUsage::ComputedPrimaryKey,
        (true, Some(Generation::NotGenerated)) => ColumnUsage::NotGeneratedPrimaryKey,
        (true, Some(Generation::Identity | Generation::Computed)) => {
            ColumnUsage::ComputedPrimaryKey
        }
        (false, None | Some(Generation::NotGenerated)) => ColumnUsage::Column,
        (false, Some(Generation::Identity)) => ColumnUsage::GeneratedColumn,
        (false, Some(Generation::Computed)) => ColumnUsage::ComputedColumn,
    }
}
