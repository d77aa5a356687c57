use super::{Dialect, create_table_columns, insert_core, select_columns};
use crate::{ArgumentError, Page, Result, SqlType, SqlTypeEx, TableSchema, util::append_clause};
use std::fmt::Write;

/// [`Dialect`] implementation for PostgreSQL.
///
/// PostgreSQL folds unquoted identifiers to lower case, which round-trips
/// fine through the case-insensitive matching of the materialization layer,
/// so identifiers are emitted verbatim.
#[derive(Debug, Default, Clone)]
pub struct PostgresDialect {
    type_overrides: Vec<(SqlType, &'static str)>,
}

impl PostgresDialect {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this dialect spelling `ty` as `declaration` in column
    /// definitions. Registration builds a new dialect rather than mutating a
    /// shared table.
    pub fn with_column_type(mut self, ty: SqlType, declaration: &'static str) -> Self {
        self.type_overrides.retain(|(t, _)| *t != ty);
        self.type_overrides.push((ty, declaration));
        self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "PostgreSql"
    }

    fn make_column_name(&self, name: &str) -> String {
        name.to_owned()
    }

    fn make_table_name(&self, name: &str) -> String {
        name.to_owned()
    }

    fn column_type(&self, ty: &SqlTypeEx) -> Option<String> {
        if let Some((_, declaration)) = self.type_overrides.iter().find(|(t, _)| *t == ty.ty) {
            return Some((*declaration).to_owned());
        }
        Some(
            match ty.ty {
                SqlType::Boolean => "BOOL",
                SqlType::Int16 => "SMALLINT",
                SqlType::Int32 => "INT",
                SqlType::Int64 => "BIGINT",
                SqlType::Float32 => "REAL",
                SqlType::Float64 => "DOUBLE PRECISION",
                SqlType::Decimal => "NUMERIC",
                SqlType::Char | SqlType::Text | SqlType::FixedLengthText => "TEXT",
                SqlType::Binary => "BYTEA",
                SqlType::Date => "DATE",
                SqlType::Time => "TIME",
                SqlType::Timestamp => "TIMESTAMP",
                SqlType::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
                SqlType::Uuid => "UUID",
            }
            .to_owned(),
        )
    }

    fn make_get_top_n_statement(
        &self,
        schema: &TableSchema,
        take: i64,
        conditions: &str,
        order_by: &str,
    ) -> String {
        let mut sql = String::from("SELECT ");
        select_columns(&mut sql, &schema.columns);
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        if !order_by.trim().is_empty() {
            append_clause(&mut sql, "ORDER BY ");
            sql.push_str(order_by);
        }
        let _ = write!(sql, "\nLIMIT {}", take);
        sql
    }

    fn make_get_page_statement(
        &self,
        schema: &TableSchema,
        page: &Page,
        conditions: &str,
        order_by: &str,
    ) -> Result<String> {
        if order_by.trim().is_empty() {
            return Err(ArgumentError::new("order_by cannot be empty").into());
        }
        let mut sql = String::from("SELECT ");
        select_columns(&mut sql, &schema.columns);
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        append_clause(&mut sql, "ORDER BY ");
        sql.push_str(order_by);
        let _ = write!(
            sql,
            "\nLIMIT {} OFFSET {}",
            page.page_size(),
            page.first_item_index()
        );
        Ok(sql)
    }

    fn make_insert_returning_key_statement(&self, schema: &TableSchema) -> Result<String> {
        let keys: Vec<_> = schema.get_primary_keys()?.into_iter().cloned().collect();
        let mut sql = String::new();
        insert_core(&mut sql, schema);
        append_clause(&mut sql, "RETURNING ");
        select_columns(&mut sql, &keys);
        Ok(sql)
    }

    fn make_create_temp_table_statement(&self, schema: &TableSchema) -> Result<String> {
        if schema.columns.is_empty() {
            return Err(ArgumentError::new("temporary tables must have columns").into());
        }
        let mut sql = String::from("CREATE TEMP TABLE ");
        sql.push_str(&schema.name);
        sql.push('\n');
        create_table_columns(self, &mut sql, schema)?;
        Ok(sql)
    }
}
