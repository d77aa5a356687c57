use super::{Dialect, create_table_columns, insert_core, select_columns};
use crate::{ArgumentError, Page, Result, SqlType, SqlTypeEx, TableSchema, util::append_clause};
use std::fmt::Write;

/// [`Dialect`] implementation for Microsoft SQL Server 2012 and later.
///
/// Identifiers are bracketed, row limiting uses `TOP`, paging uses
/// `OFFSET ... FETCH`, and generated keys come back through a follow-up
/// `SCOPE_IDENTITY()` select batched after the insert.
#[derive(Debug, Default, Clone)]
pub struct SqlServerDialect {
    type_overrides: Vec<(SqlType, &'static str)>,
}

impl SqlServerDialect {
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

    fn bracket(name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        out.push('[');
        for c in name.chars() {
            if c == ']' {
                out.push_str("]]");
            } else {
                out.push(c);
            }
        }
        out.push(']');
        out
    }
}

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "SqlServer2012"
    }

    fn make_column_name(&self, name: &str) -> String {
        Self::bracket(name)
    }

    fn make_table_name(&self, name: &str) -> String {
        Self::bracket(name)
    }

    fn column_type(&self, ty: &SqlTypeEx) -> Option<String> {
        if let Some((_, declaration)) = self.type_overrides.iter().find(|(t, _)| *t == ty.ty) {
            return Some((*declaration).to_owned());
        }
        Some(match ty.ty {
            SqlType::Boolean => "BIT".to_owned(),
            SqlType::Int16 => "SMALLINT".to_owned(),
            SqlType::Int32 => "INT".to_owned(),
            SqlType::Int64 => "BIGINT".to_owned(),
            SqlType::Float32 => "REAL".to_owned(),
            SqlType::Float64 => "FLOAT".to_owned(),
            SqlType::Decimal => "NUMERIC".to_owned(),
            SqlType::Char => "NCHAR(1)".to_owned(),
            SqlType::Text => match ty.max_length {
                Some(length) => format!("NVARCHAR({})", length),
                None => "NVARCHAR(MAX)".to_owned(),
            },
            SqlType::FixedLengthText => match ty.max_length {
                Some(length) => format!("NCHAR({})", length),
                None => "NCHAR(1)".to_owned(),
            },
            SqlType::Binary => match ty.max_length {
                Some(length) => format!("VARBINARY({})", length),
                None => "VARBINARY(MAX)".to_owned(),
            },
            SqlType::Date => "DATE".to_owned(),
            SqlType::Time => "TIME".to_owned(),
            SqlType::Timestamp => "DATETIME2(7)".to_owned(),
            SqlType::TimestampWithTimeZone => "DATETIMEOFFSET".to_owned(),
            SqlType::Uuid => "UNIQUEIDENTIFIER".to_owned(),
        })
    }

    fn make_get_top_n_statement(
        &self,
        schema: &TableSchema,
        take: i64,
        conditions: &str,
        order_by: &str,
    ) -> String {
        let mut sql = String::new();
        let _ = write!(sql, "SELECT TOP {} ", take);
        select_columns(&mut sql, &schema.columns);
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        if !order_by.trim().is_empty() {
            append_clause(&mut sql, "ORDER BY ");
            sql.push_str(order_by);
        }
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
            "\nOFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            page.first_item_index(),
            page.page_size()
        );
        Ok(sql)
    }

    fn make_insert_returning_key_statement(&self, schema: &TableSchema) -> Result<String> {
        let mut sql = String::new();
        insert_core(&mut sql, schema);
        sql.push_str(";\nSELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS [id]");
        Ok(sql)
    }

    fn make_create_temp_table_statement(&self, schema: &TableSchema) -> Result<String> {
        if !schema.name.starts_with("[#") {
            return Err(ArgumentError::new(format!(
                "temporary table names must begin with a #, but was {}",
                schema.name
            ))
            .into());
        }
        if schema.columns.is_empty() {
            return Err(ArgumentError::new("temporary tables must have columns").into());
        }
        let mut sql = String::from("CREATE TABLE ");
        sql.push_str(&schema.name);
        sql.push('\n');
        create_table_columns(self, &mut sql, schema)?;
        sql.push(';');
        Ok(sql)
    }
}
