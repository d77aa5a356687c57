mod postgres;
mod sql_server;

pub use postgres::*;
pub use sql_server::*;

use crate::{
    ColumnSchema, ConditionColumnSchema, ConditionValue, Page, Result, SchemaError, SqlTypeEx,
    TableSchema,
    util::{append_clause, separated_by},
};

/// Strategy producing SQL text for one database product.
///
/// The assembly of every statement (clause ordering, comma and AND joining,
/// aliasing) lives in the default methods and is shared; implementations
/// override only the genuine points of variance: identifier quoting, row
/// limiting, paging, generated-key retrieval, and column type spellings.
///
/// Pure text generation: a dialect never executes anything and holds no
/// mutable state beyond its type mapping table.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Quote/escape a column name for this dialect.
    fn make_column_name(&self, name: &str) -> String;

    /// Quote/escape a table name for this dialect.
    fn make_table_name(&self, name: &str) -> String;

    fn make_qualified_table_name(&self, schema: &str, table_name: &str) -> String {
        let mut out = self.make_table_name(schema);
        out.push('.');
        out.push_str(&self.make_table_name(table_name));
        out
    }

    /// The column type declaration for `ty`, without nullability;
    /// `None` when this dialect has no storage for it.
    fn column_type(&self, ty: &SqlTypeEx) -> Option<String>;

    fn make_count_statement(&self, schema: &TableSchema, conditions: &str) -> String {
        let mut sql = String::from("SELECT COUNT(*)");
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        sql
    }

    fn make_find_statement(&self, schema: &TableSchema) -> Result<String> {
        let mut sql = String::from("SELECT ");
        select_columns(&mut sql, &schema.columns);
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        where_primary_keys(&mut sql, schema)?;
        Ok(sql)
    }

    fn make_get_range_statement(&self, schema: &TableSchema, conditions: &str) -> String {
        let mut sql = String::from("SELECT ");
        select_columns(&mut sql, &schema.columns);
        append_clause(&mut sql, "FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        sql
    }

    /// Select at most `take` rows. An empty `order_by` is tolerated here;
    /// requiring a deterministic order is the calling layer's contract.
    fn make_get_top_n_statement(
        &self,
        schema: &TableSchema,
        take: i64,
        conditions: &str,
        order_by: &str,
    ) -> String;

    /// Select the rows of `page`. Fails when `order_by` is blank: a page
    /// window over an unordered result is meaningless.
    fn make_get_page_statement(
        &self,
        schema: &TableSchema,
        page: &Page,
        conditions: &str,
        order_by: &str,
    ) -> Result<String>;

    fn make_insert_statement(&self, schema: &TableSchema) -> String {
        let mut sql = String::new();
        insert_core(&mut sql, schema);
        sql.push(';');
        sql
    }

    /// As insert, plus the dialect's way of handing back the generated key.
    fn make_insert_returning_key_statement(&self, schema: &TableSchema) -> Result<String>;

    fn make_update_statement(&self, schema: &TableSchema) -> Result<String> {
        let mut sql = String::from("UPDATE ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, "SET ");
        columns_equal_parameters(&mut sql, schema.columns.iter(), ", ", |c| {
            c.usage.include_in_update()
        });
        where_primary_keys(&mut sql, schema)?;
        Ok(sql)
    }

    fn make_delete_by_key_statement(&self, schema: &TableSchema) -> Result<String> {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(&schema.name);
        where_primary_keys(&mut sql, schema)?;
        Ok(sql)
    }

    fn make_delete_range_statement(&self, schema: &TableSchema, conditions: &str) -> String {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(&schema.name);
        append_clause(&mut sql, conditions);
        sql
    }

    /// Equality WHERE clause over resolved condition columns. Empty input
    /// yields the empty string; a null value becomes `IS NULL`.
    fn make_where_clause(
        &self,
        conditions_schema: &[ConditionColumnSchema],
        values: &[ConditionValue],
    ) -> String {
        if conditions_schema.is_empty() {
            return String::new();
        }
        let mut sql = String::from("WHERE ");
        for (i, condition) in conditions_schema.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            let is_null = values
                .iter()
                .find(|v| v.name == condition.field_name)
                .is_none_or(|v| v.value.is_null());
            sql.push_str(&condition.column.column_name);
            if is_null {
                sql.push_str(" IS NULL");
            } else {
                sql.push_str(" = @");
                sql.push_str(&condition.column.parameter_name);
            }
        }
        sql
    }

    /// Full column-typed declaration of an ephemeral table. Fails when the
    /// schema has no columns or a column type has no spelling here.
    fn make_create_temp_table_statement(&self, schema: &TableSchema) -> Result<String>;

    fn make_drop_temp_table_statement(&self, schema: &TableSchema) -> String {
        let mut sql = String::from("DROP TABLE ");
        sql.push_str(&schema.name);
        sql
    }
}

/// Appends the select list: every column, aliased when its storage name
/// differs from its select name.
pub(crate) fn select_columns(out: &mut String, columns: &[ColumnSchema]) {
    separated_by(
        out,
        columns,
        |out, column| {
            out.push_str(&column.column_name);
            if column.is_aliased() {
                out.push_str(" AS ");
                out.push_str(&column.select_name);
            }
        },
        ", ",
    );
}

/// Appends `ColumnName, ColumnName ...` for the columns passing `include`.
pub(crate) fn column_names<'a>(
    out: &mut String,
    columns: impl Iterator<Item = &'a ColumnSchema>,
    include: impl Fn(&ColumnSchema) -> bool,
) {
    separated_by(
        out,
        columns.filter(|c| include(c)),
        |out, column| out.push_str(&column.column_name),
        ", ",
    );
}

/// Appends `@ParameterName, @ParameterName ...` for the columns passing
/// `include`.
pub(crate) fn parameter_names<'a>(
    out: &mut String,
    columns: impl Iterator<Item = &'a ColumnSchema>,
    include: impl Fn(&ColumnSchema) -> bool,
) {
    separated_by(
        out,
        columns.filter(|c| include(c)),
        |out, column| {
            out.push('@');
            out.push_str(&column.parameter_name);
        },
        ", ",
    );
}

/// Appends `ColumnName = @ParameterName` pairs joined by `separator`.
pub(crate) fn columns_equal_parameters<'a>(
    out: &mut String,
    columns: impl Iterator<Item = &'a ColumnSchema>,
    separator: &str,
    include: impl Fn(&ColumnSchema) -> bool,
) {
    separated_by(
        out,
        columns.filter(|c| include(c)),
        |out, column| {
            out.push_str(&column.column_name);
            out.push_str(" = @");
            out.push_str(&column.parameter_name);
        },
        separator,
    );
}

/// Appends a WHERE clause selecting equality of all primary key columns.
pub(crate) fn where_primary_keys(out: &mut String, schema: &TableSchema) -> Result<()> {
    let keys = schema.get_primary_keys()?;
    append_clause(out, "WHERE ");
    columns_equal_parameters(out, keys.into_iter(), " AND ", |_| true);
    Ok(())
}

/// Appends `INSERT INTO <table> (<cols>)\nVALUES (<params>)` without any
/// dialect suffix, over the writable non-generated columns.
pub(crate) fn insert_core(out: &mut String, schema: &TableSchema) {
    let include = |c: &ColumnSchema| c.usage.include_in_insert();
    out.push_str("INSERT INTO ");
    out.push_str(&schema.name);
    out.push_str(" (");
    column_names(out, schema.columns.iter(), include);
    out.push(')');
    append_clause(out, "VALUES (");
    parameter_names(out, schema.columns.iter(), include);
    out.push(')');
}

/// Appends the parenthesized, indented column declaration block of a
/// CREATE TABLE statement.
pub(crate) fn create_table_columns<D: Dialect + ?Sized>(
    dialect: &D,
    out: &mut String,
    schema: &TableSchema,
) -> Result<()> {
    out.push_str("(\n");
    for (i, column) in schema.columns.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str("    ");
        out.push_str(&column.column_name);
        out.push(' ');
        let Some(ty) = dialect.column_type(&column.ty) else {
            return Err(SchemaError::UnsupportedColumnType {
                table: schema.name.clone(),
                column: column.parameter_name.clone(),
                ty: column.ty.ty,
                dialect: dialect.name(),
            }
            .into());
        };
        out.push_str(&ty);
        out.push_str(if column.ty.nullable { " NULL" } else { " NOT NULL" });
    }
    out.push_str("\n)");
    Ok(())
}
