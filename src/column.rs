use crate::SqlTypeEx;

/// How a column participates in generated statements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColumnUsage {
    /// Ordinary writable column.
    #[default]
    Column,
    /// Primary key whose value the caller supplies on insert.
    NotGeneratedPrimaryKey,
    /// Primary key produced by the database (identity or computed).
    ComputedPrimaryKey,
    /// Database-generated column: never inserted, still updatable.
    GeneratedColumn,
    /// Database-computed column: never written at all.
    ComputedColumn,
}

impl ColumnUsage {
    pub fn is_primary_key(self) -> bool {
        matches!(
            self,
            ColumnUsage::NotGeneratedPrimaryKey | ColumnUsage::ComputedPrimaryKey
        )
    }

    pub fn include_in_insert(self) -> bool {
        matches!(self, ColumnUsage::Column | ColumnUsage::NotGeneratedPrimaryKey)
    }

    pub fn include_in_update(self) -> bool {
        matches!(self, ColumnUsage::Column | ColumnUsage::GeneratedColumn)
    }
}

/// One column of a derived table schema.
///
/// `column_name` and `select_name` are stored pre-quoted by the dialect that
/// built the schema; `parameter_name` is the raw field name embedded in
/// `@name` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub column_name: String,
    pub select_name: String,
    pub parameter_name: String,
    pub usage: ColumnUsage,
    pub ty: SqlTypeEx,
}

impl ColumnSchema {
    /// Whether a select list needs an `AS` alias for this column.
    pub fn is_aliased(&self) -> bool {
        self.column_name != self.select_name
    }
}
