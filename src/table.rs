use crate::{ColumnSchema, Result, SchemaError, SqlType};

/// A table as derived from an entity description: its dialect-quoted name and
/// ordered column set. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: String, columns: Vec<ColumnSchema>) -> Self {
        Self { name, columns }
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.usage.is_primary_key())
    }

    /// The primary key columns, or an [`SchemaError::InvalidPrimaryKey`] when
    /// the entity has none and a key-requiring operation was asked for.
    pub fn get_primary_keys(&self) -> Result<Vec<&ColumnSchema>> {
        let keys: Vec<_> = self.primary_keys().collect();
        if keys.is_empty() {
            return Err(SchemaError::InvalidPrimaryKey {
                table: self.name.clone(),
            }
            .into());
        }
        Ok(keys)
    }

    /// Whether the database can hand back a generated key for this table:
    /// a single primary key column of integer type.
    pub fn can_generate_primary_key(&self) -> bool {
        let mut keys = self.primary_keys();
        match (keys.next(), keys.next()) {
            (Some(key), None) => matches!(key.ty.ty, SqlType::Int32 | SqlType::Int64),
            _ => false,
        }
    }
}
