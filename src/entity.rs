use crate::{AsValue, Context, Result, SqlType, Value};
use std::sync::Arc;

/// How (and whether) the database produces a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// The caller always supplies the value.
    NotGenerated,
    /// The database assigns the value on insert (auto increment, sequence).
    Identity,
    /// The database owns the value entirely.
    Computed,
}

/// Static description of one entity field, the unit the schema builder works
/// from. Construct with [`FieldDef::new`] and the `const` builder methods:
///
/// ```
/// use rowhouse::{FieldDef, SqlType};
/// static FIELDS: &[FieldDef] = &[
///     FieldDef::new("id", SqlType::Int32).key(),
///     FieldDef::new("name", SqlType::Text),
/// ];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column_name: Option<&'static str>,
    pub ty: SqlType,
    pub nullable: bool,
    pub max_length: Option<u32>,
    pub key: bool,
    pub generated: Option<Generation>,
    pub readonly: bool,
    pub excluded: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: SqlType) -> Self {
        Self {
            name,
            column_name: None,
            ty,
            nullable: false,
            max_length: None,
            key: false,
            generated: None,
            readonly: false,
            excluded: false,
        }
    }

    /// Store the field under a different column name. Selects alias it back.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = Some(name);
        self
    }

    /// Mark as an explicit primary key member.
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub const fn generated(mut self, generation: Generation) -> Self {
        self.generated = Some(generation);
        self
    }

    /// A field the application never writes; always classified as computed.
    pub const fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Leave the field out of the schema entirely.
    pub const fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }
}

/// Shared reference-counted column label list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column labels.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }

    /// Decode the named column. Exact label match, used by `from_row`
    /// implementations; the deserializer plan has already aligned labels to
    /// the entity's own field names.
    pub fn get<T: AsValue>(&self, name: &str) -> Result<T> {
        let value = self
            .get_column(name)
            .with_context(|| format!("row has no column named '{}'", name))?;
        T::try_from_value(value).with_context(|| format!("while reading column '{}'", name))
    }
}

/// Conversion of one result row into a value of the requested type.
pub trait FromRow: Sized + Send + 'static {
    /// Field list the deserializer should bind cursor columns against.
    /// `None` means dynamic: the row keeps the cursor's own layout.
    fn binding_fields() -> Option<&'static [FieldDef]> {
        None
    }

    fn from_row(row: &RowLabeled) -> Result<Self>;
}

/// Dynamic rows pass through unchanged.
impl FromRow for RowLabeled {
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(row.clone())
    }
}

/// An entity type that maps onto one database table.
///
/// Implementations supply the static field list driving schema derivation,
/// extract the current field values for writes, and rebuild themselves from a
/// labeled row. A typical implementation backs `binding_fields` with the same
/// static slice as `fields`.
pub trait Entity: FromRow {
    /// The bare type name; the default table name is derived from it.
    fn entity_name() -> &'static str;

    /// Explicit table name override.
    fn table_name() -> Option<&'static str> {
        None
    }

    /// Optional schema (namespace) qualifier.
    fn schema_name() -> Option<&'static str> {
        None
    }

    fn fields() -> &'static [FieldDef];

    /// Current field values, keyed by field name, in `fields()` order.
    fn values(&self) -> Vec<(&'static str, Value)>;
}
