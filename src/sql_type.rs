/// Semantic scalar type of a column, independent of any dialect's spelling.
///
/// Dialects own the mapping from these to concrete column type declarations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    Int16,
    #[default]
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Char,
    Text,
    FixedLengthText,
    Binary,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    Uuid,
}

/// A column type together with its nullability and optional length limit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlTypeEx {
    pub ty: SqlType,
    pub nullable: bool,
    pub max_length: Option<u32>,
}

impl SqlTypeEx {
    pub const fn new(ty: SqlType, nullable: bool) -> Self {
        Self {
            ty,
            nullable,
            max_length: None,
        }
    }

    pub const fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }
}
