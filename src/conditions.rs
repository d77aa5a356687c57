use crate::{ColumnSchema, Value};

/// One field of a conditions value: the field name and its current value.
/// A null value turns into an `IS NULL` predicate instead of a parameter.
#[derive(Debug, Clone)]
pub struct ConditionValue {
    pub name: &'static str,
    pub value: Value,
}

impl ConditionValue {
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// A caller-supplied value whose fields become an equality WHERE clause.
///
/// Field order must be stable across calls for a given type; the resolved
/// column schema is memoized per (conditions type, entity type) pair.
pub trait Conditions: Send + 'static {
    fn condition_values(&self) -> Vec<ConditionValue>;
}

/// No conditions: matches every row.
impl Conditions for () {
    fn condition_values(&self) -> Vec<ConditionValue> {
        Vec::new()
    }
}

/// Pairs one condition field with exactly one resolved column.
#[derive(Debug, Clone)]
pub struct ConditionColumnSchema {
    pub field_name: &'static str,
    pub column: ColumnSchema,
}
