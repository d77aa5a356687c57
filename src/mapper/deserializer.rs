use crate::{ColumnInfo, FieldDef, FromRow, Identity, RowLabeled, RowNames, Value};
use dashmap::DashMap;
use std::{
    hash::{DefaultHasher, Hash, Hasher},
    sync::{Arc, LazyLock},
};

/// Process-wide plan cache. Entries are replaced wholesale when a query's
/// live column layout stops matching the one the plan was built from; they
/// are never mutated in place.
static QUERY_CACHE: LazyLock<DashMap<Identity, DeserializerEntry>> = LazyLock::new(DashMap::new);

#[derive(Clone)]
struct DeserializerEntry {
    layout_hash: u64,
    plan: Arc<DeserializerPlan>,
}

/// A cached recipe for turning one cursor row into a labeled row of the
/// requested type's layout.
///
/// For a typed target the plan binds each target field to a cursor ordinal
/// once, so per-row work is a value shuffle. A dynamic target has no binding:
/// rows keep the cursor's own layout.
#[derive(Debug)]
pub struct DeserializerPlan {
    /// Target labels (field names); `None` for dynamic passthrough.
    labels: Option<RowNames>,
    /// Target field index -> cursor ordinal; unmatched fields read as NULL.
    bindings: Box<[Option<usize>]>,
}

impl DeserializerPlan {
    /// Rearrange one raw cursor row into the target layout.
    pub fn materialize(&self, cursor_labels: &RowNames, mut raw: Vec<Value>) -> RowLabeled {
        match &self.labels {
            Some(labels) => {
                let values = self
                    .bindings
                    .iter()
                    .map(|slot| match slot {
                        Some(ordinal) => std::mem::take(&mut raw[*ordinal]),
                        None => Value::Null,
                    })
                    .collect();
                RowLabeled::new(labels.clone(), values)
            }
            None => RowLabeled::new(cursor_labels.clone(), raw.into_boxed_slice()),
        }
    }
}

/// Structural hash of an actual returned column set (names and declared
/// types). Statement text alone is not a safe cache key across heterogeneous
/// result shapes; this re-validates cheaply on every execution.
pub fn column_layout_hash(columns: &[ColumnInfo]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_usize(columns.len());
    for column in columns {
        column.name.hash(&mut hasher);
        column.ty.hash(&mut hasher);
    }
    hasher.finish()
}

/// Fetch the plan for `identity`, building and caching one if there is no
/// plan yet or the cached plan was built against a different column layout.
pub fn deserializer_for<T: FromRow>(
    identity: &Identity,
    columns: &[ColumnInfo],
) -> Arc<DeserializerPlan> {
    let layout_hash = column_layout_hash(columns);
    if let Some(entry) = QUERY_CACHE.get(identity) {
        if entry.layout_hash == layout_hash {
            return entry.plan.clone();
        }
    }
    let plan = Arc::new(build_plan::<T>(columns));
    QUERY_CACHE.insert(
        identity.clone(),
        DeserializerEntry {
            layout_hash,
            plan: plan.clone(),
        },
    );
    plan
}

fn build_plan<T: FromRow>(columns: &[ColumnInfo]) -> DeserializerPlan {
    let Some(fields) = T::binding_fields() else {
        return DeserializerPlan {
            labels: None,
            bindings: Box::new([]),
        };
    };
    let fields: Vec<&FieldDef> = fields.iter().filter(|f| !f.excluded).collect();
    let labels: RowNames = fields
        .iter()
        .map(|f| f.name.to_owned())
        .collect::<Vec<_>>()
        .into();
    let bindings = fields
        .iter()
        .map(|field| find_ordinal(columns, field.name))
        .collect();
    DeserializerPlan {
        labels: Some(labels),
        bindings,
    }
}

/// Bind one target field to a cursor column: exact name match first, then
/// case-insensitive, then both again with underscores stripped from the
/// column name (so `user_id` still lands on a `UserId` field).
fn find_ordinal(columns: &[ColumnInfo], field: &str) -> Option<usize> {
    let position = |matches: &dyn Fn(&str) -> bool| columns.iter().position(|c| matches(&c.name));
    position(&|name| name == field)
        .or_else(|| position(&|name| name.eq_ignore_ascii_case(field)))
        .or_else(|| position(&|name| name.replace('_', "") == field))
        .or_else(|| position(&|name| name.replace('_', "").eq_ignore_ascii_case(field)))
}
