use crate::CommandKind;
use std::{
    any::TypeId,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

/// Identity of a cached query: the key under which a deserializer plan is
/// stored. Two identities are equal iff every field compares equal; the
/// structural hash is precomputed once because identities are built on every
/// query execution and always end up in a map.
#[derive(Debug, Clone)]
pub struct Identity {
    sql: Arc<str>,
    kind: CommandKind,
    result_type: TypeId,
    parameters_type: TypeId,
    connection_id: Arc<str>,
    result_set_index: usize,
    hash: u64,
}

impl Identity {
    pub fn new(
        sql: &str,
        kind: CommandKind,
        result_type: TypeId,
        parameters_type: TypeId,
        connection_id: &str,
    ) -> Self {
        Self::build(
            Arc::from(sql),
            kind,
            result_type,
            parameters_type,
            Arc::from(connection_id),
            0,
        )
    }

    /// Derive the identity of one result set within a multi-result batch,
    /// materialized as `result_type`.
    pub fn for_result_set(&self, result_type: TypeId, result_set_index: usize) -> Self {
        Self::build(
            self.sql.clone(),
            self.kind,
            result_type,
            self.parameters_type,
            self.connection_id.clone(),
            result_set_index,
        )
    }

    fn build(
        sql: Arc<str>,
        kind: CommandKind,
        result_type: TypeId,
        parameters_type: TypeId,
        connection_id: Arc<str>,
        result_set_index: usize,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        sql.hash(&mut hasher);
        kind.hash(&mut hasher);
        result_type.hash(&mut hasher);
        parameters_type.hash(&mut hasher);
        connection_id.hash(&mut hasher);
        result_set_index.hash(&mut hasher);
        Self {
            sql,
            kind,
            result_type,
            parameters_type,
            connection_id,
            result_set_index,
            hash: hasher.finish(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn result_set_index(&self) -> usize {
        self.result_set_index
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.result_set_index == other.result_set_index
            && self.result_type == other.result_type
            && self.parameters_type == other.parameters_type
            && self.kind == other.kind
            && self.sql == other.sql
            && self.connection_id == other.connection_id
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
