#![allow(dead_code)]

use rowhouse::{
    ColumnInfo, ConditionValue, Conditions, Entity, Executor, FieldDef, FromRow, Generation,
    Result, RowCursor, RowLabeled, RowsAffected, SqlCommand, SqlType, Value,
};
use std::collections::VecDeque;

/// Call at the top of a test to see the facade's statement logging.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

static USER_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32),
    FieldDef::new("Name", SqlType::Text),
    FieldDef::new("Age", SqlType::Int32),
];

impl FromRow for User {
    fn binding_fields() -> Option<&'static [FieldDef]> {
        Some(USER_FIELDS)
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.get("Id")?,
            name: row.get("Name")?,
            age: row.get("Age")?,
        })
    }
}

impl Entity for User {
    fn entity_name() -> &'static str {
        "User"
    }
    fn table_name() -> Option<&'static str> {
        Some("Users")
    }
    fn fields() -> &'static [FieldDef] {
        USER_FIELDS
    }
    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("Id", self.id.into()),
            ("Name", self.name.clone().into()),
            ("Age", self.age.into()),
        ]
    }
}

pub struct NameCondition {
    pub name: Option<String>,
}

impl Conditions for NameCondition {
    fn condition_values(&self) -> Vec<ConditionValue> {
        vec![ConditionValue::new("Name", self.name.clone())]
    }
}

pub struct NameAgeCondition {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl Conditions for NameAgeCondition {
    fn condition_values(&self) -> Vec<ConditionValue> {
        vec![
            ConditionValue::new("Name", self.name.clone()),
            ConditionValue::new("Age", self.age),
        ]
    }
}

macro_rules! simple_entity {
    ($name:ident, $fields:ident) => {
        impl FromRow for $name {
            fn binding_fields() -> Option<&'static [FieldDef]> {
                Some($fields)
            }
            fn from_row(_row: &RowLabeled) -> Result<Self> {
                unimplemented!("only used for statement generation")
            }
        }
        impl Entity for $name {
            fn entity_name() -> &'static str {
                stringify!($name)
            }
            fn fields() -> &'static [FieldDef] {
                $fields
            }
            fn values(&self) -> Vec<(&'static str, Value)> {
                Vec::new()
            }
        }
    };
}

/// Explicitly marked key under a non-default name.
pub struct KeyExplicit;
static KEY_EXPLICIT_FIELDS: &[FieldDef] = &[
    FieldDef::new("Key", SqlType::Int32).key(),
    FieldDef::new("Name", SqlType::Text),
];
simple_entity!(KeyExplicit, KEY_EXPLICIT_FIELDS);

/// Key the caller supplies on insert.
pub struct KeyNotGenerated;
static KEY_NOT_GENERATED_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32)
        .key()
        .generated(Generation::NotGenerated),
    FieldDef::new("Name", SqlType::Text),
];
simple_entity!(KeyNotGenerated, KEY_NOT_GENERATED_FIELDS);

pub struct CompositeKeys;
static COMPOSITE_KEYS_FIELDS: &[FieldDef] = &[
    FieldDef::new("Key1", SqlType::Int32).key(),
    FieldDef::new("Key2", SqlType::Int32).key(),
    FieldDef::new("Name", SqlType::Text),
];
simple_entity!(CompositeKeys, COMPOSITE_KEYS_FIELDS);

/// Inferred key stored under an aliased column name.
pub struct KeyAlias;
static KEY_ALIAS_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32).column("Key"),
    FieldDef::new("Name", SqlType::Text),
];
simple_entity!(KeyAlias, KEY_ALIAS_FIELDS);

/// Ordinary column stored under an aliased name.
pub struct PropertyAlias;
static PROPERTY_ALIAS_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32),
    FieldDef::new("Age", SqlType::Int32).column("YearsOld"),
];
simple_entity!(PropertyAlias, PROPERTY_ALIAS_FIELDS);

pub struct PropertyComputed;
static PROPERTY_COMPUTED_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32),
    FieldDef::new("Name", SqlType::Text),
    FieldDef::new("LastUpdated", SqlType::Timestamp).readonly(),
];
simple_entity!(PropertyComputed, PROPERTY_COMPUTED_FIELDS);

pub struct PropertyGenerated;
static PROPERTY_GENERATED_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32),
    FieldDef::new("Name", SqlType::Text),
    FieldDef::new("Created", SqlType::Timestamp).generated(Generation::Identity),
];
simple_entity!(PropertyGenerated, PROPERTY_GENERATED_FIELDS);

pub struct NoColumns;
static NO_COLUMNS_FIELDS: &[FieldDef] = &[];
simple_entity!(NoColumns, NO_COLUMNS_FIELDS);

/// Keyless entity for invalid-primary-key paths.
pub struct NoKey;
static NO_KEY_FIELDS: &[FieldDef] = &[FieldDef::new("Name", SqlType::Text)];
simple_entity!(NoKey, NO_KEY_FIELDS);

/// Representative type spread for ephemeral table declarations.
pub struct TempUser;
static TEMP_USER_FIELDS: &[FieldDef] = &[
    FieldDef::new("Id", SqlType::Int32),
    FieldDef::new("Name", SqlType::Text).max_length(50),
    FieldDef::new("Notes", SqlType::Text).nullable(),
    FieldDef::new("Balance", SqlType::Decimal),
    FieldDef::new("Active", SqlType::Boolean),
    FieldDef::new("Reference", SqlType::Uuid).nullable(),
    FieldDef::new("Created", SqlType::Timestamp),
];
simple_entity!(TempUser, TEMP_USER_FIELDS);

#[derive(Debug, Clone)]
pub struct FakeResultSet {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<Value>>,
}

impl FakeResultSet {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// A single-result-set layout of users with the given (id, name, age)
    /// triples.
    pub fn users(rows: &[(i32, &str, i32)]) -> Self {
        Self::new(
            vec![
                ColumnInfo::new("Id", SqlType::Int32),
                ColumnInfo::new("Name", SqlType::Text),
                ColumnInfo::new("Age", SqlType::Int32),
            ],
            rows.iter()
                .map(|(id, name, age)| {
                    vec![Value::from(*id), Value::from(*name), Value::from(*age)]
                })
                .collect(),
        )
    }
}

pub struct FakeCursor {
    sets: VecDeque<FakeResultSet>,
    row: Option<usize>,
}

impl FakeCursor {
    pub fn new(sets: Vec<FakeResultSet>) -> Self {
        Self {
            sets: sets.into(),
            row: None,
        }
    }
}

static NO_COLUMNS_LAYOUT: &[ColumnInfo] = &[];

impl RowCursor for FakeCursor {
    fn columns(&self) -> &[ColumnInfo] {
        self.sets
            .front()
            .map(|s| s.columns.as_slice())
            .unwrap_or(NO_COLUMNS_LAYOUT)
    }

    fn value(&self, index: usize) -> Result<Value> {
        let set = self.sets.front().expect("no current result set");
        let row = self.row.expect("cursor is not positioned on a row");
        Ok(set.rows[row][index].clone())
    }

    async fn advance(&mut self) -> Result<bool> {
        let Some(set) = self.sets.front() else {
            return Ok(false);
        };
        let next = self.row.map_or(0, |r| r + 1);
        if next < set.rows.len() {
            self.row = Some(next);
            Ok(true)
        } else {
            self.row = Some(set.rows.len());
            Ok(false)
        }
    }

    async fn next_result(&mut self) -> Result<bool> {
        self.sets.pop_front();
        self.row = None;
        Ok(!self.sets.is_empty())
    }
}

/// Scripted stand-in for the execution collaborator: hands out queued
/// results and records every command it was asked to run.
pub struct FakeExecutor {
    pub connection_id: String,
    pub scalars: VecDeque<Value>,
    pub affected: VecDeque<u64>,
    pub cursors: VecDeque<Vec<FakeResultSet>>,
    pub executed: Vec<SqlCommand>,
    pub scalar_queries: Vec<SqlCommand>,
    pub cursor_queries: Vec<SqlCommand>,
}

impl FakeExecutor {
    pub fn new(connection_id: &str) -> Self {
        Self {
            connection_id: connection_id.to_owned(),
            scalars: VecDeque::new(),
            affected: VecDeque::new(),
            cursors: VecDeque::new(),
            executed: Vec::new(),
            scalar_queries: Vec::new(),
            cursor_queries: Vec::new(),
        }
    }

    pub fn with_scalar(mut self, value: impl Into<Value>) -> Self {
        self.scalars.push_back(value.into());
        self
    }

    pub fn with_affected(mut self, rows: u64) -> Self {
        self.affected.push_back(rows);
        self
    }

    pub fn with_cursor(mut self, sets: Vec<FakeResultSet>) -> Self {
        self.cursors.push_back(sets);
        self
    }
}

impl Executor for FakeExecutor {
    type Cursor = FakeCursor;

    fn connection_id(&self) -> &str {
        &self.connection_id
    }

    async fn execute(&mut self, command: &SqlCommand) -> Result<RowsAffected> {
        self.executed.push(command.clone());
        Ok(RowsAffected::new(self.affected.pop_front().unwrap_or(0)))
    }

    async fn execute_scalar(&mut self, command: &SqlCommand) -> Result<Value> {
        self.scalar_queries.push(command.clone());
        self.scalars
            .pop_front()
            .ok_or_else(|| rowhouse::Error::msg("no scalar scripted"))
    }

    async fn open_cursor(&mut self, command: &SqlCommand) -> Result<FakeCursor> {
        self.cursor_queries.push(command.clone());
        let sets = self
            .cursors
            .pop_front()
            .ok_or_else(|| rowhouse::Error::msg("no cursor scripted"))?;
        Ok(FakeCursor::new(sets))
    }
}
