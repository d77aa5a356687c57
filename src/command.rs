use crate::{AffectedRowCountError, Value};
use std::{
    borrow::Cow,
    cmp::min,
    fmt::{self, Display},
};

/// How the statement text should be interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Plain SQL text.
    Text,
    /// The text names a stored procedure.
    StoredProcedure,
}

/// Ordered name-to-value parameter carrier. Names always match the `@name`
/// tokens embedded in the statement text.
pub type Params = Vec<(Cow<'static, str>, Value)>;

/// A ready-to-run statement: literal SQL text plus its parameters.
#[derive(Debug, Clone)]
pub struct SqlCommand {
    pub text: String,
    pub kind: CommandKind,
    pub params: Params,
}

impl SqlCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommandKind::Text,
            params: Vec::new(),
        }
    }

    pub fn with_params(text: impl Into<String>, params: Params) -> Self {
        Self {
            text: text.into(),
            kind: CommandKind::Text,
            params,
        }
    }

    pub fn procedure(name: impl Into<String>, params: Params) -> Self {
        Self {
            text: name.into(),
            kind: CommandKind::StoredProcedure,
            params,
        }
    }
}

impl From<&str> for SqlCommand {
    fn from(value: &str) -> Self {
        SqlCommand::new(value)
    }
}

impl From<String> for SqlCommand {
    fn from(value: String) -> Self {
        SqlCommand::new(value)
    }
}

impl Display for SqlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = &self.text[..min(self.text.len(), 497)];
        write!(
            f,
            "{}{}",
            text.trim_end(),
            if self.text.len() > 497 { "..." } else { "" },
        )?;
        if !self.params.is_empty() {
            f.write_str(" [")?;
            for (i, (name, value)) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "@{} = {}", name, value)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
}

impl RowsAffected {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }

    /// Post-write verification: the statement ran, now check it touched the
    /// expected number of rows.
    pub fn expecting(&self, expected: u64) -> Result<(), AffectedRowCountError> {
        if self.rows_affected != expected {
            return Err(AffectedRowCountError {
                expected,
                actual: self.rows_affected,
            });
        }
        Ok(())
    }
}
