use crate::SqlType;
use rust_decimal::Decimal;
use std::fmt::{self, Display, Write};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

macro_rules! write_integer {
    ($f:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $f.write_str(buffer.format($value))
    }};
}
macro_rules! write_float {
    ($f:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $f.write_str(buffer.format($value))
    }};
}

/// A database scalar. Every variant wraps an `Option` so a typed NULL is
/// representable: `Varchar(None)` is a NULL that still knows it is text.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Vec<u8>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int16(None)
                | Value::Int32(None)
                | Value::Int64(None)
                | Value::Float32(None)
                | Value::Float64(None)
                | Value::Decimal(None)
                | Value::Char(None)
                | Value::Varchar(None)
                | Value::Blob(None)
                | Value::Date(None)
                | Value::Time(None)
                | Value::Timestamp(None)
                | Value::TimestampWithTimezone(None)
                | Value::Uuid(None)
        )
    }

    /// The semantic column type of this value, when it carries one.
    pub fn sql_type(&self) -> Option<SqlType> {
        Some(match self {
            Value::Null => return None,
            Value::Boolean(..) => SqlType::Boolean,
            Value::Int16(..) => SqlType::Int16,
            Value::Int32(..) => SqlType::Int32,
            Value::Int64(..) => SqlType::Int64,
            Value::Float32(..) => SqlType::Float32,
            Value::Float64(..) => SqlType::Float64,
            Value::Decimal(..) => SqlType::Decimal,
            Value::Char(..) => SqlType::Char,
            Value::Varchar(..) => SqlType::Text,
            Value::Blob(..) => SqlType::Binary,
            Value::Date(..) => SqlType::Date,
            Value::Time(..) => SqlType::Time,
            Value::Timestamp(..) => SqlType::Timestamp,
            Value::TimestampWithTimezone(..) => SqlType::TimestampWithTimeZone,
            Value::Uuid(..) => SqlType::Uuid,
        })
    }

    fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
        f.write_char('\'')?;
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                f.write_str(&value[position..i])?;
                f.write_str("''")?;
                position = i + 1;
            }
        }
        f.write_str(&value[position..])?;
        f.write_char('\'')
    }

    fn write_date(f: &mut fmt::Formatter<'_>, value: &Date) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        )
    }

    fn write_time(f: &mut fmt::Formatter<'_>, value: &Time) -> fmt::Result {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}.{:0width$}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        )
    }
}

/// Renders the value as a SQL-style literal. Used for logging and error
/// context only; statements always carry values as named parameters.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self {
            Value::Boolean(Some(v)) => f.write_str(["false", "true"][*v as usize]),
            Value::Int16(Some(v)) => write_integer!(f, *v),
            Value::Int32(Some(v)) => write_integer!(f, *v),
            Value::Int64(Some(v)) => write_integer!(f, *v),
            Value::Float32(Some(v)) => write_float!(f, *v),
            Value::Float64(Some(v)) => write_float!(f, *v),
            Value::Decimal(Some(v)) => write!(f, "{}", v),
            Value::Char(Some(v)) => {
                f.write_char('\'')?;
                f.write_char(*v)?;
                f.write_char('\'')
            }
            Value::Varchar(Some(v)) => Self::write_string(f, v),
            Value::Blob(Some(v)) => {
                f.write_char('\'')?;
                for b in v {
                    write!(f, "\\x{:02X}", b)?;
                }
                f.write_char('\'')
            }
            Value::Date(Some(v)) => {
                f.write_char('\'')?;
                Self::write_date(f, v)?;
                f.write_char('\'')
            }
            Value::Time(Some(v)) => {
                f.write_char('\'')?;
                Self::write_time(f, v)?;
                f.write_char('\'')
            }
            Value::Timestamp(Some(v)) => {
                f.write_char('\'')?;
                Self::write_date(f, &v.date())?;
                f.write_char('T')?;
                Self::write_time(f, &v.time())?;
                f.write_char('\'')
            }
            Value::TimestampWithTimezone(Some(v)) => {
                f.write_char('\'')?;
                Self::write_date(f, &v.date())?;
                f.write_char('T')?;
                Self::write_time(f, &v.time())?;
                write!(
                    f,
                    "{:+03}:{:02}",
                    v.offset().whole_hours(),
                    v.offset().whole_minutes().unsigned_abs() % 60
                )?;
                f.write_char('\'')
            }
            Value::Uuid(Some(v)) => write!(f, "'{}'", v),
            _ => f.write_str("NULL"),
        }
    }
}
