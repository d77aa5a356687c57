use crate::{Error, Result, Value};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between Rust scalars and [`Value`].
///
/// `try_from_value` is strict about NULL (a plain scalar refuses it; wrap the
/// field in `Option` to accept it) and lenient about integer width, so a
/// `COUNT(*)` arriving as `Int32` still decodes into an `i64` field.
pub trait AsValue: Sized {
    fn as_value(&self) -> Value;
    fn try_from_value(value: &Value) -> Result<Self>;
}

fn unexpected<T>(expected: &str, value: &Value) -> Result<T> {
    Err(Error::msg(format!(
        "cannot convert {} into {}",
        value, expected
    )))
}

macro_rules! impl_as_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl AsValue for $ty {
            fn as_value(&self) -> Value {
                Value::$variant(Some(self.clone()))
            }
            fn try_from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::$variant(Some(v)) => Ok(v.clone()),
                    v => unexpected($name, v),
                }
            }
        }
    };
}

impl_as_value!(bool, Boolean, "bool");
impl_as_value!(f32, Float32, "f32");
impl_as_value!(f64, Float64, "f64");
impl_as_value!(Decimal, Decimal, "Decimal");
impl_as_value!(char, Char, "char");
impl_as_value!(String, Varchar, "String");
impl_as_value!(Vec<u8>, Blob, "Vec<u8>");
impl_as_value!(Date, Date, "Date");
impl_as_value!(Time, Time, "Time");
impl_as_value!(PrimitiveDateTime, Timestamp, "PrimitiveDateTime");
impl_as_value!(OffsetDateTime, TimestampWithTimezone, "OffsetDateTime");
impl_as_value!(Uuid, Uuid, "Uuid");

impl AsValue for i16 {
    fn as_value(&self) -> Value {
        Value::Int16(Some(*self))
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int16(Some(v)) => Ok(*v),
            Value::Int32(Some(v)) => i16::try_from(*v).map_err(Error::from),
            Value::Int64(Some(v)) => i16::try_from(*v).map_err(Error::from),
            v => unexpected("i16", v),
        }
    }
}

impl AsValue for i32 {
    fn as_value(&self) -> Value {
        Value::Int32(Some(*self))
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int16(Some(v)) => Ok(i32::from(*v)),
            Value::Int32(Some(v)) => Ok(*v),
            Value::Int64(Some(v)) => i32::try_from(*v).map_err(Error::from),
            v => unexpected("i32", v),
        }
    }
}

impl AsValue for i64 {
    fn as_value(&self) -> Value {
        Value::Int64(Some(*self))
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int16(Some(v)) => Ok(i64::from(*v)),
            Value::Int32(Some(v)) => Ok(i64::from(*v)),
            Value::Int64(Some(v)) => Ok(*v),
            v => unexpected("i64", v),
        }
    }
}

impl AsValue for Value {
    fn as_value(&self) -> Value {
        self.clone()
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}

macro_rules! impl_from {
    ($ty:ty) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                value.as_value()
            }
        }
        impl From<Option<$ty>> for Value {
            fn from(value: Option<$ty>) -> Self {
                value.as_value()
            }
        }
    };
}

impl_from!(bool);
impl_from!(i16);
impl_from!(i32);
impl_from!(i64);
impl_from!(f32);
impl_from!(f64);
impl_from!(Decimal);
impl_from!(char);
impl_from!(String);
impl_from!(Vec<u8>);
impl_from!(Date);
impl_from!(Time);
impl_from!(PrimitiveDateTime);
impl_from!(OffsetDateTime);
impl_from!(Uuid);
