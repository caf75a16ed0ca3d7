//! Bound parameters, decoded cells and the scalar types columns yield.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A SQL value: either a bound parameter or a cell decoded from a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
}

impl Value {
    /// Short name of the variant, used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// The scalar kinds a column expression can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Integer,
    Real,
    Text,
    Boolean,
    Blob,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Real => "real",
            ScalarKind::Text => "text",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Blob => "blob",
        }
    }
}

/// The type a decoded value is coerced into.
///
/// Written as `"integer"`, `"text"` etc., with a trailing `?` for nullable
/// types (`"text?"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResultType {
    pub kind: ScalarKind,
    pub nullable: bool,
}

impl ResultType {
    pub const fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub const fn integer() -> Self {
        Self::new(ScalarKind::Integer)
    }

    pub const fn real() -> Self {
        Self::new(ScalarKind::Real)
    }

    pub const fn text() -> Self {
        Self::new(ScalarKind::Text)
    }

    pub const fn boolean() -> Self {
        Self::new(ScalarKind::Boolean)
    }

    pub const fn blob() -> Self {
        Self::new(ScalarKind::Blob)
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Coerce a raw database value into this type.
    ///
    /// Returns `None` when the value cannot be represented, e.g. NULL into a
    /// non-nullable slot or `123.5` into an integer.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        if value.is_null() {
            return self.nullable.then_some(Value::Null);
        }

        match (self.kind, value) {
            (ScalarKind::Integer, Value::Integer(i)) => Some(Value::Integer(i)),
            (ScalarKind::Integer, Value::Real(f)) => {
                (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
                    .then_some(Value::Integer(f as i64))
            }
            (ScalarKind::Integer, Value::Boolean(b)) => Some(Value::Integer(b.into())),
            (ScalarKind::Integer, Value::Text(s)) => s.trim().parse().ok().map(Value::Integer),

            (ScalarKind::Real, Value::Real(f)) => Some(Value::Real(f)),
            (ScalarKind::Real, Value::Integer(i)) => Some(Value::Real(i as f64)),
            (ScalarKind::Real, Value::Text(s)) => s.trim().parse().ok().map(Value::Real),

            (ScalarKind::Text, Value::Text(s)) => Some(Value::Text(s)),
            (ScalarKind::Text, Value::Integer(i)) => Some(Value::Text(i.to_string())),
            (ScalarKind::Text, Value::Real(f)) => Some(Value::Text(f.to_string())),
            (ScalarKind::Text, Value::Blob(b)) => String::from_utf8(b).ok().map(Value::Text),

            (ScalarKind::Boolean, Value::Boolean(b)) => Some(Value::Boolean(b)),
            (ScalarKind::Boolean, Value::Integer(0)) => Some(Value::Boolean(false)),
            (ScalarKind::Boolean, Value::Integer(1)) => Some(Value::Boolean(true)),

            (ScalarKind::Blob, Value::Blob(b)) => Some(Value::Blob(b)),
            (ScalarKind::Blob, Value::Text(s)) => Some(Value::Blob(s.into_bytes())),

            _ => None,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, nullable) = match s.strip_suffix('?') {
            Some(name) => (name, true),
            None => (s, false),
        };
        let kind = match name.to_lowercase().as_str() {
            "integer" | "int" | "bigint" => ScalarKind::Integer,
            "real" | "float" | "double" | "numeric" => ScalarKind::Real,
            "text" | "string" | "uuid" => ScalarKind::Text,
            "boolean" | "bool" => ScalarKind::Boolean,
            "blob" | "bytes" => ScalarKind::Blob,
            other => return Err(format!("unknown result type: {}", other)),
        };
        Ok(Self { kind, nullable })
    }
}

impl TryFrom<String> for ResultType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResultType> for String {
    fn from(t: ResultType) -> Self {
        t.to_string()
    }
}
