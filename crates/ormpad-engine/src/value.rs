//! Runtime values produced by snippet evaluation.

use std::fmt;

use ormpad_lang::Literal;
use rusqlite::types::ValueRef;

/// A value in the snippet runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The no-value sentinel; never echoed by the executor.
    Unit,
    /// SQL NULL / missing value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A single fetched or created record.
    Record(Record),
    /// A list of records, as returned by `findMany`.
    Rows(Vec<Record>),
    /// The row count of an update or delete.
    Affected(usize),
}

/// A record: an entity name plus ordered field values.
///
/// Included relations are appended as extra fields holding a nested
/// [`Value::Record`] or [`Value::Rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Look up an integer field, typically a key column.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }
}

impl Value {
    /// Describe the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Record(_) => "record",
            Value::Rows(_) => "rows",
            Value::Affected(_) => "affected count",
        }
    }

    /// Convert a SQLite column value.
    pub fn from_sql(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Int(n),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(bytes) => Value::Str(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Str(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Render the value as it appears nested inside a record: strings
    /// quoted, everything else as the top-level form.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Value {
        match lit {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => {
                // Keep a decimal point so floats read as floats.
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Record(record) => write!(f, "{}", record),
            Value::Rows(records) => {
                write!(f, "[")?;
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", record)?;
                }
                write!(f, "]")
            }
            Value::Affected(n) => write!(f, "{} row(s) affected", n),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.entity)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: ", name)?;
            value.fmt_nested(f)?;
        }
        write!(f, " }}")
    }
}
