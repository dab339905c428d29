//! Attribute values in their three representations.
//!
//! - [`WireValue`] - the structured form a bulk payload decodes into
//! - [`AttributeValue`] - the compact stored form, strings interned
//! - [`PlainValue`] - the owned form handed to and returned from callers
//!
//! Empty strings and empty lists are present values in every representation;
//! only an explicit absent marker (or an unset wire value) means "no value".

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::intern::{InternedStr, StringPool};

/// Caller-facing attribute value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PlainValue {
    /// No value.
    #[default]
    Absent,
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point.
    Number(f64),
    /// String value.
    String(String),
    /// List of strings (may be empty).
    List(Vec<String>),
}

impl PlainValue {
    /// Returns true if this is the absent marker.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a list of strings.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Renders a value as display text.
///
/// Lists keep a trailing comma before the closing bracket (`[a,b,]`, `[]`);
/// downstream consumers match on this exact shape.
#[must_use]
pub fn to_display_string(value: &PlainValue) -> String {
    value.to_string()
}

impl fmt::Display for PlainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                for item in items {
                    write!(f, "{item},")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for PlainValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for PlainValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for PlainValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for PlainValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for PlainValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<String>> for PlainValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for PlainValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_owned).collect())
    }
}

impl<T: Into<PlainValue>> From<Option<T>> for PlainValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Attribute value as decoded from a bulk payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WireValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// List of raw strings.
    List(Vec<String>),
    /// Null or missing single value.
    #[default]
    Unset,
}

impl From<WireValue> for PlainValue {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::Bool(b) => Self::Bool(b),
            WireValue::Number(n) => Self::Number(n),
            WireValue::String(s) => Self::String(s),
            WireValue::List(items) => Self::List(items),
            WireValue::Unset => Self::Absent,
        }
    }
}

/// Stored attribute value.
///
/// Strings are pool handles; lists are exact-size boxed slices of handles.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AttributeValue {
    /// No value.
    #[default]
    Absent,
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point.
    Number(f64),
    /// Interned string.
    String(InternedStr),
    /// Interned strings (may be empty).
    List(Box<[InternedStr]>),
}

impl AttributeValue {
    /// Converts a caller value, interning its strings into `pool`.
    pub fn from_plain(value: PlainValue, pool: &mut StringPool) -> Self {
        match value {
            PlainValue::Absent => Self::Absent,
            PlainValue::Bool(b) => Self::Bool(b),
            PlainValue::Number(n) => Self::Number(n),
            PlainValue::String(s) => Self::String(pool.intern_owned(s)),
            PlainValue::List(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| pool.intern_owned(item))
                    .collect(),
            ),
        }
    }

    /// Converts a payload value, interning its strings into `pool`.
    pub fn from_wire(value: WireValue, pool: &mut StringPool) -> Self {
        Self::from_plain(PlainValue::from(value), pool)
    }

    /// Converts back to an owned caller value.
    #[must_use]
    pub fn to_plain(&self) -> PlainValue {
        match self {
            Self::Absent => PlainValue::Absent,
            Self::Bool(b) => PlainValue::Bool(*b),
            Self::Number(n) => PlainValue::Number(*n),
            Self::String(s) => PlainValue::String(s.to_string()),
            Self::List(items) => PlainValue::List(items.iter().map(ToString::to_string).collect()),
        }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::List(_) => ValueKind::List,
        }
    }
}

/// Value kinds, shared by every representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// Absent marker.
    Absent,
    /// Boolean.
    Bool,
    /// Number.
    Number,
    /// String.
    String,
    /// List of strings.
    List,
}

impl ValueKind {
    /// All kinds, in display order.
    pub const ALL: [ValueKind; 5] = [
        Self::Absent,
        Self::Number,
        Self::Bool,
        Self::String,
        Self::List,
    ];

    /// Returns a short lowercase name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Absent => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
