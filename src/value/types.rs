//! Value and kind definitions
//!
//! Supported kinds:
//! - int: 64-bit signed integer
//! - string: UTF-8 string
//! - float: 64-bit floating point
//! - bool: boolean
//! - slices of each scalar kind (length >= 1)

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;

use super::errors::{ValueError, ValueResult};

/// Kind tag for stored values.
///
/// The integer codes are persisted in the `value_kind` column and must never
/// be renumbered. Codes 5..=8 are the slice kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// 64-bit signed integer
    Int = 1,
    /// UTF-8 string
    String = 2,
    /// 64-bit floating point
    Float = 3,
    /// Boolean, persisted as 0/1 in the integer column
    Bool = 4,
    /// Ordered sequence of ints
    SliceInt = 5,
    /// Ordered sequence of strings
    SliceString = 6,
    /// Ordered sequence of floats
    SliceFloat = 7,
    /// Ordered sequence of bools
    SliceBool = 8,
}

impl Kind {
    /// Returns the persisted integer code for this kind
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Maps a persisted code back to a kind
    pub fn from_code(code: i64) -> ValueResult<Self> {
        match code {
            1 => Ok(Kind::Int),
            2 => Ok(Kind::String),
            3 => Ok(Kind::Float),
            4 => Ok(Kind::Bool),
            5 => Ok(Kind::SliceInt),
            6 => Ok(Kind::SliceString),
            7 => Ok(Kind::SliceFloat),
            8 => Ok(Kind::SliceBool),
            other => Err(ValueError::UnknownKind(other)),
        }
    }

    /// Returns true for the four slice kinds
    pub fn is_slice(&self) -> bool {
        matches!(
            self,
            Kind::SliceInt | Kind::SliceString | Kind::SliceFloat | Kind::SliceBool
        )
    }

    /// The scalar kind a slice kind's element rows carry.
    ///
    /// Scalar kinds return themselves.
    pub fn element_kind(&self) -> Kind {
        match self {
            Kind::SliceInt => Kind::Int,
            Kind::SliceString => Kind::String,
            Kind::SliceFloat => Kind::Float,
            Kind::SliceBool => Kind::Bool,
            scalar => *scalar,
        }
    }

    /// Returns the kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::String => "string",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::SliceInt => "slice_int",
            Kind::SliceString => "slice_string",
            Kind::SliceFloat => "slice_float",
            Kind::SliceBool => "slice_bool",
        }
    }
}

/// A typed value as seen by callers of the store.
///
/// The payload lives inside the variant, so kind and payload cannot
/// disagree. Slice variants must hold at least one element to be storable;
/// `validate` enforces this at the write boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    String(String),
    Float(f64),
    Bool(bool),
    SliceInt(Vec<i64>),
    SliceString(Vec<String>),
    SliceFloat(Vec<f64>),
    SliceBool(Vec<bool>),
}

impl Value {
    /// Returns the kind tag for this value
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::String(_) => Kind::String,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::SliceInt(_) => Kind::SliceInt,
            Value::SliceString(_) => Kind::SliceString,
            Value::SliceFloat(_) => Kind::SliceFloat,
            Value::SliceBool(_) => Kind::SliceBool,
        }
    }

    /// Element count for slice variants, `None` for scalars
    pub fn slice_len(&self) -> Option<usize> {
        match self {
            Value::SliceInt(v) => Some(v.len()),
            Value::SliceString(v) => Some(v.len()),
            Value::SliceFloat(v) => Some(v.len()),
            Value::SliceBool(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Rejects slice values of length 0.
    ///
    /// An empty slice has no element rows and a header count of zero, which
    /// the decode path treats as corruption, so it can never round-trip.
    pub fn validate(&self) -> ValueResult<()> {
        match self.slice_len() {
            Some(0) => Err(ValueError::EmptySlice),
            _ => Ok(()),
        }
    }

    /// Builds a value of the given kind from an untyped JSON payload.
    ///
    /// This is the constructor used at the HTTP boundary, where the kind
    /// arrives as a code next to an arbitrary JSON `data` field. A payload
    /// whose shape disagrees with the kind fails with `TypeMismatch`; an
    /// empty array for a slice kind fails with `EmptySlice`.
    pub fn from_kind_and_json(kind: Kind, data: &serde_json::Value) -> ValueResult<Self> {
        fn mismatch(kind: Kind, data: &serde_json::Value) -> ValueError {
            ValueError::TypeMismatch {
                kind: kind.name(),
                detail: format!("got {}", json_type_name(data)),
            }
        }

        fn as_i64(kind: Kind, v: &serde_json::Value) -> ValueResult<i64> {
            v.as_i64().ok_or_else(|| mismatch(kind, v))
        }

        fn as_f64(kind: Kind, v: &serde_json::Value) -> ValueResult<f64> {
            v.as_f64().ok_or_else(|| mismatch(kind, v))
        }

        fn as_bool(kind: Kind, v: &serde_json::Value) -> ValueResult<bool> {
            v.as_bool().ok_or_else(|| mismatch(kind, v))
        }

        fn as_string(kind: Kind, v: &serde_json::Value) -> ValueResult<String> {
            v.as_str().map(str::to_owned).ok_or_else(|| mismatch(kind, v))
        }

        fn elements<'a>(
            kind: Kind,
            v: &'a serde_json::Value,
        ) -> ValueResult<&'a Vec<serde_json::Value>> {
            let items = v.as_array().ok_or_else(|| mismatch(kind, v))?;
            if items.is_empty() {
                return Err(ValueError::EmptySlice);
            }
            Ok(items)
        }

        match kind {
            Kind::Int => Ok(Value::Int(as_i64(kind, data)?)),
            Kind::String => Ok(Value::String(as_string(kind, data)?)),
            Kind::Float => Ok(Value::Float(as_f64(kind, data)?)),
            Kind::Bool => Ok(Value::Bool(as_bool(kind, data)?)),
            Kind::SliceInt => elements(kind, data)?
                .iter()
                .map(|v| as_i64(kind, v))
                .collect::<ValueResult<Vec<_>>>()
                .map(Value::SliceInt),
            Kind::SliceString => elements(kind, data)?
                .iter()
                .map(|v| as_string(kind, v))
                .collect::<ValueResult<Vec<_>>>()
                .map(Value::SliceString),
            Kind::SliceFloat => elements(kind, data)?
                .iter()
                .map(|v| as_f64(kind, v))
                .collect::<ValueResult<Vec<_>>>()
                .map(Value::SliceFloat),
            Kind::SliceBool => elements(kind, data)?
                .iter()
                .map(|v| as_bool(kind, v))
                .collect::<ValueResult<Vec<_>>>()
                .map(Value::SliceBool),
        }
    }

    /// The payload as plain JSON, without the kind tag
    pub fn to_json_data(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => json!(v),
            Value::String(v) => json!(v),
            Value::Float(v) => json!(v),
            Value::Bool(v) => json!(v),
            Value::SliceInt(v) => json!(v),
            Value::SliceString(v) => json!(v),
            Value::SliceFloat(v) => json!(v),
            Value::SliceBool(v) => json!(v),
        }
    }
}

fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Wire shape consumed and produced by the HTTP layer
#[derive(Serialize, Deserialize)]
struct WireValue {
    #[serde(rename = "type")]
    kind: i64,
    data: serde_json::Value,
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireValue {
            kind: self.kind().code(),
            data: self.to_json_data(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        let kind = Kind::from_code(wire.kind).map_err(D::Error::custom)?;
        Value::from_kind_and_json(kind, &wire.data).map_err(D::Error::custom)
    }
}
