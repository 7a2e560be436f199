//! Parameter value kinds.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::input_file::InputFile;

/// Capability of converting a value into JSON.
///
/// Implemented for every `Serialize` type, so model structs can be passed
/// directly with [`ParamValue::encodable`].
pub trait ToJson: Send + Sync {
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize + Send + Sync> ToJson for T {
    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A single parameter value.
#[derive(Clone)]
pub enum ParamValue {
    String(String),
    Number(Number),
    Bool(bool),
    Array(Vec<ParamValue>),
    Object(Map<String, Value>),
    File(InputFile),
    Encodable(Arc<dyn ToJson>),
}

impl ParamValue {
    /// Wrap any serializable value.
    pub fn encodable<T: Serialize + Send + Sync + 'static>(value: T) -> Self {
        Self::Encodable(Arc::new(value))
    }

    pub fn as_file(&self) -> Option<&InputFile> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used for request bodies.
    ///
    /// Files have no JSON form and fall back to their string representation.
    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        Ok(match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Array(items) => Value::Array(
                items
                    .iter()
                    .map(ParamValue::to_json_value)
                    .collect::<Result<_, _>>()?,
            ),
            Self::Object(map) => Value::Object(map.clone()),
            Self::Encodable(e) => e.to_json()?,
            Self::File(file) => Value::String(file.filename().to_string()),
        })
    }

    /// String form used in query strings and multipart parts.
    ///
    /// Arrays, objects and encodables are rendered as compact JSON, which
    /// fails when an encodable cannot be serialized.
    pub fn to_param_string(&self) -> Result<String, serde_json::Error> {
        Ok(match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::File(file) => file.filename().to_string(),
            Self::Array(_) | Self::Object(_) | Self::Encodable(_) => {
                self.to_json_value()?.to_string()
            }
        })
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_param_string() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<unserializable>"),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
            Self::Encodable(_) => f.write_str("Encodable(..)"),
        }
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    Self::Number(Number::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        // NaN and infinities have no JSON number form
        match Number::from_f64(v) {
            Some(n) => Self::Number(n),
            None => Self::String(v.to_string()),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::from(f64::from(v))
    }
}

impl From<InputFile> for ParamValue {
    fn from(v: InputFile) -> Self {
        Self::File(v)
    }
}

impl From<Map<String, Value>> for ParamValue {
    fn from(v: Map<String, Value>) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}
