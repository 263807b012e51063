//! Request parameter sets.
//!
//! [`Params`] maps case-sensitive string keys to typed [`Value`]s. It is
//! produced by a protocol-specific parser outside this crate and passed by
//! reference through every transform.
//!
//! Typed getters fail with [`Error::MissingKey`] or [`Error::WrongType`];
//! nothing is coerced. Callers that have a documented default check
//! [`Params::has`] first.
//!
//! ```rust
//! use pixpipe_core::{Error, Params};
//!
//! let mut params = Params::new();
//! params.set("gamma_correction", true);
//! params.set("width", 300);
//!
//! assert_eq!(params.get_bool("gamma_correction"), Ok(true));
//! assert_eq!(params.get_int("width"), Ok(300));
//! assert!(matches!(params.get_string("width"), Err(Error::WrongType { .. })));
//! assert_eq!(params.to_string(), "{gamma_correction=true, width=300}");
//! ```

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A parameter value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Any number.
    Number(f64),
    /// Text.
    String(String),
    /// Nested set.
    Params(Params),
}

impl Value {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Params(_) => "params",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Params(p) => write!(f, "{p}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Params> for Value {
    fn from(v: Params) -> Self {
        Self::Params(v)
    }
}

/// Mapping of parameter keys to values.
///
/// Keys are kept sorted so [`Display`](fmt::Display) output is stable and
/// can serve as a cache key.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether `key` is present.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Raw value for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if absent.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.0.get(key).ok_or_else(|| Error::missing_key(key))
    }

    /// String value for `key`.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        match self.get(key)? {
            Value::String(s) => Ok(s.as_str()),
            v => Err(Error::wrong_type(key, "string", v.type_name())),
        }
    }

    /// Boolean value for `key`.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            Value::Bool(b) => Ok(*b),
            v => Err(Error::wrong_type(key, "bool", v.type_name())),
        }
    }

    /// Numeric value for `key`.
    pub fn get_number(&self, key: &str) -> Result<f64> {
        match self.get(key)? {
            Value::Number(n) => Ok(*n),
            v => Err(Error::wrong_type(key, "number", v.type_name())),
        }
    }

    /// Integral numeric value for `key`.
    ///
    /// A number with a fractional part, or outside `i64`, is a type error.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        let n = self.get_number(key)?;
        if n.fract() != 0.0 || !n.is_finite() || n < i64::MIN as f64 || n > i64::MAX as f64 {
            return Err(Error::wrong_type(key, "integer", "number"));
        }
        Ok(n as i64)
    }

    /// Nested set for `key`.
    pub fn get_params(&self, key: &str) -> Result<&Params> {
        match self.get(key)? {
            Value::Params(p) => Ok(p),
            v => Err(Error::wrong_type(key, "params", v.type_name())),
        }
    }

    /// Looks up `key` inside the nested set `parent`, reporting failures
    /// with the dotted path `parent.key`.
    pub fn get_nested<'a, T>(
        &'a self,
        parent: &str,
        key: &str,
        get: impl FnOnce(&'a Params, &str) -> Result<T>,
    ) -> Result<T> {
        let nested = self.get_params(parent)?;
        get(nested, key).map_err(|e| e.nested_in(parent))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
