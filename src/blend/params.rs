//! Algorithm parameter values, schemas, and validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{BlendError, BlendResult};

/// Parameter map as supplied by callers (`{"factor": 0.5, ...}`).
pub type BlendParams = BTreeMap<String, ParamValue>;

/// A single parameter value.
///
/// Deserializes from plain JSON scalars: booleans, integers, floats, strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `true` / `false`.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form string.
    Str(String),
}

impl ParamValue {
    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// String view.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Int(_) => ParamKind::Int,
            Self::Float(_) => ParamKind::Float,
            Self::Str(_) => ParamKind::Str,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Declared type of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Boolean flag.
    Bool,
    /// Integer.
    Int,
    /// Float; integer values are accepted and widened.
    Float,
    /// String.
    Str,
}

impl ParamKind {
    fn accepts(self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, ParamValue::Bool(_))
                | (Self::Int, ParamValue::Int(_))
                | (Self::Float, ParamValue::Float(_) | ParamValue::Int(_))
                | (Self::Str, ParamValue::Str(_))
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        };
        f.write_str(s)
    }
}

/// Schema entry for one accepted parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    /// Parameter key.
    pub name: &'static str,
    /// Accepted type.
    pub kind: ParamKind,
    /// Whether callers must supply it.
    pub required: bool,
    /// Value used when an optional parameter is omitted.
    pub default: Option<ParamValue>,
}

/// What to do with keys that no [`ParamSpec`] declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParamPolicy {
    /// Accept and drop them.
    #[default]
    Ignore,
    /// Fail with [`BlendError::InvalidAlgorithmParams`].
    Reject,
}

/// Validated parameters with defaults filled in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ResolvedParams {
    /// Look up a resolved value.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Numeric parameter, if present.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    /// Boolean parameter, if present.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `supplied` against `specs` and fill in defaults.
///
/// - A supplied key with the wrong type is an error.
/// - A required key that is missing is an error.
/// - Undeclared keys follow `policy`.
pub fn resolve_params(
    algorithm: &str,
    specs: &[ParamSpec],
    supplied: Option<&BlendParams>,
    policy: UnknownParamPolicy,
) -> BlendResult<ResolvedParams> {
    let empty = BlendParams::new();
    let supplied = supplied.unwrap_or(&empty);

    if policy == UnknownParamPolicy::Reject
        && let Some(key) = supplied
            .keys()
            .find(|k| !specs.iter().any(|s| s.name == k.as_str()))
    {
        return Err(BlendError::invalid_params(
            algorithm,
            format!("unknown parameter '{key}'"),
        ));
    }

    let mut values = BTreeMap::new();
    for spec in specs {
        match supplied.get(spec.name) {
            Some(value) => {
                if !spec.kind.accepts(value) {
                    return Err(BlendError::invalid_params(
                        algorithm,
                        format!(
                            "parameter '{}' expects {}, got {}",
                            spec.name,
                            spec.kind,
                            value.kind()
                        ),
                    ));
                }
                values.insert(spec.name, value.clone());
            }
            None if spec.required => {
                return Err(BlendError::invalid_params(
                    algorithm,
                    format!("missing required parameter '{}'", spec.name),
                ));
            }
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name, default.clone());
                }
            }
        }
    }

    Ok(ResolvedParams { values })
}

#[cfg(test)]
#[path = "../../tests/unit/blend/params.rs"]
mod tests;
