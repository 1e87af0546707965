//! Named, nullable procedure parameters.

use sea_orm::Value;

use crate::repository::{RepositoryError, RepositoryResult};

/// A name/value pair passed to a stored procedure.
///
/// The value is a typed [`Value`]; `Option::<T>::None` converts into a typed
/// null, so every parameter is nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureParam {
    pub name: String,
    pub value: Value,
}

impl ProcedureParam {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Null parameter bound as a text-typed null.
    ///
    /// PostgreSQL resolves named arguments by type, so a null for a
    /// non-text argument should be built with a typed `None` instead, e.g.
    /// `ProcedureParam::new("since", Option::<i32>::None)`.
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::String(None),
        }
    }

    /// Parameter name without a leading `@`.
    pub fn bare_name(&self) -> &str {
        self.name.strip_prefix('@').unwrap_or(&self.name)
    }

    /// Parse a `name=value` argument.
    ///
    /// `null` becomes a text-typed null (see [`ProcedureParam::null`]),
    /// `true`/`false` booleans, then integers (bound as 64-bit `BigInt`) and
    /// floats (`Double`) are tried before falling back to a string. Arguments
    /// declared with narrower types on PostgreSQL need an implicit cast to
    /// exist from these types.
    pub fn parse(arg: &str) -> RepositoryResult<Self> {
        let (name, raw) = arg
            .split_once('=')
            .ok_or_else(|| RepositoryError::InvalidIdentifier(arg.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::InvalidIdentifier(arg.to_string()));
        }

        let param = match raw {
            "null" | "NULL" => Self::null(name),
            "true" => Self::new(name, true),
            "false" => Self::new(name, false),
            _ => {
                if let Ok(int) = raw.parse::<i64>() {
                    Self::new(name, int)
                } else if let Ok(float) = raw.parse::<f64>() {
                    Self::new(name, float)
                } else {
                    Self::new(name, raw.to_string())
                }
            }
        };
        Ok(param)
    }
}

impl<K, V> From<(K, V)> for ProcedureParam
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from((name, value): (K, V)) -> Self {
        Self::new(name, value)
    }
}
