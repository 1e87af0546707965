//! Building backend-specific stored procedure statements.

use sea_orm::{DbBackend, Statement};

use super::params::ProcedureParam;
use crate::constants::DEFAULT_PROCEDURE_SCHEMA;
use crate::repository::{RepositoryError, RepositoryResult};

/// A stored procedure invocation: `schema.name(params...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    pub schema: String,
    pub name: String,
    pub params: Vec<ProcedureParam>,
}

impl ProcedureCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: DEFAULT_PROCEDURE_SCHEMA.to_string(),
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn param(mut self, param: impl Into<ProcedureParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProcedureParam>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Dotted name used in logs.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Build the statement for `backend`.
    ///
    /// PostgreSQL calls a set-returning function with named arguments,
    /// MySQL uses `CALL` with positional arguments in the given order.
    /// SQLite has no stored procedures.
    ///
    /// PostgreSQL names are emitted unquoted, so they fold to lower case the
    /// same way names in an unquoted `CREATE FUNCTION` do. A function created
    /// with a quoted mixed-case name cannot be reached through this call.
    pub fn to_statement(&self, backend: DbBackend) -> RepositoryResult<Statement> {
        validate_identifier(&self.schema)?;
        validate_identifier(&self.name)?;
        for param in &self.params {
            validate_identifier(param.bare_name())?;
        }

        let values = self.params.iter().map(|p| p.value.clone()).collect::<Vec<_>>();
        let sql = match backend {
            DbBackend::Postgres => {
                let args = self
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{} => ${}", p.bare_name(), i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT * FROM {}.{}({})", self.schema, self.name, args)
            }
            DbBackend::MySql => {
                let args = vec!["?"; self.params.len()].join(", ");
                format!("CALL `{}`.`{}`({})", self.schema, self.name, args)
            }
            DbBackend::Sqlite => return Err(RepositoryError::UnsupportedBackend(backend)),
        };

        Ok(Statement::from_sql_and_values(backend, sql, values))
    }
}

/// Accept `[A-Za-z_][A-Za-z0-9_$]*`; names are interpolated into SQL.
fn validate_identifier(ident: &str) -> RepositoryResult<()> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidIdentifier(ident.to_string()))
    }
}
