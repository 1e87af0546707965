//! Executing statements and reading untyped rows into nested values.

use std::time::{Duration, Instant};

use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::call::ProcedureCall;
use crate::config::ProcedureConfig;
use crate::mapping::{map_json_rows, Nested, NullPolicy};
use crate::repository::{RepositoryError, RepositoryResult};

/// Runs procedure calls and raw statements, mapping each row through
/// [`Nested`] onto the requested type.
#[derive(Debug, Clone)]
pub struct ProcedureReader {
    schema: String,
    command_timeout: Duration,
    nulls: NullPolicy,
}

impl Default for ProcedureReader {
    fn default() -> Self {
        Self::from_config(&ProcedureConfig::default())
    }
}

impl ProcedureReader {
    pub fn from_config(config: &ProcedureConfig) -> Self {
        Self {
            schema: config.schema.clone(),
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            nulls: config.null_columns,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_null_policy(mut self, nulls: NullPolicy) -> Self {
        self.nulls = nulls;
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.nulls
    }

    /// Start a call to `name` under the configured schema.
    pub fn call(&self, name: impl Into<String>) -> ProcedureCall {
        ProcedureCall::new(name).schema(self.schema.clone())
    }

    /// Execute `call` and map every row onto `T`.
    pub async fn execute<T, C>(&self, conn: &C, call: &ProcedureCall) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned,
        C: ConnectionTrait,
    {
        let stmt = call.to_statement(conn.get_database_backend())?;
        log::debug!("Calling procedure {} with {} parameter(s)", call.qualified_name(), call.params.len());
        self.read(conn, stmt).await
    }

    /// Execute a raw statement and map every row onto `T`.
    pub async fn read<T, C>(&self, conn: &C, stmt: Statement) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned,
        C: ConnectionTrait,
    {
        let rows = self.fetch_json(conn, stmt).await?;
        map_json_rows(rows, self.nulls)
    }

    /// Execute a raw statement and return the nested rows without mapping.
    pub async fn read_nested<C>(&self, conn: &C, stmt: Statement) -> RepositoryResult<Vec<Nested>>
    where
        C: ConnectionTrait,
    {
        let rows = self.fetch_json(conn, stmt).await?;
        rows.into_iter()
            .map(|row| Nested::from_json_row(row, self.nulls).map_err(RepositoryError::from))
            .collect()
    }

    async fn fetch_json<C>(&self, conn: &C, stmt: Statement) -> RepositoryResult<Vec<JsonValue>>
    where
        C: ConnectionTrait,
    {
        let started = Instant::now();
        let rows = tokio::time::timeout(self.command_timeout, JsonValue::find_by_statement(stmt).all(conn))
            .await
            .map_err(|_| RepositoryError::Timeout {
                seconds: self.command_timeout.as_secs(),
            })??;

        log::debug!("Read {} row(s) in {:?}", rows.len(), started.elapsed());
        Ok(rows)
    }
}

impl From<&ProcedureConfig> for ProcedureReader {
    fn from(config: &ProcedureConfig) -> Self {
        Self::from_config(config)
    }
}
