//! Repository layer for database operations.
//!
//! [`RepositoryBase`] wraps a SeaORM connection for one entity type and
//! exposes CRUD, column projections and stored procedure reads. Every write
//! is persisted immediately; there is no unit of work to flush.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel, PrimaryKeyTrait, QueryFilter,
    QuerySelect, Statement,
};
use serde::de::DeserializeOwned;

use crate::config::ProcedureConfig;
use crate::mapping::map_json_rows;
use crate::procedures::{ProcedureParam, ProcedureReader};
use crate::storage::db::close_shared;
use crate::storage::Storage;

pub mod error;

pub use error::{RepositoryError, RepositoryResult};

/// Primary key value type declared by entity `E`.
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Generic data access for entity `E`.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: EntityTrait,
    E::ActiveModel: Send,
    PrimaryKeyOf<E>: Send,
{
    /// Insert a new row.
    async fn add(&self, model: E::ActiveModel) -> RepositoryResult<()>;

    /// Insert a new row and return its primary key as declared by the entity.
    async fn add_return_id(&self, model: E::ActiveModel) -> RepositoryResult<PrimaryKeyOf<E>>;

    /// Insert several rows in one statement. An empty batch does nothing.
    async fn add_range(&self, models: Vec<E::ActiveModel>) -> RepositoryResult<()>;

    /// Overwrite every column of the stored row with `model`.
    async fn update(&self, model: E::Model) -> RepositoryResult<E::Model>;

    /// Delete the row with `model`'s primary key, returning rows affected.
    async fn remove(&self, model: E::Model) -> RepositoryResult<u64>;

    async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<Option<E::Model>>;

    async fn find(&self, filter: Condition) -> RepositoryResult<Vec<E::Model>>;

    async fn get_all(&self) -> RepositoryResult<Vec<E::Model>>;

    /// Select only `columns` from every row and map each row onto `P`.
    async fn get_cols_all<P>(&self, columns: Vec<E::Column>) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send;

    async fn get_cols_by<P>(&self, filter: Condition, columns: Vec<E::Column>) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send;

    /// Like [`Repository::get_cols_by`], limited to the first `top` rows.
    async fn get_top_cols_by<P>(
        &self,
        filter: Condition,
        columns: Vec<E::Column>,
        top: u64,
    ) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send;

    /// Call a stored procedure and map its rows onto the entity model.
    async fn execute_reader_procedure(
        &self,
        procedure: &str,
        params: Vec<ProcedureParam>,
    ) -> RepositoryResult<Vec<E::Model>>;

    /// Call a stored procedure and map its rows onto `T`.
    async fn execute_reader_procedure_as<T>(
        &self,
        procedure: &str,
        params: Vec<ProcedureParam>,
    ) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned + Send;
}

/// Default [`Repository`] implementation over a shared SeaORM connection.
pub struct RepositoryBase<E> {
    conn: Arc<DatabaseConnection>,
    reader: ProcedureReader,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RepositoryBase<E> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            reader: self.reader.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: EntityTrait> RepositoryBase<E> {
    /// Accepts an owned connection or an `Arc` shared with other handles.
    pub fn new(conn: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self {
            conn: conn.into(),
            reader: ProcedureReader::default(),
            _entity: PhantomData,
        }
    }

    /// Build a repository on top of an opened [`Storage`].
    pub fn from_storage(storage: &Storage, procedures: &ProcedureConfig) -> Self {
        Self::new(storage.shared()).with_reader(ProcedureReader::from_config(procedures))
    }

    pub fn with_reader(mut self, reader: ProcedureReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn reader(&self) -> &ProcedureReader {
        &self.reader
    }

    /// Run a raw statement through the procedure reader and map rows onto `T`.
    pub async fn read_query<T: DeserializeOwned>(&self, stmt: Statement) -> RepositoryResult<Vec<T>> {
        self.reader.read(self.connection(), stmt).await
    }

    /// Close the underlying connection, or release this handle if the
    /// connection is still shared.
    pub async fn close(self) -> RepositoryResult<()> {
        close_shared(self.conn).await?;
        Ok(())
    }

    async fn select_columns<P>(
        &self,
        filter: Option<Condition>,
        columns: Vec<E::Column>,
        top: Option<u64>,
    ) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned,
    {
        let mut query = E::find().select_only().columns(columns);
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        if let Some(top) = top {
            query = query.limit(top);
        }

        let rows = query.into_json().all(self.connection()).await?;
        map_json_rows(rows, self.reader.null_policy())
    }
}

#[async_trait]
impl<E> Repository<E> for RepositoryBase<E>
where
    E: EntityTrait,
    E::Model: DeserializeOwned + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: Send,
    PrimaryKeyOf<E>: Send,
{
    async fn add(&self, model: E::ActiveModel) -> RepositoryResult<()> {
        E::insert(model).exec(self.connection()).await?;
        Ok(())
    }

    async fn add_return_id(&self, model: E::ActiveModel) -> RepositoryResult<PrimaryKeyOf<E>> {
        let result = E::insert(model).exec(self.connection()).await?;
        Ok(result.last_insert_id)
    }

    async fn add_range(&self, models: Vec<E::ActiveModel>) -> RepositoryResult<()> {
        if models.is_empty() {
            return Ok(());
        }
        E::insert_many(models).exec(self.connection()).await?;
        Ok(())
    }

    async fn update(&self, model: E::Model) -> RepositoryResult<E::Model> {
        let active = model.into_active_model().reset_all();
        Ok(E::update(active).exec(self.connection()).await?)
    }

    async fn remove(&self, model: E::Model) -> RepositoryResult<u64> {
        let result = E::delete(model.into_active_model()).exec(self.connection()).await?;
        Ok(result.rows_affected)
    }

    async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<Option<E::Model>> {
        Ok(E::find_by_id(id).one(self.connection()).await?)
    }

    async fn find(&self, filter: Condition) -> RepositoryResult<Vec<E::Model>> {
        Ok(E::find().filter(filter).all(self.connection()).await?)
    }

    async fn get_all(&self) -> RepositoryResult<Vec<E::Model>> {
        Ok(E::find().all(self.connection()).await?)
    }

    async fn get_cols_all<P>(&self, columns: Vec<E::Column>) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send,
    {
        self.select_columns(None, columns, None).await
    }

    async fn get_cols_by<P>(&self, filter: Condition, columns: Vec<E::Column>) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send,
    {
        self.select_columns(Some(filter), columns, None).await
    }

    async fn get_top_cols_by<P>(
        &self,
        filter: Condition,
        columns: Vec<E::Column>,
        top: u64,
    ) -> RepositoryResult<Vec<P>>
    where
        P: DeserializeOwned + Send,
    {
        self.select_columns(Some(filter), columns, Some(top)).await
    }

    async fn execute_reader_procedure(
        &self,
        procedure: &str,
        params: Vec<ProcedureParam>,
    ) -> RepositoryResult<Vec<E::Model>> {
        self.execute_reader_procedure_as::<E::Model>(procedure, params).await
    }

    async fn execute_reader_procedure_as<T>(
        &self,
        procedure: &str,
        params: Vec<ProcedureParam>,
    ) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let call = self.reader.call(procedure).params(params);
        self.reader.execute(self.connection(), &call).await
    }
}
