//! repobase - a generic repository over SeaORM
//!
//! This library wraps a SeaORM connection with CRUD operations, column
//! projections and stored procedure calls whose untyped rows are turned
//! into nested values and mapped onto caller types.
//!
//! # Modules
//!
//! * [`config`] - Configuration file loading and validation
//! * [`logger`] - Logging setup
//! * [`storage`] - Database connection handle
//! * [`mapping`] - Nested rows from dotted column names, DTO mapping
//! * [`procedures`] - Stored procedure parameters, calls and reader
//! * [`repository`] - The generic repository and its error type
//!
//! # Example
//!
//! ```ignore
//! use repobase::{Repository, RepositoryBase, Storage, ProcedureParam};
//!
//! let storage = Storage::connect(&config.database).await?;
//! let customers = RepositoryBase::<customer::Entity>::from_storage(&storage, &config.procedures);
//!
//! let id = customers.add_return_id(new_customer).await?;
//! let rows: Vec<CustomerWithAddress> = customers
//!     .execute_reader_procedure_as("GetCustomer", vec![ProcedureParam::new("@Id", id)])
//!     .await?;
//! ```

/// Configuration module for managing application settings
pub mod config;

/// Crate-wide constants and default values
pub mod constants;

/// Logging setup
pub mod logger;

/// Nested row construction and object mapping
pub mod mapping;

/// Stored procedure invocation
pub mod procedures;

/// Generic repository over SeaORM entities
pub mod repository;

/// Database connection handle
pub mod storage;

pub use mapping::{Nested, NullPolicy};
pub use procedures::{ProcedureCall, ProcedureParam, ProcedureReader};
pub use repository::{PrimaryKeyOf, Repository, RepositoryBase, RepositoryError, RepositoryResult};
pub use storage::Storage;
