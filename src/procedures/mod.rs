//! Stored procedure invocation with dynamic result mapping.
//!
//! This module provides:
//! - Named, nullable parameters
//! - Backend-specific call statements under a schema prefix
//! - A reader that nests dotted column names and maps rows onto any
//!   `Deserialize` type, bounded by a command timeout

pub mod call;
pub mod params;
pub mod reader;

pub use call::ProcedureCall;
pub use params::ProcedureParam;
pub use reader::ProcedureReader;
