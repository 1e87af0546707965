//! Database connection management
//!
//! This module opens the SeaORM connection that repositories share.

pub mod db;

pub use db::Storage;
