//! Turning untyped rows into typed values.
//!
//! [`nested`] builds trees from dotted column names and [`mapper`] maps
//! those trees onto caller-supplied types.

pub mod mapper;
pub mod nested;

pub use mapper::{map_into, map_json_rows, map_row};
pub use nested::{Nested, NullPolicy, ShapeConflict};
