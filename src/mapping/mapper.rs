//! Field-by-field mapping of nested rows onto caller types.
//!
//! Mapping goes through serde: the source becomes a JSON value and the
//! target is deserialized from it, so any `Deserialize` struct can act as a
//! DTO. Missing `Option` fields map to `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::nested::{Nested, NullPolicy};
use crate::repository::{RepositoryError, RepositoryResult};

fn mapping_error<T>(source: serde_json::Error) -> RepositoryError {
    RepositoryError::Mapping {
        target: std::any::type_name::<T>(),
        source,
    }
}

/// Map one nested row onto `T`.
pub fn map_row<T: DeserializeOwned>(row: Nested) -> RepositoryResult<T> {
    serde_json::from_value(row.into_json()).map_err(mapping_error::<T>)
}

/// Nest and map a batch of untyped JSON rows.
pub fn map_json_rows<T: DeserializeOwned>(rows: Vec<JsonValue>, nulls: NullPolicy) -> RepositoryResult<Vec<T>> {
    rows.into_iter()
        .map(|row| map_row(Nested::from_json_row(row, nulls)?))
        .collect()
}

/// Map any serializable value onto another type sharing its field names.
pub fn map_into<S, D>(source: &S) -> RepositoryResult<D>
where
    S: Serialize,
    D: DeserializeOwned,
{
    let value = serde_json::to_value(source).map_err(mapping_error::<S>)?;
    serde_json::from_value(value).map_err(mapping_error::<D>)
}
