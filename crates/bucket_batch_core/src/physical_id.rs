//! Physical resource id codec.
//!
//! The id CloudFormation round-trips between invocations is the JSON array of
//! bucket names created by the last Create or Update.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicalIdError {
    #[error("physical resource id is not valid JSON: {0}")]
    NotJson(String),
    #[error("physical resource id must be a JSON array of bucket names")]
    NotBucketList,
}

pub fn encode_physical_id(bucket_names: &[String]) -> String {
    Value::from(bucket_names.to_vec()).to_string()
}

pub fn decode_physical_id(physical_id: &str) -> Result<Vec<String>, PhysicalIdError> {
    let value: Value = serde_json::from_str(physical_id)
        .map_err(|error| PhysicalIdError::NotJson(error.to_string()))?;

    let Value::Array(items) = value else {
        return Err(PhysicalIdError::NotBucketList);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            _ => Err(PhysicalIdError::NotBucketList),
        })
        .collect()
}

/// Buckets recorded by a previous invocation.
///
/// A missing, blank or non-JSON id means nothing was recorded: a Create that
/// failed reports the log stream name as its id, and the Delete that follows
/// on rollback carries it back.
pub fn recorded_buckets(physical_id: Option<&str>) -> Result<Vec<String>, PhysicalIdError> {
    let Some(physical_id) = physical_id.filter(|value| !value.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    match decode_physical_id(physical_id) {
        Err(PhysicalIdError::NotJson(_)) => Ok(Vec::new()),
        other => other,
    }
}
