use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const COUNT_PROPERTY: &str = "Count";
pub const BUCKET_NAME_PROPERTY: &str = "BucketName";
pub const NUMBER_OF_BUCKETS_CREATED: &str = "NumberOfBucketsCreated";

/// CloudFormation lifecycle operation requested for the custom resource.
///
/// Values other than `Create`, `Update` and `Delete` are kept verbatim so the
/// handler can report them instead of failing to decode the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Create" => Self::Create,
            "Update" => Self::Update,
            "Delete" => Self::Delete,
            _ => Self::Other(value),
        }
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties are kept as raw JSON so a mistyped value still decodes into an
/// event that can be answered with `FAILED`. `Count` arrives as a string from
/// CloudFormation, but hand-written test events frequently carry a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceProperties {
    #[serde(rename = "Count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(
        rename = "BucketName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bucket_name: Option<Value>,
    #[serde(
        rename = "ServiceToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub service_token: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<ResourceProperties>,
}

impl LifecycleEvent {
    /// Physical id carried by the event, `None` when absent or blank.
    pub fn existing_physical_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Validated form of the resource properties for a Create or Update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSpec {
    pub count: u32,
    /// `Count` exactly as supplied, echoed back in the response data.
    pub requested_count: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("resource property '{0}' is required")]
    MissingProperty(&'static str),
    #[error("resource property 'Count' must be a non-negative integer, got '{0}'")]
    InvalidCount(String),
    #[error("resource property 'BucketName' must be a string, got '{0}'")]
    InvalidBucketName(String),
}

pub fn normalize_properties(properties: &ResourceProperties) -> Result<BatchSpec, ValidationError> {
    let (count, requested_count) = match &properties.count {
        None | Some(Value::Null) => return Err(ValidationError::MissingProperty(COUNT_PROPERTY)),
        Some(Value::String(text)) => {
            let count = text
                .trim()
                .parse::<u32>()
                .map_err(|_| ValidationError::InvalidCount(text.clone()))?;
            (count, text.clone())
        }
        Some(Value::Number(number)) => {
            let count = number
                .as_u64()
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| ValidationError::InvalidCount(number.to_string()))?;
            (count, number.to_string())
        }
        Some(other) => return Err(ValidationError::InvalidCount(other.to_string())),
    };

    let prefix = match &properties.bucket_name {
        None | Some(Value::Null) => {
            return Err(ValidationError::MissingProperty(BUCKET_NAME_PROPERTY))
        }
        Some(Value::String(prefix)) => prefix.clone(),
        Some(other) => return Err(ValidationError::InvalidBucketName(other.to_string())),
    };

    Ok(BatchSpec {
        count,
        requested_count,
        prefix,
    })
}
