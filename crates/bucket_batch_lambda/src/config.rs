use aws_config::SdkConfig;

use crate::error::HandlerError;

/// Settings passed explicitly into the handler instead of read from ambient
/// session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub region: String,
}

impl HandlerConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Region resolved by the shared AWS config chain (`AWS_REGION`, profile,
    /// instance metadata).
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Result<Self, HandlerError> {
        let region = sdk_config
            .region()
            .map(|region| region.as_ref().to_string())
            .filter(|region| !region.trim().is_empty())
            .ok_or_else(|| {
                HandlerError::Configuration("AWS region must be configured".to_string())
            })?;
        Ok(Self::new(region))
    }
}
