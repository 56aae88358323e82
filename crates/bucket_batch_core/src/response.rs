use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::LifecycleEvent;

pub type ResponseData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Result of one lifecycle invocation, decided once at the end of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Success {
        data: ResponseData,
        physical_resource_id: String,
    },
    Failed {
        reason: String,
    },
}

impl HandlerOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Success { .. } => ResponseStatus::Success,
            Self::Failed { .. } => ResponseStatus::Failed,
        }
    }
}

/// Body PUT to the presigned `ResponseURL` of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: ResponseData,
}

pub fn build_response(
    event: &LifecycleEvent,
    outcome: &HandlerOutcome,
    log_stream_name: &str,
) -> CfnResponse {
    let log_pointer = format!("See the details in CloudWatch Log Stream: {log_stream_name}");

    let (reason, physical_resource_id, data) = match outcome {
        HandlerOutcome::Success {
            data,
            physical_resource_id,
        } => {
            // CloudFormation rejects an empty id; Delete reports none of its own.
            let physical_resource_id = if physical_resource_id.is_empty() {
                log_stream_name.to_string()
            } else {
                physical_resource_id.clone()
            };
            (log_pointer, physical_resource_id, data.clone())
        }
        HandlerOutcome::Failed { reason } => (
            format!("{reason}. {log_pointer}"),
            event
                .existing_physical_id()
                .unwrap_or(log_stream_name)
                .to_string(),
            ResponseData::new(),
        ),
    };

    CfnResponse {
        status: outcome.status(),
        reason,
        physical_resource_id,
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        no_echo: false,
        data,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::contract::NUMBER_OF_BUCKETS_CREATED;

    fn sample_event(physical_id: Option<&str>) -> LifecycleEvent {
        serde_json::from_value(json!({
            "RequestType": "Update",
            "ResponseURL": "https://example.com/response",
            "StackId": "stack-1",
            "RequestId": "request-1",
            "LogicalResourceId": "Buckets",
            "PhysicalResourceId": physical_id,
            "ResourceProperties": {"Count": "2", "BucketName": "foo"}
        }))
        .expect("event should parse")
    }

    #[test]
    fn success_response_serializes_cloudformation_fields() {
        let outcome = HandlerOutcome::Success {
            data: ResponseData::from([(NUMBER_OF_BUCKETS_CREATED.to_string(), "2".to_string())]),
            physical_resource_id: r#"["foo001-x","foo002-x"]"#.to_string(),
        };
        let response = build_response(&sample_event(None), &outcome, "stream-1");

        let body = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(
            body,
            json!({
                "Status": "SUCCESS",
                "Reason": "See the details in CloudWatch Log Stream: stream-1",
                "PhysicalResourceId": "[\"foo001-x\",\"foo002-x\"]",
                "StackId": "stack-1",
                "RequestId": "request-1",
                "LogicalResourceId": "Buckets",
                "NoEcho": false,
                "Data": {"NumberOfBucketsCreated": "2"}
            })
        );
    }

    #[test]
    fn success_with_empty_id_falls_back_to_log_stream_name() {
        let outcome = HandlerOutcome::Success {
            data: ResponseData::from([(NUMBER_OF_BUCKETS_CREATED.to_string(), "0".to_string())]),
            physical_resource_id: String::new(),
        };
        let response = build_response(
            &sample_event(Some(r#"["foo001-x"]"#)),
            &outcome,
            "log-stream-1",
        );

        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.physical_resource_id, "log-stream-1");
        assert_eq!(response.data[NUMBER_OF_BUCKETS_CREATED], "0");
    }

    #[test]
    fn failed_response_echoes_existing_physical_id() {
        let response = build_response(
            &sample_event(Some(r#"["foo001-old"]"#)),
            &HandlerOutcome::failed("boom"),
            "stream-1",
        );

        assert_eq!(response.status, ResponseStatus::Failed);
        assert_eq!(response.physical_resource_id, r#"["foo001-old"]"#);
        assert!(response.data.is_empty());
        assert_eq!(
            response.reason,
            "boom. See the details in CloudWatch Log Stream: stream-1"
        );
    }

    #[test]
    fn failed_response_falls_back_to_log_stream_name() {
        let response = build_response(
            &sample_event(None),
            &HandlerOutcome::failed("boom"),
            "stream-1",
        );
        assert_eq!(response.physical_resource_id, "stream-1");
    }
}
