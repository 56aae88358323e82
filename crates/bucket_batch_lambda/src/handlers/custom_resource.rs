use std::collections::HashSet;

use bucket_batch_core::contract::{
    normalize_properties, LifecycleEvent, RequestType, ResourceProperties,
    NUMBER_OF_BUCKETS_CREATED,
};
use bucket_batch_core::naming::{bucket_names, SuffixSource};
use bucket_batch_core::physical_id::{encode_physical_id, recorded_buckets};
use bucket_batch_core::response::{build_response, CfnResponse, HandlerOutcome, ResponseData};
use serde_json::Value;

use crate::adapters::bucket_store::BucketStore;
use crate::adapters::response_sender::ResponseSender;
use crate::config::HandlerConfig;
use crate::error::HandlerError;

/// Maps one lifecycle event onto bucket operations.
///
/// Update is a fresh Create under a new suffix. CloudFormation sees the new
/// physical id and sends a Delete for the old one once the stack update
/// completes.
pub fn handle_lifecycle_event(
    event: &LifecycleEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    suffixes: &impl SuffixSource,
) -> HandlerOutcome {
    tracing::info!(
        request_type = %event.request_type,
        stack_id = %event.stack_id,
        logical_resource_id = %event.logical_resource_id,
        request_id = %event.request_id,
        "lifecycle_event_received"
    );

    match &event.request_type {
        RequestType::Create | RequestType::Update => create_batch(event, config, store, suffixes),
        RequestType::Delete => delete_batch(event, store),
        RequestType::Other(request_type) => {
            tracing::warn!(request_type = %request_type, "unsupported_request_type");
            HandlerOutcome::failed(format!("Unsupported request type '{request_type}'"))
        }
    }
}

/// Runs the handler, then reports its outcome to the event's `ResponseURL`.
pub fn process_event(
    event: &LifecycleEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    suffixes: &impl SuffixSource,
    sender: &impl ResponseSender,
    log_stream_name: &str,
) -> Result<CfnResponse, HandlerError> {
    let outcome = handle_lifecycle_event(event, config, store, suffixes);
    report_outcome(event, &outcome, sender, log_stream_name)
}

pub fn report_outcome(
    event: &LifecycleEvent,
    outcome: &HandlerOutcome,
    sender: &impl ResponseSender,
    log_stream_name: &str,
) -> Result<CfnResponse, HandlerError> {
    let response = build_response(event, outcome, log_stream_name);
    let body = serde_json::to_vec(&response)?;

    sender
        .send_response(&event.response_url, &body)
        .map_err(HandlerError::ResponseDelivery)?;

    tracing::info!(
        status = ?response.status,
        physical_resource_id = %response.physical_resource_id,
        "response_sent"
    );
    Ok(response)
}

/// Answers an event that does not decode into a `LifecycleEvent` with
/// `FAILED`, as long as its envelope still names a `ResponseURL`.
pub fn report_undecodable_event(
    payload: &Value,
    reason: &str,
    sender: &impl ResponseSender,
    log_stream_name: &str,
) -> Result<CfnResponse, HandlerError> {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let response_url = field("ResponseURL").ok_or_else(|| {
        HandlerError::InvalidEvent(format!("{reason} (no ResponseURL to report to)"))
    })?;

    let event = LifecycleEvent {
        request_type: RequestType::from(field("RequestType").unwrap_or_default()),
        response_url,
        stack_id: field("StackId").unwrap_or_default(),
        request_id: field("RequestId").unwrap_or_default(),
        logical_resource_id: field("LogicalResourceId").unwrap_or_default(),
        resource_type: field("ResourceType").unwrap_or_default(),
        service_token: field("ServiceToken"),
        physical_resource_id: field("PhysicalResourceId"),
        resource_properties: ResourceProperties::default(),
        old_resource_properties: None,
    };

    tracing::error!(reason = %reason, "lifecycle_event_invalid");
    report_outcome(
        &event,
        &HandlerOutcome::failed(format!("Invalid lifecycle event: {reason}")),
        sender,
        log_stream_name,
    )
}

fn create_batch(
    event: &LifecycleEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    suffixes: &impl SuffixSource,
) -> HandlerOutcome {
    let spec = match normalize_properties(&event.resource_properties) {
        Ok(value) => value,
        Err(error) => return HandlerOutcome::failed(error.to_string()),
    };

    let suffix = suffixes.next_suffix();
    let mut created = Vec::with_capacity(spec.count as usize);

    // Buckets created before a failure are left in place.
    for name in bucket_names(&spec, &suffix) {
        if let Err(error) = store.create_bucket(&name, &config.region) {
            tracing::error!(
                bucket = %name,
                buckets_created = created.len(),
                error = %error,
                "bucket_operation_failed"
            );
            return HandlerOutcome::failed(format!(
                "Failed to create bucket '{name}' after creating {} bucket(s): {error}",
                created.len()
            ));
        }
        tracing::info!(bucket = %name, region = %config.region, "bucket_created");
        created.push(name);
    }

    HandlerOutcome::Success {
        data: ResponseData::from([(
            NUMBER_OF_BUCKETS_CREATED.to_string(),
            spec.requested_count,
        )]),
        physical_resource_id: encode_physical_id(&created),
    }
}

fn delete_batch(event: &LifecycleEvent, store: &impl BucketStore) -> HandlerOutcome {
    let buckets = match recorded_buckets(event.physical_resource_id.as_deref()) {
        Ok(value) => value,
        Err(error) => return HandlerOutcome::failed(error.to_string()),
    };

    if buckets.is_empty() {
        tracing::info!("no_buckets_recorded");
    } else {
        let existing: HashSet<String> = match store.list_buckets() {
            Ok(value) => value.into_iter().collect(),
            Err(error) => {
                return HandlerOutcome::failed(format!("Failed to list buckets: {error}"));
            }
        };

        for (deleted, name) in buckets.iter().enumerate() {
            // A redelivered Delete finds its buckets already gone.
            if !existing.contains(name) {
                tracing::warn!(bucket = %name, "bucket_missing_skipped");
                continue;
            }
            if let Err(error) = store.delete_bucket(name) {
                tracing::error!(bucket = %name, error = %error, "bucket_operation_failed");
                return HandlerOutcome::failed(format!(
                    "Failed to delete bucket '{name}' after processing {deleted} bucket(s): {error}"
                ));
            }
            tracing::info!(bucket = %name, "bucket_deleted");
        }
    }

    HandlerOutcome::Success {
        data: ResponseData::from([(NUMBER_OF_BUCKETS_CREATED.to_string(), "0".to_string())]),
        physical_resource_id: String::new(),
    }
}
