use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bucket_batch_core::contract::LifecycleEvent;
use bucket_batch_core::naming::ThreadRngSuffix;
use bucket_batch_core::response::{CfnResponse, HandlerOutcome};
use bucket_batch_lambda::adapters::bucket_store::BucketStore;
use bucket_batch_lambda::adapters::response_sender::ResponseSender;
use bucket_batch_lambda::config::HandlerConfig;
use bucket_batch_lambda::handlers::custom_resource::{
    process_event, report_outcome, report_undecodable_event,
};
use bucket_batch_lambda::logging::init_logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

/// S3 rejects an explicit `LocationConstraint` for its default region.
const DEFAULT_S3_REGION: &str = "us-east-1";

struct S3BucketStore {
    s3_client: aws_sdk_s3::Client,
}

impl BucketStore for S3BucketStore {
    fn create_bucket(&self, name: &str, region: &str) -> Result<(), String> {
        let client = self.s3_client.clone();
        let bucket = name.to_string();
        let configuration = location_constraint(region).map(|constraint| {
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(constraint))
                .build()
        });

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .create_bucket()
                    .bucket(bucket)
                    .set_create_bucket_configuration(configuration)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to create s3 bucket: {error}"))
            })
        })
    }

    fn delete_bucket(&self, name: &str) -> Result<(), String> {
        let client = self.s3_client.clone();
        let bucket = name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_bucket()
                    .bucket(bucket)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to delete s3 bucket: {error}"))
            })
        })
    }

    fn list_buckets(&self) -> Result<Vec<String>, String> {
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .list_buckets()
                    .send()
                    .await
                    .map_err(|error| format!("failed to list s3 buckets: {error}"))?;
                Ok(output
                    .buckets
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|bucket| bucket.name)
                    .collect())
            })
        })
    }
}

struct HttpResponseSender {
    http_client: reqwest::Client,
}

impl ResponseSender for HttpResponseSender {
    fn send_response(&self, response_url: &str, body: &[u8]) -> Result<(), String> {
        let client = self.http_client.clone();
        let url = response_url.to_string();
        let body_bytes = body.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                // The presigned URL is signed without a content type.
                client
                    .put(url)
                    .header(reqwest::header::CONTENT_TYPE, "")
                    .body(body_bytes)
                    .send()
                    .await
                    .and_then(|response| response.error_for_status())
                    .map(|_| ())
                    .map_err(|error| format!("failed to put response to CloudFormation: {error}"))
            })
        })
    }
}

fn location_constraint(region: &str) -> Option<&str> {
    if region == DEFAULT_S3_REGION {
        None
    } else {
        Some(region)
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<CfnResponse, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(event = %payload, "raw_event");

    let log_stream_name = context.env_config.log_stream.clone();
    let sender = HttpResponseSender {
        http_client: reqwest::Client::new(),
    };

    let lifecycle_event: LifecycleEvent = match serde_json::from_value(payload.clone()) {
        Ok(value) => value,
        Err(error) => {
            // Once FAILED is delivered the invocation itself succeeds, so the
            // asynchronous invoke is not retried into a second response.
            return Ok(report_undecodable_event(
                &payload,
                &error.to_string(),
                &sender,
                &log_stream_name,
            )?);
        }
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let config = match HandlerConfig::from_sdk_config(&aws_config) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(error = %error, "configuration_failed");
            return Ok(report_outcome(
                &lifecycle_event,
                &HandlerOutcome::failed(error.to_string()),
                &sender,
                &log_stream_name,
            )?);
        }
    };

    let store = S3BucketStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    let response = process_event(
        &lifecycle_event,
        &config,
        &store,
        &ThreadRngSuffix,
        &sender,
        &log_stream_name,
    )?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    lambda_runtime::run(service_fn(handle_request)).await
}
