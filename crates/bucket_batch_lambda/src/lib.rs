//! AWS-oriented adapters and handlers for the bucket batch custom resource.
//!
//! This crate owns runtime integration details (the Lambda handler, the bucket
//! store and response sender seams, configuration and logging) on top of the
//! domain primitives in `bucket_batch_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
