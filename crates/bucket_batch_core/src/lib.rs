//! Shared bucket batch domain primitives.
//!
//! This crate owns the CloudFormation custom-resource contract, the bucket
//! naming scheme and the physical resource id codec. It intentionally excludes
//! AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod naming;
pub mod physical_id;
pub mod response;
