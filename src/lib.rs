//! dynokit: thin typed wrappers over the DynamoDB, IAM and Application Auto
//! Scaling SDKs.
//!
//! Each operation is a request struct plus an async `execute_*` function.
//! `DynamoClient` and `AutoscalingClient` block on a shared runtime, and
//! `RequestExecutor` runs one `Operation` and prints its outcome.

pub mod autoscaling;
pub mod basic_operations;
pub mod batch_operations;
pub mod client;
pub mod config;
pub mod conversions;
pub mod errors;
pub mod executor;
pub mod logging;
pub mod metrics;
pub mod table_operations;
pub mod types;

pub use autoscaling::{AutoscalingClient, ScalingPolicy};
pub use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue, ScalarAttributeType, StreamViewType};
pub use client::DynamoClient;
pub use config::AwsConfig;
pub use errors::{DynokitError, Result};
pub use executor::{Operation, Outcome, RequestExecutor};
pub use metrics::OperationMetrics;
pub use types::{AttributeMap, ItemKey, KeyValue};
