//! Table stream settings.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{StreamSpecification, StreamViewType};

use super::TableSummary;
use crate::errors::{AwsService, Result, map_sdk_error};

/// Turn on the table stream with the given view type.
pub async fn enable_streams(
    client: &Client,
    table_name: &str,
    view_type: StreamViewType,
) -> Result<TableSummary> {
    let spec = StreamSpecification::builder()
        .stream_enabled(true)
        .stream_view_type(view_type)
        .build()?;
    update_stream(client, table_name, spec).await
}

pub async fn disable_streams(client: &Client, table_name: &str) -> Result<TableSummary> {
    let spec = StreamSpecification::builder().stream_enabled(false).build()?;
    update_stream(client, table_name, spec).await
}

async fn update_stream(
    client: &Client,
    table_name: &str,
    spec: StreamSpecification,
) -> Result<TableSummary> {
    tracing::debug!(
        table = %table_name,
        enabled = spec.stream_enabled(),
        view_type = ?spec.stream_view_type(),
        "update_table stream"
    );

    let output = client
        .update_table()
        .table_name(table_name)
        .stream_specification(spec)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(table_name)))?;

    Ok(output
        .table_description()
        .map(TableSummary::from_description)
        .unwrap_or_else(|| TableSummary {
            table_name: table_name.to_string(),
            ..Default::default()
        }))
}
