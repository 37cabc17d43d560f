//! Delete table operation.

use aws_sdk_dynamodb::Client;
use std::time::Duration;

use super::{TableSummary, wait_for_table_deleted};
use crate::errors::{AwsService, Result, map_sdk_error};

/// Delete a table. Returns the description DynamoDB sent back, usually in
/// DELETING state.
pub async fn delete_table(
    client: &Client,
    table_name: &str,
    wait: Option<Duration>,
) -> Result<TableSummary> {
    tracing::debug!(table = %table_name, "delete_table");

    let output = client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(table_name)))?;

    tracing::info!(table = %table_name, "table deletion started");

    if let Some(max_wait) = wait {
        wait_for_table_deleted(client, table_name, max_wait).await?;
    }

    Ok(output
        .table_description()
        .map(TableSummary::from_description)
        .unwrap_or_else(|| TableSummary {
            table_name: table_name.to_string(),
            ..Default::default()
        }))
}
