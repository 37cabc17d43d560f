//! Describe, exists and list.

use aws_sdk_dynamodb::Client;

use super::{TableList, TableSummary};
use crate::errors::{AwsService, DynokitError, Result, map_sdk_error};

pub async fn describe_table(client: &Client, table_name: &str) -> Result<TableSummary> {
    tracing::debug!(table = %table_name, "describe_table");

    let output = client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(table_name)))?;

    output
        .table()
        .map(TableSummary::from_description)
        .ok_or_else(|| DynokitError::ResourceNotFound {
            service: AwsService::DynamoDB,
            message: format!("'{}': no table description returned", table_name),
        })
}

/// Check if a table exists.
pub async fn table_exists(client: &Client, table_name: &str) -> Result<bool> {
    match describe_table(client, table_name).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// List one page of table names.
pub async fn list_tables(
    client: &Client,
    limit: Option<i32>,
    exclusive_start_table_name: Option<String>,
) -> Result<TableList> {
    tracing::debug!(?limit, start = ?exclusive_start_table_name, "list_tables");

    let output = client
        .list_tables()
        .set_limit(limit)
        .set_exclusive_start_table_name(exclusive_start_table_name)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, None))?;

    Ok(TableList {
        table_names: output.table_names.unwrap_or_default(),
        last_evaluated_table_name: output.last_evaluated_table_name,
    })
}
