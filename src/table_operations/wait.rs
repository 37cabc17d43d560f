//! Wait for table state changes.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::client::Waiters;
use std::time::Duration;

use super::TableSummary;
use crate::errors::{DynokitError, Result};

/// Wait for a table to become ACTIVE and return its final description.
pub async fn wait_for_table_active(
    client: &Client,
    table_name: &str,
    max_wait: Duration,
) -> Result<TableSummary> {
    tracing::debug!(table = %table_name, ?max_wait, "waiting for table to become active");

    let final_poll = client
        .wait_until_table_exists()
        .table_name(table_name)
        .wait(max_wait)
        .await
        .map_err(|e| DynokitError::Waiter {
            table: table_name.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(table = %table_name, "table is active");

    let output = final_poll.into_result().map_err(|e| DynokitError::Waiter {
        table: table_name.to_string(),
        message: e.to_string(),
    })?;

    Ok(output
        .table()
        .map(TableSummary::from_description)
        .unwrap_or_else(|| TableSummary {
            table_name: table_name.to_string(),
            ..Default::default()
        }))
}

/// Wait for a table to be gone.
pub async fn wait_for_table_deleted(
    client: &Client,
    table_name: &str,
    max_wait: Duration,
) -> Result<()> {
    tracing::debug!(table = %table_name, ?max_wait, "waiting for table to be deleted");

    client
        .wait_until_table_not_exists()
        .table_name(table_name)
        .wait(max_wait)
        .await
        .map_err(|e| DynokitError::Waiter {
            table: table_name.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(table = %table_name, "table deleted");
    Ok(())
}
