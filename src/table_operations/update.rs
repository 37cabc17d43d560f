//! Update table throughput.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{BillingMode, ProvisionedThroughput};
use std::time::Duration;

use super::{TableSummary, ThroughputMode, wait_for_table_active};
use crate::errors::{AwsService, Result, map_sdk_error};

/// Switch a table to on-demand, or to provisioned with the given units.
pub async fn update_throughput(
    client: &Client,
    table_name: &str,
    throughput: ThroughputMode,
    wait: Option<Duration>,
) -> Result<TableSummary> {
    let request = client.update_table().table_name(table_name);

    let request = match &throughput {
        ThroughputMode::OnDemand => request.billing_mode(BillingMode::PayPerRequest),
        ThroughputMode::Provisioned {
            read_capacity_units,
            write_capacity_units,
        } => request
            .billing_mode(BillingMode::Provisioned)
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(*read_capacity_units)
                    .write_capacity_units(*write_capacity_units)
                    .build()?,
            ),
    };

    tracing::debug!(table = %table_name, ?throughput, "update_table");

    let output = request
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(table_name)))?;

    match wait {
        Some(max_wait) => wait_for_table_active(client, table_name, max_wait).await,
        None => Ok(output
            .table_description()
            .map(TableSummary::from_description)
            .unwrap_or_else(|| TableSummary {
                table_name: table_name.to_string(),
                ..Default::default()
            })),
    }
}
