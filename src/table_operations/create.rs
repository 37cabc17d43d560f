//! Create table operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{BillingMode, ProvisionedThroughput, StreamSpecification};
use std::time::Duration;

use super::{TableDescriptor, TableSummary, ThroughputMode, add_replica, wait_for_table_active};
use crate::errors::{AwsService, DynokitError, Result, map_sdk_error};

/// Create a table.
///
/// With `wait` set, blocks until the table is ACTIVE. Replica regions need
/// an ACTIVE table, so they are only added when waiting.
pub async fn create_table(
    client: &Client,
    descriptor: TableDescriptor,
    wait: Option<Duration>,
) -> Result<TableSummary> {
    if descriptor.key_schema.is_empty() {
        return Err(DynokitError::Validation(format!(
            "table '{}' needs a partition key",
            descriptor.name
        )));
    }
    if !descriptor.replica_regions.is_empty() && wait.is_none() {
        return Err(DynokitError::Validation(
            "replica regions can only be added once the table is active, set a wait".to_string(),
        ));
    }

    let mut request = client
        .create_table()
        .table_name(&descriptor.name)
        .set_attribute_definitions(Some(descriptor.attribute_definitions()?))
        .set_key_schema(Some(descriptor.key_schema_elements()?));

    request = match descriptor.throughput {
        ThroughputMode::OnDemand => request.billing_mode(BillingMode::PayPerRequest),
        ThroughputMode::Provisioned {
            read_capacity_units,
            write_capacity_units,
        } => {
            let throughput = ProvisionedThroughput::builder()
                .read_capacity_units(read_capacity_units)
                .write_capacity_units(write_capacity_units)
                .build()?;
            request
                .billing_mode(BillingMode::Provisioned)
                .provisioned_throughput(throughput)
        }
    };

    if let Some(view_type) = descriptor.stream_view_type.clone() {
        let stream = StreamSpecification::builder()
            .stream_enabled(true)
            .stream_view_type(view_type)
            .build()?;
        request = request.stream_specification(stream);
    }

    tracing::debug!(table = %descriptor.name, throughput = ?descriptor.throughput, "create_table");

    let output = request
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(&descriptor.name)))?;

    tracing::info!(table = %descriptor.name, "table creation started");

    let mut summary = output
        .table_description()
        .map(TableSummary::from_description)
        .unwrap_or_else(|| TableSummary {
            table_name: descriptor.name.clone(),
            ..Default::default()
        });

    if let Some(max_wait) = wait {
        summary = wait_for_table_active(client, &descriptor.name, max_wait).await?;

        for region in &descriptor.replica_regions {
            add_replica(client, &descriptor.name, region).await?;
            summary = wait_for_table_active(client, &descriptor.name, max_wait).await?;
        }
    }

    Ok(summary)
}
