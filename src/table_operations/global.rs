//! Global table replicas.
//!
//! `update_global_table` and `update_global_table_settings` use the
//! 2017.11.29 global tables API. `add_replica` uses `UpdateTable` replica
//! updates (version 2019.11.21).

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    CreateReplicaAction, CreateReplicationGroupMemberAction, GlobalTableDescription,
    ReplicaUpdate, ReplicationGroupUpdate,
};
use serde::Serialize;

use super::TableSummary;
use crate::errors::{AwsService, Result, map_sdk_error};

/// Printable view of a `GlobalTableDescription`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalTableSummary {
    pub global_table_name: String,
    pub global_table_status: Option<String>,
    pub replica_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_table_arn: Option<String>,
}

impl GlobalTableSummary {
    pub fn from_description(description: &GlobalTableDescription) -> Self {
        Self {
            global_table_name: description
                .global_table_name()
                .unwrap_or_default()
                .to_string(),
            global_table_status: description
                .global_table_status()
                .map(|s| s.as_str().to_string()),
            replica_regions: description
                .replication_group()
                .iter()
                .filter_map(|r| r.region_name().map(str::to_string))
                .collect(),
            global_table_arn: description.global_table_arn().map(str::to_string),
        }
    }
}

/// Regions reported after a settings update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalTableSettingsSummary {
    pub global_table_name: String,
    pub replica_regions: Vec<String>,
}

/// Add a replica region to a global table.
pub async fn update_global_table(
    client: &Client,
    global_table_name: &str,
    region: &str,
) -> Result<GlobalTableSummary> {
    tracing::debug!(table = %global_table_name, %region, "update_global_table");

    let update = ReplicaUpdate::builder()
        .create(CreateReplicaAction::builder().region_name(region).build()?)
        .build();

    let output = client
        .update_global_table()
        .global_table_name(global_table_name)
        .replica_updates(update)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(global_table_name)))?;

    tracing::info!(table = %global_table_name, %region, "replica requested");

    Ok(output
        .global_table_description()
        .map(GlobalTableSummary::from_description)
        .unwrap_or_else(|| GlobalTableSummary {
            global_table_name: global_table_name.to_string(),
            ..Default::default()
        }))
}

/// Set the provisioned write capacity shared by every replica.
pub async fn update_global_table_settings(
    client: &Client,
    global_table_name: &str,
    write_capacity_units: i64,
) -> Result<GlobalTableSettingsSummary> {
    tracing::debug!(
        table = %global_table_name,
        write_capacity_units,
        "update_global_table_settings"
    );

    let output = client
        .update_global_table_settings()
        .global_table_name(global_table_name)
        .global_table_provisioned_write_capacity_units(write_capacity_units)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(global_table_name)))?;

    Ok(GlobalTableSettingsSummary {
        global_table_name: output
            .global_table_name()
            .unwrap_or(global_table_name)
            .to_string(),
        replica_regions: output
            .replica_settings()
            .iter()
            .map(|r| r.region_name().to_string())
            .collect(),
    })
}

/// Add a replica through `UpdateTable`.
pub async fn add_replica(client: &Client, table_name: &str, region: &str) -> Result<TableSummary> {
    tracing::debug!(table = %table_name, %region, "update_table add replica");

    let update = ReplicationGroupUpdate::builder()
        .create(
            CreateReplicationGroupMemberAction::builder()
                .region_name(region)
                .build()?,
        )
        .build();

    let output = client
        .update_table()
        .table_name(table_name)
        .replica_updates(update)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(table_name)))?;

    tracing::info!(table = %table_name, %region, "replica requested");

    Ok(output
        .table_description()
        .map(TableSummary::from_description)
        .unwrap_or_else(|| TableSummary {
            table_name: table_name.to_string(),
            ..Default::default()
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::{GlobalTableStatus, ReplicaDescription};

    #[test]
    fn global_summary_lists_replicas() {
        let description = GlobalTableDescription::builder()
            .global_table_name("Music")
            .global_table_status(GlobalTableStatus::Updating)
            .replication_group(ReplicaDescription::builder().region_name("us-west-2").build())
            .replication_group(ReplicaDescription::builder().region_name("eu-west-1").build())
            .build();

        let summary = GlobalTableSummary::from_description(&description);
        assert_eq!(summary.global_table_name, "Music");
        assert_eq!(summary.global_table_status.as_deref(), Some("UPDATING"));
        assert_eq!(summary.replica_regions, vec!["us-west-2", "eu-west-1"]);
        assert!(summary.global_table_arn.is_none());
    }
}
