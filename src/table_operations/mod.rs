//! Table management operations for DynamoDB.
//!
//! This module provides table lifecycle operations:
//! - `create` - Create a table from a `TableDescriptor`
//! - `update` - Switch between on-demand and provisioned throughput
//! - `delete` - Delete a table
//! - `describe` - Describe, check existence and list tables
//! - `streams` - Enable or disable the table stream
//! - `global` - Global table replicas and settings
//! - `wait` - Wait for a table to become active or disappear

mod create;
mod delete;
mod describe;
mod global;
mod streams;
mod update;
mod wait;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType, StreamViewType,
    TableDescription,
};
use serde::Serialize;
use std::time::Duration;

use crate::errors::Result;

pub use create::create_table;
pub use delete::delete_table;
pub use describe::{describe_table, list_tables, table_exists};
pub use global::{
    GlobalTableSettingsSummary, GlobalTableSummary, add_replica, update_global_table,
    update_global_table_settings,
};
pub use streams::{disable_streams, enable_streams};
pub use update::update_throughput;
pub use wait::{wait_for_table_active, wait_for_table_deleted};

/// Default maximum time to wait for a table state change.
pub const DEFAULT_TABLE_WAIT: Duration = Duration::from_secs(500);

/// Role of a key attribute in the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Partition,
    Sort,
}

impl KeyRole {
    fn key_type(self) -> KeyType {
        match self {
            KeyRole::Partition => KeyType::Hash,
            KeyRole::Sort => KeyType::Range,
        }
    }
}

/// One attribute of the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: ScalarAttributeType,
    pub role: KeyRole,
}

/// Capacity mode of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThroughputMode {
    OnDemand,
    Provisioned {
        read_capacity_units: i64,
        write_capacity_units: i64,
    },
}

/// Everything needed to create a table.
///
/// ```
/// use dynokit::ScalarAttributeType;
/// use dynokit::table_operations::TableDescriptor;
///
/// let music = TableDescriptor::new("Music")
///     .partition_key("Artist", ScalarAttributeType::S)
///     .sort_key("SongTitle", ScalarAttributeType::S)
///     .provisioned(10, 10);
/// assert_eq!(music.key_schema.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    pub name: String,
    pub key_schema: Vec<KeyAttribute>,
    pub throughput: ThroughputMode,
    pub stream_view_type: Option<StreamViewType>,
    pub replica_regions: Vec<String>,
}

impl TableDescriptor {
    /// New on-demand table with no keys yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_schema: Vec::new(),
            throughput: ThroughputMode::OnDemand,
            stream_view_type: None,
            replica_regions: Vec::new(),
        }
    }

    pub fn partition_key(
        self,
        name: impl Into<String>,
        attribute_type: ScalarAttributeType,
    ) -> Self {
        self.key(name, attribute_type, KeyRole::Partition)
    }

    pub fn sort_key(self, name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        self.key(name, attribute_type, KeyRole::Sort)
    }

    fn key(
        mut self,
        name: impl Into<String>,
        attribute_type: ScalarAttributeType,
        role: KeyRole,
    ) -> Self {
        self.key_schema.retain(|k| k.role != role);
        self.key_schema.push(KeyAttribute {
            name: name.into(),
            attribute_type,
            role,
        });
        // Partition key first, DynamoDB rejects any other order.
        self.key_schema.sort_by_key(|k| k.role != KeyRole::Partition);
        self
    }

    pub fn on_demand(mut self) -> Self {
        self.throughput = ThroughputMode::OnDemand;
        self
    }

    pub fn provisioned(mut self, read_capacity_units: i64, write_capacity_units: i64) -> Self {
        self.throughput = ThroughputMode::Provisioned {
            read_capacity_units,
            write_capacity_units,
        };
        self
    }

    pub fn stream(mut self, view_type: StreamViewType) -> Self {
        self.stream_view_type = Some(view_type);
        self
    }

    /// Add a replica region (global tables version 2019.11.21).
    pub fn replica(mut self, region: impl Into<String>) -> Self {
        self.replica_regions.push(region.into());
        self
    }

    /// Attribute definitions derived from the key schema.
    pub fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>> {
        self.key_schema
            .iter()
            .map(|k| {
                AttributeDefinition::builder()
                    .attribute_name(&k.name)
                    .attribute_type(k.attribute_type.clone())
                    .build()
                    .map_err(Into::into)
            })
            .collect()
    }

    pub fn key_schema_elements(&self) -> Result<Vec<KeySchemaElement>> {
        self.key_schema
            .iter()
            .map(|k| {
                KeySchemaElement::builder()
                    .attribute_name(&k.name)
                    .key_type(k.role.key_type())
                    .build()
                    .map_err(Into::into)
            })
            .collect()
    }
}

/// One key schema entry as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySummary {
    pub attribute_name: String,
    pub key_type: String,
}

/// Printable view of a `TableDescription`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSummary {
    pub table_name: String,
    pub table_status: Option<String>,
    pub key_schema: Vec<KeySummary>,
    pub billing_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<i64>,
    pub stream_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_stream_arn: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replica_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
}

impl TableSummary {
    pub fn from_description(table: &TableDescription) -> Self {
        let throughput = table.provisioned_throughput();
        let billing_mode = table
            .billing_mode_summary()
            .and_then(|b| b.billing_mode())
            .map(|m| m.as_str().to_string())
            // Tables created before on-demand existed carry no summary.
            .or_else(|| throughput.map(|_| "PROVISIONED".to_string()));

        let stream = table.stream_specification();

        Self {
            table_name: table.table_name().unwrap_or_default().to_string(),
            table_status: table.table_status().map(|s| s.as_str().to_string()),
            key_schema: table
                .key_schema()
                .iter()
                .map(|k| KeySummary {
                    attribute_name: k.attribute_name().to_string(),
                    key_type: k.key_type().as_str().to_string(),
                })
                .collect(),
            billing_mode,
            read_capacity_units: throughput.and_then(|t| t.read_capacity_units()),
            write_capacity_units: throughput.and_then(|t| t.write_capacity_units()),
            stream_enabled: stream.map(|s| s.stream_enabled()).unwrap_or(false),
            stream_view_type: stream
                .and_then(|s| s.stream_view_type())
                .map(|v| v.as_str().to_string()),
            latest_stream_arn: table.latest_stream_arn().map(str::to_string),
            replica_regions: table
                .replicas()
                .iter()
                .filter_map(|r| r.region_name().map(str::to_string))
                .collect(),
            item_count: table.item_count(),
            table_arn: table.table_arn().map(str::to_string),
        }
    }

    pub fn is_on_demand(&self) -> bool {
        self.billing_mode.as_deref() == Some("PAY_PER_REQUEST")
    }
}

/// One page of table names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableList {
    pub table_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_table_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::{
        BillingMode, BillingModeSummary, ProvisionedThroughputDescription, ReplicaDescription,
        StreamSpecification, TableStatus,
    };

    #[test]
    fn attribute_definitions_follow_key_schema() {
        let descriptor = TableDescriptor::new("Music")
            .sort_key("SongTitle", ScalarAttributeType::S)
            .partition_key("Artist", ScalarAttributeType::S);

        let keys = descriptor.key_schema_elements().unwrap();
        assert_eq!(keys[0].attribute_name(), "Artist");
        assert_eq!(keys[0].key_type(), &KeyType::Hash);
        assert_eq!(keys[1].attribute_name(), "SongTitle");
        assert_eq!(keys[1].key_type(), &KeyType::Range);

        let definitions = descriptor.attribute_definitions().unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].attribute_name(), "Artist");
        assert_eq!(definitions[0].attribute_type(), &ScalarAttributeType::S);
    }

    #[test]
    fn redefining_a_key_replaces_it() {
        let descriptor = TableDescriptor::new("Music")
            .partition_key("Artist", ScalarAttributeType::S)
            .partition_key("ArtistId", ScalarAttributeType::N);
        assert_eq!(descriptor.key_schema.len(), 1);
        assert_eq!(descriptor.key_schema[0].name, "ArtistId");
    }

    #[test]
    fn descriptor_defaults_to_on_demand() {
        let descriptor = TableDescriptor::new("Music").stream(StreamViewType::NewAndOldImages);
        assert_eq!(descriptor.throughput, ThroughputMode::OnDemand);
        assert_eq!(descriptor.stream_view_type, Some(StreamViewType::NewAndOldImages));

        let provisioned = descriptor.provisioned(10, 5).replica("eu-west-1");
        assert_eq!(
            provisioned.throughput,
            ThroughputMode::Provisioned {
                read_capacity_units: 10,
                write_capacity_units: 5
            }
        );
        assert_eq!(provisioned.replica_regions, vec!["eu-west-1".to_string()]);
    }

    #[test]
    fn summary_of_on_demand_table_with_stream() {
        let description = TableDescription::builder()
            .table_name("Music")
            .table_status(TableStatus::Active)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("Artist")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .billing_mode_summary(
                BillingModeSummary::builder()
                    .billing_mode(BillingMode::PayPerRequest)
                    .build(),
            )
            .stream_specification(
                StreamSpecification::builder()
                    .stream_enabled(true)
                    .stream_view_type(StreamViewType::NewAndOldImages)
                    .build()
                    .unwrap(),
            )
            .replicas(ReplicaDescription::builder().region_name("eu-west-1").build())
            .item_count(3)
            .build();

        let summary = TableSummary::from_description(&description);
        assert_eq!(summary.table_name, "Music");
        assert_eq!(summary.table_status.as_deref(), Some("ACTIVE"));
        assert!(summary.is_on_demand());
        assert!(summary.stream_enabled);
        assert_eq!(summary.stream_view_type.as_deref(), Some("NEW_AND_OLD_IMAGES"));
        assert_eq!(summary.replica_regions, vec!["eu-west-1".to_string()]);
        assert_eq!(summary.key_schema[0].key_type, "HASH");
        assert_eq!(summary.item_count, Some(3));
    }

    #[test]
    fn summary_without_billing_summary_is_provisioned() {
        let description = TableDescription::builder()
            .table_name("Music")
            .provisioned_throughput(
                ProvisionedThroughputDescription::builder()
                    .read_capacity_units(10)
                    .write_capacity_units(10)
                    .build(),
            )
            .build();

        let summary = TableSummary::from_description(&description);
        assert_eq!(summary.billing_mode.as_deref(), Some("PROVISIONED"));
        assert_eq!(summary.read_capacity_units, Some(10));
        assert!(!summary.stream_enabled);
        assert!(!summary.is_on_demand());
    }
}
