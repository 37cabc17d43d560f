//! Get item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::ReturnConsumedCapacity;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use super::non_empty;
use crate::conversions::serialize_optional_item;
use crate::errors::{AwsService, Result, map_sdk_error};
use crate::metrics::OperationMetrics;
use crate::types::{AttributeMap, ItemKey};

/// GetItem request.
#[derive(Debug, Clone)]
pub struct GetItemRequest {
    pub table: String,
    pub key: ItemKey,
    pub consistent_read: bool,
    pub projection_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
}

impl GetItemRequest {
    pub fn new(table: impl Into<String>, key: ItemKey) -> Self {
        Self {
            table: table.into(),
            key,
            consistent_read: false,
            projection_expression: None,
            expression_attribute_names: HashMap::new(),
        }
    }

    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    pub fn projection(mut self, expression: impl Into<String>) -> Self {
        self.projection_expression = Some(expression.into());
        self
    }

    pub fn attribute_name(
        mut self,
        placeholder: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.expression_attribute_names
            .insert(placeholder.into(), name.into());
        self
    }
}

/// Result of a get_item operation. `item` is `None` when no item has the key.
#[derive(Debug, Clone, Serialize)]
pub struct GetItemResult {
    #[serde(serialize_with = "serialize_optional_item")]
    pub item: Option<AttributeMap>,
    pub metrics: OperationMetrics,
}

/// Core async get_item operation.
pub async fn execute_get_item(client: &Client, request: GetItemRequest) -> Result<GetItemResult> {
    tracing::debug!(table = %request.table, key = ?request.key, "get_item");

    let builder = client
        .get_item()
        .table_name(&request.table)
        .set_key(Some(request.key.into_attribute_map()))
        .consistent_read(request.consistent_read)
        .set_projection_expression(request.projection_expression)
        .set_expression_attribute_names(non_empty(request.expression_attribute_names))
        .return_consumed_capacity(ReturnConsumedCapacity::Total);

    let start = Instant::now();
    let result = builder.send().await;
    let duration_ms = OperationMetrics::elapsed_ms(start);

    match result {
        Ok(output) => {
            let consumed_rcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            let item = output.item;
            let items_count = Some(usize::from(item.is_some()));
            Ok(GetItemResult {
                item,
                metrics: OperationMetrics::with_capacity(
                    duration_ms,
                    consumed_rcu,
                    None,
                    items_count,
                ),
            })
        }
        Err(e) => Err(map_sdk_error(e, AwsService::DynamoDB, Some(&request.table))),
    }
}
