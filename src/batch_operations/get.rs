//! Batch get operation for DynamoDB.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{KeysAndAttributes, ReturnConsumedCapacity};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use super::split_into_batches;
use crate::conversions::serialize_items;
use crate::errors::{AwsService, Result, map_sdk_error};
use crate::metrics::{OperationMetrics, total_capacity};
use crate::types::{AttributeMap, ItemKey};

/// Maximum keys per batch get request (DynamoDB limit).
pub const BATCH_GET_MAX_KEYS: usize = 100;

/// Keys to read from one table.
#[derive(Debug, Clone, Default)]
pub struct BatchGetRequest {
    pub table: String,
    pub keys: Vec<ItemKey>,
    pub consistent_read: bool,
    pub projection_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
}

impl BatchGetRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn key(mut self, key: ItemKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn keys(mut self, keys: impl IntoIterator<Item = ItemKey>) -> Self {
        self.keys.extend(keys);
        self
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

/// Result of a batch get. Items come back in no particular order.
///
/// `unprocessed_keys` holds one entry per call that left keys unread, ready
/// to be resubmitted as-is.
#[derive(Debug, Clone, Serialize)]
pub struct BatchGetResult {
    #[serde(serialize_with = "serialize_items")]
    pub items: Vec<AttributeMap>,
    pub unprocessed_count: usize,
    #[serde(skip)]
    pub unprocessed_keys: Vec<KeysAndAttributes>,
    pub metrics: OperationMetrics,
}

/// Execute a batch get, one `BatchGetItem` call per 100 keys.
pub async fn execute_batch_get(
    client: &Client,
    request: BatchGetRequest,
) -> Result<BatchGetResult> {
    let BatchGetRequest {
        table,
        keys,
        consistent_read,
        projection_expression,
        expression_attribute_names,
    } = request;

    let mut result = BatchGetResult {
        items: Vec::new(),
        unprocessed_count: 0,
        unprocessed_keys: Vec::new(),
        metrics: OperationMetrics::default(),
    };

    if keys.is_empty() {
        return Ok(result);
    }

    let names = if expression_attribute_names.is_empty() {
        None
    } else {
        Some(expression_attribute_names)
    };

    for chunk in split_into_batches(keys, BATCH_GET_MAX_KEYS) {
        let chunk_len = chunk.len();
        let chunk_keys: Vec<AttributeMap> =
            chunk.into_iter().map(ItemKey::into_attribute_map).collect();

        let keys_and_attrs = KeysAndAttributes::builder()
            .set_keys(Some(chunk_keys))
            .consistent_read(consistent_read)
            .set_projection_expression(projection_expression.clone())
            .set_expression_attribute_names(names.clone())
            .build()?;

        let mut request_items = HashMap::new();
        request_items.insert(table.clone(), keys_and_attrs);

        tracing::debug!(table = %table, keys = chunk_len, "batch_get_item");

        let start = Instant::now();
        let output = client
            .batch_get_item()
            .set_request_items(Some(request_items))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(&table)))?;
        let duration_ms = OperationMetrics::elapsed_ms(start);

        let items = output
            .responses
            .and_then(|mut tables| tables.remove(&table))
            .unwrap_or_default();

        let unprocessed = output
            .unprocessed_keys
            .and_then(|mut tables| tables.remove(&table))
            .filter(|ka| !ka.keys().is_empty());

        result.metrics.absorb(&OperationMetrics::with_capacity(
            duration_ms,
            total_capacity(output.consumed_capacity.as_deref().unwrap_or_default()),
            None,
            Some(items.len()),
        ));

        if let Some(unprocessed) = unprocessed {
            let count = unprocessed.keys().len();
            tracing::warn!(table = %table, unprocessed = count, "batch get left unprocessed keys");
            result.unprocessed_count += count;
            result.unprocessed_keys.push(unprocessed);
        }
        result.items.extend(items);
    }

    Ok(result)
}
