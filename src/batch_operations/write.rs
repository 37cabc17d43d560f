//! Batch write operations for DynamoDB.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{DeleteRequest, PutRequest, ReturnConsumedCapacity, WriteRequest};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use super::split_into_batches;
use crate::errors::{AwsService, Result, map_sdk_error};
use crate::metrics::{OperationMetrics, total_capacity};
use crate::types::{AttributeMap, ItemKey};

/// Maximum items per batch write request (DynamoDB limit).
pub const BATCH_WRITE_MAX_ITEMS: usize = 25;

/// Puts and deletes against one table.
#[derive(Debug, Clone, Default)]
pub struct BatchWriteRequest {
    pub table: String,
    pub put_items: Vec<AttributeMap>,
    pub delete_keys: Vec<ItemKey>,
}

impl BatchWriteRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn put(mut self, item: AttributeMap) -> Self {
        self.put_items.push(item);
        self
    }

    pub fn delete(mut self, key: ItemKey) -> Self {
        self.delete_keys.push(key);
        self
    }

    pub fn len(&self) -> usize {
        self.put_items.len() + self.delete_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a batch write.
///
/// `unprocessed_items` keeps the requests the service did not apply so the
/// caller can decide whether to resubmit them.
#[derive(Debug, Clone, Serialize)]
pub struct BatchWriteResult {
    pub requests_sent: usize,
    pub unprocessed_count: usize,
    #[serde(skip)]
    pub unprocessed_items: Vec<WriteRequest>,
    pub metrics: OperationMetrics,
}

/// Convert puts then deletes into SDK write requests, in that order.
pub fn build_write_requests(
    put_items: Vec<AttributeMap>,
    delete_keys: Vec<ItemKey>,
) -> Result<Vec<WriteRequest>> {
    let mut requests = Vec::with_capacity(put_items.len() + delete_keys.len());

    for item in put_items {
        let put_request = PutRequest::builder().set_item(Some(item)).build()?;
        requests.push(WriteRequest::builder().put_request(put_request).build());
    }

    for key in delete_keys {
        let delete_request = DeleteRequest::builder()
            .set_key(Some(key.into_attribute_map()))
            .build()?;
        requests.push(
            WriteRequest::builder()
                .delete_request(delete_request)
                .build(),
        );
    }

    Ok(requests)
}

/// Execute a batch write, one `BatchWriteItem` call per 25 requests.
pub async fn execute_batch_write(
    client: &Client,
    request: BatchWriteRequest,
) -> Result<BatchWriteResult> {
    let table = request.table;
    let all_requests = build_write_requests(request.put_items, request.delete_keys)?;

    let mut result = BatchWriteResult {
        requests_sent: all_requests.len(),
        unprocessed_count: 0,
        unprocessed_items: Vec::new(),
        metrics: OperationMetrics::default(),
    };

    if all_requests.is_empty() {
        return Ok(result);
    }

    for chunk in split_into_batches(all_requests, BATCH_WRITE_MAX_ITEMS) {
        let chunk_len = chunk.len();
        let mut request_items = HashMap::new();
        request_items.insert(table.clone(), chunk);

        tracing::debug!(table = %table, requests = chunk_len, "batch_write_item");

        let start = Instant::now();
        let output = client
            .batch_write_item()
            .set_request_items(Some(request_items))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, Some(&table)))?;
        let duration_ms = OperationMetrics::elapsed_ms(start);

        let unprocessed = output
            .unprocessed_items
            .and_then(|mut tables| tables.remove(&table))
            .unwrap_or_default();

        let processed = chunk_len - unprocessed.len().min(chunk_len);
        result.metrics.absorb(&OperationMetrics::with_capacity(
            duration_ms,
            None,
            total_capacity(output.consumed_capacity.as_deref().unwrap_or_default()),
            Some(processed),
        ));

        if !unprocessed.is_empty() {
            tracing::warn!(
                table = %table,
                unprocessed = unprocessed.len(),
                "batch write left unprocessed items"
            );
            result.unprocessed_count += unprocessed.len();
            result.unprocessed_items.extend(unprocessed);
        }
    }

    Ok(result)
}
