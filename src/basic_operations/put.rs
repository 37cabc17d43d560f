//! Put item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeValue, ReturnConsumedCapacity, ReturnValue, ReturnValuesOnConditionCheckFailure,
};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use super::non_empty;
use crate::conversions::serialize_optional_item;
use crate::errors::{Result, map_sdk_error_with_item};
use crate::metrics::OperationMetrics;
use crate::types::AttributeMap;

/// PutItem request. PutItem only supports `NONE` and `ALL_OLD` return values.
#[derive(Debug, Clone)]
pub struct PutItemRequest {
    pub table: String,
    pub item: AttributeMap,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
    pub expression_attribute_values: AttributeMap,
    pub return_old_values: bool,
    pub return_item_on_condition_failure: bool,
}

impl PutItemRequest {
    pub fn new(table: impl Into<String>, item: AttributeMap) -> Self {
        Self {
            table: table.into(),
            item,
            condition_expression: None,
            expression_attribute_names: HashMap::new(),
            expression_attribute_values: HashMap::new(),
            return_old_values: false,
            return_item_on_condition_failure: false,
        }
    }

    pub fn condition(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
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

    pub fn value(mut self, placeholder: impl Into<String>, value: AttributeValue) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value);
        self
    }

    pub fn return_old_values(mut self) -> Self {
        self.return_old_values = true;
        self
    }

    pub fn return_item_on_condition_failure(mut self) -> Self {
        self.return_item_on_condition_failure = true;
        self
    }
}

/// Result of a put_item operation. `attributes` holds the replaced item
/// when `return_old_values` was set.
#[derive(Debug, Clone, Serialize)]
pub struct PutItemResult {
    #[serde(serialize_with = "serialize_optional_item")]
    pub attributes: Option<AttributeMap>,
    pub metrics: OperationMetrics,
}

/// Core async put_item operation.
pub async fn execute_put_item(client: &Client, request: PutItemRequest) -> Result<PutItemResult> {
    tracing::debug!(
        table = %request.table,
        attributes = request.item.len(),
        conditional = request.condition_expression.is_some(),
        "put_item"
    );

    let mut builder = client
        .put_item()
        .table_name(&request.table)
        .set_item(Some(request.item))
        .set_condition_expression(request.condition_expression)
        .set_expression_attribute_names(non_empty(request.expression_attribute_names))
        .set_expression_attribute_values(non_empty(request.expression_attribute_values))
        .return_consumed_capacity(ReturnConsumedCapacity::Total);

    if request.return_old_values {
        builder = builder.return_values(ReturnValue::AllOld);
    }
    if request.return_item_on_condition_failure {
        builder = builder
            .return_values_on_condition_check_failure(ReturnValuesOnConditionCheckFailure::AllOld);
    }

    let start = Instant::now();
    let result = builder.send().await;
    let duration_ms = OperationMetrics::elapsed_ms(start);

    match result {
        Ok(output) => {
            let consumed_wcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            Ok(PutItemResult {
                attributes: output.attributes,
                metrics: OperationMetrics::with_capacity(duration_ms, None, consumed_wcu, None),
            })
        }
        Err(e) => {
            let item = extract_item_from_put_error(&e);
            Err(map_sdk_error_with_item(e, &request.table, item))
        }
    }
}

/// Extract the item from a ConditionalCheckFailedException.
fn extract_item_from_put_error(
    err: &aws_sdk_dynamodb::error::SdkError<aws_sdk_dynamodb::operation::put_item::PutItemError>,
) -> Option<AttributeMap> {
    use aws_sdk_dynamodb::operation::put_item::PutItemError;

    if let aws_sdk_dynamodb::error::SdkError::ServiceError(service_err) = err
        && let PutItemError::ConditionalCheckFailedException(ccf) = service_err.err()
    {
        return ccf.item().cloned();
    }
    None
}
