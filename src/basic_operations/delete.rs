//! Delete item operation.

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
use crate::types::{AttributeMap, ItemKey};

/// DeleteItem request. DeleteItem only supports `NONE` and `ALL_OLD`.
///
/// ```
/// use dynokit::{AttributeValue, ItemKey};
/// use dynokit::basic_operations::DeleteItemRequest;
///
/// let request = DeleteItemRequest::new(
///     "RetailDatabase",
///     ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata"),
/// )
/// .condition("age <= :max_age")
/// .value(":max_age", AttributeValue::N("30".to_string()));
/// assert!(request.condition_expression.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct DeleteItemRequest {
    pub table: String,
    pub key: ItemKey,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
    pub expression_attribute_values: AttributeMap,
    pub return_old_values: bool,
    pub return_item_on_condition_failure: bool,
}

impl DeleteItemRequest {
    pub fn new(table: impl Into<String>, key: ItemKey) -> Self {
        Self {
            table: table.into(),
            key,
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

/// Result of a delete_item operation.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteItemResult {
    #[serde(serialize_with = "serialize_optional_item")]
    pub attributes: Option<AttributeMap>,
    pub metrics: OperationMetrics,
}

/// Core async delete_item operation.
pub async fn execute_delete_item(
    client: &Client,
    request: DeleteItemRequest,
) -> Result<DeleteItemResult> {
    tracing::debug!(
        table = %request.table,
        key = ?request.key,
        condition = ?request.condition_expression,
        "delete_item"
    );

    let mut builder = client
        .delete_item()
        .table_name(&request.table)
        .set_key(Some(request.key.into_attribute_map()))
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
            Ok(DeleteItemResult {
                attributes: output.attributes,
                metrics: OperationMetrics::with_capacity(duration_ms, None, consumed_wcu, None),
            })
        }
        Err(e) => {
            let item = extract_item_from_delete_error(&e);
            Err(map_sdk_error_with_item(e, &request.table, item))
        }
    }
}

/// Extract the item from a ConditionalCheckFailedException.
fn extract_item_from_delete_error(
    err: &aws_sdk_dynamodb::error::SdkError<
        aws_sdk_dynamodb::operation::delete_item::DeleteItemError,
    >,
) -> Option<AttributeMap> {
    use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;

    if let aws_sdk_dynamodb::error::SdkError::ServiceError(service_err) = err
        && let DeleteItemError::ConditionalCheckFailedException(ccf) = service_err.err()
    {
        return ccf.item().cloned();
    }
    None
}
