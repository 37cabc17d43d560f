//! Update item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeValue, ReturnConsumedCapacity, ReturnValue, ReturnValuesOnConditionCheckFailure,
};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use super::non_empty;
use crate::conversions::serialize_optional_item;
use crate::errors::{DynokitError, Result, map_sdk_error_with_item};
use crate::metrics::OperationMetrics;
use crate::types::{AttributeMap, ItemKey};

/// UpdateItem request.
///
/// Either give a raw `update_expression` or a list of `set` fields that is
/// turned into `SET #f0 = :v0, ...`, not both.
#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub table: String,
    pub key: ItemKey,
    pub update_expression: Option<String>,
    pub set_fields: Vec<(String, AttributeValue)>,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
    pub expression_attribute_values: AttributeMap,
    pub return_values: Option<ReturnValue>,
    pub return_item_on_condition_failure: bool,
}

impl UpdateItemRequest {
    pub fn new(table: impl Into<String>, key: ItemKey) -> Self {
        Self {
            table: table.into(),
            key,
            update_expression: None,
            set_fields: Vec::new(),
            condition_expression: None,
            expression_attribute_names: HashMap::new(),
            expression_attribute_values: HashMap::new(),
            return_values: None,
            return_item_on_condition_failure: false,
        }
    }

    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.update_expression = Some(expression.into());
        self
    }

    /// Set a top-level attribute. The name is always bound through a
    /// placeholder, so reserved words are safe.
    pub fn set(mut self, field: impl Into<String>, value: AttributeValue) -> Self {
        self.set_fields.push((field.into(), value));
        self
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

    pub fn return_values(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }

    pub fn return_item_on_condition_failure(mut self) -> Self {
        self.return_item_on_condition_failure = true;
        self
    }

    /// Final update expression with auto-generated placeholders merged into
    /// the caller's names and values. Generated placeholders skip any name
    /// the caller already bound.
    fn resolve_expression(&mut self) -> Result<String> {
        match (self.update_expression.take(), self.set_fields.is_empty()) {
            (Some(_), false) => Err(DynokitError::Validation(
                "give either an update expression or SET fields, not both".to_string(),
            )),
            (Some(expr), true) => Ok(expr),
            (None, false) => {
                let fields = std::mem::take(&mut self.set_fields);
                let (expr, names, values) = set_expression_avoiding(
                    fields,
                    &self.expression_attribute_names,
                    &self.expression_attribute_values,
                );
                self.expression_attribute_names.extend(names);
                self.expression_attribute_values.extend(values);
                Ok(expr)
            }
            (None, true) => Err(DynokitError::Validation(
                "either SET fields or an update expression must be provided".to_string(),
            )),
        }
    }
}

/// Result of an update_item operation.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateItemResult {
    #[serde(serialize_with = "serialize_optional_item")]
    pub attributes: Option<AttributeMap>,
    pub metrics: OperationMetrics,
}

/// Core async update_item operation.
pub async fn execute_update_item(
    client: &Client,
    mut request: UpdateItemRequest,
) -> Result<UpdateItemResult> {
    let update_expression = request.resolve_expression()?;
    tracing::debug!(table = %request.table, key = ?request.key, %update_expression, "update_item");

    let has_return_values = request.return_values.is_some();

    let mut builder = client
        .update_item()
        .table_name(&request.table)
        .set_key(Some(request.key.into_attribute_map()))
        .update_expression(update_expression)
        .set_condition_expression(request.condition_expression)
        .set_expression_attribute_names(non_empty(request.expression_attribute_names))
        .set_expression_attribute_values(non_empty(request.expression_attribute_values))
        .return_consumed_capacity(ReturnConsumedCapacity::Total);

    if let Some(rv) = request.return_values {
        builder = builder.return_values(rv);
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
            let attributes = if has_return_values {
                output.attributes
            } else {
                None
            };
            Ok(UpdateItemResult {
                attributes,
                metrics: OperationMetrics::with_capacity(duration_ms, None, consumed_wcu, None),
            })
        }
        Err(e) => {
            let item = extract_item_from_update_error(&e);
            Err(map_sdk_error_with_item(e, &request.table, item))
        }
    }
}

/// Extract the item from a ConditionalCheckFailedException.
fn extract_item_from_update_error(
    err: &aws_sdk_dynamodb::error::SdkError<
        aws_sdk_dynamodb::operation::update_item::UpdateItemError,
    >,
) -> Option<AttributeMap> {
    use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

    if let aws_sdk_dynamodb::error::SdkError::ServiceError(service_err) = err
        && let UpdateItemError::ConditionalCheckFailedException(ccf) = service_err.err()
    {
        return ccf.item().cloned();
    }
    None
}

/// Build a SET update expression from field:value pairs.
#[allow(clippy::type_complexity)]
pub fn build_set_expression(
    fields: Vec<(String, AttributeValue)>,
) -> (String, HashMap<String, String>, AttributeMap) {
    set_expression_avoiding(fields, &HashMap::new(), &HashMap::new())
}

/// `build_set_expression`, skipping `#fN`/`:vN` pairs already present in
/// `taken_names` or `taken_values`.
#[allow(clippy::type_complexity)]
fn set_expression_avoiding(
    fields: Vec<(String, AttributeValue)>,
    taken_names: &HashMap<String, String>,
    taken_values: &AttributeMap,
) -> (String, HashMap<String, String>, AttributeMap) {
    let mut set_parts = Vec::with_capacity(fields.len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();
    let mut next = 0usize;

    for (field, value) in fields {
        let (name_placeholder, value_placeholder) = loop {
            let name = format!("#f{}", next);
            let value = format!(":v{}", next);
            next += 1;
            if !taken_names.contains_key(&name) && !taken_values.contains_key(&value) {
                break (name, value);
            }
        };

        set_parts.push(format!("{} = {}", name_placeholder, value_placeholder));
        names.insert(name_placeholder, field);
        values.insert(value_placeholder, value);
    }

    let expression = format!("SET {}", set_parts.join(", "));
    (expression, names, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_expression_uses_positional_placeholders() {
        let (expr, names, values) = build_set_expression(vec![
            ("name".to_string(), AttributeValue::S("Jose Schneller".to_string())),
            ("age".to_string(), AttributeValue::N("28".to_string())),
        ]);

        assert_eq!(expr, "SET #f0 = :v0, #f1 = :v1");
        assert_eq!(names["#f0"], "name");
        assert_eq!(names["#f1"], "age");
        assert_eq!(values[":v1"], AttributeValue::N("28".to_string()));
    }

    #[test]
    fn explicit_expression_passes_through() {
        let mut request = UpdateItemRequest::new("RetailDatabase", ItemKey::new("pk", "a"))
            .expression("set address.road = :r")
            .value(":r", AttributeValue::S("8123 Updated Rd".to_string()));

        assert_eq!(request.resolve_expression().unwrap(), "set address.road = :r");
        assert!(request.expression_attribute_names.is_empty());
    }

    #[test]
    fn set_fields_merge_with_caller_values() {
        let mut request = UpdateItemRequest::new("RetailDatabase", ItemKey::new("pk", "a"))
            .set("username", AttributeValue::S("joses".to_string()))
            .condition("attribute_exists(pk) AND age < :limit")
            .value(":limit", AttributeValue::N("99".to_string()));

        assert_eq!(request.resolve_expression().unwrap(), "SET #f0 = :v0");
        assert_eq!(request.expression_attribute_names["#f0"], "username");
        assert_eq!(request.expression_attribute_values.len(), 2);
    }

    #[test]
    fn generated_placeholders_skip_caller_bindings() {
        let mut request = UpdateItemRequest::new("RetailDatabase", ItemKey::new("pk", "a"))
            .set("age", AttributeValue::N("28".to_string()))
            .set("username", AttributeValue::S("joses".to_string()))
            .condition("#f0 = :expected AND #f2 <> :v1")
            .attribute_name("#f0", "status")
            .attribute_name("#f2", "tier")
            .value(":expected", AttributeValue::S("active".to_string()))
            .value(":v1", AttributeValue::S("gold".to_string()));

        assert_eq!(request.resolve_expression().unwrap(), "SET #f3 = :v3, #f4 = :v4");

        let names = &request.expression_attribute_names;
        assert_eq!(names["#f0"], "status");
        assert_eq!(names["#f2"], "tier");
        assert_eq!(names["#f3"], "age");
        assert_eq!(names["#f4"], "username");

        let values = &request.expression_attribute_values;
        assert_eq!(values[":v1"], AttributeValue::S("gold".to_string()));
        assert_eq!(values[":v3"], AttributeValue::N("28".to_string()));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn missing_or_conflicting_update_is_rejected() {
        let mut empty = UpdateItemRequest::new("t", ItemKey::new("pk", "a"));
        assert!(matches!(empty.resolve_expression(), Err(DynokitError::Validation(_))));

        let mut both = UpdateItemRequest::new("t", ItemKey::new("pk", "a"))
            .expression("SET a = :a")
            .set("b", AttributeValue::Bool(true));
        assert!(matches!(both.resolve_expression(), Err(DynokitError::Validation(_))));
    }
}
