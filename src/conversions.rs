//! Type conversions between JSON and DynamoDB AttributeValue.
//!
//! Items are written as `serde_json::json!` literals and converted on the
//! way out; responses are converted back to JSON for printing.

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::Serializer;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::errors::{DynokitError, Result};
use crate::types::AttributeMap;

/// Convert a JSON value to a DynamoDB AttributeValue.
///
/// Handles: null, bool, number, string, array (as `L`), object (as `M`).
/// JSON has no set type, so `SS`/`NS`/`BS` are built with [`string_set`]
/// and [`number_set`].
pub fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute_value).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute_value(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON object to an item.
pub fn item_from_json(value: &Value) -> Result<AttributeMap> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), json_to_attribute_value(v)))
            .collect()),
        other => Err(DynokitError::Serialization(format!(
            "an item must be a JSON object, got {}",
            json_type_name(other)
        ))),
    }
}

/// Build a string set (`SS`). DynamoDB rejects empty sets.
pub fn string_set<I, S>(values: I) -> Result<AttributeValue>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(DynokitError::Serialization(
            "DynamoDB does not support empty sets".to_string(),
        ));
    }
    Ok(AttributeValue::Ss(values))
}

/// Build a number set (`NS`). DynamoDB rejects empty sets.
pub fn number_set<I>(values: I) -> Result<AttributeValue>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<String> = values.into_iter().map(|n| n.to_string()).collect();
    if values.is_empty() {
        return Err(DynokitError::Serialization(
            "DynamoDB does not support empty sets".to_string(),
        ));
    }
    Ok(AttributeValue::Ns(values))
}

/// Convert a DynamoDB AttributeValue to JSON.
///
/// Numbers become JSON integers when they have no fraction or exponent.
/// Binary values are rendered as base64 strings, sets as arrays.
pub fn attribute_value_to_json(value: &AttributeValue) -> Result<Value> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::B(b) => Ok(Value::String(BASE64.encode(b.as_ref()))),
        AttributeValue::L(list) => list
            .iter()
            .map(attribute_value_to_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_json(map),
        AttributeValue::Ss(ss) => Ok(Value::Array(
            ss.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(ns) => ns
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::Bs(bs) => Ok(Value::Array(
            bs.iter()
                .map(|b| Value::String(BASE64.encode(b.as_ref())))
                .collect(),
        )),
        _ => Err(DynokitError::Serialization(
            "unknown DynamoDB AttributeValue type".to_string(),
        )),
    }
}

/// Convert an item to a JSON object.
pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Result<Value> {
    let mut map = Map::with_capacity(item.len());
    for (key, value) in item {
        map.insert(key.clone(), attribute_value_to_json(value)?);
    }
    Ok(Value::Object(map))
}

/// Wrap raw bytes as a binary attribute.
pub fn binary(bytes: impl Into<Vec<u8>>) -> AttributeValue {
    AttributeValue::B(Blob::new(bytes.into()))
}

fn parse_number(n: &str) -> Result<Number> {
    let invalid = || DynokitError::Serialization(format!("invalid number: {}", n));
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Number::from(u));
    }
    // Keeps the exact digits of anything wider than 64 bits.
    if let Ok(number) = n.parse::<Number>() {
        return Ok(number);
    }
    // DynamoDB also accepts forms JSON does not, such as ".5".
    let f: f64 = n.parse().map_err(|_| invalid())?;
    Number::from_f64(f).ok_or_else(invalid)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ========== SERDE HELPERS ==========

/// `serialize_with` helper for an optional item.
pub fn serialize_optional_item<S>(
    item: &Option<AttributeMap>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::Serialize;
    use serde::ser::Error;

    match item {
        Some(item) => item_to_json(item)
            .map_err(S::Error::custom)?
            .serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for a list of items.
pub fn serialize_items<S>(
    items: &[AttributeMap],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::Serialize;
    use serde::ser::Error;

    let json = items
        .iter()
        .map(item_to_json)
        .collect::<Result<Vec<_>>>()
        .map_err(S::Error::custom)?;
    json.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_item_from_json() {
        let item = item_from_json(&json!({
            "pk": "jose.schneller@somewhere.com",
            "age": 27,
            "address": { "city": "Greenbank", "pcode": "98253" },
            "tags": ["a", "b"],
            "active": true,
            "nickname": null
        }))
        .unwrap();

        assert_eq!(item["age"], AttributeValue::N("27".to_string()));
        assert_eq!(item["active"], AttributeValue::Bool(true));
        assert_eq!(item["nickname"], AttributeValue::Null(true));
        match &item["address"] {
            AttributeValue::M(address) => {
                assert_eq!(address["city"], AttributeValue::S("Greenbank".to_string()));
            }
            other => panic!("expected a map, got {other:?}"),
        }
        assert!(matches!(&item["tags"], AttributeValue::L(list) if list.len() == 2));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = item_from_json(&json!(["pk"])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn numbers_keep_integer_shape() {
        assert_eq!(attribute_value_to_json(&AttributeValue::N("35".into())).unwrap(), json!(35));
        assert_eq!(
            attribute_value_to_json(&AttributeValue::N("2.5".into())).unwrap(),
            json!(2.5)
        );
        assert!(attribute_value_to_json(&AttributeValue::N("abc".into())).is_err());
    }

    #[test]
    fn sets_render_as_arrays() {
        let ss = string_set(["rock", "jazz"]).unwrap();
        assert_eq!(attribute_value_to_json(&ss).unwrap(), json!(["rock", "jazz"]));

        let ns = number_set([1.0, 2.5]).unwrap();
        assert_eq!(attribute_value_to_json(&ns).unwrap(), json!([1, 2.5]));

        assert!(string_set(Vec::<String>::new()).is_err());
    }

    #[test]
    fn binary_is_base64() {
        let value = binary(b"hi".to_vec());
        assert_eq!(attribute_value_to_json(&value).unwrap(), json!("aGk="));
    }

    #[test]
    fn json_item_survives_the_wire_form() {
        let submitted = json!({
            "pk": "x@y.com",
            "sk": "metadata",
            "address": { "road": "89105 Bakken Rd" },
            "age": 27
        });
        let item = item_from_json(&submitted).unwrap();
        assert_eq!(item_to_json(&item).unwrap(), submitted);
    }

    #[test]
    fn wide_integers_keep_every_digit() {
        let submitted = json!({ "counter": u64::MAX });
        let item = item_from_json(&submitted).unwrap();
        assert_eq!(item["counter"], AttributeValue::N("18446744073709551615".to_string()));
        assert_eq!(item_to_json(&item).unwrap(), submitted);

        let wide = AttributeValue::N("12345678901234567890123".to_string());
        let value = attribute_value_to_json(&wide).unwrap();
        assert_eq!(value.to_string(), "12345678901234567890123");
        assert_eq!(json_to_attribute_value(&value), wide);
    }

    #[test]
    fn decimals_keep_their_text() {
        let value = attribute_value_to_json(&AttributeValue::N("0.1".to_string())).unwrap();
        assert_eq!(value.to_string(), "0.1");
        assert_eq!(
            attribute_value_to_json(&AttributeValue::N(".5".to_string())).unwrap(),
            json!(0.5)
        );
    }
}
