//! Single-item operations for DynamoDB.
//!
//! - `get` - Read one item by key
//! - `put` - Create or replace one item
//! - `update_op` - Update attributes of one item
//! - `delete` - Delete one item, optionally behind a condition

mod delete;
mod get;
mod put;
mod update_op;

pub use delete::{DeleteItemRequest, DeleteItemResult, execute_delete_item};
pub use get::{GetItemRequest, GetItemResult, execute_get_item};
pub use put::{PutItemRequest, PutItemResult, execute_put_item};
pub use update_op::{UpdateItemRequest, UpdateItemResult, build_set_expression, execute_update_item};

use std::collections::HashMap;

/// `None` for an empty map, so the SDK omits the parameter entirely.
pub(crate) fn non_empty<K, V>(map: HashMap<K, V>) -> Option<HashMap<K, V>> {
    if map.is_empty() { None } else { Some(map) }
}
