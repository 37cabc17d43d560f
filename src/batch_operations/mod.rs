//! Batch operations module for DynamoDB.
//!
//! This module provides batch operations:
//! - `batch_write` - Put and delete multiple items of one table
//! - `batch_get` - Get multiple items of one table
//!
//! Both split requests to respect DynamoDB limits (25 items for write,
//! 100 keys for get). Unprocessed entries are reported back, not retried.

mod get;
mod write;

pub use get::{BATCH_GET_MAX_KEYS, BatchGetRequest, BatchGetResult, execute_batch_get};
pub use write::{
    BATCH_WRITE_MAX_ITEMS, BatchWriteRequest, BatchWriteResult, build_write_requests,
    execute_batch_write,
};

/// Split `items` into consecutive batches of at most `limit` entries.
pub fn split_into_batches<T>(items: Vec<T>, limit: usize) -> Vec<Vec<T>> {
    let limit = limit.max(1);
    let mut batches = Vec::with_capacity(items.len().div_ceil(limit));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        batches.push(items.by_ref().take(limit).collect());
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes<T>(batches: &[Vec<T>]) -> Vec<usize> {
        batches.iter().map(Vec::len).collect()
    }

    #[test]
    fn batches_keep_order_and_respect_limit() {
        let batches = split_into_batches((0..7).collect(), 3);
        assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_batch() {
        assert_eq!(sizes(&split_into_batches(vec![(); 50], 25)), vec![25, 25]);
        assert!(split_into_batches(Vec::<u8>::new(), 25).is_empty());
    }
}
