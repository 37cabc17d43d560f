//! Per-call operation metrics.

use aws_sdk_dynamodb::types::ConsumedCapacity;
use serde::Serialize;
use std::time::Instant;

/// Duration and consumed capacity of one logical operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationMetrics {
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_rcu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_wcu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_count: Option<usize>,
}

impl OperationMetrics {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }

    pub fn with_capacity(
        duration_ms: f64,
        consumed_rcu: Option<f64>,
        consumed_wcu: Option<f64>,
        items_count: Option<usize>,
    ) -> Self {
        Self {
            duration_ms,
            consumed_rcu,
            consumed_wcu,
            items_count,
        }
    }

    /// Milliseconds elapsed since `start`.
    pub fn elapsed_ms(start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }

    /// Fold another call's numbers into this one (batch chunks).
    pub fn absorb(&mut self, other: &OperationMetrics) {
        self.duration_ms += other.duration_ms;
        self.consumed_rcu = add_optional(self.consumed_rcu, other.consumed_rcu);
        self.consumed_wcu = add_optional(self.consumed_wcu, other.consumed_wcu);
        self.items_count = match (self.items_count, other.items_count) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }
}

/// Sum the capacity units of a batch response.
pub fn total_capacity(consumed: &[ConsumedCapacity]) -> Option<f64> {
    consumed
        .iter()
        .filter_map(|c| c.capacity_units())
        .fold(None, |acc, units| Some(acc.unwrap_or(0.0) + units))
}

fn add_optional(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_sums_chunks() {
        let mut total = OperationMetrics::with_capacity(10.0, None, Some(25.0), Some(25));
        total.absorb(&OperationMetrics::with_capacity(5.0, None, Some(3.0), Some(3)));
        assert_eq!(total.duration_ms, 15.0);
        assert_eq!(total.consumed_wcu, Some(28.0));
        assert_eq!(total.consumed_rcu, None);
        assert_eq!(total.items_count, Some(28));
    }

    #[test]
    fn capacity_of_empty_response_is_unknown() {
        assert_eq!(total_capacity(&[]), None);
        let consumed = vec![
            ConsumedCapacity::builder().table_name("Music").capacity_units(1.5).build(),
            ConsumedCapacity::builder().table_name("Music").capacity_units(0.5).build(),
        ];
        assert_eq!(total_capacity(&consumed), Some(2.0));
    }
}
