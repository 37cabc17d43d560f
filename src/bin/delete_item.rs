//! Delete a customer only if they are 30 or younger.

use std::process::ExitCode;

use dynokit::basic_operations::DeleteItemRequest;
use dynokit::{AttributeValue, AwsConfig, ItemKey, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    let request = DeleteItemRequest::new(
        "RetailDatabase",
        ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata"),
    )
    .condition("age <= :max_age")
    .value(":max_age", AttributeValue::N("30".to_string()))
    .return_old_values()
    .return_item_on_condition_failure();

    executor::run(
        AwsConfig::from_env().region("eu-west-1"),
        Operation::DeleteItem(request),
    )
}
