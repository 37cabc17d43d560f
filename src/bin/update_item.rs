//! Change the road of a customer's address and print the new value.

use std::process::ExitCode;

use dynokit::basic_operations::UpdateItemRequest;
use dynokit::{AttributeValue, AwsConfig, ItemKey, Operation, ReturnValue, executor, logging};

fn main() -> ExitCode {
    logging::init();

    let request = UpdateItemRequest::new(
        "RetailDatabase",
        ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata"),
    )
    .expression("set address.road = :r")
    .value(":r", AttributeValue::S("8123 Updated Rd".to_string()))
    .return_values(ReturnValue::UpdatedNew);

    executor::run(
        AwsConfig::from_env().region("eu-west-1"),
        Operation::UpdateItem(request),
    )
}
