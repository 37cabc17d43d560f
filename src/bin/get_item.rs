//! Read the metadata item of one customer.

use std::process::ExitCode;

use dynokit::basic_operations::GetItemRequest;
use dynokit::{AwsConfig, ItemKey, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    let request = GetItemRequest::new(
        "RetailDatabase",
        ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata"),
    )
    .consistent_read(true);

    executor::run(
        AwsConfig::from_env().region("eu-west-1"),
        Operation::GetItem(request),
    )
}
