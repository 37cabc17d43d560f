//! Read two customers in one request.

use std::process::ExitCode;

use dynokit::batch_operations::BatchGetRequest;
use dynokit::{AwsConfig, ItemKey, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    let request = BatchGetRequest::new("RetailDatabase")
        .key(ItemKey::new("pk", "jose.schneller@somewhere.com").with_sort("sk", "metadata"))
        .key(ItemKey::new("pk", "jim.bob@somewhere.com").with_sort("sk", "metadata"))
        .projection("pk, #n, username")
        .attribute_name("#n", "name");

    executor::run(AwsConfig::from_env(), Operation::BatchGet(request))
}
