//! Store two customers in one request.

use serde_json::json;
use std::process::ExitCode;

use dynokit::batch_operations::BatchWriteRequest;
use dynokit::conversions::item_from_json;
use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::try_run(AwsConfig::from_env(), || {
        let jose = item_from_json(&json!({
            "pk": "jose.schneller@somewhere.com",
            "sk": "metadata",
            "firstName": "jose",
            "lastName": "schneller",
            "name": "Jose Schneller",
            "username": "joses"
        }))?;
        let jim = item_from_json(&json!({
            "pk": "jim.bob@somewhere.com",
            "sk": "metadata",
            "firstName": "jim",
            "lastName": "bob",
            "name": "Jim Bob",
            "username": "jbob"
        }))?;

        Ok(Operation::BatchWrite(
            BatchWriteRequest::new("RetailDatabase").put(jose).put(jim),
        ))
    })
}
