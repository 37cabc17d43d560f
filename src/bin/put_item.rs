//! Store a customer with a nested address.

use serde_json::json;
use std::process::ExitCode;

use dynokit::basic_operations::PutItemRequest;
use dynokit::conversions::item_from_json;
use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::try_run(AwsConfig::from_env().region("eu-west-1"), || {
        let item = item_from_json(&json!({
            "pk": "jose.schneller@somewhere.com",
            "sk": "metadata",
            "firstName": "Jose",
            "lastName": "Schneller",
            "name": "Jose Schneller",
            "username": "joses",
            "age": 27,
            "address": {
                "city": "Greenbank",
                "country": "USA",
                "pcode": "98253",
                "road": "89105 Bakken Rd",
                "state": "WA"
            }
        }))?;
        Ok(Operation::PutItem(PutItemRequest::new("RetailDatabase", item)))
    })
}
