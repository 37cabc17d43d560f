//! Describe the Music table and print its key schema, billing mode and status.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::DescribeTable {
            table: "Music".to_string(),
        },
    )
}
