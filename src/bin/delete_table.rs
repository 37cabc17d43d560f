//! Delete the Music table and wait until it is gone.

use std::process::ExitCode;

use dynokit::table_operations::DEFAULT_TABLE_WAIT;
use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::DeleteTable {
            table: "Music".to_string(),
            wait: Some(DEFAULT_TABLE_WAIT),
        },
    )
}
