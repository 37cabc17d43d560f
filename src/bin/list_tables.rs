//! List the first page of tables in the region.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::ListTables {
            limit: Some(10),
            exclusive_start_table_name: None,
        },
    )
}
