//! Remove the scaling policies and targets of the Music table.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::DisableAutoscaling {
            table: "Music".to_string(),
        },
    )
}
