//! Switch the Music table to on-demand billing.

use std::process::ExitCode;

use dynokit::table_operations::{DEFAULT_TABLE_WAIT, ThroughputMode};
use dynokit::{AwsConfig, Operation, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::UpdateTable {
            table: "Music".to_string(),
            throughput: ThroughputMode::OnDemand,
            wait: Some(DEFAULT_TABLE_WAIT),
        },
    )
}
