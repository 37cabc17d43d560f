//! Add a us-west-2 replica to the Music global table, then set its write
//! capacity.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, executor, logging};

const TABLE: &str = "Music";
const REGION: &str = "us-west-2";

fn main() -> ExitCode {
    logging::init();

    executor::run_all(
        AwsConfig::from_env().region(REGION),
        vec![
            Operation::UpdateGlobalTable {
                table: TABLE.to_string(),
                region: REGION.to_string(),
            },
            Operation::UpdateGlobalTableSettings {
                table: TABLE.to_string(),
                write_capacity_units: 10,
            },
        ],
    )
}
