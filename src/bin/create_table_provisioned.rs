//! Create the Music table with 10 read and 10 write capacity units.

use std::process::ExitCode;

use dynokit::table_operations::{DEFAULT_TABLE_WAIT, TableDescriptor};
use dynokit::{AwsConfig, Operation, ScalarAttributeType, executor, logging};

fn main() -> ExitCode {
    logging::init();

    let descriptor = TableDescriptor::new("Music")
        .partition_key("Artist", ScalarAttributeType::S)
        .sort_key("SongTitle", ScalarAttributeType::S)
        .provisioned(10, 10);

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::CreateTable {
            descriptor,
            wait: Some(DEFAULT_TABLE_WAIT),
        },
    )
}
