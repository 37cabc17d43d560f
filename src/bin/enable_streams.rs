//! Turn on a stream carrying old and new images for the Music table.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, StreamViewType, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::EnableStreams {
            table: "Music".to_string(),
            view_type: StreamViewType::NewAndOldImages,
        },
    )
}
