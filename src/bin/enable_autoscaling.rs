//! Create the scaling role and policy, then autoscale the Music table
//! between 1 and 100 units at 50% utilization.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, ScalingPolicy, executor, logging};

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::RegisterAutoscaling {
            table: "Music".to_string(),
            policy: ScalingPolicy::default(),
        },
    )
}
