//! Raise the autoscaling ceiling of the Music table to 500 units.

use std::process::ExitCode;

use dynokit::{AwsConfig, Operation, ScalingPolicy, executor, logging};

/// ARN of the role `enable_autoscaling` created.
const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/Music_TableScalingRole";

fn main() -> ExitCode {
    logging::init();

    executor::run(
        AwsConfig::from_env().region("us-west-2"),
        Operation::UpdateAutoscaling {
            table: "Music".to_string(),
            policy: ScalingPolicy::default().capacity(1, 500).role_arn(ROLE_ARN),
        },
    )
}
