//! Blocking handle over the IAM and Application Auto Scaling clients.

use std::sync::Arc;
use tokio::runtime::Runtime;

use super::{AutoscalingReport, ScalingPolicy};
use crate::client::shared_runtime;
use crate::config::AwsConfig;
use crate::errors::Result;

#[derive(Clone)]
pub struct AutoscalingClient {
    iam: aws_sdk_iam::Client,
    autoscaling: aws_sdk_applicationautoscaling::Client,
    runtime: Arc<Runtime>,
}

impl std::fmt::Debug for AutoscalingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoscalingClient").finish_non_exhaustive()
    }
}

impl AutoscalingClient {
    pub fn new(config: &AwsConfig) -> Result<Self> {
        let runtime = shared_runtime()?;
        let sdk_config = runtime.block_on(config.load());
        Ok(Self {
            iam: config.iam_client(&sdk_config),
            autoscaling: config.autoscaling_client(&sdk_config),
            runtime,
        })
    }

    pub fn enable(&self, table: &str, policy: &ScalingPolicy) -> Result<AutoscalingReport> {
        self.runtime.block_on(super::enable_autoscaling(
            &self.iam,
            &self.autoscaling,
            table,
            policy,
        ))
    }

    pub fn update(&self, table: &str, policy: &ScalingPolicy) -> Result<AutoscalingReport> {
        self.runtime
            .block_on(super::update_autoscaling(&self.autoscaling, table, policy))
    }

    pub fn disable(&self, table: &str) -> Result<AutoscalingReport> {
        self.runtime
            .block_on(super::disable_autoscaling(&self.autoscaling, table))
    }
}
