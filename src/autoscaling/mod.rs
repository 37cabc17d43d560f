//! Provisioned capacity autoscaling for DynamoDB tables.
//!
//! Enabling autoscaling is a fixed sequence:
//! 1. create an IAM role Application Auto Scaling can assume
//! 2. create the scaling policy and attach it to the role
//! 3. register read and write scalable targets
//! 4. put a target tracking policy on both
//!
//! Every step propagates its error; a half-configured table is reported,
//! never hidden.

mod client;
mod iam;
mod policy;
mod targets;

use aws_sdk_applicationautoscaling::types::{MetricType, ScalableDimension, ServiceNamespace};
use serde::Serialize;

use crate::errors::{DynokitError, Result};

pub use client::AutoscalingClient;
pub use iam::{ScalingRole, attach_role_policy, create_scaling_policy, create_scaling_role};
pub use policy::{
    AUTOSCALING_PRINCIPAL, PolicyDocument, PolicyStatement, Principal, assume_role_policy,
    scaling_role_policy,
};
pub use targets::{
    delete_scaling_policy, deregister_scalable_target, put_scaling_policy,
    register_scalable_target,
};

/// Capacity dimension of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalingDimension {
    Read,
    Write,
}

impl ScalingDimension {
    pub const BOTH: [ScalingDimension; 2] = [ScalingDimension::Read, ScalingDimension::Write];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingDimension::Read => "dynamodb:table:ReadCapacityUnits",
            ScalingDimension::Write => "dynamodb:table:WriteCapacityUnits",
        }
    }

    pub fn metric(&self) -> &'static str {
        match self {
            ScalingDimension::Read => "DynamoDBReadCapacityUtilization",
            ScalingDimension::Write => "DynamoDBWriteCapacityUtilization",
        }
    }

    pub(crate) fn scalable_dimension(&self) -> ScalableDimension {
        ScalableDimension::from(self.as_str())
    }

    pub(crate) fn metric_type(&self) -> MetricType {
        MetricType::from(self.metric())
    }
}

pub(crate) fn service_namespace() -> ServiceNamespace {
    ServiceNamespace::from("dynamodb")
}

/// `table/<name>`, the Application Auto Scaling resource id of a table.
pub fn resource_id(table: &str) -> String {
    format!("table/{}", table)
}

pub fn role_name(table: &str) -> String {
    format!("{}_TableScalingRole", table)
}

pub fn policy_name(table: &str) -> String {
    format!("{}_TableScalingPolicy", table)
}

/// Capacity bounds and target tracking settings applied to both dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingPolicy {
    pub min_capacity: i32,
    pub max_capacity: i32,
    /// Target utilization in percent.
    pub target_value: f64,
    /// Seconds.
    pub scale_in_cooldown: i32,
    /// Seconds.
    pub scale_out_cooldown: i32,
    pub disable_scale_in: bool,
    /// Role to register targets with. When unset, `enable_autoscaling`
    /// creates one.
    pub role_arn: Option<String>,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            min_capacity: 1,
            max_capacity: 100,
            target_value: 50.0,
            scale_in_cooldown: 150,
            scale_out_cooldown: 150,
            disable_scale_in: true,
            role_arn: None,
        }
    }
}

impl ScalingPolicy {
    pub fn capacity(mut self, min: i32, max: i32) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    pub fn target_value(mut self, percent: f64) -> Self {
        self.target_value = percent;
        self
    }

    pub fn cooldowns(mut self, scale_in: i32, scale_out: i32) -> Self {
        self.scale_in_cooldown = scale_in;
        self.scale_out_cooldown = scale_out;
        self
    }

    pub fn disable_scale_in(mut self, disable: bool) -> Self {
        self.disable_scale_in = disable;
        self
    }

    pub fn role_arn(mut self, arn: impl Into<String>) -> Self {
        self.role_arn = Some(arn.into());
        self
    }
}

/// What an autoscaling sequence created or changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoscalingReport {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_arn: Option<String>,
    pub dimensions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scalable_target_arns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scaling_policy_arns: Vec<String>,
}

impl AutoscalingReport {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }
}

/// Create the role and policy, then register and track both dimensions.
///
/// A `role_arn` in `policy` skips the IAM steps.
pub async fn enable_autoscaling(
    iam: &aws_sdk_iam::Client,
    autoscaling: &aws_sdk_applicationautoscaling::Client,
    table: &str,
    policy: &ScalingPolicy,
) -> Result<AutoscalingReport> {
    let mut report = AutoscalingReport::new(table);

    let role_arn = match &policy.role_arn {
        Some(arn) => arn.clone(),
        None => {
            let role = create_scaling_role(iam, table, AUTOSCALING_PRINCIPAL).await?;
            tracing::info!(table, role = %role.name, "role created");

            let policy_arn = create_scaling_policy(iam, table).await?;
            tracing::info!(table, policy = %policy_arn, "policy created");

            attach_role_policy(iam, &role.name, &policy_arn).await?;
            tracing::info!(table, role = %role.name, "policy attached to role");

            report.policy_arn = Some(policy_arn);
            role.arn
        }
    };

    for dimension in ScalingDimension::BOTH {
        let target_arn =
            register_scalable_target(autoscaling, table, dimension, policy, &role_arn).await?;
        tracing::info!(table, dimension = dimension.as_str(), "scalable target registered");
        report.dimensions.push(dimension.as_str().to_string());
        report.scalable_target_arns.extend(target_arn);
    }

    for dimension in ScalingDimension::BOTH {
        let policy_arn = put_scaling_policy(autoscaling, table, dimension, policy).await?;
        tracing::info!(table, dimension = dimension.as_str(), "scaling policy updated");
        report.scaling_policy_arns.push(policy_arn);
    }

    report.role_arn = Some(role_arn);
    Ok(report)
}

/// Re-register both targets with new capacity bounds.
pub async fn update_autoscaling(
    autoscaling: &aws_sdk_applicationautoscaling::Client,
    table: &str,
    policy: &ScalingPolicy,
) -> Result<AutoscalingReport> {
    let Some(role_arn) = policy.role_arn.clone() else {
        return Err(DynokitError::Validation(
            "updating autoscaling needs the scaling role ARN".to_string(),
        ));
    };

    let mut report = AutoscalingReport::new(table);
    for dimension in ScalingDimension::BOTH {
        let target_arn =
            register_scalable_target(autoscaling, table, dimension, policy, &role_arn).await?;
        tracing::info!(
            table,
            dimension = dimension.as_str(),
            min = policy.min_capacity,
            max = policy.max_capacity,
            "scalable target updated"
        );
        report.dimensions.push(dimension.as_str().to_string());
        report.scalable_target_arns.extend(target_arn);
    }

    report.role_arn = Some(role_arn);
    Ok(report)
}

/// Delete both scaling policies, then deregister both targets.
pub async fn disable_autoscaling(
    autoscaling: &aws_sdk_applicationautoscaling::Client,
    table: &str,
) -> Result<AutoscalingReport> {
    let mut report = AutoscalingReport::new(table);

    for dimension in ScalingDimension::BOTH {
        delete_scaling_policy(autoscaling, table, dimension).await?;
        tracing::info!(table, dimension = dimension.as_str(), "scaling policy deleted");
    }

    for dimension in ScalingDimension::BOTH {
        deregister_scalable_target(autoscaling, table, dimension).await?;
        tracing::info!(table, dimension = dimension.as_str(), "scalable target deregistered");
        report.dimensions.push(dimension.as_str().to_string());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AwsConfig;
    use crate::errors::AwsService;

    /// Clients pointed at a closed local port, so every call fails at dispatch.
    async fn unreachable_clients() -> (
        aws_sdk_iam::Client,
        aws_sdk_applicationautoscaling::Client,
    ) {
        let config = AwsConfig::new()
            .region("us-west-2")
            .endpoint_url("http://127.0.0.1:1")
            .static_credentials("AKIDEXAMPLE", "secret", None)
            .connect_timeout(1.0)
            .max_retries(1);
        let sdk_config = config.load().await;
        (config.iam_client(&sdk_config), config.autoscaling_client(&sdk_config))
    }

    #[test]
    fn names_follow_table() {
        assert_eq!(role_name("Music"), "Music_TableScalingRole");
        assert_eq!(policy_name("Music"), "Music_TableScalingPolicy");
        assert_eq!(resource_id("Music"), "table/Music");
    }

    #[test]
    fn dimensions_map_to_metrics() {
        assert_eq!(ScalingDimension::Read.as_str(), "dynamodb:table:ReadCapacityUnits");
        assert_eq!(ScalingDimension::Write.metric(), "DynamoDBWriteCapacityUtilization");
        assert_eq!(
            ScalingDimension::Read.scalable_dimension().as_str(),
            "dynamodb:table:ReadCapacityUnits"
        );
        assert_eq!(service_namespace().as_str(), "dynamodb");
    }

    #[test]
    fn default_policy_matches_enable_settings() {
        let policy = ScalingPolicy::default();
        assert_eq!((policy.min_capacity, policy.max_capacity), (1, 100));
        assert_eq!(policy.target_value, 50.0);
        assert_eq!((policy.scale_in_cooldown, policy.scale_out_cooldown), (150, 150));
        assert!(policy.disable_scale_in);
        assert!(policy.role_arn.is_none());

        let update = ScalingPolicy::default()
            .capacity(1, 500)
            .role_arn("arn:aws:iam::123456789012:role/Music_TableScalingRole");
        assert_eq!(update.max_capacity, 500);
        assert!(update.role_arn.is_some());
    }

    #[tokio::test]
    async fn update_without_role_is_rejected() {
        let config = aws_sdk_applicationautoscaling::Config::builder()
            .behavior_version(aws_sdk_applicationautoscaling::config::BehaviorVersion::latest())
            .region(aws_sdk_applicationautoscaling::config::Region::new("us-west-2"))
            .build();
        let client = aws_sdk_applicationautoscaling::Client::from_conf(config);

        let err = update_autoscaling(&client, "Music", &ScalingPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DynokitError::Validation(_)));
    }

    #[tokio::test]
    async fn enable_stops_at_role_creation() {
        let (iam, autoscaling) = unreachable_clients().await;

        let err = enable_autoscaling(&iam, &autoscaling, "Music", &ScalingPolicy::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, DynokitError::Connection { service: AwsService::Iam, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn enable_with_role_starts_at_target_registration() {
        let (iam, autoscaling) = unreachable_clients().await;
        let policy = ScalingPolicy::default()
            .role_arn("arn:aws:iam::123456789012:role/Music_TableScalingRole");

        let err = enable_autoscaling(&iam, &autoscaling, "Music", &policy)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                DynokitError::Connection { service: AwsService::ApplicationAutoScaling, .. }
            ),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn disable_propagates_policy_deletion_failure() {
        let (_, autoscaling) = unreachable_clients().await;

        let err = disable_autoscaling(&autoscaling, "Music").await.unwrap_err();
        assert!(matches!(
            err,
            DynokitError::Connection { service: AwsService::ApplicationAutoScaling, .. }
        ));
    }
}
