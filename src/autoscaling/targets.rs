//! Application Auto Scaling targets and target tracking policies.

use aws_sdk_applicationautoscaling::Client;
use aws_sdk_applicationautoscaling::types::{
    PolicyType, PredefinedMetricSpecification, TargetTrackingScalingPolicyConfiguration,
};

use super::{ScalingDimension, ScalingPolicy, policy_name, resource_id, service_namespace};
use crate::errors::{AwsService, Result, map_sdk_error};

/// Register (or re-register) one dimension. Returns the target ARN when
/// the service reports it.
pub async fn register_scalable_target(
    client: &Client,
    table: &str,
    dimension: ScalingDimension,
    policy: &ScalingPolicy,
    role_arn: &str,
) -> Result<Option<String>> {
    let resource = resource_id(table);
    tracing::debug!(
        %resource,
        dimension = dimension.as_str(),
        min = policy.min_capacity,
        max = policy.max_capacity,
        "register_scalable_target"
    );

    let output = client
        .register_scalable_target()
        .service_namespace(service_namespace())
        .resource_id(&resource)
        .scalable_dimension(dimension.scalable_dimension())
        .min_capacity(policy.min_capacity)
        .max_capacity(policy.max_capacity)
        .role_arn(role_arn)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::ApplicationAutoScaling, Some(&resource)))?;

    Ok(output.scalable_target_arn().map(str::to_string))
}

pub async fn deregister_scalable_target(
    client: &Client,
    table: &str,
    dimension: ScalingDimension,
) -> Result<()> {
    let resource = resource_id(table);
    tracing::debug!(%resource, dimension = dimension.as_str(), "deregister_scalable_target");

    client
        .deregister_scalable_target()
        .service_namespace(service_namespace())
        .resource_id(&resource)
        .scalable_dimension(dimension.scalable_dimension())
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::ApplicationAutoScaling, Some(&resource)))?;
    Ok(())
}

/// Target tracking configuration for one dimension.
pub(crate) fn tracking_configuration(
    dimension: ScalingDimension,
    policy: &ScalingPolicy,
) -> Result<TargetTrackingScalingPolicyConfiguration> {
    let metric = PredefinedMetricSpecification::builder()
        .predefined_metric_type(dimension.metric_type())
        .build()?;

    Ok(TargetTrackingScalingPolicyConfiguration::builder()
        .target_value(policy.target_value)
        .predefined_metric_specification(metric)
        .scale_in_cooldown(policy.scale_in_cooldown)
        .scale_out_cooldown(policy.scale_out_cooldown)
        .disable_scale_in(policy.disable_scale_in)
        .build()?)
}

/// Put `<table>_TableScalingPolicy` on one dimension and return its ARN.
pub async fn put_scaling_policy(
    client: &Client,
    table: &str,
    dimension: ScalingDimension,
    policy: &ScalingPolicy,
) -> Result<String> {
    let resource = resource_id(table);
    let configuration = tracking_configuration(dimension, policy)?;
    tracing::debug!(
        %resource,
        dimension = dimension.as_str(),
        target = policy.target_value,
        "put_scaling_policy"
    );

    let output = client
        .put_scaling_policy()
        .policy_name(policy_name(table))
        .policy_type(PolicyType::TargetTrackingScaling)
        .service_namespace(service_namespace())
        .resource_id(&resource)
        .scalable_dimension(dimension.scalable_dimension())
        .target_tracking_scaling_policy_configuration(configuration)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::ApplicationAutoScaling, Some(&resource)))?;

    Ok(output.policy_arn().to_string())
}

pub async fn delete_scaling_policy(
    client: &Client,
    table: &str,
    dimension: ScalingDimension,
) -> Result<()> {
    let resource = resource_id(table);
    tracing::debug!(%resource, dimension = dimension.as_str(), "delete_scaling_policy");

    client
        .delete_scaling_policy()
        .policy_name(policy_name(table))
        .service_namespace(service_namespace())
        .resource_id(&resource)
        .scalable_dimension(dimension.scalable_dimension())
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::ApplicationAutoScaling, Some(&resource)))?;
    Ok(())
}
