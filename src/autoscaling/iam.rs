//! IAM steps of the autoscaling sequence.

use super::{assume_role_policy, policy_name, role_name, scaling_role_policy};
use crate::errors::{AwsService, DynokitError, Result, map_sdk_error};

/// Name and ARN of a created role.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingRole {
    pub name: String,
    pub arn: String,
}

/// Create `<table>_TableScalingRole`, assumable by `principal`.
pub async fn create_scaling_role(
    iam: &aws_sdk_iam::Client,
    table: &str,
    principal: &str,
) -> Result<ScalingRole> {
    let name = role_name(table);
    let trust = assume_role_policy(principal).to_json()?;
    tracing::debug!(role = %name, %principal, "create_role");

    let output = iam
        .create_role()
        .role_name(&name)
        .path("/")
        .assume_role_policy_document(trust)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::Iam, Some(&name)))?;

    let role = output.role().ok_or_else(|| DynokitError::Service {
        service: AwsService::Iam,
        code: "MissingRole".to_string(),
        message: format!("CreateRole returned no role for '{}'", name),
    })?;

    Ok(ScalingRole {
        name: role.role_name().to_string(),
        arn: role.arn().to_string(),
    })
}

/// Create `<table>_TableScalingPolicy` and return its ARN.
pub async fn create_scaling_policy(iam: &aws_sdk_iam::Client, table: &str) -> Result<String> {
    let name = policy_name(table);
    let document = scaling_role_policy().to_json()?;
    tracing::debug!(policy = %name, "create_policy");

    let output = iam
        .create_policy()
        .policy_name(&name)
        .policy_document(document)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::Iam, Some(&name)))?;

    output
        .policy()
        .and_then(|p| p.arn())
        .map(str::to_string)
        .ok_or_else(|| DynokitError::Service {
            service: AwsService::Iam,
            code: "MissingPolicyArn".to_string(),
            message: format!("CreatePolicy returned no ARN for '{}'", name),
        })
}

pub async fn attach_role_policy(
    iam: &aws_sdk_iam::Client,
    role_name: &str,
    policy_arn: &str,
) -> Result<()> {
    tracing::debug!(role = %role_name, policy = %policy_arn, "attach_role_policy");

    iam.attach_role_policy()
        .role_name(role_name)
        .policy_arn(policy_arn)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, AwsService::Iam, Some(role_name)))?;
    Ok(())
}
