//! IAM policy documents for the scaling role.

use serde::Serialize;

use crate::errors::Result;

/// Service principal that assumes the scaling role.
pub const AUTOSCALING_PRINCIPAL: &str = "application-autoscaling.amazonaws.com";

const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: String,
    pub action: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: Vec<String>,
}

impl PolicyStatement {
    fn allow(actions: &[&str]) -> Self {
        Self {
            effect: "Allow".to_string(),
            action: actions.iter().map(|a| a.to_string()).collect(),
            resource: None,
            principal: None,
        }
    }

    fn on_any_resource(mut self) -> Self {
        self.resource = Some("*".to_string());
        self
    }
}

impl PolicyDocument {
    pub fn new(statement: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Permissions the scaling role needs: read and resize the table, manage
/// the CloudWatch alarms target tracking relies on.
pub fn scaling_role_policy() -> PolicyDocument {
    PolicyDocument::new(vec![
        PolicyStatement::allow(&["dynamodb:DescribeTable", "dynamodb:UpdateTable"])
            .on_any_resource(),
        PolicyStatement::allow(&[
            "cloudwatch:PutMetricAlarm",
            "cloudwatch:DescribeAlarms",
            "cloudwatch:GetMetricStatistics",
            "cloudwatch:SetAlarmState",
            "cloudwatch:DeleteAlarms",
        ])
        .on_any_resource(),
    ])
}

/// Trust policy letting `service` assume the role.
pub fn assume_role_policy(service: &str) -> PolicyDocument {
    let mut statement = PolicyStatement::allow(&["sts:AssumeRole"]);
    statement.principal = Some(Principal {
        service: vec![service.to_string()],
    });
    PolicyDocument::new(vec![statement])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scaling_policy_document_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&scaling_role_policy().to_json().unwrap()).unwrap();

        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["Statement"][0],
            json!({
                "Effect": "Allow",
                "Action": ["dynamodb:DescribeTable", "dynamodb:UpdateTable"],
                "Resource": "*"
            })
        );
        assert_eq!(value["Statement"][1]["Action"][0], "cloudwatch:PutMetricAlarm");
        assert!(value["Statement"][1].get("Principal").is_none());
    }

    #[test]
    fn trust_policy_names_the_service() {
        let value = serde_json::to_value(assume_role_policy(AUTOSCALING_PRINCIPAL)).unwrap();
        assert_eq!(
            value,
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Action": ["sts:AssumeRole"],
                    "Principal": { "Service": ["application-autoscaling.amazonaws.com"] }
                }]
            })
        );
    }
}
