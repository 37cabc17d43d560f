//! Shared AWS configuration for every client the crate builds.
//!
//! One `AwsConfig` feeds the DynamoDB, IAM and Application Auto Scaling
//! clients so a program only states region and endpoint once.

use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::config::{Credentials, Region};
use std::time::Duration;

/// Environment variable overriding the endpoint of every client.
pub const ENDPOINT_ENV: &str = "DYNOKIT_ENDPOINT_URL";

/// Environment variable naming a credentials profile.
pub const PROFILE_ENV: &str = "DYNOKIT_PROFILE";

/// Region used when nothing else resolves one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client configuration.
///
/// Region priority: explicit value > `AWS_REGION` / profile > `us-east-1`.
/// Credentials priority: static keys > named profile > default chain.
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    /// Seconds.
    pub connect_timeout: Option<f64>,
    /// Seconds.
    pub read_timeout: Option<f64>,
    /// Total attempts handed to the SDK's standard retry strategy.
    pub max_retries: Option<u32>,
}

impl AwsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the crate's own overrides from the environment.
    ///
    /// Everything else (credentials, `AWS_REGION`) is left to the SDK's
    /// default provider chains.
    pub fn from_env() -> Self {
        Self {
            endpoint_url: non_empty_env(ENDPOINT_ENV),
            profile: non_empty_env(PROFILE_ENV),
            ..Self::default()
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn static_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self.session_token = session_token;
        self
    }

    pub fn connect_timeout(mut self, seconds: f64) -> Self {
        self.connect_timeout = Some(seconds);
        self
    }

    pub fn read_timeout(mut self, seconds: f64) -> Self {
        self.read_timeout = Some(seconds);
        self
    }

    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = Some(attempts);
        self
    }

    /// Resolve region, credentials, timeouts and retries into an `SdkConfig`.
    pub async fn load(&self) -> SdkConfig {
        let region_provider =
            RegionProviderChain::first_try(self.region.clone().map(Region::new))
                .or_default_provider()
                .or_else(DEFAULT_REGION);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

        if let (Some(ak), Some(sk)) = (&self.access_key, &self.secret_key) {
            let creds = Credentials::new(
                ak.clone(),
                sk.clone(),
                self.session_token.clone(),
                None,
                "dynokit-static",
            );
            loader = loader.credentials_provider(creds);
        } else if let Some(profile_name) = &self.profile {
            let profile_provider = ProfileFileCredentialsProvider::builder()
                .profile_name(profile_name)
                .build();
            loader = loader.credentials_provider(profile_provider);
        }

        if self.connect_timeout.is_some() || self.read_timeout.is_some() {
            let mut timeouts = TimeoutConfig::builder();
            if let Some(secs) = self.connect_timeout {
                timeouts = timeouts.connect_timeout(Duration::from_secs_f64(secs));
            }
            if let Some(secs) = self.read_timeout {
                timeouts = timeouts.read_timeout(Duration::from_secs_f64(secs));
            }
            loader = loader.timeout_config(timeouts.build());
        }

        if let Some(attempts) = self.max_retries {
            loader = loader.retry_config(RetryConfig::standard().with_max_attempts(attempts));
        }

        let sdk_config = loader.load().await;
        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint = ?self.endpoint_url,
            "loaded AWS configuration"
        );
        sdk_config
    }

    /// Build the DynamoDB client.
    pub fn dynamodb_client(&self, sdk_config: &SdkConfig) -> aws_sdk_dynamodb::Client {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        aws_sdk_dynamodb::Client::from_conf(builder.build())
    }

    /// Build the IAM client.
    pub fn iam_client(&self, sdk_config: &SdkConfig) -> aws_sdk_iam::Client {
        let mut builder = aws_sdk_iam::config::Builder::from(sdk_config);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        aws_sdk_iam::Client::from_conf(builder.build())
    }

    /// Build the Application Auto Scaling client.
    pub fn autoscaling_client(
        &self,
        sdk_config: &SdkConfig,
    ) -> aws_sdk_applicationautoscaling::Client {
        let mut builder = aws_sdk_applicationautoscaling::config::Builder::from(sdk_config);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        aws_sdk_applicationautoscaling::Client::from_conf(builder.build())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = AwsConfig::new()
            .region("us-west-2")
            .endpoint_url("http://localhost:8000")
            .static_credentials("AKIDEXAMPLE", "secret", None)
            .connect_timeout(2.5)
            .max_retries(1);

        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.access_key.as_deref(), Some("AKIDEXAMPLE"));
        assert_eq!(config.connect_timeout, Some(2.5));
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.max_retries, Some(1));
    }

    #[tokio::test]
    async fn explicit_region_wins() {
        let config = AwsConfig::new()
            .region("eu-west-1")
            .static_credentials("test", "test", None);
        let sdk_config = config.load().await;
        assert_eq!(
            sdk_config.region().map(|r| r.to_string()),
            Some("eu-west-1".to_string())
        );
    }
}
