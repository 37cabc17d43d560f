//! Error types for dynokit.
//!
//! Every remote failure is mapped from the SDK's typed `SdkError` variants
//! and `ProvideErrorMetadata` codes. No string parsing of debug output.
//! The vendor message is kept in every variant.

use aws_sdk_dynamodb::error::{BuildError, ProvideErrorMetadata, SdkError};
use std::fmt;
use thiserror::Error;

use crate::types::AttributeMap;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DynokitError>;

/// AWS service type for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwsService {
    DynamoDB,
    Iam,
    ApplicationAutoScaling,
}

impl AwsService {
    fn name(&self) -> &'static str {
        match self {
            AwsService::DynamoDB => "DynamoDB",
            AwsService::Iam => "IAM",
            AwsService::ApplicationAutoScaling => "Application Auto Scaling",
        }
    }
}

impl fmt::Display for AwsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that can go wrong while building or sending a request.
#[derive(Debug, Error)]
pub enum DynokitError {
    #[error("{service} resource not found: {message}")]
    ResourceNotFound {
        service: AwsService,
        message: String,
    },

    #[error("{service} resource already in use: {message}")]
    ResourceInUse {
        service: AwsService,
        message: String,
    },

    #[error("validation error: {0}")]
    Validation(String),

    /// The condition expression evaluated to false. `item` holds the stored
    /// item when the caller asked for it on failure.
    #[error("condition check failed: {message}")]
    ConditionalCheckFailed {
        message: String,
        item: Option<AttributeMap>,
    },

    #[error("{service} request rate too high: {message}")]
    Throttled {
        service: AwsService,
        message: String,
    },

    #[error("access denied to {service}: {message}")]
    AccessDenied {
        service: AwsService,
        message: String,
    },

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("connection to {service} failed: {message}")]
    Connection {
        service: AwsService,
        message: String,
    },

    #[error("{service} error {code}: {message}")]
    Service {
        service: AwsService,
        code: String,
        message: String,
    },

    #[error("failed to build request: {0}")]
    Build(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("waiting on table '{table}' failed: {message}")]
    Waiter { table: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DynokitError {
    /// True for `ResourceNotFound` from any service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DynokitError::ResourceNotFound { .. })
    }

    /// True when a condition expression rejected the write.
    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, DynokitError::ConditionalCheckFailed { .. })
    }
}

impl From<BuildError> for DynokitError {
    fn from(err: BuildError) -> Self {
        DynokitError::Build(err.to_string())
    }
}

impl From<serde_json::Error> for DynokitError {
    fn from(err: serde_json::Error) -> Self {
        DynokitError::Serialization(err.to_string())
    }
}

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>, service: AwsService) -> Option<DynokitError>
where
    E: fmt::Debug,
    R: fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let message = if dispatch.is_timeout() {
                "connection timed out, check your network or endpoint"
            } else if dispatch.is_io() {
                "I/O error, check if the endpoint is reachable"
            } else {
                "dispatch failed, check if the endpoint is reachable"
            };
            Some(DynokitError::Connection {
                service,
                message: message.to_string(),
            })
        }
        SdkError::TimeoutError(_) => Some(DynokitError::Connection {
            service,
            message: "request timed out".to_string(),
        }),
        SdkError::ConstructionFailure(inner) => {
            let msg = format!("{:?}", inner);
            if msg.contains("credentials") || msg.contains("Credentials") {
                Some(DynokitError::Credentials(
                    "no AWS credentials found; configure environment variables, a profile, \
                     or an instance role"
                        .to_string(),
                ))
            } else {
                Some(DynokitError::Build(msg))
            }
        }
        SdkError::ResponseError(inner) => Some(DynokitError::Service {
            service,
            code: "ResponseError".to_string(),
            message: format!("invalid response: {:?}", inner),
        }),
        SdkError::ServiceError(_) => None,
        _ => Some(DynokitError::Service {
            service,
            code: "Unknown".to_string(),
            message: format!("{:?}", err),
        }),
    }
}

/// Classify a service error code shared by every AWS service, then the
/// service-specific codes.
pub fn map_service_code(
    service: AwsService,
    code: Option<&str>,
    message: Option<&str>,
    display: &str,
    resource: Option<&str>,
) -> DynokitError {
    let message = message.unwrap_or(display).to_string();
    let Some(code) = code else {
        return DynokitError::Service {
            service,
            code: "Unknown".to_string(),
            message,
        };
    };

    match code {
        "UnrecognizedClientException"
        | "InvalidClientTokenId"
        | "InvalidAccessKeyId"
        | "SignatureDoesNotMatch"
        | "MissingAuthenticationToken" => DynokitError::Credentials(message),
        "ExpiredTokenException" | "ExpiredToken" => DynokitError::Credentials(format!(
            "credentials have expired, refresh your session token: {}",
            message
        )),
        "AccessDeniedException" | "AccessDenied" | "FailedResourceAccessException" => {
            DynokitError::AccessDenied { service, message }
        }
        "ProvisionedThroughputExceededException"
        | "RequestLimitExceeded"
        | "LimitExceededException"
        | "Throttling"
        | "ThrottlingException" => DynokitError::Throttled { service, message },
        "ResourceNotFoundException" | "TableNotFoundException" | "NoSuchEntity"
        | "ObjectNotFoundException" | "GlobalTableNotFoundException" => {
            let message = match resource {
                Some(name) => format!("'{}': {}", name, message),
                None => message,
            };
            DynokitError::ResourceNotFound { service, message }
        }
        "ResourceInUseException" | "TableAlreadyExistsException" | "EntityAlreadyExists"
        | "ReplicaAlreadyExistsException" => {
            let message = match resource {
                Some(name) => format!("'{}': {}", name, message),
                None => message,
            };
            DynokitError::ResourceInUse { service, message }
        }
        "ValidationException" | "ValidationError" | "MalformedPolicyDocument"
        | "InvalidInput" | "ItemCollectionSizeLimitExceededException" => {
            DynokitError::Validation(message)
        }
        "ConditionalCheckFailedException" => DynokitError::ConditionalCheckFailed {
            message,
            item: None,
        },
        other => DynokitError::Service {
            service,
            code: other.to_string(),
            message,
        },
    }
}

/// Map any AWS SDK error into a `DynokitError`.
///
/// Works for DynamoDB, IAM and Application Auto Scaling alike since they
/// share `SdkError` and `ProvideErrorMetadata`.
pub fn map_sdk_error<E, R>(
    err: SdkError<E, R>,
    service: AwsService,
    resource: Option<&str>,
) -> DynokitError
where
    E: ProvideErrorMetadata + fmt::Debug + fmt::Display,
    R: fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err, service) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let display = service_err.to_string();
        return map_service_code(
            service,
            service_err.code(),
            service_err.message(),
            &display,
            resource,
        );
    }

    DynokitError::Service {
        service,
        code: "Unknown".to_string(),
        message: format!("{:?}", err),
    }
}

/// Map a DynamoDB error and attach the stored item to a conditional check
/// failure when the service returned one.
pub fn map_sdk_error_with_item<E, R>(
    err: SdkError<E, R>,
    table: &str,
    item: Option<AttributeMap>,
) -> DynokitError
where
    E: ProvideErrorMetadata + fmt::Debug + fmt::Display,
    R: fmt::Debug,
{
    match map_sdk_error(err, AwsService::DynamoDB, Some(table)) {
        DynokitError::ConditionalCheckFailed { message, .. } => {
            DynokitError::ConditionalCheckFailed { message, item }
        }
        other => other,
    }
}
