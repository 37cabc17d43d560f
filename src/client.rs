//! DynamoDB client module.
//!
//! `DynamoClient` owns an SDK client and blocks on a shared tokio runtime,
//! so programs can call every operation from a plain `fn main`.
//! Credential sources, in priority order:
//! - Static credentials
//! - AWS profile
//! - Default chain (environment variables, instance profile, etc.)

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::StreamViewType;
use once_cell::sync::OnceCell;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::basic_operations::{
    DeleteItemRequest, DeleteItemResult, GetItemRequest, GetItemResult, PutItemRequest,
    PutItemResult, UpdateItemRequest, UpdateItemResult, execute_delete_item, execute_get_item,
    execute_put_item, execute_update_item,
};
use crate::batch_operations::{
    BatchGetRequest, BatchGetResult, BatchWriteRequest, BatchWriteResult, execute_batch_get,
    execute_batch_write,
};
use crate::config::AwsConfig;
use crate::errors::{AwsService, DynokitError, Result, map_sdk_error};
use crate::table_operations::{
    self, GlobalTableSettingsSummary, GlobalTableSummary, TableDescriptor, TableList,
    TableSummary, ThroughputMode,
};

static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Process-wide runtime shared by every client handle.
pub(crate) fn shared_runtime() -> Result<Arc<Runtime>> {
    RUNTIME
        .get_or_try_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map(Arc::new)
                .map_err(|e| DynokitError::Config(format!("failed to create tokio runtime: {}", e)))
        })
        .cloned()
}

/// DynamoDB client with flexible credential configuration.
///
/// # Examples
///
/// ```no_run
/// use dynokit::{AwsConfig, DynamoClient};
///
/// // Region from the environment, credentials from the default chain.
/// let client = DynamoClient::new(&AwsConfig::from_env())?;
///
/// // DynamoDB Local.
/// let local = DynamoClient::new(
///     &AwsConfig::new()
///         .region("us-east-1")
///         .endpoint_url("http://localhost:8000")
///         .static_credentials("local", "local", None),
/// )?;
/// # Ok::<(), dynokit::DynokitError>(())
/// ```
#[derive(Clone)]
pub struct DynamoClient {
    /// The underlying AWS SDK DynamoDB client.
    client: Client,
    /// Tokio runtime for async operations.
    runtime: Arc<Runtime>,
    /// The resolved AWS region.
    region: String,
}

impl std::fmt::Debug for DynamoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoClient")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl DynamoClient {
    /// Create a new DynamoDB client.
    ///
    /// # Errors
    ///
    /// Returns `DynokitError::Config` if the runtime cannot be created.
    pub fn new(config: &AwsConfig) -> Result<Self> {
        let runtime = shared_runtime()?;
        let sdk_config = runtime.block_on(config.load());
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| crate::config::DEFAULT_REGION.to_string());
        let client = config.dynamodb_client(&sdk_config);

        Ok(Self {
            client,
            runtime,
            region,
        })
    }

    /// Wrap an already configured SDK client.
    pub fn from_sdk(client: Client) -> Result<Self> {
        let region = client
            .config()
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| crate::config::DEFAULT_REGION.to_string());
        Ok(Self {
            client,
            runtime: shared_runtime()?,
            region,
        })
    }

    /// The configured AWS region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The underlying SDK client, for callers already inside a runtime.
    pub fn sdk(&self) -> &Client {
        &self.client
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Check if the client can reach DynamoDB with a one-table ListTables.
    pub fn ping(&self) -> Result<bool> {
        self.block_on(async { self.client.list_tables().limit(1).send().await })
            .map_err(|e| map_sdk_error(e, AwsService::DynamoDB, None))?;
        Ok(true)
    }

    pub fn get_item(&self, request: GetItemRequest) -> Result<GetItemResult> {
        self.block_on(execute_get_item(&self.client, request))
    }

    pub fn put_item(&self, request: PutItemRequest) -> Result<PutItemResult> {
        self.block_on(execute_put_item(&self.client, request))
    }

    pub fn update_item(&self, request: UpdateItemRequest) -> Result<UpdateItemResult> {
        self.block_on(execute_update_item(&self.client, request))
    }

    pub fn delete_item(&self, request: DeleteItemRequest) -> Result<DeleteItemResult> {
        self.block_on(execute_delete_item(&self.client, request))
    }

    pub fn batch_get(&self, request: BatchGetRequest) -> Result<BatchGetResult> {
        self.block_on(execute_batch_get(&self.client, request))
    }

    pub fn batch_write(&self, request: BatchWriteRequest) -> Result<BatchWriteResult> {
        self.block_on(execute_batch_write(&self.client, request))
    }

    pub fn create_table(
        &self,
        descriptor: TableDescriptor,
        wait: Option<Duration>,
    ) -> Result<TableSummary> {
        self.block_on(table_operations::create_table(&self.client, descriptor, wait))
    }

    pub fn update_table(
        &self,
        table_name: &str,
        throughput: ThroughputMode,
        wait: Option<Duration>,
    ) -> Result<TableSummary> {
        self.block_on(table_operations::update_throughput(
            &self.client,
            table_name,
            throughput,
            wait,
        ))
    }

    pub fn delete_table(&self, table_name: &str, wait: Option<Duration>) -> Result<TableSummary> {
        self.block_on(table_operations::delete_table(&self.client, table_name, wait))
    }

    pub fn describe_table(&self, table_name: &str) -> Result<TableSummary> {
        self.block_on(table_operations::describe_table(&self.client, table_name))
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        self.block_on(table_operations::table_exists(&self.client, table_name))
    }

    pub fn list_tables(
        &self,
        limit: Option<i32>,
        exclusive_start_table_name: Option<String>,
    ) -> Result<TableList> {
        self.block_on(table_operations::list_tables(
            &self.client,
            limit,
            exclusive_start_table_name,
        ))
    }

    pub fn wait_for_table_active(
        &self,
        table_name: &str,
        max_wait: Duration,
    ) -> Result<TableSummary> {
        self.block_on(table_operations::wait_for_table_active(
            &self.client,
            table_name,
            max_wait,
        ))
    }

    pub fn enable_streams(
        &self,
        table_name: &str,
        view_type: StreamViewType,
    ) -> Result<TableSummary> {
        self.block_on(table_operations::enable_streams(&self.client, table_name, view_type))
    }

    pub fn disable_streams(&self, table_name: &str) -> Result<TableSummary> {
        self.block_on(table_operations::disable_streams(&self.client, table_name))
    }

    pub fn update_global_table(
        &self,
        table_name: &str,
        region: &str,
    ) -> Result<GlobalTableSummary> {
        self.block_on(table_operations::update_global_table(
            &self.client,
            table_name,
            region,
        ))
    }

    pub fn update_global_table_settings(
        &self,
        table_name: &str,
        write_capacity_units: i64,
    ) -> Result<GlobalTableSettingsSummary> {
        self.block_on(table_operations::update_global_table_settings(
            &self.client,
            table_name,
            write_capacity_units,
        ))
    }

    pub fn add_replica(&self, table_name: &str, region: &str) -> Result<TableSummary> {
        self.block_on(table_operations::add_replica(&self.client, table_name, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

    #[test]
    fn runtime_is_shared() {
        let a = shared_runtime().unwrap();
        let b = shared_runtime().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn from_sdk_keeps_region() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        let client = DynamoClient::from_sdk(Client::from_conf(config)).unwrap();
        assert_eq!(client.region(), "eu-west-1");
    }

    #[test]
    fn empty_batch_write_blocks_without_network() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let client = DynamoClient::from_sdk(Client::from_conf(config)).unwrap();
        let result = client
            .batch_write(BatchWriteRequest::new("RetailDatabase"))
            .unwrap();
        assert_eq!(result.requests_sent, 0);
    }
}
