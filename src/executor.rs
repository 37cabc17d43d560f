//! Request executor.
//!
//! Turns one `Operation` into one remote call and one printed outcome.
//! Every error propagates up to here; `RequestExecutor::run` is the only
//! place an error becomes output and an exit code.

use aws_sdk_dynamodb::types::StreamViewType;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

use crate::autoscaling::{AutoscalingClient, AutoscalingReport, ScalingPolicy};
use crate::basic_operations::{
    DeleteItemRequest, DeleteItemResult, GetItemRequest, GetItemResult, PutItemRequest,
    PutItemResult, UpdateItemRequest, UpdateItemResult,
};
use crate::batch_operations::{
    BatchGetRequest, BatchGetResult, BatchWriteRequest, BatchWriteResult,
};
use crate::client::DynamoClient;
use crate::config::AwsConfig;
use crate::errors::{DynokitError, Result};
use crate::table_operations::{
    GlobalTableSettingsSummary, GlobalTableSummary, TableDescriptor, TableList, TableSummary,
    ThroughputMode,
};

/// One remote operation with all of its parameters.
#[derive(Debug, Clone)]
pub enum Operation {
    GetItem(GetItemRequest),
    PutItem(PutItemRequest),
    UpdateItem(UpdateItemRequest),
    DeleteItem(DeleteItemRequest),
    BatchGet(BatchGetRequest),
    BatchWrite(BatchWriteRequest),
    CreateTable {
        descriptor: TableDescriptor,
        wait: Option<Duration>,
    },
    UpdateTable {
        table: String,
        throughput: ThroughputMode,
        wait: Option<Duration>,
    },
    DeleteTable {
        table: String,
        wait: Option<Duration>,
    },
    DescribeTable {
        table: String,
    },
    ListTables {
        limit: Option<i32>,
        exclusive_start_table_name: Option<String>,
    },
    EnableStreams {
        table: String,
        view_type: StreamViewType,
    },
    UpdateGlobalTable {
        table: String,
        region: String,
    },
    UpdateGlobalTableSettings {
        table: String,
        write_capacity_units: i64,
    },
    RegisterAutoscaling {
        table: String,
        policy: ScalingPolicy,
    },
    UpdateAutoscaling {
        table: String,
        policy: ScalingPolicy,
    },
    DisableAutoscaling {
        table: String,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::GetItem(_) => "get",
            Operation::PutItem(_) => "put",
            Operation::UpdateItem(_) => "update",
            Operation::DeleteItem(_) => "delete",
            Operation::BatchGet(_) => "batch-get",
            Operation::BatchWrite(_) => "batch-write",
            Operation::CreateTable { .. } => "create-table",
            Operation::UpdateTable { .. } => "update-table",
            Operation::DeleteTable { .. } => "delete-table",
            Operation::DescribeTable { .. } => "describe",
            Operation::ListTables { .. } => "list",
            Operation::EnableStreams { .. } => "enable-streams",
            Operation::UpdateGlobalTable { .. } => "update-global-table",
            Operation::UpdateGlobalTableSettings { .. } => "update-global-table-settings",
            Operation::RegisterAutoscaling { .. } => "register-autoscaling",
            Operation::UpdateAutoscaling { .. } => "update-autoscaling",
            Operation::DisableAutoscaling { .. } => "disable-autoscaling",
        }
    }
}

/// Successful result of any operation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Get(GetItemResult),
    Put(PutItemResult),
    Update(UpdateItemResult),
    Delete(DeleteItemResult),
    BatchGet(BatchGetResult),
    BatchWrite(BatchWriteResult),
    Table(TableSummary),
    Tables(TableList),
    GlobalTable(GlobalTableSummary),
    GlobalTableSettings(GlobalTableSettingsSummary),
    Autoscaling(AutoscalingReport),
}

impl Outcome {
    /// Pretty JSON for the console.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs operations against one region.
pub struct RequestExecutor {
    config: AwsConfig,
    dynamo: DynamoClient,
    autoscaling: OnceCell<AutoscalingClient>,
}

impl RequestExecutor {
    pub fn new(config: AwsConfig) -> Result<Self> {
        let dynamo = DynamoClient::new(&config)?;
        Ok(Self {
            config,
            dynamo,
            autoscaling: OnceCell::new(),
        })
    }

    /// Use an existing DynamoDB handle. Autoscaling clients are still built
    /// from `config` on first use.
    pub fn with_client(config: AwsConfig, dynamo: DynamoClient) -> Self {
        Self {
            config,
            dynamo,
            autoscaling: OnceCell::new(),
        }
    }

    pub fn dynamo(&self) -> &DynamoClient {
        &self.dynamo
    }

    fn autoscaling(&self) -> Result<&AutoscalingClient> {
        self.autoscaling
            .get_or_try_init(|| AutoscalingClient::new(&self.config))
    }

    /// Send one operation.
    pub fn execute(&self, operation: Operation) -> Result<Outcome> {
        let kind = operation.kind();
        tracing::debug!(operation = kind, region = self.dynamo.region(), "executing");

        let outcome = match operation {
            Operation::GetItem(request) => Outcome::Get(self.dynamo.get_item(request)?),
            Operation::PutItem(request) => Outcome::Put(self.dynamo.put_item(request)?),
            Operation::UpdateItem(request) => Outcome::Update(self.dynamo.update_item(request)?),
            Operation::DeleteItem(request) => Outcome::Delete(self.dynamo.delete_item(request)?),
            Operation::BatchGet(request) => Outcome::BatchGet(self.dynamo.batch_get(request)?),
            Operation::BatchWrite(request) => {
                Outcome::BatchWrite(self.dynamo.batch_write(request)?)
            }
            Operation::CreateTable { descriptor, wait } => {
                Outcome::Table(self.dynamo.create_table(descriptor, wait)?)
            }
            Operation::UpdateTable {
                table,
                throughput,
                wait,
            } => Outcome::Table(self.dynamo.update_table(&table, throughput, wait)?),
            Operation::DeleteTable { table, wait } => {
                Outcome::Table(self.dynamo.delete_table(&table, wait)?)
            }
            Operation::DescribeTable { table } => {
                Outcome::Table(self.dynamo.describe_table(&table)?)
            }
            Operation::ListTables {
                limit,
                exclusive_start_table_name,
            } => Outcome::Tables(self.dynamo.list_tables(limit, exclusive_start_table_name)?),
            Operation::EnableStreams { table, view_type } => {
                Outcome::Table(self.dynamo.enable_streams(&table, view_type)?)
            }
            Operation::UpdateGlobalTable { table, region } => {
                Outcome::GlobalTable(self.dynamo.update_global_table(&table, &region)?)
            }
            Operation::UpdateGlobalTableSettings {
                table,
                write_capacity_units,
            } => Outcome::GlobalTableSettings(
                self.dynamo
                    .update_global_table_settings(&table, write_capacity_units)?,
            ),
            Operation::RegisterAutoscaling { table, policy } => {
                Outcome::Autoscaling(self.autoscaling()?.enable(&table, &policy)?)
            }
            Operation::UpdateAutoscaling { table, policy } => {
                Outcome::Autoscaling(self.autoscaling()?.update(&table, &policy)?)
            }
            Operation::DisableAutoscaling { table } => {
                Outcome::Autoscaling(self.autoscaling()?.disable(&table)?)
            }
        };

        tracing::info!(operation = kind, "operation succeeded");
        Ok(outcome)
    }

    /// Execute, print the outcome on stdout or the error on stderr.
    pub fn run(&self, operation: Operation) -> ExitCode {
        if self.run_and_print(operation) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    fn run_and_print(&self, operation: Operation) -> bool {
        let kind = operation.kind();
        match self.execute(operation).and_then(|outcome| outcome.render()) {
            Ok(rendered) => {
                println!("{}", rendered);
                true
            }
            Err(e) => {
                report_failure(kind, &e);
                false
            }
        }
    }
}

fn report_failure(kind: &str, error: &DynokitError) {
    tracing::error!(operation = kind, error = %error, "operation failed");
    eprintln!("{} failed: {}", kind, error);
}

/// Build an executor from `config` and run one operation.
pub fn run(config: AwsConfig, operation: Operation) -> ExitCode {
    run_all(config, vec![operation])
}

/// Run operations in order, stopping at the first failure.
pub fn run_all(config: AwsConfig, operations: Vec<Operation>) -> ExitCode {
    let executor = match RequestExecutor::new(config) {
        Ok(executor) => executor,
        Err(e) => {
            let kind = operations.first().map(Operation::kind).unwrap_or("setup");
            report_failure(kind, &e);
            return ExitCode::FAILURE;
        }
    };

    for operation in operations {
        if !executor.run_and_print(operation) {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Build the operation with `prepare`, then run it. A failure while
/// preparing is reported like a remote failure.
pub fn try_run<F>(config: AwsConfig, prepare: F) -> ExitCode
where
    F: FnOnce() -> Result<Operation>,
{
    match prepare() {
        Ok(operation) => run(config, operation),
        Err(e) => {
            report_failure("prepare", &e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::OperationMetrics;
    use crate::types::ItemKey;
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::HashMap;

    #[test]
    fn kinds_are_stable() {
        let get =
            Operation::GetItem(GetItemRequest::new("RetailDatabase", ItemKey::new("pk", "a")));
        assert_eq!(get.kind(), "get");

        let scaling = Operation::RegisterAutoscaling {
            table: "Music".to_string(),
            policy: ScalingPolicy::default(),
        };
        assert_eq!(scaling.kind(), "register-autoscaling");
    }

    #[test]
    fn missing_item_renders_null() {
        let outcome = Outcome::Get(GetItemResult {
            item: None,
            metrics: OperationMetrics::new(1.5),
        });
        let value: serde_json::Value = serde_json::from_str(&outcome.render().unwrap()).unwrap();
        assert!(value["item"].is_null());
        assert_eq!(value["metrics"]["duration_ms"], 1.5);
    }

    #[test]
    fn item_renders_as_plain_json() {
        let item = HashMap::from([
            ("pk".to_string(), AttributeValue::S("jim.bob@somewhere.com".to_string())),
            ("age".to_string(), AttributeValue::N("30".to_string())),
        ]);
        let outcome = Outcome::Get(GetItemResult {
            item: Some(item),
            metrics: OperationMetrics::new(2.0),
        });
        let value: serde_json::Value = serde_json::from_str(&outcome.render().unwrap()).unwrap();
        assert_eq!(value["item"]["pk"], "jim.bob@somewhere.com");
        assert_eq!(value["item"]["age"], 30);
    }

    #[test]
    fn table_list_renders_names() {
        let outcome = Outcome::Tables(TableList {
            table_names: vec!["Music".to_string(), "RetailDatabase".to_string()],
            last_evaluated_table_name: None,
        });
        let value: serde_json::Value = serde_json::from_str(&outcome.render().unwrap()).unwrap();
        assert_eq!(value["table_names"][1], "RetailDatabase");
        assert!(value.get("last_evaluated_table_name").is_none());
    }

    #[test]
    fn preparation_failure_exits_non_zero() {
        let code = try_run(AwsConfig::new(), || {
            Err(DynokitError::Serialization("an item must be a JSON object".to_string()))
        });
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
    }
}
