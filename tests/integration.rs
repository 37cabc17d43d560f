//! Integration tests against DynamoDB Local.
//!
//! Marked `#[ignore]` so they don't run during normal `cargo test`. Start
//! DynamoDB Local and run them with:
//! ```text
//! DYNOKIT_ENDPOINT_URL=http://localhost:8000 cargo test --test integration -- --ignored
//! ```

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_dynamodb::Client;
use serde_json::json;

use dynokit::basic_operations::{
    DeleteItemRequest, GetItemRequest, PutItemRequest, execute_delete_item, execute_get_item,
    execute_put_item,
};
use dynokit::batch_operations::{
    BatchGetRequest, BatchWriteRequest, execute_batch_get, execute_batch_write,
};
use dynokit::conversions::{item_from_json, item_to_json};
use dynokit::table_operations::{
    TableDescriptor, create_table, delete_table, describe_table, enable_streams, table_exists,
};
use dynokit::{AttributeValue, AwsConfig, ItemKey, ScalarAttributeType, StreamViewType};

const WAIT: Duration = Duration::from_secs(60);

async fn local_client() -> Client {
    dynokit::logging::init();

    let endpoint = std::env::var(dynokit::config::ENDPOINT_ENV)
        .unwrap_or_else(|_| "http://localhost:8000".to_owned());
    let config = AwsConfig::new()
        .region("us-east-1")
        .endpoint_url(endpoint)
        .static_credentials("local", "local", None);
    let sdk_config = config.load().await;
    config.dynamodb_client(&sdk_config)
}

fn unique_table(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

/// pk/sk table shaped like RetailDatabase.
async fn create_retail_table(client: &Client, name: &str) {
    let descriptor = TableDescriptor::new(name)
        .partition_key("pk", ScalarAttributeType::S)
        .sort_key("sk", ScalarAttributeType::S)
        .on_demand();
    create_table(client, descriptor, Some(WAIT))
        .await
        .unwrap_or_else(|e| panic!("failed to create table {name}: {e}"));
}

async fn drop_table(client: &Client, name: &str) {
    let _ = delete_table(client, name, None).await;
}

fn metadata_key(email: &str) -> ItemKey {
    ItemKey::new("pk", email).with_sort("sk", "metadata")
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn put_then_get_returns_same_attributes() {
    let client = local_client().await;
    let table = unique_table("retail");
    create_retail_table(&client, &table).await;

    let submitted = json!({
        "pk": "x@y.com",
        "sk": "metadata",
        "name": "X Y",
        "age": 41,
        "address": { "road": "89105 Bakken Rd", "state": "WA" }
    });

    let before = execute_get_item(&client, GetItemRequest::new(&table, metadata_key("x@y.com")))
        .await
        .unwrap();
    assert!(before.item.is_none());

    execute_put_item(
        &client,
        PutItemRequest::new(&table, item_from_json(&submitted).unwrap()),
    )
    .await
    .unwrap();

    let fetched = execute_get_item(
        &client,
        GetItemRequest::new(&table, metadata_key("x@y.com")).consistent_read(true),
    )
    .await
    .unwrap();
    let item = fetched.item.expect("item was just written");
    assert_eq!(item_to_json(&item).unwrap(), submitted);

    drop_table(&client, &table).await;
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn conditional_delete_respects_age() {
    let client = local_client().await;
    let table = unique_table("retail");
    create_retail_table(&client, &table).await;

    for (email, age) in [("old@somewhere.com", 35), ("young@somewhere.com", 25)] {
        let item = item_from_json(&json!({ "pk": email, "sk": "metadata", "age": age })).unwrap();
        execute_put_item(&client, PutItemRequest::new(&table, item))
            .await
            .unwrap();
    }

    let conditional_delete = |email: &str| {
        DeleteItemRequest::new(&table, metadata_key(email))
            .condition("age <= :max_age")
            .value(":max_age", AttributeValue::N("30".to_string()))
            .return_item_on_condition_failure()
    };

    let err = execute_delete_item(&client, conditional_delete("old@somewhere.com"))
        .await
        .unwrap_err();
    assert!(err.is_conditional_check_failed());

    execute_delete_item(&client, conditional_delete("young@somewhere.com"))
        .await
        .unwrap();

    let old = execute_get_item(
        &client,
        GetItemRequest::new(&table, metadata_key("old@somewhere.com")),
    )
    .await
    .unwrap();
    assert!(old.item.is_some());

    let young = execute_get_item(
        &client,
        GetItemRequest::new(&table, metadata_key("young@somewhere.com")),
    )
    .await
    .unwrap();
    assert!(young.item.is_none());

    drop_table(&client, &table).await;
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn on_demand_table_reports_pay_per_request() {
    let client = local_client().await;
    let table = unique_table("music");

    let descriptor = TableDescriptor::new(&table)
        .partition_key("Artist", ScalarAttributeType::S)
        .sort_key("SongTitle", ScalarAttributeType::S)
        .on_demand();
    create_table(&client, descriptor, Some(WAIT)).await.unwrap();

    let summary = describe_table(&client, &table).await.unwrap();
    assert_eq!(summary.billing_mode.as_deref(), Some("PAY_PER_REQUEST"));
    assert_eq!(summary.table_status.as_deref(), Some("ACTIVE"));
    assert!(table_exists(&client, &table).await.unwrap());

    delete_table(&client, &table, Some(WAIT)).await.unwrap();
    assert!(!table_exists(&client, &table).await.unwrap());
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn batch_write_then_batch_get_returns_both() {
    let client = local_client().await;
    let table = unique_table("retail");
    create_retail_table(&client, &table).await;

    let emails = ["jose.schneller@somewhere.com", "jim.bob@somewhere.com"];
    let mut request = BatchWriteRequest::new(&table);
    for email in emails {
        request = request.put(
            item_from_json(&json!({ "pk": email, "sk": "metadata", "username": email })).unwrap(),
        );
    }

    let written = execute_batch_write(&client, request).await.unwrap();
    assert_eq!(written.requests_sent, 2);
    assert_eq!(written.unprocessed_count, 0);

    let fetched = execute_batch_get(
        &client,
        BatchGetRequest::new(&table).keys(emails.iter().map(|e| metadata_key(e))),
    )
    .await
    .unwrap();
    assert_eq!(fetched.items.len(), 2);

    let mut pks: Vec<String> = fetched
        .items
        .iter()
        .filter_map(|item| match item.get("pk") {
            Some(AttributeValue::S(pk)) => Some(pk.clone()),
            _ => None,
        })
        .collect();
    pks.sort();
    assert_eq!(pks, vec!["jim.bob@somewhere.com", "jose.schneller@somewhere.com"]);

    drop_table(&client, &table).await;
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn enabled_stream_is_reported_by_describe() {
    let client = local_client().await;
    let table = unique_table("music");
    create_retail_table(&client, &table).await;

    enable_streams(&client, &table, StreamViewType::NewAndOldImages)
        .await
        .unwrap();

    let summary = describe_table(&client, &table).await.unwrap();
    assert!(summary.stream_enabled);
    assert_eq!(summary.stream_view_type.as_deref(), Some("NEW_AND_OLD_IMAGES"));

    drop_table(&client, &table).await;
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn missing_table_is_not_found() {
    let client = local_client().await;
    let table = unique_table("missing");

    let err = describe_table(&client, &table).await.unwrap_err();
    assert!(err.is_not_found());

    let err = execute_get_item(&client, GetItemRequest::new(&table, metadata_key("a@b.com")))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");

    let items: HashMap<String, AttributeValue> = HashMap::new();
    let err = execute_put_item(&client, PutItemRequest::new(&table, items))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        dynokit::DynokitError::ResourceNotFound { .. } | dynokit::DynokitError::Validation(_)
    ));
}
