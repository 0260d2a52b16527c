use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use todoapi_api::config::ApiConfig;
use todoapi_items::{InMemoryItemStore, ItemStore};

struct TestServer {
    base_url: String,
    upload_path: PathBuf,
    handle: tokio::task::JoinHandle<()>,
    _upload_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        todoapi_observability::init();

        let upload_dir = tempfile::tempdir().expect("failed to create temp dir");
        let upload_path = upload_dir.path().join("upload.txt");
        let config = ApiConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            upload_path: upload_path.clone(),
        };

        // Same router as prod, fresh seeded store, ephemeral port.
        let items: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::seeded());
        let app = todoapi_api::app::build_app(&config, items);
        let listener = tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            upload_path,
            handle,
            _upload_dir: upload_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn sorted_by_id(mut items: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
    items.sort_by_key(|i| i["id"].as_i64().unwrap());
    items
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seed_store_lists_three_items() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/todoItems/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let items: Vec<serde_json::Value> = res.json().await.unwrap();

    assert_eq!(
        sorted_by_id(items),
        vec![
            json!({ "id": 1, "title": "Item 1", "completed": false }),
            json!({ "id": 2, "title": "Item 2", "completed": true }),
            json!({ "id": 3, "title": "Item 3", "completed": false }),
        ]
    );
}

#[tokio::test]
async fn create_then_get_returns_same_item() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let item = json!({ "id": 10, "title": "Write tests", "completed": false });

    let res = client.post(srv.url("/todoItems/")).json(&item).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["location"], "/items/10");
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created, item);

    let res = client.get(srv.url("/todoItems/10")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn duplicate_create_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let item = json!({ "id": 11, "title": "Once", "completed": true });

    let first = client.post(srv.url("/todoItems/")).json(&item).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(srv.url("/todoItems/")).json(&item).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    // Seeded ids are duplicates too.
    let res = client
        .post(srv.url("/todoItems/"))
        .json(&json!({ "id": 1, "title": "dup", "completed": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_absent_item_returns_null() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/todoItems/404")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn non_integer_id_fails_binding() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/todoItems/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.delete(srv.url("/todoItems/1.5")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Store untouched.
    let items: Vec<serde_json::Value> = client
        .get(srv.url("/todoItems/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn put_replaces_present_item() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let replacement = json!({ "id": 2, "title": "Item 2 (renamed)", "completed": false });

    let res = client
        .put(srv.url("/todoItems/2"))
        .json(&replacement)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    let fetched: serde_json::Value = client
        .get(srv.url("/todoItems/2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, replacement);
}

#[tokio::test]
async fn put_checks_body_id_not_path_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Path names an absent id, body names a present one: replaced.
    let res = client
        .put(srv.url("/todoItems/999"))
        .json(&json!({ "id": 3, "title": "via other path", "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let fetched: serde_json::Value = client
        .get(srv.url("/todoItems/3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "via other path");
}

#[tokio::test]
async fn put_or_delete_absent_item_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/todoItems/50"))
        .json(&json!({ "id": 50, "title": "ghost", "completed": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.delete(srv.url("/todoItems/50")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Neither call inserted anything.
    let body: serde_json::Value = client
        .get(srv.url("/todoItems/50"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn delete_removes_present_item() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.delete(srv.url("/todoItems/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: serde_json::Value = client
        .get(srv.url("/todoItems/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.is_null());

    let res = client.delete(srv.url("/todoItems/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_marker_filter_guards_endpoint() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/todoItems/filters?x=meep123"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Hello World");

    let res = client
        .get(srv.url("/todoItems/filters?secretPasscode=nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(srv.url("/todoItems/filters")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filter_v2_runs_through_logging_chain() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/filterV2")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Test of multiple filters");
}

#[tokio::test]
async fn array_binding_uses_first_two_names() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/array-binding?names=meep&names=morp&names=zeep"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "name1: meep, name2: morp");

    // Keys match regardless of case.
    let res = reqwest::get(srv.url("/array-binding?NAMES=a&Names=b")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "name1: a, name2: b");
}

#[tokio::test]
async fn array_binding_with_fewer_than_two_names_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/array-binding?names=solo")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_names");

    let res = client.get(srv.url("/array-binding")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn struct_binding_from_query() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/todos?Id=4&Title=Laundry&Completed=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    // Bool values ignore case; a repeated key keeps its first value.
    let res = client
        .post(srv.url("/todos?Id=6&id=7&Completed=True"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Defaults fill absent fields.
    let res = client.post(srv.url("/todos?id=5")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Missing id fails binding.
    let res = client.post(srv.url("/todos?Title=x")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_overwrites_destination_file() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    std::fs::write(&srv.upload_path, b"stale contents that are longer").unwrap();

    let payload: Vec<u8> = b"line one\nline two\n\x00\xffbinary".to_vec();
    let part = reqwest::multipart::Part::bytes(payload.clone()).file_name("notes.txt");
    let form = reqwest::multipart::Form::new()
        .text("comment", "not a file")
        .part("file", part);

    let res = client.post(srv.url("/upload")).multipart(form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["bytes_written"], payload.len());

    assert_eq!(std::fs::read(&srv.upload_path).unwrap(), payload);
}

#[tokio::test]
async fn upload_larger_than_default_body_limit_replaces_file() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    std::fs::write(&srv.upload_path, b"previous contents").unwrap();

    // 3 MiB, past axum's 2 MB default body limit.
    let payload: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let part = reqwest::multipart::Part::bytes(payload.clone()).file_name("big.bin");
    let form = reqwest::multipart::Form::new().part("file", part);

    let res = client.post(srv.url("/upload")).multipart(form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["bytes_written"], payload.len());

    let on_disk = std::fs::read(&srv.upload_path).unwrap();
    assert_eq!(on_disk.len(), payload.len());
    assert!(on_disk == payload);

    // No staging files left beside the destination.
    let leftovers: Vec<_> = std::fs::read_dir(srv.upload_path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|name| name != "upload.txt")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[tokio::test]
async fn failed_upload_keeps_previous_file() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    std::fs::write(&srv.upload_path, b"previous contents").unwrap();

    // Multipart body cut off mid-file: the closing boundary never arrives.
    let body = "--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\
        Content-Type: text/plain\r\n\r\n\
        partial data that never finishes";
    let res = client
        .post(srv.url("/upload"))
        .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
        .body(body)
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error(), "got {}", res.status());

    assert_eq!(std::fs::read(&srv.upload_path).unwrap(), b"previous contents");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new().text("comment", "no file here");
    let res = client.post(srv.url("/upload")).multipart(form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!srv.upload_path.exists());
}
