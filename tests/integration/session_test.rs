// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, create_test_app_with_options, created, sample_listings, task_body,
    task_path, tasks_path, TestApp,
};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_task(app: &TestApp, task_id: &str, status: &str, listings: Value) {
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(created(task_id)))
        .mount(&app.browse_ai)
        .await;
    Mock::given(method("GET"))
        .and(path(task_path(task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(task_id, status, listings)))
        .mount(&app.browse_ai)
        .await;
}

/// 等待会话进入指定状态
async fn wait_for_status(app: &TestApp, status: &str) -> Value {
    for _ in 0..50 {
        let snapshot: Value = app.server.get("/session").await.json();
        if snapshot["status"] == status {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("session never reached status {}", status);
}

fn titles(snapshot: &Value) -> Vec<String> {
    snapshot["ranked"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_session_starts_idle() {
    let app = create_test_app().await;

    let snapshot: Value = app.server.get("/session").await.json();
    assert_eq!(snapshot["status"], "idle");
    assert_eq!(snapshot["isLoading"], false);
    assert_eq!(snapshot["maxAttempts"], 30);
    assert_eq!(snapshot["keywords"].as_array().map(Vec::len), Some(6));
}

/// 提交、轮询、排序、改关键词、导出的完整流程
#[tokio::test]
async fn test_session_workflow() {
    let app = create_test_app().await;
    mount_task(&app, "T1", "successful", sample_listings()).await;

    let response = app
        .server
        .post("/session/scrape")
        .json(&json!({ "sourceUrl": "https://example.com/jobs", "recordLimit": 3, "keywords": "회계, 재무" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let snapshot: Value = response.json();
    assert_eq!(snapshot["status"], "polling");
    assert_eq!(snapshot["taskId"], "T1");
    assert_eq!(snapshot["isPolling"], true);

    let snapshot = wait_for_status(&app, "ready").await;
    assert_eq!(snapshot["isReady"], true);
    assert_eq!(snapshot["ranked"]["matchedCount"], 2);
    assert_eq!(titles(&snapshot), vec!["재무 팀장", "회계 담당자", "영업 관리"]);

    let response = app
        .server
        .put("/session/keywords")
        .json(&json!({ "keywords": ["영업"] }))
        .await;
    let snapshot: Value = response.json();
    assert_eq!(titles(&snapshot), vec!["영업 관리", "재무 팀장", "회계 담당자"]);

    let response = app.server.get("/session/export").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains("job_listings_"));
    let text = response.text();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("=HYPERLINK"));
}

#[tokio::test]
async fn test_session_timeout_and_retry() {
    let app = create_test_app_with_options(true, 2).await;
    mount_task(&app, "T1", "in-progress", json!([])).await;

    app.server
        .post("/session/scrape")
        .json(&json!({}))
        .await;

    let snapshot = wait_for_status(&app, "timed_out").await;
    assert_eq!(snapshot["attempts"], 2);

    let snapshot: Value = app.server.post("/session/retry").await.json();
    assert_eq!(snapshot["status"], "polling");
    assert_eq!(snapshot["attempt"], 0);

    let snapshot: Value = app.server.delete("/session").await.json();
    assert_eq!(snapshot["status"], "idle");
}

#[tokio::test]
async fn test_session_refresh_reads_current_task() {
    let app = create_test_app().await;
    mount_task(&app, "T1", "successful", sample_listings()).await;

    app.server.post("/session/scrape").json(&json!({})).await;
    let response = app.server.post("/session/refresh").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let snapshot: Value = response.json();
    assert_eq!(snapshot["status"], "ready");
    assert_eq!(titles(&snapshot).len(), 3);
}

#[tokio::test]
async fn test_session_errors() {
    let app = create_test_app().await;

    let response = app.server.post("/session/retry").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.server.get("/session/export").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .post("/session/scrape")
        .json(&json!({ "recordLimit": 500 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let snapshot: Value = app.server.get("/session").await.json();
    assert_eq!(snapshot["status"], "failed");
}
