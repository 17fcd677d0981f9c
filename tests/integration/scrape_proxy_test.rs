// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, create_test_app_without_credentials, created, sample_listings, task_body,
    task_path, tasks_path, API_KEY,
};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

/// 有效请求被转发到外部服务并返回任务ID
#[tokio::test]
async fn test_scrape_forwards_request() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_json(json!({
            "inputParameters": {
                "originUrl": "https://example.com/list",
                "job_listings_limit": 20
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("T1")))
        .expect(1)
        .mount(&app.browse_ai)
        .await;

    let response = app
        .server
        .post("/scrape")
        .json(&json!({ "sourceUrl": "https://example.com/list", "recordLimit": 20 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["taskId"], "T1");
    assert_eq!(body["data"]["messageCode"], "success");
}

/// 缺省字段使用默认值，同时接受原始字段名
#[tokio::test]
async fn test_scrape_defaults_and_aliases() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .and(body_json(json!({
            "inputParameters": {
                "originUrl": "https://example.com/jobs",
                "job_listings_limit": 10
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("T-default")))
        .expect(1)
        .mount(&app.browse_ai)
        .await;
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .and(body_json(json!({
            "inputParameters": {
                "originUrl": "https://example.com/alias",
                "job_listings_limit": 3
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("T-alias")))
        .expect(1)
        .mount(&app.browse_ai)
        .await;

    let response = app.server.post("/scrape").json(&json!({})).await;
    assert_eq!(response.json::<Value>()["taskId"], "T-default");

    let response = app
        .server
        .post("/scrape")
        .json(&json!({ "originUrl": "https://example.com/alias", "job_listings_limit": 3 }))
        .await;
    assert_eq!(response.json::<Value>()["taskId"], "T-alias");
}

/// 成功响应中没有任务ID时返回 null
#[tokio::test]
async fn test_scrape_without_task_id() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "statusCode": 200 })))
        .mount(&app.browse_ai)
        .await;

    let response = app.server.post("/scrape").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["taskId"], Value::Null);
}

/// 非法输入返回 400，且不会调用外部服务
#[tokio::test]
async fn test_scrape_validation_errors() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created("T1")))
        .expect(0)
        .mount(&app.browse_ai)
        .await;

    let invalid = [
        json!({ "sourceUrl": "not a url" }),
        json!({ "recordLimit": 0 }),
        json!({ "recordLimit": 101 }),
        json!({ "recordLimit": 2.5 }),
        json!({ "recordLimit": "10" }),
    ];

    for body in invalid {
        let response = app.server.post("/scrape").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", body);
        assert!(response.json::<Value>()["error"].is_string());
    }

    let response = app.server.post("/scrape").text("{not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

/// 凭据缺失时返回 500
#[tokio::test]
async fn test_missing_credentials_is_server_error() {
    let app = create_test_app_without_credentials().await;

    let response = app
        .server
        .post("/scrape")
        .json(&json!({ "recordLimit": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.server.get("/task/T1").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// 外部服务失败时返回 500 并附带原始响应
#[tokio::test]
async fn test_provider_failure_carries_details() {
    let app = create_test_app().await;
    Mock::given(method("POST"))
        .and(path(tasks_path()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 401,
            "messageCode": "unauthorized"
        })))
        .mount(&app.browse_ai)
        .await;

    let response = app.server.post("/scrape").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert_eq!(body["details"]["messageCode"], "unauthorized");
}

/// 任务查询原样透传
#[tokio::test]
async fn test_get_task_proxies_status() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path(task_path("T1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_body("T1", "successful", sample_listings())),
        )
        .mount(&app.browse_ai)
        .await;

    let response = app.server.get("/task/T1").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["taskId"], "T1");
    assert_eq!(body["data"]["result"]["status"], "successful");
    assert_eq!(
        body["data"]["result"]["capturedLists"]["Job Listings"]
            .as_array()
            .map(Vec::len),
        Some(3)
    );
}

#[tokio::test]
async fn test_get_task_requires_id() {
    let app = create_test_app().await;

    for uri in ["/task", "/task/", "/task/%20"] {
        let response = app.server.get(uri).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_task_provider_error() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path(task_path("missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "messageCode": "not_found"
        })))
        .mount(&app.browse_ai)
        .await;

    let response = app.server.get("/task/missing").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["details"]["messageCode"], "not_found");
}

#[tokio::test]
async fn test_get_task_id_cannot_escape_tasks_path() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path(task_path("..%2F..%2F..%2Fv2%2Frobots")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_body("T1", "in-progress", json!([]))),
        )
        .expect(1)
        .mount(&app.browse_ai)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/robots"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.browse_ai)
        .await;

    let response = app.server.get("/task/..%2F..%2F..%2Fv2%2Frobots").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get("/task/%2E%2E").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
