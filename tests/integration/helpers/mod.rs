// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use jobscout::application::session::ScrapeSession;
use jobscout::config::settings::{
    BrowseAiSettings, MetricsSettings, PollingSettings, RankingSettings, ServerSettings, Settings,
    DEFAULT_KEYWORDS,
};
use jobscout::domain::scraping::provider::ScrapeProvider;
use jobscout::domain::services::ranking_service::parse_keywords;
use jobscout::infrastructure::browse_ai::client::BrowseAiClient;
use jobscout::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const ROBOT_ID: &str = "robot-1";
pub const API_KEY: &str = "secret-key";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub browse_ai: MockServer,
    pub session: Arc<ScrapeSession>,
}

pub fn test_settings(base_url: &str, with_credentials: bool, max_attempts: u32) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        browse_ai: BrowseAiSettings {
            api_base_url: base_url.to_string(),
            api_key: with_credentials.then(|| API_KEY.to_string()),
            robot_id: with_credentials.then(|| ROBOT_ID.to_string()),
            request_timeout_secs: 5,
            default_source_url: "https://example.com/jobs".to_string(),
            default_record_limit: 10,
        },
        polling: PollingSettings {
            interval_secs: 1,
            max_attempts,
        },
        ranking: RankingSettings {
            default_keywords: DEFAULT_KEYWORDS.to_string(),
        },
        metrics: MetricsSettings {
            enabled: false,
            listen_addr: "127.0.0.1:0".to_string(),
        },
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_options(true, 30).await
}

pub async fn create_test_app_without_credentials() -> TestApp {
    create_test_app_with_options(false, 30).await
}

pub async fn create_test_app_with_options(with_credentials: bool, max_attempts: u32) -> TestApp {
    let browse_ai = MockServer::start().await;
    let settings = Arc::new(test_settings(&browse_ai.uri(), with_credentials, max_attempts));

    let client = BrowseAiClient::new(&settings.browse_ai).unwrap();
    let provider: Arc<dyn ScrapeProvider> = Arc::new(client);
    let session = Arc::new(ScrapeSession::new(
        provider.clone(),
        &settings.polling,
        parse_keywords(&settings.ranking.default_keywords),
    ));

    let app = routes::build_app(settings, provider, session.clone());
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        browse_ai,
        session,
    }
}

pub fn tasks_path() -> String {
    format!("/v2/robots/{}/tasks", ROBOT_ID)
}

pub fn task_path(task_id: &str) -> String {
    format!("{}/{}", tasks_path(), task_id)
}

pub fn created(task_id: &str) -> Value {
    json!({
        "statusCode": 200,
        "messageCode": "success",
        "result": { "id": task_id, "status": "in-progress" }
    })
}

pub fn task_body(task_id: &str, status: &str, listings: Value) -> Value {
    json!({
        "statusCode": 200,
        "result": {
            "id": task_id,
            "status": status,
            "capturedLists": { "Job Listings": listings }
        }
    })
}

pub fn sample_listings() -> Value {
    json!([
        {
            "Job Title": "영업 관리",
            "Company Name": "가나상사",
            "Date Posted": "1일 전",
            "Job Details Link": "https://example.com/jobs/1"
        },
        {
            "Job Title": "회계 담당자",
            "Company Name": "다라회계",
            "Date Posted": "3일 전",
            "고용형태": "정규직"
        },
        {
            "Job Title": "재무 팀장",
            "Company Name": "마바산업",
            "Date Posted": "오늘"
        }
    ])
}
