// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::settings::BrowseAiSettings;
use crate::domain::models::scrape_request::ScrapeRequest;
use crate::domain::scraping::provider::{ProviderError, ProviderReply, ScrapeProvider};

/// 访问凭据
#[derive(Clone)]
struct Credentials {
    api_key: String,
    robot_id: String,
}

/// Browse.ai v2 API 客户端
///
/// 凭据在请求时检查，缺失时返回 [`ProviderError::MissingCredentials`]
pub struct BrowseAiClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl BrowseAiClient {
    pub fn new(settings: &BrowseAiSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("jobscout/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let credentials = match (&settings.api_key, &settings.robot_id) {
            (Some(api_key), Some(robot_id)) if !api_key.is_empty() && !robot_id.is_empty() => {
                Some(Credentials {
                    api_key: api_key.clone(),
                    robot_id: robot_id.clone(),
                })
            }
            _ => None,
        };

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn credentials(&self) -> Result<&Credentials, ProviderError> {
        self.credentials
            .as_ref()
            .ok_or(ProviderError::MissingCredentials)
    }

    fn tasks_url(&self, robot_id: &str) -> String {
        format!("{}/v2/robots/{}/tasks", self.base_url, robot_id)
    }

    /// 任务ID始终编码为单个路径段
    fn task_url(&self, robot_id: &str, task_id: &str) -> Result<Url, ProviderError> {
        if matches!(task_id, "" | "." | "..") {
            return Err(ProviderError::InvalidTaskId(task_id.to_string()));
        }

        let mut url = Url::parse(&self.tasks_url(robot_id))
            .map_err(|e| ProviderError::Network(format!("Invalid Browse.ai base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network("Browse.ai base url cannot hold a path".into()))?
            .push(task_id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ProviderReply, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(_) if !status.is_success() => Value::String(text),
                Err(e) => return Err(ProviderError::Malformed(e.to_string())),
            }
        };

        debug!("Browse.ai response ({}): {}", status, body);

        if !status.is_success() {
            error!("Browse.ai call failed with status {}", status);
            return Err(ProviderError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ProviderReply::new(body))
    }
}

#[async_trait]
impl ScrapeProvider for BrowseAiClient {
    async fn create_task(&self, request: &ScrapeRequest) -> Result<ProviderReply, ProviderError> {
        let credentials = self.credentials()?;
        let url = self.tasks_url(&credentials.robot_id);

        let payload = json!({
            "inputParameters": {
                "originUrl": request.source_url,
                "job_listings_limit": request.record_limit,
            }
        });

        info!("Creating Browse.ai task: {}", url);
        let reply = self
            .send(
                self.client
                    .post(&url)
                    .bearer_auth(&credentials.api_key)
                    .json(&payload),
            )
            .await?;

        if let Some(task_id) = reply.task_id() {
            info!("Browse.ai task created: {}", task_id);
        }

        Ok(reply)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<ProviderReply, ProviderError> {
        let credentials = self.credentials()?;
        let url = self.task_url(&credentials.robot_id, task_id)?;

        debug!("Fetching Browse.ai task: {}", url);
        self.send(self.client.get(url).bearer_auth(&credentials.api_key))
            .await
    }

    fn name(&self) -> &'static str {
        "browse_ai"
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
