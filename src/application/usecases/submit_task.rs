// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::models::scrape_request::{describe_validation_errors, ScrapeRequest};
use crate::domain::models::task::TaskHandle;
use crate::domain::scraping::provider::{ProviderError, ProviderReply, ScrapeProvider};
use crate::infrastructure::metrics::{TASKS_REJECTED, TASKS_SUBMITTED};

// === Section: Errors ===

#[derive(Debug, Error, Clone)]
pub enum SubmissionError {
    /// 请求未通过校验，未发起网络调用
    #[error("{0}")]
    Validation(String),
    /// 外部服务调用失败
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// 提交结果，包含句柄与外部服务的原始应答
#[derive(Debug, Clone)]
pub struct Submission {
    pub handle: TaskHandle,
    pub reply: ProviderReply,
}

// === Section: Use Case Definition ===

pub struct TaskSubmitter {
    provider: Arc<dyn ScrapeProvider>,
}

// === Section: Implementation ===

impl TaskSubmitter {
    pub fn new(provider: Arc<dyn ScrapeProvider>) -> Self {
        Self { provider }
    }

    /// 校验并提交抓取任务
    ///
    /// 成功响应中缺少任务ID时返回空ID的句柄，由调用方决定后续处理
    pub async fn submit(&self, request: &ScrapeRequest) -> Result<Submission, SubmissionError> {
        if let Err(errors) = request.validate() {
            let message = describe_validation_errors(&errors);
            warn!("Rejected scrape request: {}", message);
            counter!(TASKS_REJECTED).increment(1);
            return Err(SubmissionError::Validation(message));
        }

        let reply = self.provider.create_task(request).await.inspect_err(|e| {
            warn!("{} rejected scrape request: {}", self.provider.name(), e);
            counter!(TASKS_REJECTED).increment(1);
        })?;

        let handle = TaskHandle::new(reply.task_id());
        match handle.task_id() {
            Some(task_id) => info!("Submitted scrape task {}", task_id),
            None => warn!("Provider accepted the request without returning a task id"),
        }
        counter!(TASKS_SUBMITTED).increment(1);

        Ok(Submission { handle, reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        response: Result<Value, ProviderError>,
    }

    impl CountingProvider {
        fn new(response: Result<Value, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response,
            })
        }
    }

    #[async_trait]
    impl ScrapeProvider for CountingProvider {
        async fn create_task(&self, _request: &ScrapeRequest) -> Result<ProviderReply, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map(ProviderReply::new)
        }

        async fn fetch_task(&self, _task_id: &str) -> Result<ProviderReply, ProviderError> {
            unreachable!("submitter never fetches")
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_invalid_requests_never_reach_provider() {
        let provider = CountingProvider::new(Ok(json!({})));
        let submitter = TaskSubmitter::new(provider.clone());

        let invalid = [
            ScrapeRequest::new("not a url", 10),
            ScrapeRequest::new("/relative/path", 10),
            ScrapeRequest::new("https://example.com", 0),
            ScrapeRequest::new("https://example.com", 101),
        ];
        for request in &invalid {
            let result = submitter.submit(request).await;
            assert!(matches!(result, Err(SubmissionError::Validation(_))));
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_request_returns_handle() {
        let provider = CountingProvider::new(Ok(json!({ "result": { "id": "T1" } })));
        let submitter = TaskSubmitter::new(provider.clone());

        let submission = submitter
            .submit(&ScrapeRequest::new("https://example.com/jobs", 10))
            .await
            .unwrap();

        assert_eq!(submission.handle.task_id(), Some("T1"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_task_id_yields_empty_handle() {
        let provider = CountingProvider::new(Ok(json!({ "statusCode": 200 })));
        let submitter = TaskSubmitter::new(provider);

        let submission = submitter
            .submit(&ScrapeRequest::new("https://example.com/jobs", 10))
            .await
            .unwrap();

        assert_eq!(submission.handle.task_id(), None);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_status_and_body() {
        let provider = CountingProvider::new(Err(ProviderError::Remote {
            status: 401,
            body: json!({ "messageCode": "unauthorized" }),
        }));
        let submitter = TaskSubmitter::new(provider);

        let error = submitter
            .submit(&ScrapeRequest::new("https://example.com/jobs", 10))
            .await
            .unwrap_err();

        match error {
            SubmissionError::Provider(ProviderError::Remote { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body["messageCode"], "unauthorized");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
