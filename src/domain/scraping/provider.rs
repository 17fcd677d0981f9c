// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_request::ScrapeRequest;
use crate::domain::models::task::TaskStatus;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// 外部抓取服务错误
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    /// 未配置 API 密钥或机器人ID
    #[error("Browse.ai API key or robot id is not configured")]
    MissingCredentials,
    /// 网络错误
    #[error("Network error: {0}")]
    Network(String),
    /// 外部服务返回了非成功状态
    #[error("Provider responded with status {status}")]
    Remote { status: u16, body: Value },
    /// 响应无法解析
    #[error("Malformed provider response: {0}")]
    Malformed(String),
    /// 任务ID不能作为单个路径段使用
    #[error("Invalid task id: {0:?}")]
    InvalidTaskId(String),
}

impl ProviderError {
    /// 原始诊断信息，供调用方透传
    pub fn details(&self) -> Value {
        match self {
            ProviderError::Remote { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// 外部服务的一次应答
///
/// 只对需要的字段做宽松解析，完整的原始响应保留在 `body` 中。
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    /// 原始响应体
    pub body: Value,
}

impl ProviderReply {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    fn result(&self) -> Option<&Map<String, Value>> {
        self.body.get("result").and_then(Value::as_object)
    }

    /// 任务ID（`result.id`）
    pub fn task_id(&self) -> Option<String> {
        self.result()?.get("id").and_then(|id| match id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// 原始状态字符串（`result.status`）
    pub fn raw_status(&self) -> Option<&str> {
        self.result()?.get("status").and_then(Value::as_str)
    }

    /// 解析后的任务状态
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_provider(self.raw_status())
    }

    /// 捕获列表映射（`result.capturedLists`）
    pub fn captured_lists(&self) -> Option<&Map<String, Value>> {
        self.result()?.get("capturedLists").and_then(Value::as_object)
    }
}

/// 外部抓取服务接口
#[async_trait]
pub trait ScrapeProvider: Send + Sync {
    /// 创建抓取任务
    async fn create_task(&self, request: &ScrapeRequest) -> Result<ProviderReply, ProviderError>;

    /// 查询任务状态与结果
    async fn fetch_task(&self, task_id: &str) -> Result<ProviderReply, ProviderError>;

    /// 服务名称
    fn name(&self) -> &'static str;

    /// 凭据是否齐全
    fn is_configured(&self) -> bool {
        true
    }
}
