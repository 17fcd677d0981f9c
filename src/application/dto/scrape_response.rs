// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::scraping::provider::ProviderReply;

/// 代理接口的成功响应
///
/// `data` 原样透传外部服务的响应体
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponseDto {
    /// 请求处理是否成功
    pub success: bool,
    /// 外部任务ID，外部服务未返回时为 `null`
    pub task_id: Option<String>,
    /// 原始响应体
    pub data: Value,
}

impl ScrapeResponseDto {
    pub fn from_reply(task_id: Option<String>, reply: ProviderReply) -> Self {
        Self {
            success: true,
            task_id,
            data: reply.body,
        }
    }
}
