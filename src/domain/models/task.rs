// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 任务句柄
///
/// 提交成功后创建，之后不可变。轮询器和提取器以它作为关联单元。
/// 外部服务在成功响应中偶尔不返回任务ID，此时 `task_id` 为 `None`，
/// 由调用方决定如何继续。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    /// 外部任务ID
    pub task_id: Option<String>,
    /// 句柄创建时间
    pub created_at: DateTime<Utc>,
}

impl TaskHandle {
    pub fn new(task_id: Option<String>) -> Self {
        Self {
            task_id,
            created_at: Utc::now(),
        }
    }

    /// 已知任务ID的句柄
    pub fn for_task(task_id: impl Into<String>) -> Self {
        Self::new(Some(task_id.into()))
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }
}

/// 任务状态枚举
///
/// 由外部服务返回的状态字符串推导而来。
/// 无法识别的字符串一律视为 `Pending`（尚未就绪），而不是报错。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 排队中
    #[default]
    Pending,
    /// 执行中
    Running,
    /// 已成功
    Succeeded,
    /// 已失败
    Failed,
}

impl TaskStatus {
    /// 从外部状态字符串解析，缺失时返回默认值
    pub fn from_provider(raw: Option<&str>) -> Self {
        raw.map(|s| s.parse().unwrap_or_default()).unwrap_or_default()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_lowercase().as_str() {
            "running" | "in-progress" | "in_progress" => TaskStatus::Running,
            "successful" | "succeeded" | "completed" | "done" => TaskStatus::Succeeded,
            "failed" | "error" | "cancelled" => TaskStatus::Failed,
            _ => TaskStatus::Pending,
        };
        Ok(status)
    }
}
