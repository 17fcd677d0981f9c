// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_record::JobRecord;
use crate::domain::scraping::provider::ProviderReply;
use serde_json::{Map, Value};
use tracing::debug;

/// 捕获列表的候选键，按优先级排列
///
/// 键名由外部服务的机器人配置决定，并不稳定
pub const PRIORITY_KEYS: [&str; 8] = [
    "Job Listings",
    "job_listings",
    "Job listings",
    "jobs",
    "list",
    "data",
    "items",
    "results",
];

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// 找到了数组类型的捕获列表
    Found { key: String, records: Vec<JobRecord> },
    /// 没有任何数组类型的值
    NotFound,
}

impl Extraction {
    pub fn records(&self) -> &[JobRecord] {
        match self {
            Extraction::Found { records, .. } => records,
            Extraction::NotFound => &[],
        }
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        match self {
            Extraction::Found { records, .. } => records,
            Extraction::NotFound => Vec::new(),
        }
    }

    /// 非空即视为数据就绪
    pub fn has_records(&self) -> bool {
        !self.records().is_empty()
    }
}

/// 从捕获列表映射中定位职位记录
///
/// 先按 [`PRIORITY_KEYS`] 顺序查找数组值；都不匹配时，
/// 按映射自身的键顺序取第一个数组值。形状不符从不报错。
pub fn extract(payload: &Map<String, Value>) -> Extraction {
    let prioritized = PRIORITY_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array).map(|items| (*key, items)));

    let found = prioritized.or_else(|| {
        payload
            .iter()
            .find_map(|(key, value)| value.as_array().map(|items| (key.as_str(), items)))
    });

    match found {
        Some((key, items)) => {
            let records: Vec<JobRecord> = items
                .iter()
                .filter_map(Value::as_object)
                .map(JobRecord::from_captured)
                .collect();
            debug!("Captured list found under key '{}' with {} records", key, records.len());
            Extraction::Found {
                key: key.to_string(),
                records,
            }
        }
        None => Extraction::NotFound,
    }
}

/// 从一次完整应答中提取，缺少 `capturedLists` 时视为未找到
pub fn extract_reply(reply: &ProviderReply) -> Extraction {
    reply
        .captured_lists()
        .map(extract)
        .unwrap_or(Extraction::NotFound)
}

#[cfg(test)]
#[path = "result_extractor_test.rs"]
mod tests;
