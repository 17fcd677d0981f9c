// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 数据源中表示“无值”的占位符
pub const PLACEHOLDER: &str = "-";

/// 雇佣类型候选字段，按优先级排列
pub const EMPLOYMENT_TYPE_FIELDS: [&str; 9] = [
    "Job Type",
    "Employment Type",
    "고용형태",
    "채용형태",
    "근무형태",
    "Job Category",
    "직무유형",
    "Career Level",
    "Position Type",
];

/// 规范化后的职位记录
///
/// 所有字段都可能缺失，缺失时显式为 `None`，
/// 由展示层统一替换为占位符。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// 经验要求
    pub seniority: Option<String>,
    /// 学历要求
    pub education: Option<String>,
    /// 雇佣类型候选值，按 [`EMPLOYMENT_TYPE_FIELDS`] 的优先级排列
    pub employment_type_candidates: Vec<String>,
    /// 截止日期
    pub deadline: Option<String>,
    /// 发布日期原文，例如 "3일 전 등록"
    pub posted: Option<String>,
    pub detail_link: Option<String>,
    pub company_link: Option<String>,
}

impl JobRecord {
    /// 从外部抓取服务的一条原始数据构建记录
    ///
    /// 空字符串与占位符 `-` 视为缺失，非字符串标量会被转成字符串。
    pub fn from_captured(item: &Map<String, Value>) -> Self {
        let field = |name: &str| item.get(name).and_then(scalar_text);

        Self {
            title: field("Job Title"),
            company: field("Company Name"),
            location: field("Location"),
            seniority: field("Career Level"),
            education: field("Education Requirement"),
            employment_type_candidates: EMPLOYMENT_TYPE_FIELDS
                .iter()
                .filter_map(|name| field(*name))
                .collect(),
            deadline: field("Application Deadline"),
            posted: field("Date Posted"),
            detail_link: field("Job Details Link"),
            company_link: field("Company Info Link"),
        }
    }

    /// 实际生效的雇佣类型：第一个存在的候选值
    pub fn employment_type(&self) -> Option<&str> {
        self.employment_type_candidates.first().map(String::as_str)
    }

    /// 用于关键词匹配的标题，缺失时为空串
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if text.is_empty() || text == PLACEHOLDER {
        None
    } else {
        Some(text)
    }
}

/// 排序后的单条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    #[serde(flatten)]
    pub record: JobRecord,
    /// 标题是否命中关键词
    pub matched: bool,
    /// 解析后的发布时间，无法解析时为 Unix 纪元
    pub posted_at: DateTime<Utc>,
}

/// 排序后的职位列表
///
/// 命中关键词的记录在前，其余在后；两段内部各自按发布时间倒序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJobList {
    entries: Vec<RankedJob>,
    matched_count: usize,
}

impl RankedJobList {
    /// 由已排好序的两段拼接而成
    pub fn from_blocks(matched: Vec<RankedJob>, unmatched: Vec<RankedJob>) -> Self {
        let matched_count = matched.len();
        let mut entries = matched;
        entries.extend(unmatched);
        Self {
            entries,
            matched_count,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn matched(&self) -> &[RankedJob] {
        &self.entries[..self.matched_count]
    }

    pub fn unmatched(&self) -> &[RankedJob] {
        &self.entries[self.matched_count..]
    }

    pub fn records(&self) -> impl Iterator<Item = &JobRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }
}
