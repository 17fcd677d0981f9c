// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tracing::info;

use crate::domain::models::job_record::{JobRecord, RankedJob, RankedJobList};
use crate::domain::services::posted_date::parse_posted_date_at;

/// 解析逗号分隔的关键词输入
///
/// 去掉首尾空白并丢弃空项，例如 `"인사, 회계,,"` 得到 `["인사", "회계"]`
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

/// 标题是否包含任一关键词
///
/// 区分大小写的子串匹配，空白关键词忽略
pub fn matches_keywords<S: AsRef<str>>(title: &str, keywords: &[S]) -> bool {
    keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|keyword| !keyword.trim().is_empty())
        .any(|keyword| title.contains(keyword))
}

/// 关键词排序器
///
/// 纯函数：同样的记录和关键词总是得到同样的顺序，
/// 因此关键词变化时可以直接对已获取的数据重新排序。
#[derive(Debug, Clone, Default)]
pub struct RankingService {
    keywords: Vec<String>,
}

impl RankingService {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// 以当前时间为基准排序
    pub fn rank(&self, records: &[JobRecord]) -> RankedJobList {
        self.rank_at(records, Utc::now())
    }

    /// 以给定时间为基准排序
    ///
    /// 1. 按标题是否命中关键词分为两段
    /// 2. 每段按发布时间倒序稳定排序
    /// 3. 命中段在前，未命中段在后
    pub fn rank_at(&self, records: &[JobRecord], now: DateTime<Utc>) -> RankedJobList {
        let (mut matched, mut unmatched): (Vec<RankedJob>, Vec<RankedJob>) = records
            .iter()
            .map(|record| RankedJob {
                matched: matches_keywords(record.title_text(), &self.keywords),
                posted_at: parse_posted_date_at(record.posted.as_deref(), now),
                record: record.clone(),
            })
            .partition(|job| job.matched);

        // sort_by_key 是稳定排序，同一时间的记录保持原有相对顺序
        matched.sort_by_key(|job| Reverse(job.posted_at));
        unmatched.sort_by_key(|job| Reverse(job.posted_at));

        info!(
            "Keyword ranking finished: {} matched, {} other",
            matched.len(),
            unmatched.len()
        );

        RankedJobList::from_blocks(matched, unmatched)
    }
}

/// 排序入口
pub fn normalize<S: AsRef<str>>(records: &[JobRecord], keywords: &[S]) -> RankedJobList {
    let keywords = keywords.iter().map(|k| k.as_ref().to_string()).collect();
    RankingService::new(keywords).rank(records)
}

#[cfg(test)]
#[path = "ranking_service_test.rs"]
mod tests;
