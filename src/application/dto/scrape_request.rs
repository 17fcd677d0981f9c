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

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::application::usecases::submit_task::SubmissionError;
use crate::config::settings::BrowseAiSettings;
use crate::domain::models::scrape_request::{ScrapeRequest, RECORD_LIMIT_MESSAGE};
use crate::domain::services::ranking_service::parse_keywords;

/// 抓取请求数据传输对象
///
/// 同时接受外部服务的原始字段名 `originUrl` 与 `job_listings_limit`，
/// 缺省字段使用配置中的默认值
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequestDto {
    /// 要抓取的列表页URL
    #[serde(default, alias = "originUrl")]
    pub source_url: Option<String>,
    /// 数据条数，保留原始JSON以区分非整数输入
    #[serde(default, alias = "job_listings_limit")]
    pub record_limit: Option<Value>,
}

impl ScrapeRequestDto {
    /// 转换为领域请求
    ///
    /// 非整数的条数（如 `2.5`、`"10"`）直接视为校验失败；范围与URL校验由提交用例负责
    pub fn into_request(self, defaults: &BrowseAiSettings) -> Result<ScrapeRequest, SubmissionError> {
        let record_limit = match self.record_limit {
            None | Some(Value::Null) => defaults.default_record_limit,
            Some(Value::Number(n)) => integral(&n)
                .ok_or_else(|| SubmissionError::Validation(RECORD_LIMIT_MESSAGE.to_string()))?,
            Some(_) => return Err(SubmissionError::Validation(RECORD_LIMIT_MESSAGE.to_string())),
        };

        let source_url = self
            .source_url
            .unwrap_or_else(|| defaults.default_source_url.clone());

        Ok(ScrapeRequest::new(source_url, record_limit))
    }
}

/// `10` 与 `10.0` 都是整数，`2.5` 不是
fn integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// 关键词输入，可以是逗号分隔的字符串或字符串数组
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeywordsInput {
    Text(String),
    List(Vec<String>),
}

impl KeywordsInput {
    pub fn into_keywords(self) -> Vec<String> {
        match self {
            KeywordsInput::Text(text) => parse_keywords(&text),
            KeywordsInput::List(list) => list
                .into_iter()
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }
}

/// 更新关键词请求
#[derive(Debug, Deserialize, Serialize)]
pub struct KeywordsDto {
    pub keywords: KeywordsInput,
}

/// 会话抓取请求
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionScrapeDto {
    #[serde(flatten)]
    pub request: ScrapeRequestDto,
    /// 为空时沿用会话当前的关键词
    #[serde(default)]
    pub keywords: Option<KeywordsInput>,
}
