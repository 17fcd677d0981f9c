// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// 条数不是整数或越界时的提示
pub const RECORD_LIMIT_MESSAGE: &str = "recordLimit must be an integer between 1 and 100";

/// 抓取请求
///
/// 提交给外部抓取服务之前必须通过 [`Validate`] 校验，
/// 未通过校验的请求不会产生任何网络调用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// 抓取入口URL，必须是绝对地址
    #[validate(url(message = "sourceUrl must be an absolute URL"))]
    pub source_url: String,
    /// 期望抓取的数据条数
    #[validate(range(
        min = 1,
        max = 100,
        message = "recordLimit must be an integer between 1 and 100"
    ))]
    pub record_limit: i64,
}

impl ScrapeRequest {
    pub fn new(source_url: impl Into<String>, record_limit: i64) -> Self {
        Self {
            source_url: source_url.into(),
            record_limit,
        }
    }
}

/// 将校验错误压缩为一行可读消息
///
/// 字段按名称排序，保证同样的输入得到同样的消息
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid ({})", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
