// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local, TimeZone};
use reqwest::Url;
use thiserror::Error;

use crate::domain::models::job_record::{JobRecord, RankedJobList, PLACEHOLDER};

/// 表头，顺序固定
pub const COLUMNS: [&str; 11] = [
    "No.",
    "Title",
    "Company",
    "Location",
    "Career Level",
    "Education",
    "Employment Type",
    "Deadline",
    "Posted",
    "Job Link",
    "Company Link",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// 表格软件会把以这些字符开头的单元格当作公式
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer failed: {0}")]
    Buffer(String),
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// 文件名包含精确到分钟的时间戳
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("job_listings_{}.csv", at.format("%Y%m%d_%H%M"))
}

/// 抓取到的文本一律按纯文本写出
fn neutralize(value: &str) -> String {
    if value != PLACEHOLDER && value.starts_with(FORMULA_TRIGGERS) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

fn text(value: Option<&str>) -> String {
    neutralize(value.unwrap_or(PLACEHOLDER))
}

fn is_web_link(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// http(s) 链接写成超链接公式，其他链接按纯文本写出
fn hyperlink(value: Option<&str>) -> String {
    match value {
        Some(url) if is_web_link(url) => {
            format!("=HYPERLINK(\"{}\")", url.replace('"', "\"\""))
        }
        other => text(other),
    }
}

fn row(index: usize, record: &JobRecord) -> [String; 11] {
    [
        (index + 1).to_string(),
        text(record.title.as_deref()),
        text(record.company.as_deref()),
        text(record.location.as_deref()),
        text(record.seniority.as_deref()),
        text(record.education.as_deref()),
        text(record.employment_type()),
        text(record.deadline.as_deref()),
        text(record.posted.as_deref()),
        hyperlink(record.detail_link.as_deref()),
        hyperlink(record.company_link.as_deref()),
    ]
}

/// 将排序后的列表序列化为 CSV
///
/// 带 UTF-8 BOM，表格软件可正确识别韩文
pub fn write_csv(list: &RankedJobList) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(COLUMNS)?;
    for (index, record) in list.records().enumerate() {
        writer.write_record(row(index, record))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

/// 以当前本地时间命名导出文件
pub fn export(list: &RankedJobList) -> Result<ExportFile, ExportError> {
    Ok(ExportFile {
        file_name: export_file_name(&Local::now()),
        content_type: "text/csv; charset=utf-8",
        bytes: write_csv(list)?,
    })
}
