// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Months, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::job_record::PLACEHOLDER;

// "3일 전 등록", "2주 전", "1개월 전", "1년 전"
static KOREAN_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(일|주|개월|년)\s*전").expect("Failed to compile korean date regex")
});

// "3 days ago", "1 week ago"
static ENGLISH_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(day|week|month|year)s?\s+ago")
        .expect("Failed to compile english date regex")
});

static TODAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)오늘|\btoday\b").expect("Failed to compile today regex"));
static YESTERDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)어제|\byesterday\b").expect("Failed to compile yesterday regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "일" | "day" => Some(Unit::Day),
            "주" | "week" => Some(Unit::Week),
            "개월" | "month" => Some(Unit::Month),
            "년" | "year" => Some(Unit::Year),
            _ => None,
        }
    }

    fn subtract(self, now: DateTime<Utc>, amount: u32) -> Option<DateTime<Utc>> {
        match self {
            Unit::Day => now.checked_sub_signed(Duration::try_days(amount.into())?),
            Unit::Week => now.checked_sub_signed(Duration::try_days(i64::from(amount) * 7)?),
            Unit::Month => now.checked_sub_months(Months::new(amount)),
            Unit::Year => now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        }
    }
}

/// 排在最后的时间
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// 将发布日期原文解析为可比较的时间戳
///
/// 支持 "N{单位} 전" / "N units ago"、"오늘"/"today"、"어제"/"yesterday"。
/// 月和年按日历减法计算。缺失、占位符以及无法解析的文本都返回 Unix 纪元。
pub fn parse_posted_date_at(text: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() && t != PLACEHOLDER => t,
        _ => return epoch(),
    };

    if let Some(caps) = KOREAN_RELATIVE
        .captures(text)
        .or_else(|| ENGLISH_RELATIVE.captures(text))
    {
        let amount = caps[1].parse::<u32>().ok();
        let unit = Unit::parse(&caps[2]);
        return match (amount, unit) {
            (Some(amount), Some(unit)) => unit.subtract(now, amount).unwrap_or_else(epoch),
            _ => epoch(),
        };
    }

    if TODAY.is_match(text) {
        return now;
    }

    if YESTERDAY.is_match(text) {
        return now - Duration::days(1);
    }

    epoch()
}

/// 以当前时间为基准解析
pub fn parse_posted_date(text: Option<&str>) -> DateTime<Utc> {
    parse_posted_date_at(text, Utc::now())
}

#[cfg(test)]
#[path = "posted_date_test.rs"]
mod tests;
