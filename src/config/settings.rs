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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 默认的抓取入口（사람인 职位分类列表）
pub const DEFAULT_SOURCE_URL: &str = "https://www.saramin.co.kr/zf_user/jobs/list/job-category?cat_kewd=322%2C323%2C2198&panel_type=&search_optional_item=n&search_done=y&panel_count=y&preview=y";

/// 默认关键词
pub const DEFAULT_KEYWORDS: &str = "인사, 회계, 경리, 경영지원, 세무, 재무";

/// 应用程序配置设置
///
/// 包含服务器、Browse.ai、轮询、排序和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// Browse.ai 配置
    pub browse_ai: BrowseAiSettings,
    /// 轮询配置
    pub polling: PollingSettings,
    /// 排序配置
    pub ranking: RankingSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// Browse.ai 配置设置
///
/// 凭据缺失不会导致启动失败，而是在请求时返回 500
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseAiSettings {
    /// API 基础地址
    pub api_base_url: String,
    /// API 密钥
    pub api_key: Option<String>,
    /// 机器人ID
    pub robot_id: Option<String>,
    /// 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 请求未携带URL时使用的默认抓取地址
    pub default_source_url: String,
    /// 请求未携带数量时使用的默认数据条数
    pub default_record_limit: i64,
}

impl BrowseAiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 轮询配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    /// 轮询间隔（秒）
    pub interval_secs: u64,
    /// 最大轮询次数
    pub max_attempts: u32,
}

/// 排序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    /// 默认关键词，逗号分隔
    pub default_keywords: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次合并默认值、配置文件和环境变量。
    /// `BROWSE_API_KEY` 与 `ROBOT_ID` 作为凭据的兼容变量，优先级最高。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("browse_ai.api_base_url", "https://api.browse.ai")?
            .set_default("browse_ai.request_timeout_secs", 30)?
            .set_default("browse_ai.default_source_url", DEFAULT_SOURCE_URL)?
            .set_default("browse_ai.default_record_limit", 10)?
            .set_default("polling.interval_secs", 10)?
            .set_default("polling.max_attempts", 30)?
            .set_default("ranking.default_keywords", DEFAULT_KEYWORDS)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("JOBSCOUT").separator("__"))
            .set_override_option("browse_ai.api_key", non_empty_env("BROWSE_API_KEY"))?
            .set_override_option("browse_ai.robot_id", non_empty_env("ROBOT_ID"))?;

        builder.build()?.try_deserialize()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
