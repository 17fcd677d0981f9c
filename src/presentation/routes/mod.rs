// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod session;

use crate::application::session::ScrapeSession;
use crate::config::settings::Settings;
use crate::domain::scraping::provider::ScrapeProvider;
use crate::presentation::handlers::{scrape_handler, task_handler};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version));

    let proxy_routes = Router::new()
        .route("/scrape", post(scrape_handler::create_scrape))
        .route("/task", get(task_handler::missing_task))
        .route("/task/", get(task_handler::missing_task))
        .route("/task/{task_id}", get(task_handler::get_task));

    Router::new()
        .merge(public_routes)
        .merge(proxy_routes)
        .merge(session::session_routes())
}

/// 组装完整应用：路由、共享依赖与请求追踪
pub fn build_app(
    settings: Arc<Settings>,
    provider: Arc<dyn ScrapeProvider>,
    session: Arc<ScrapeSession>,
) -> Router {
    routes()
        .layer(Extension(provider))
        .layer(Extension(session))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
