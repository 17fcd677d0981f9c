// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::routing::{get, post, put};
use axum::Router;

use crate::presentation::handlers::session_handler;

/// 抓取会话路由
pub fn session_routes() -> Router {
    Router::new()
        .route(
            "/session",
            get(session_handler::snapshot).delete(session_handler::cancel),
        )
        .route("/session/scrape", post(session_handler::start))
        .route("/session/keywords", put(session_handler::set_keywords))
        .route("/session/refresh", post(session_handler::refresh))
        .route("/session/retry", post(session_handler::retry))
        .route("/session/export", get(session_handler::export))
}
