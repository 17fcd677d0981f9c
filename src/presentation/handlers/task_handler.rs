// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tracing::debug;

use crate::application::dto::scrape_response::ScrapeResponseDto;
use crate::domain::scraping::provider::{ProviderError, ScrapeProvider};
use crate::presentation::errors::{AppError, RequestError};

/// 查询任务状态与结果，原样透传外部服务的响应
pub async fn get_task(
    Extension(provider): Extension<Arc<dyn ScrapeProvider>>,
    Path(task_id): Path<String>,
) -> Result<Json<ScrapeResponseDto>, AppError> {
    if !provider.is_configured() {
        return Err(ProviderError::MissingCredentials.into());
    }

    let task_id = task_id.trim();
    if task_id.is_empty() {
        return Err(missing_task_id());
    }

    debug!("Proxying status query for task {}", task_id);
    let reply = provider.fetch_task(task_id).await?;
    Ok(Json(ScrapeResponseDto::from_reply(
        Some(task_id.to_string()),
        reply,
    )))
}

/// `/task` 与 `/task/` 没有任务ID
pub async fn missing_task() -> AppError {
    missing_task_id()
}

fn missing_task_id() -> AppError {
    RequestError::BadRequest("taskId is required".to_string()).into()
}
