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

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    application::{
        dto::{scrape_request::ScrapeRequestDto, scrape_response::ScrapeResponseDto},
        usecases::submit_task::TaskSubmitter,
    },
    config::settings::Settings,
    domain::scraping::provider::{ProviderError, ScrapeProvider},
    presentation::errors::{AppError, RequestError},
};

/// 创建抓取任务
///
/// 凭据缺失优先于请求校验，直接返回 500
pub async fn create_scrape(
    Extension(provider): Extension<Arc<dyn ScrapeProvider>>,
    Extension(settings): Extension<Arc<Settings>>,
    payload: Result<Json<ScrapeRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    if !provider.is_configured() {
        return Err(ProviderError::MissingCredentials.into());
    }

    let Json(payload) = payload.map_err(|e| RequestError::BadRequest(e.body_text()))?;
    let request = payload.into_request(&settings.browse_ai)?;
    info!(
        "Scrape requested for {} (limit {})",
        request.source_url, request.record_limit
    );

    let submission = TaskSubmitter::new(provider).submit(&request).await?;
    let task_id = submission.handle.task_id.clone();
    Ok(Json(ScrapeResponseDto::from_reply(task_id, submission.reply)))
}
