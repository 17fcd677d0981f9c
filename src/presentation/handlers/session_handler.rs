// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::dto::scrape_request::{KeywordsDto, SessionScrapeDto};
use crate::application::session::{ScrapeSession, SessionSnapshot};
use crate::config::settings::Settings;
use crate::presentation::errors::{AppError, RequestError};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| RequestError::BadRequest(e.body_text()).into())
}

/// 提交新任务并开始轮询
pub async fn start(
    Extension(session): Extension<Arc<ScrapeSession>>,
    Extension(settings): Extension<Arc<Settings>>,
    payload: Result<Json<SessionScrapeDto>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let dto = body(payload)?;
    let request = dto.request.into_request(&settings.browse_ai)?;
    let keywords = dto.keywords.map(|input| input.into_keywords());
    Ok(Json(session.start(request, keywords).await?))
}

pub async fn snapshot(Extension(session): Extension<Arc<ScrapeSession>>) -> Json<SessionSnapshot> {
    Json(session.snapshot())
}

/// 更新关键词并重新排序
pub async fn set_keywords(
    Extension(session): Extension<Arc<ScrapeSession>>,
    payload: Result<Json<KeywordsDto>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let dto = body(payload)?;
    Ok(Json(session.set_keywords(dto.keywords.into_keywords())))
}

pub async fn refresh(
    Extension(session): Extension<Arc<ScrapeSession>>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(session.refresh().await?))
}

pub async fn retry(
    Extension(session): Extension<Arc<ScrapeSession>>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(session.retry().await?))
}

pub async fn cancel(Extension(session): Extension<Arc<ScrapeSession>>) -> Json<SessionSnapshot> {
    Json(session.cancel().await)
}

/// 下载当前排序结果
pub async fn export(
    Extension(session): Extension<Arc<ScrapeSession>>,
) -> Result<impl IntoResponse, AppError> {
    let file = session.export()?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
