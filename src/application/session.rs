// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::usecases::submit_task::{SubmissionError, TaskSubmitter};
use crate::config::settings::PollingSettings;
use crate::domain::models::job_record::{JobRecord, RankedJobList};
use crate::domain::models::scrape_request::ScrapeRequest;
use crate::domain::models::task::{TaskHandle, TaskStatus};
use crate::domain::scraping::provider::{ProviderError, ProviderReply, ScrapeProvider};
use crate::domain::services::ranking_service::RankingService;
use crate::domain::services::result_extractor::extract_reply;
use crate::infrastructure::export::csv_export::{self, ExportFile};
use crate::workers::task_poller::{PollError, PollListener, TaskPoller};

/// 会话操作错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No scrape task has been submitted")]
    NoTask,
    #[error("Another session operation is in progress")]
    Busy,
    #[error("There are no job listings to export")]
    NothingToExport,
    #[error("Export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// 会话状态，界面上的各种标志都由它推导
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    #[serde(rename_all = "camelCase")]
    Polling { task_id: String, attempt: u32 },
    #[serde(rename_all = "camelCase")]
    Ready {
        task_id: String,
        #[serde(skip)]
        records: Vec<JobRecord>,
        ranked: RankedJobList,
    },
    #[serde(rename_all = "camelCase")]
    TimedOut { task_id: String, attempts: u32 },
    #[serde(rename_all = "camelCase")]
    Failed {
        task_id: Option<String>,
        error: String,
        details: Option<Value>,
    },
}

impl SessionState {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            SessionState::Idle | SessionState::Submitting => None,
            SessionState::Polling { task_id, .. }
            | SessionState::Ready { task_id, .. }
            | SessionState::TimedOut { task_id, .. } => Some(task_id),
            SessionState::Failed { task_id, .. } => task_id.as_deref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Submitting | SessionState::Polling { .. })
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, SessionState::Polling { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready { .. })
    }
}

/// 会话快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub state: SessionState,
    pub is_loading: bool,
    pub is_polling: bool,
    pub is_ready: bool,
    pub max_attempts: u32,
    pub keywords: Vec<String>,
}

struct Inner {
    state: SessionState,
    keywords: Vec<String>,
}

/// 轮询回调落地到会话状态
struct SessionCore {
    inner: Mutex<Inner>,
}

impl SessionCore {
    fn set_state(&self, state: SessionState) {
        self.inner.lock().state = state;
    }

    fn ready(&self, task_id: &str, records: Vec<JobRecord>) {
        let mut inner = self.inner.lock();
        let ranked = RankingService::new(inner.keywords.clone()).rank(&records);
        inner.state = SessionState::Ready {
            task_id: task_id.to_string(),
            records,
            ranked,
        };
    }

    fn is_polling(&self, task_id: &str) -> bool {
        matches!(&self.inner.lock().state, SessionState::Polling { task_id: current, .. } if current == task_id)
    }
}

impl PollListener for SessionCore {
    fn on_attempt(&self, task_id: &str, attempt: u32, _max_attempts: u32) {
        let mut inner = self.inner.lock();
        if let SessionState::Polling {
            task_id: current,
            attempt: counter,
        } = &mut inner.state
        {
            if current == task_id {
                *counter = attempt;
            }
        }
    }

    fn on_ready(&self, task_id: &str, _reply: ProviderReply, records: Vec<JobRecord>) {
        if self.is_polling(task_id) {
            self.ready(task_id, records);
        }
    }

    fn on_timeout(&self, task_id: &str, attempts: u32) {
        if self.is_polling(task_id) {
            self.set_state(SessionState::TimedOut {
                task_id: task_id.to_string(),
                attempts,
            });
        }
    }

    fn on_error(&self, task_id: &str, error: PollError) {
        if self.is_polling(task_id) {
            self.set_state(SessionState::Failed {
                task_id: Some(task_id.to_string()),
                error: error.to_string(),
                details: None,
            });
        }
    }
}

/// 抓取会话控制器
///
/// 每个进程一个会话。修改性操作互斥执行，轮询回调只触碰状态锁，
/// 锁顺序为 操作锁 → 轮询器锁 → 状态锁。
pub struct ScrapeSession {
    submitter: TaskSubmitter,
    provider: Arc<dyn ScrapeProvider>,
    poller: TaskPoller,
    core: Arc<SessionCore>,
    ops: tokio::sync::Mutex<()>,
}

impl ScrapeSession {
    pub fn new(
        provider: Arc<dyn ScrapeProvider>,
        polling: &PollingSettings,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            submitter: TaskSubmitter::new(provider.clone()),
            poller: TaskPoller::from_settings(provider.clone(), polling),
            provider,
            core: Arc::new(SessionCore {
                inner: Mutex::new(Inner {
                    state: SessionState::Idle,
                    keywords,
                }),
            }),
            ops: tokio::sync::Mutex::new(()),
        }
    }

    /// 提交新任务并开始轮询，旧的轮询会先被取消
    pub async fn start(
        &self,
        request: ScrapeRequest,
        keywords: Option<Vec<String>>,
    ) -> Result<SessionSnapshot, SessionError> {
        let _op = self.ops.try_lock().map_err(|_| SessionError::Busy)?;
        self.poller.stop();

        {
            let mut inner = self.core.inner.lock();
            if let Some(keywords) = keywords {
                inner.keywords = keywords;
            }
            inner.state = SessionState::Submitting;
        }

        let submission = match self.submitter.submit(&request).await {
            Ok(submission) => submission,
            Err(e) => {
                let details = match &e {
                    SubmissionError::Provider(provider) => Some(provider.details()),
                    SubmissionError::Validation(_) => None,
                };
                self.core.set_state(SessionState::Failed {
                    task_id: None,
                    error: e.to_string(),
                    details,
                });
                return Err(e.into());
            }
        };

        match submission.handle.task_id() {
            Some(_) => self.begin_polling(&submission.handle)?,
            None => {
                warn!("Submission returned no task id, session cannot poll");
                self.core.set_state(SessionState::Failed {
                    task_id: None,
                    error: PollError::MissingTaskId.to_string(),
                    details: Some(submission.reply.body),
                });
            }
        }

        Ok(self.snapshot())
    }

    /// 立即查询一次当前任务
    pub async fn refresh(&self) -> Result<SessionSnapshot, SessionError> {
        let _op = self.ops.try_lock().map_err(|_| SessionError::Busy)?;
        let task_id = self.current_task_id()?;
        self.poller.stop();

        let reply = match self.provider.fetch_task(&task_id).await {
            Ok(reply) => reply,
            Err(e) => {
                self.core.set_state(SessionState::Failed {
                    task_id: Some(task_id),
                    error: e.to_string(),
                    details: Some(e.details()),
                });
                return Err(e.into());
            }
        };

        let extraction = extract_reply(&reply);
        let status = reply.status();
        info!(
            "Refreshed task {}: status {}, {} records",
            task_id,
            status,
            extraction.records().len()
        );

        if extraction.has_records() || status == TaskStatus::Succeeded {
            self.core.ready(&task_id, extraction.into_records());
        } else if status == TaskStatus::Failed {
            self.core.set_state(SessionState::Failed {
                task_id: Some(task_id.clone()),
                error: PollError::TaskFailed {
                    task_id,
                    status: reply.raw_status().unwrap_or_default().to_string(),
                }
                .to_string(),
                details: Some(reply.body),
            });
        } else {
            self.begin_polling(&TaskHandle::for_task(task_id))?;
        }

        Ok(self.snapshot())
    }

    /// 以新的计数重新轮询当前任务
    pub async fn retry(&self) -> Result<SessionSnapshot, SessionError> {
        let _op = self.ops.try_lock().map_err(|_| SessionError::Busy)?;
        let task_id = self.current_task_id()?;
        info!("Retrying task {}", task_id);
        self.begin_polling(&TaskHandle::for_task(task_id))?;
        Ok(self.snapshot())
    }

    /// 停止轮询并回到初始状态
    pub async fn cancel(&self) -> SessionSnapshot {
        let _op = self.ops.lock().await;
        self.poller.stop();
        self.core.set_state(SessionState::Idle);
        self.snapshot()
    }

    /// 更新关键词，对已获取的记录重新排序，不重新请求
    pub fn set_keywords(&self, keywords: Vec<String>) -> SessionSnapshot {
        {
            let mut inner = self.core.inner.lock();
            let service = RankingService::new(keywords);
            if let SessionState::Ready {
                records, ranked, ..
            } = &mut inner.state
            {
                *ranked = service.rank(records);
            }
            inner.keywords = service.keywords().to_vec();
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.core.inner.lock();
        SessionSnapshot {
            is_loading: inner.state.is_loading(),
            is_polling: inner.state.is_polling(),
            is_ready: inner.state.is_ready(),
            max_attempts: self.poller.max_attempts(),
            keywords: inner.keywords.clone(),
            state: inner.state.clone(),
        }
    }

    /// 导出当前排序结果
    pub fn export(&self) -> Result<ExportFile, SessionError> {
        let inner = self.core.inner.lock();
        match &inner.state {
            SessionState::Ready { ranked, .. } if !ranked.is_empty() => {
                csv_export::export(ranked).map_err(|e| SessionError::Export(e.to_string()))
            }
            _ => Err(SessionError::NothingToExport),
        }
    }

    fn current_task_id(&self) -> Result<String, SessionError> {
        self.core
            .inner
            .lock()
            .state
            .task_id()
            .map(str::to_string)
            .ok_or(SessionError::NoTask)
    }

    fn begin_polling(&self, handle: &TaskHandle) -> Result<(), SessionError> {
        let task_id = handle
            .task_id()
            .map(str::to_string)
            .ok_or(SessionError::NoTask)?;

        self.poller.stop();
        self.core.set_state(SessionState::Polling {
            task_id,
            attempt: 0,
        });

        let listener: Arc<dyn PollListener> = self.core.clone();
        self.poller
            .start(handle, listener)
            .map_err(|_| SessionError::NoTask)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
