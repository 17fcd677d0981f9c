// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::settings::PollingSettings;
use crate::domain::models::job_record::JobRecord;
use crate::domain::models::task::{TaskHandle, TaskStatus};
use crate::domain::scraping::provider::{ProviderReply, ScrapeProvider};
use crate::domain::services::result_extractor::extract_reply;
use crate::infrastructure::metrics::{
    POLL_ATTEMPTS, POLL_SESSIONS_FINISHED, POLL_TRANSIENT_ERRORS,
};

/// 轮询终止错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    /// 外部服务报告任务失败
    #[error("Task {task_id} failed with status '{status}'")]
    TaskFailed { task_id: String, status: String },
    /// 句柄中没有任务ID，无法轮询
    #[error("Task handle has no task id")]
    MissingTaskId,
}

/// 轮询状态机
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollState {
    #[default]
    Idle,
    Polling { task_id: String, attempt: u32 },
    Succeeded { task_id: String, attempts: u32 },
    TimedOut { task_id: String, attempts: u32 },
    ErrorStopped { task_id: String, attempts: u32 },
}

impl PollState {
    pub fn is_active(&self) -> bool {
        matches!(self, PollState::Polling { .. })
    }
}

/// 轮询结果回调
///
/// 所有回调都在轮询器内部锁中同步执行，实现中不得再调用轮询器本身。
pub trait PollListener: Send + Sync {
    /// 每次查询前调用
    fn on_attempt(&self, _task_id: &str, _attempt: u32, _max_attempts: u32) {}

    /// 捕获到数据，或外部服务报告任务成功
    fn on_ready(&self, task_id: &str, reply: ProviderReply, records: Vec<JobRecord>);

    /// 达到最大轮询次数
    fn on_timeout(&self, task_id: &str, attempts: u32);

    /// 外部服务报告任务失败
    fn on_error(&self, task_id: &str, error: PollError);
}

enum TickOutcome {
    Ready(ProviderReply, Vec<JobRecord>),
    Failed(String),
    Continue,
}

struct Active {
    generation: u64,
    handle: Option<JoinHandle<()>>,
    state: PollState,
}

/// 任务轮询器
///
/// 同一时刻最多只有一个活动的定时任务。`start` 会先取消旧任务；
/// 每个轮询会话带有代号，回调触发前在锁内校验代号，
/// 因此 `stop` 返回后不会再有任何回调。
pub struct TaskPoller {
    provider: Arc<dyn ScrapeProvider>,
    interval: Duration,
    max_attempts: u32,
    guard: Arc<Mutex<Active>>,
}

impl TaskPoller {
    pub fn new(provider: Arc<dyn ScrapeProvider>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            provider,
            interval,
            max_attempts: max_attempts.max(1),
            guard: Arc::new(Mutex::new(Active {
                generation: 0,
                handle: None,
                state: PollState::Idle,
            })),
        }
    }

    pub fn from_settings(provider: Arc<dyn ScrapeProvider>, settings: &PollingSettings) -> Self {
        Self::new(
            provider,
            Duration::from_secs(settings.interval_secs),
            settings.max_attempts,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 开始轮询，取消之前的轮询会话并重置计数
    pub fn start(
        &self,
        handle: &TaskHandle,
        listener: Arc<dyn PollListener>,
    ) -> Result<(), PollError> {
        let task_id = handle
            .task_id()
            .map(str::to_string)
            .ok_or(PollError::MissingTaskId)?;

        let mut active = self.guard.lock();
        Self::cancel_locked(&mut active);

        let generation = active.generation;
        let session = PollSession {
            provider: self.provider.clone(),
            guard: self.guard.clone(),
            listener,
            generation,
            task_id: task_id.clone(),
            interval: self.interval,
            max_attempts: self.max_attempts,
        };

        info!(
            "Polling task {} every {:?} (max {} attempts)",
            task_id, self.interval, self.max_attempts
        );
        active.state = PollState::Polling {
            task_id,
            attempt: 0,
        };
        active.handle = Some(tokio::spawn(session.run()));
        Ok(())
    }

    /// 停止当前轮询；返回之前是否存在活动会话
    pub fn stop(&self) -> bool {
        let mut active = self.guard.lock();
        let was_active = active.state.is_active();
        Self::cancel_locked(&mut active);
        active.state = PollState::Idle;
        if was_active {
            info!("Polling stopped");
        }
        was_active
    }

    pub fn state(&self) -> PollState {
        self.guard.lock().state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.guard.lock().state.is_active()
    }

    fn cancel_locked(active: &mut Active) {
        active.generation = active.generation.wrapping_add(1);
        if let Some(handle) = active.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        Self::cancel_locked(&mut self.guard.lock());
    }
}

struct PollSession {
    provider: Arc<dyn ScrapeProvider>,
    guard: Arc<Mutex<Active>>,
    listener: Arc<dyn PollListener>,
    generation: u64,
    task_id: String,
    interval: Duration,
    max_attempts: u32,
}

impl PollSession {
    async fn run(self) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut attempt = 0u32;

        loop {
            ticker.tick().await;
            attempt += 1;

            {
                let mut active = self.guard.lock();
                if active.generation != self.generation {
                    return;
                }
                active.state = PollState::Polling {
                    task_id: self.task_id.clone(),
                    attempt,
                };
                self.listener
                    .on_attempt(&self.task_id, attempt, self.max_attempts);
            }

            debug!(
                "Polling task {}: attempt {}/{}",
                self.task_id, attempt, self.max_attempts
            );
            counter!(POLL_ATTEMPTS).increment(1);

            match self.tick().await {
                TickOutcome::Ready(reply, records) => {
                    let state = PollState::Succeeded {
                        task_id: self.task_id.clone(),
                        attempts: attempt,
                    };
                    self.finish(state, "ready", |listener, task_id| {
                        info!("Task {} ready with {} records", task_id, records.len());
                        listener.on_ready(task_id, reply, records);
                    });
                    return;
                }
                TickOutcome::Failed(status) => {
                    let state = PollState::ErrorStopped {
                        task_id: self.task_id.clone(),
                        attempts: attempt,
                    };
                    self.finish(state, "failed", |listener, task_id| {
                        warn!("Task {} reported failure: {}", task_id, status);
                        listener.on_error(
                            task_id,
                            PollError::TaskFailed {
                                task_id: task_id.to_string(),
                                status,
                            },
                        );
                    });
                    return;
                }
                TickOutcome::Continue if attempt >= self.max_attempts => {
                    let state = PollState::TimedOut {
                        task_id: self.task_id.clone(),
                        attempts: attempt,
                    };
                    self.finish(state, "timed_out", |listener, task_id| {
                        warn!("Task {} timed out after {} attempts", task_id, attempt);
                        listener.on_timeout(task_id, attempt);
                    });
                    return;
                }
                TickOutcome::Continue => {}
            }
        }
    }

    async fn tick(&self) -> TickOutcome {
        let reply = match self.provider.fetch_task(&self.task_id).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Poll of task {} failed: {}", self.task_id, e);
                counter!(POLL_TRANSIENT_ERRORS).increment(1);
                return TickOutcome::Continue;
            }
        };

        let status = reply.status();
        let extraction = extract_reply(&reply);

        match status {
            TaskStatus::Failed => {
                let raw = reply.raw_status().unwrap_or_default().to_string();
                TickOutcome::Failed(raw)
            }
            TaskStatus::Succeeded => TickOutcome::Ready(reply, extraction.into_records()),
            _ if extraction.has_records() => TickOutcome::Ready(reply, extraction.into_records()),
            _ => TickOutcome::Continue,
        }
    }

    fn finish<F>(&self, state: PollState, outcome: &'static str, notify: F)
    where
        F: FnOnce(&dyn PollListener, &str),
    {
        let mut active = self.guard.lock();
        if active.generation != self.generation {
            return;
        }

        active.state = state;
        // 任务自身即将结束，只释放句柄
        active.handle = None;

        counter!(POLL_SESSIONS_FINISHED, "outcome" => outcome).increment(1);
        notify(self.listener.as_ref(), &self.task_id);
    }
}

#[cfg(test)]
#[path = "task_poller_test.rs"]
mod tests;
