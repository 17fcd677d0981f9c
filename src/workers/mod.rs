// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 后台定时轮询外部任务状态
pub mod task_poller;

pub use task_poller::TaskPoller;
