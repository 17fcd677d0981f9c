// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型
///
/// 抓取请求、任务句柄与职位记录等核心实体
pub mod job_record;
pub mod scrape_request;
pub mod task;
