// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 两个外部服务代理端点，以及抓取会话的操作端点
pub mod scrape_handler;
pub mod session_handler;
pub mod task_handler;
