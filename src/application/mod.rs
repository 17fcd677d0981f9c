// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 任务提交用例与抓取会话控制器，负责把领域服务、外部服务和轮询器组合起来
pub mod dto;
pub mod session;
pub mod usecases;
