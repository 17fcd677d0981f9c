// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 任务提交用例与抓取会话
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 核心实体、外部服务端口，以及结果提取和排序逻辑
pub mod domain;

/// 基础设施模块
///
/// Browse.ai 客户端、表格导出与指标
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由与处理器
pub mod presentation;

/// 工具模块
pub mod utils;

/// 工作器模块
///
/// 任务状态轮询
pub mod workers;
