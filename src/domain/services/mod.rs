// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务
///
/// 结果提取、发布日期解析与关键词排序，均为无副作用的纯逻辑
pub mod posted_date;
pub mod ranking_service;
pub mod result_extractor;
