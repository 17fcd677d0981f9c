// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

pub const TASKS_SUBMITTED: &str = "scrape_tasks_submitted_total";
pub const TASKS_REJECTED: &str = "scrape_tasks_rejected_total";
pub const POLL_ATTEMPTS: &str = "poll_attempts_total";
pub const POLL_TRANSIENT_ERRORS: &str = "poll_transient_errors_total";
pub const POLL_SESSIONS_FINISHED: &str = "poll_sessions_finished_total";

/// 初始化指标系统
///
/// 导出器启动失败只记录警告，不影响服务运行
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(TASKS_SUBMITTED, "Scrape tasks accepted by the provider");
    describe_counter!(TASKS_REJECTED, "Scrape requests rejected by validation or the provider");
    describe_counter!(POLL_ATTEMPTS, "Task status queries issued by the poller");
    describe_counter!(POLL_TRANSIENT_ERRORS, "Poll ticks that failed and were skipped");
    describe_counter!(POLL_SESSIONS_FINISHED, "Poll sessions finished, labelled by outcome");

    info!("Metrics exporter listening on {}", addr);
}
