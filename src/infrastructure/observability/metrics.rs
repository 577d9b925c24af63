// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use anyhow::Context;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 初始化指标系统
///
/// 安装Prometheus导出器并注册投递引擎的各类指标
///
/// # 参数
///
/// * `settings` - 指标配置
///
/// # 返回值
///
/// * `Ok(())` - 初始化成功或指标已禁用
/// * `Err(anyhow::Error)` - 监听地址无效或导出器安装失败
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings
        .listen_addr
        .parse()
        .with_context(|| format!("invalid metrics listen address '{}'", settings.listen_addr))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("failed to install Prometheus recorder")?;

    describe_metrics();
    info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "webhook_delivery_attempts_total",
        "Total number of webhook HTTP delivery attempts"
    );
    describe_counter!(
        "webhook_delivery_success_total",
        "Total number of webhook deliveries answered with 2xx"
    );
    describe_counter!(
        "webhook_delivery_failed_total",
        "Total number of failed webhook delivery attempts, by reason"
    );
    describe_counter!(
        "webhook_delivery_exhausted_total",
        "Total number of webhook deliveries that used up every attempt"
    );
    describe_histogram!(
        "webhook_delivery_duration_seconds",
        Unit::Seconds,
        "Duration of webhook HTTP delivery attempts"
    );
    describe_counter!(
        "webhook_deliveries_created_total",
        "Total number of webhook delivery records created by fan-out"
    );
    describe_counter!(
        "webhook_sweep_claimed_total",
        "Total number of failed deliveries claimed by retry sweeps"
    );
}
