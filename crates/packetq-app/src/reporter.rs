//! 상태 리포터.
//!
//! 주기적으로 그래프별 최신값을 로그로 남긴다. 그래프 구성은
//! [`chart_bindings`]를 그대로 따르므로 렌더러가 그릴 내용과 같다.
//! 그래프 렌더러가 없는 터미널 환경에서 수집 상태를 확인하는 용도.

use std::time::Duration;

use packetq_telemetry::chart::chart_bindings;
use packetq_telemetry::metric_store::{MetricStore, SharedMetricStore};
use tokio::sync::watch;
use tracing::info;

/// 상태 리포터
pub struct StatusReporter {
    store: SharedMetricStore,
    interval: Duration,
}

impl StatusReporter {
    /// 주기는 최소 1ms로 보정한다
    pub fn new(store: SharedMetricStore, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        // 시작 직후에는 보고할 것이 없다
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let line = summary(&self.store.read());
                    if let Some(line) = line {
                        info!("{line}");
                    }
                }
                _ = shutdown_rx.changed() => {
                    info!("상태 리포터 종료");
                    break;
                }
            }
        }
    }
}

/// 그래프별 최신값 한 줄 요약. 저장된 점이 없으면 `None`
///
/// 예: `up-buffer[buffer=1500] up-bytes[drop=80] (점 3개)`
pub fn summary(store: &MetricStore) -> Option<String> {
    let parts: Vec<String> = chart_bindings()
        .iter()
        .filter_map(|binding| {
            let values: Vec<String> = binding
                .keys()
                .filter_map(|key| {
                    store
                        .latest(key.pipe, key.kind)
                        .map(|point| format!("{}={}", key.kind, point.value))
                })
                .collect();
            (!values.is_empty())
                .then(|| format!("{}[{}]", binding.canvas_id(), values.join(" ")))
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("{} (점 {}개)", parts.join(" "), store.total_points()))
}
