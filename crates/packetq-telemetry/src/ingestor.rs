//! 이벤트 수집기.
//!
//! `GET /events`를 한 번 호출해 배치 단위로 시계를 보정하고,
//! 받은 순서 그대로 메트릭 저장소에 반영한다.

use std::sync::Arc;

use packetq_core::error::CoreError;
use packetq_core::models::event::EventBatch;
use packetq_core::ports::clock::Clock;
use packetq_core::ports::pipe_api::PipeApi;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clock_sync::ClockSync;
use crate::metric_store::SharedMetricStore;

/// 이벤트 수집기
pub struct EventIngestor {
    api: Arc<dyn PipeApi>,
    clock: Arc<dyn Clock>,
    store: SharedMetricStore,
}

impl EventIngestor {
    pub fn new(api: Arc<dyn PipeApi>, clock: Arc<dyn Clock>, store: SharedMetricStore) -> Self {
        Self { api, clock, store }
    }

    pub fn store(&self) -> &SharedMetricStore {
        &self.store
    }

    /// 폴링 1회. 에러는 삼키고 로그만 남긴다. 다음 주기가 곧 재시도다.
    pub async fn poll(&self) {
        log_outcome(self.poll_once().await);
    }

    /// 취소 토큰이 걸린 폴링 1회
    pub async fn poll_with_token(&self, token: CancellationToken) {
        log_outcome(self.poll_cancellable(&token).await);
    }

    /// 폴링 1회 (에러 전파). 반영한 이벤트 수를 반환한다.
    pub async fn poll_once(&self) -> Result<usize, CoreError> {
        let batch = self.api.fetch_events().await?;
        let received_at = self.clock.now_millis();
        self.apply(&batch, received_at)
    }

    /// 응답 도착 전에 토큰이 취소되면 아무것도 반영하지 않는다.
    pub async fn poll_cancellable(&self, token: &CancellationToken) -> Result<usize, CoreError> {
        let batch = tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(CoreError::Cancelled("새 폴링 사이클 시작".to_string()));
            }
            result = self.api.fetch_events() => result?,
        };
        let received_at = self.clock.now_millis();
        self.apply(&batch, received_at)
    }

    /// 배치 하나를 저장소에 반영한다.
    ///
    /// 라우팅에 실패하면 아무것도 추가하지 않는다. 쓰기 락은 배치 전체에
    /// 대해 한 번만 잡으므로 한 배치의 이벤트는 연속으로 추가된다.
    pub fn apply(&self, batch: &EventBatch, received_at_millis: i64) -> Result<usize, CoreError> {
        let events = batch.route_all()?;
        let sync = ClockSync::new(batch.now, received_at_millis);

        let mut store = self.store.write();
        for event in &events {
            store.append(event.pipe, event.kind, sync.to_local(event.time), event.value);
        }

        debug!(
            "이벤트 {}개 반영 (오프셋 {}ms)",
            events.len(),
            sync.offset_millis()
        );
        Ok(events.len())
    }
}

fn log_outcome(result: Result<usize, CoreError>) {
    match result {
        Ok(_) => {}
        Err(e @ (CoreError::Network(_) | CoreError::Cancelled(_))) => {
            debug!("이벤트 폴링 건너뜀: {e}");
        }
        Err(e) => warn!("이벤트 배치 폐기: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric_store::{MetricStore, Point};
    use crate::test_support::{raw, FixedClock, MockPipeApi};
    use packetq_core::models::metric::{MetricKind, Pipe};

    fn ingestor(api: Arc<MockPipeApi>, now: i64) -> EventIngestor {
        EventIngestor::new(api, FixedClock::at(now), MetricStore::shared())
    }

    #[tokio::test]
    async fn drop_counter_end_to_end() {
        let api = MockPipeApi::new();
        api.push_events(Ok(EventBatch {
            events: vec![
                raw("up", "drop", 50.0, 999.0),
                raw("up", "drop", 30.0, 999.5),
            ],
            now: 1000.0,
        }));
        let ingestor = ingestor(api, 1_000_000);

        assert_eq!(ingestor.poll_once().await.unwrap(), 2);

        let store = ingestor.store().read();
        assert_eq!(
            store.series(Pipe::Up, MetricKind::Drop).points(),
            &[
                Point {
                    timestamp_millis: 999_000,
                    value: 50.0
                },
                Point {
                    timestamp_millis: 999_500,
                    value: 80.0
                },
            ]
        );
        assert_eq!(store.counter_total(Pipe::Up, MetricKind::Drop), Some(80.0));
    }

    #[tokio::test]
    async fn offset_is_recomputed_per_batch() {
        let api = MockPipeApi::new();
        api.push_events(Ok(EventBatch {
            events: vec![raw("down", "latency", 0.2, 50.0)],
            now: 50.0,
        }));
        api.push_events(Ok(EventBatch {
            events: vec![raw("down", "latency", 0.4, 51.0)],
            now: 51.0,
        }));
        let clock = FixedClock::at(80_000);
        let ingestor = EventIngestor::new(api, clock.clone(), MetricStore::shared());

        ingestor.poll_once().await.unwrap();
        // 로컬 시계가 중간에 5초 점프
        clock.set(86_000);
        ingestor.poll_once().await.unwrap();

        let store = ingestor.store().read();
        let points = store.series(Pipe::Down, MetricKind::Latency).points();
        assert_eq!(points[0].timestamp_millis, 80_000);
        assert_eq!(points[1].timestamp_millis, 86_000);
        // gauge는 원값 그대로
        assert_eq!(points[0].value, 0.2);
        assert_eq!(points[1].value, 0.4);
    }

    #[tokio::test]
    async fn unknown_metric_rejects_whole_batch() {
        let api = MockPipeApi::new();
        api.push_events(Ok(EventBatch {
            events: vec![
                raw("up", "buffer", 1500.0, 10.0),
                raw("sideways", "buffer", 1.0, 10.1),
            ],
            now: 10.0,
        }));
        let ingestor = ingestor(api, 10_000);

        let err = ingestor.poll_once().await.unwrap_err();
        assert!(matches!(err, CoreError::UnknownMetric { .. }));
        assert_eq!(ingestor.store().read().total_points(), 0);
    }

    #[tokio::test]
    async fn malformed_batch_is_dropped() {
        let api = MockPipeApi::new();
        api.push_events(Err(CoreError::MalformedResponse(
            "missing field `events`".to_string(),
        )));
        let ingestor = ingestor(api, 0);

        let err = ingestor.poll_once().await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
        assert_eq!(ingestor.store().read().total_points(), 0);
    }

    #[tokio::test]
    async fn poll_swallows_failures() {
        let api = MockPipeApi::new();
        api.push_events(Err(CoreError::Network("refused".to_string())));
        api.push_events(Ok(EventBatch {
            events: vec![raw("up", "deliver", 64.0, 1.0)],
            now: 1.0,
        }));
        let ingestor = ingestor(api, 1_000);

        ingestor.poll().await;
        assert_eq!(ingestor.store().read().total_points(), 0);
        ingestor.poll().await;
        assert_eq!(ingestor.store().read().total_points(), 1);
    }

    #[tokio::test]
    async fn cancelled_poll_appends_nothing() {
        let api = MockPipeApi::new();
        api.push_events(Ok(EventBatch {
            events: vec![raw("up", "buffer", 9.0, 1.0)],
            now: 1.0,
        }));
        let gate = api.hold_events();
        let ingestor = Arc::new(ingestor(api.clone(), 1_000));
        let token = CancellationToken::new();

        let task = {
            let ingestor = ingestor.clone();
            let token = token.clone();
            tokio::spawn(async move { ingestor.poll_cancellable(&token).await })
        };
        api.started.notified().await;
        token.cancel();
        gate.notify_one();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(CoreError::Cancelled(_))));
        assert_eq!(ingestor.store().read().total_points(), 0);
    }

    #[tokio::test]
    async fn uncancelled_token_behaves_like_plain_poll() {
        let api = MockPipeApi::new();
        api.push_events(Ok(EventBatch {
            events: vec![raw("down", "drop", 5.0, 2.0), raw("down", "drop", 5.0, 2.1)],
            now: 2.0,
        }));
        let ingestor = ingestor(api, 2_000);

        let token = CancellationToken::new();
        ingestor.poll_with_token(token).await;
        let store = ingestor.store().read();
        assert_eq!(store.counter_total(Pipe::Down, MetricKind::Drop), Some(10.0));
    }
}
