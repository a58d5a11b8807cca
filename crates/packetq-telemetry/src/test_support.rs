//! 테스트용 mock 어댑터.

use async_trait::async_trait;
use packetq_core::error::CoreError;
use packetq_core::models::event::{EventBatch, RawEvent};
use packetq_core::models::meter::ByteMeter;
use packetq_core::models::params::{CandidateParams, ParamsPatch};
use packetq_core::ports::clock::Clock;
use packetq_core::ports::pipe_api::PipeApi;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

type Script<T> = Mutex<VecDeque<Result<T, CoreError>>>;

/// 응답을 순서대로 돌려주는 mock packet queue
///
/// 스크립트가 비면 `Network` 에러를 반환한다.
/// 게이트를 걸면 해당 요청은 `release_*` 호출 전까지 응답하지 않는다.
#[derive(Default)]
pub(crate) struct MockPipeApi {
    events: Script<EventBatch>,
    params: Script<Option<ParamsPatch>>,
    updates: Script<Option<ParamsPatch>>,
    resets: Script<Option<ParamsPatch>>,
    meters: Script<ByteMeter>,
    pub submitted: Mutex<Vec<CandidateParams>>,
    events_gate: Mutex<Option<Arc<Notify>>>,
    update_gate: Mutex<Option<Arc<Notify>>>,
    /// 게이트에 걸린 요청이 대기를 시작하면 알린다
    pub started: Arc<Notify>,
}

fn next<T>(script: &Script<T>) -> Result<T, CoreError> {
    script
        .lock()
        .pop_front()
        .unwrap_or_else(|| Err(CoreError::Network("스크립트 없음".to_string())))
}

impl MockPipeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_events(&self, reply: Result<EventBatch, CoreError>) {
        self.events.lock().push_back(reply);
    }

    pub fn push_params(&self, reply: Result<Option<ParamsPatch>, CoreError>) {
        self.params.lock().push_back(reply);
    }

    pub fn push_update(&self, reply: Result<Option<ParamsPatch>, CoreError>) {
        self.updates.lock().push_back(reply);
    }

    pub fn push_reset(&self, reply: Result<Option<ParamsPatch>, CoreError>) {
        self.resets.lock().push_back(reply);
    }

    pub fn push_meter(&self, reply: Result<ByteMeter, CoreError>) {
        self.meters.lock().push_back(reply);
    }

    /// 다음 `fetch_events` 호출을 붙잡는다
    pub fn hold_events(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.events_gate.lock() = Some(gate.clone());
        gate
    }

    /// 다음 `update_params` 호출을 붙잡는다
    pub fn hold_update(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock() = Some(gate.clone());
        gate
    }

    async fn pass(&self, gate: &Mutex<Option<Arc<Notify>>>) {
        let held = gate.lock().take();
        if let Some(gate) = held {
            self.started.notify_one();
            gate.notified().await;
        }
    }
}

#[async_trait]
impl PipeApi for MockPipeApi {
    async fn fetch_events(&self) -> Result<EventBatch, CoreError> {
        // 게이트 통과 전에 응답을 꺼내 두어 호출 순서대로 배정한다
        let reply = next(&self.events);
        self.pass(&self.events_gate).await;
        reply
    }

    async fn fetch_params(&self) -> Result<Option<ParamsPatch>, CoreError> {
        next(&self.params)
    }

    async fn update_params(
        &self,
        params: &CandidateParams,
    ) -> Result<Option<ParamsPatch>, CoreError> {
        self.submitted.lock().push(*params);
        let reply = next(&self.updates);
        self.pass(&self.update_gate).await;
        reply
    }

    async fn reset_params(&self) -> Result<Option<ParamsPatch>, CoreError> {
        next(&self.resets)
    }

    async fn fetch_meter(&self) -> Result<ByteMeter, CoreError> {
        next(&self.meters)
    }
}

/// 고정 시계
#[derive(Default)]
pub(crate) struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at(millis: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(millis)))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// 테스트 이벤트
pub(crate) fn raw(pipe: &str, kind: &str, value: f64, time: f64) -> RawEvent {
    RawEvent {
        id: None,
        pipe: pipe.to_string(),
        kind: kind.to_string(),
        value,
        time,
    }
}
