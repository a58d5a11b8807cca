//! 시계 동기화.
//!
//! 배치마다 `now`(서버 초)와 수신 시점의 로컬 밀리초로 오프셋을 다시 계산한다.
//! 오프셋은 폴링 사이에 캐시하지 않는다. 서버/클라이언트 시계 드리프트나
//! 절전 복귀 후에도 다음 배치에서 바로 맞춰진다.

use packetq_core::ports::clock::Clock;

/// 초 → 밀리초 (내림)
pub fn to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).floor() as i64
}

/// 배치 하나에 대한 시계 오프셋
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSync {
    offset_millis: i64,
}

impl ClockSync {
    /// `offset = local_now_ms - floor(server_now_s * 1000)`
    pub fn new(server_now_seconds: f64, local_now_millis: i64) -> Self {
        Self {
            offset_millis: local_now_millis.saturating_sub(to_millis(server_now_seconds)),
        }
    }

    pub fn offset_millis(&self) -> i64 {
        self.offset_millis
    }

    /// 서버 기준 이벤트 시각(초)을 로컬 밀리초로 변환
    pub fn to_local(&self, event_time_seconds: f64) -> i64 {
        to_millis(event_time_seconds).saturating_add(self.offset_millis)
    }
}

/// 시스템 벽시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
