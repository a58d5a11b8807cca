//! 로컬 시계 포트.
//!
//! 구현: `packetq-telemetry` crate (`SystemClock`). 테스트에서는 고정 시계로 교체한다.

/// 로컬 벽시계
pub trait Clock: Send + Sync {
    /// 현재 로컬 시각 (Unix epoch 밀리초)
    fn now_millis(&self) -> i64;
}
