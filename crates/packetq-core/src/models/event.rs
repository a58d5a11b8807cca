//! 이벤트 모델.
//!
//! `GET /events` 응답 구조. 서버 시계 기준 초 단위 타임스탬프를 가진다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::metric::{MetricKey, MetricKind, Pipe};

/// 서버가 보낸 이벤트 (라우팅 전)
///
/// `pipe`/`type`은 문자열로 받아 [`RawEvent::route`]에서 닫힌 열거형으로 검증한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// 서버 이벤트 로그 순번 (라우팅에는 사용하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub pipe: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// gauge면 순간값, counter면 증분 바이트
    pub value: f64,
    /// 서버 시계 기준 시각 (초)
    pub time: f64,
}

impl RawEvent {
    /// pipe/type을 검증하여 라우팅 가능한 이벤트로 변환
    pub fn route(&self) -> Result<Event, CoreError> {
        match (Pipe::parse(&self.pipe), MetricKind::parse(&self.kind)) {
            (Some(pipe), Some(kind)) => Ok(Event {
                pipe,
                kind,
                value: self.value,
                time: self.time,
            }),
            _ => Err(CoreError::UnknownMetric {
                pipe: self.pipe.clone(),
                kind: self.kind.clone(),
            }),
        }
    }
}

/// 라우팅이 끝난 이벤트
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub pipe: Pipe,
    pub kind: MetricKind,
    pub value: f64,
    /// 서버 시계 기준 시각 (초)
    pub time: f64,
}

impl Event {
    pub fn key(&self) -> MetricKey {
        MetricKey::new(self.pipe, self.kind)
    }
}

/// `GET /events` 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    /// 서버가 반환한 순서 그대로의 이벤트
    pub events: Vec<RawEvent>,
    /// 응답 시점의 서버 시각 (초)
    pub now: f64,
}

impl EventBatch {
    /// 배치 전체를 라우팅한다.
    ///
    /// 하나라도 알 수 없는 메트릭이면 배치 전체를 거부한다.
    pub fn route_all(&self) -> Result<Vec<Event>, CoreError> {
        self.events.iter().map(RawEvent::route).collect()
    }
}
