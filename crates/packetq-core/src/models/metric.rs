//! 메트릭 식별자.
//!
//! 셰이핑 방향(`Pipe`)과 메트릭 종류(`MetricKind`)의 닫힌 열거형.
//! (Pipe × MetricKind) 조합은 정확히 8개이며 시계열 하나씩에 대응한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 트래픽 셰이핑 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipe {
    Up,
    Down,
}

impl Pipe {
    /// 모든 방향 (표시 순서)
    pub const ALL: [Pipe; 2] = [Pipe::Up, Pipe::Down];

    /// 와이어 표기
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipe::Up => "up",
            Pipe::Down => "down",
        }
    }

    /// 와이어 표기 파싱
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Pipe::Up),
            "down" => Some(Pipe::Down),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Pipe::Up => 0,
            Pipe::Down => 1,
        }
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 메트릭 종류
///
/// `Buffer`/`Latency`는 순간값(gauge), `Deliver`/`Drop`은 이벤트마다
/// 증분(delta)으로 보고되는 바이트 카운터다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Buffer,
    Latency,
    Deliver,
    Drop,
}

impl MetricKind {
    /// 모든 메트릭 종류
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Buffer,
        MetricKind::Latency,
        MetricKind::Deliver,
        MetricKind::Drop,
    ];

    /// 와이어 표기
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Buffer => "buffer",
            MetricKind::Latency => "latency",
            MetricKind::Deliver => "deliver",
            MetricKind::Drop => "drop",
        }
    }

    /// 와이어 표기 파싱
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buffer" => Some(MetricKind::Buffer),
            "latency" => Some(MetricKind::Latency),
            "deliver" => Some(MetricKind::Deliver),
            "drop" => Some(MetricKind::Drop),
            _ => None,
        }
    }

    /// 누적 카운터 여부
    pub fn is_counter(&self) -> bool {
        matches!(self, MetricKind::Deliver | MetricKind::Drop)
    }

    fn index(&self) -> usize {
        match self {
            MetricKind::Buffer => 0,
            MetricKind::Latency => 1,
            MetricKind::Deliver => 2,
            MetricKind::Drop => 3,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (Pipe, MetricKind) 조합. 시계열 하나를 가리킨다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    pub pipe: Pipe,
    pub kind: MetricKind,
}

impl MetricKey {
    /// 조합 개수
    pub const COUNT: usize = Pipe::ALL.len() * MetricKind::ALL.len();

    pub fn new(pipe: Pipe, kind: MetricKind) -> Self {
        Self { pipe, kind }
    }

    /// 모든 조합 (pipe 우선 순서)
    pub fn all() -> impl Iterator<Item = MetricKey> {
        Pipe::ALL.into_iter().flat_map(|pipe| {
            MetricKind::ALL
                .into_iter()
                .map(move |kind| MetricKey::new(pipe, kind))
        })
    }

    /// 고정 크기 배열 인덱스 (0..COUNT)
    pub fn index(&self) -> usize {
        self.pipe.index() * MetricKind::ALL.len() + self.kind.index()
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pipe, self.kind)
    }
}
