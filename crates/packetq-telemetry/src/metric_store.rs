//! 메트릭 저장소.
//!
//! (Pipe × MetricKind) 8개 조합마다 추가 전용 시계열을 하나씩 가진다.
//! counter 종류(deliver, drop)는 증분을 누계에 더한 뒤 누계값을 저장한다.
//! 타임스탬프 정렬/중복 제거는 하지 않는다. 렌더러가 받은 순서대로 누적한다.
//! 보존 기간 제한도 렌더러 몫이다.

use packetq_core::models::metric::{MetricKey, MetricKind, Pipe};
use parking_lot::RwLock;
use std::sync::Arc;

/// 드라이버가 소유하고 수집기/리포터가 공유하는 저장소 핸들
pub type SharedMetricStore = Arc<RwLock<MetricStore>>;

/// 시계열 한 점 (로컬 밀리초, 값)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub timestamp_millis: i64,
    pub value: f64,
}

/// 추가 전용 시계열
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<Point>,
}

impl TimeSeries {
    pub fn append(&mut self, timestamp_millis: i64, value: f64) {
        self.points.push(Point {
            timestamp_millis,
            value,
        });
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `start` 인덱스 이후에 추가된 점. 렌더러가 커서로 새 점만 가져갈 때 사용
    pub fn points_from(&self, start: usize) -> &[Point] {
        self.points.get(start..).unwrap_or(&[])
    }

    pub fn latest(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 메트릭 저장소
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    series: [TimeSeries; MetricKey::COUNT],
    /// counter 종류만 사용. gauge 자리는 항상 0
    counters: [f64; MetricKey::COUNT],
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 공유 핸들로 생성
    pub fn shared() -> SharedMetricStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// 점 하나 추가. 실제로 저장된 값(gauge면 원값, counter면 누계)을 반환한다.
    pub fn append(
        &mut self,
        pipe: Pipe,
        kind: MetricKind,
        timestamp_millis: i64,
        raw: f64,
    ) -> f64 {
        let key = MetricKey::new(pipe, kind);
        let idx = key.index();

        let value = if kind.is_counter() {
            self.counters[idx] += raw;
            self.counters[idx]
        } else {
            raw
        };

        self.series[idx].append(timestamp_millis, value);
        value
    }

    pub fn series(&self, pipe: Pipe, kind: MetricKind) -> &TimeSeries {
        &self.series[MetricKey::new(pipe, kind).index()]
    }

    /// counter 누계. gauge 종류면 `None`
    pub fn counter_total(&self, pipe: Pipe, kind: MetricKind) -> Option<f64> {
        kind.is_counter()
            .then(|| self.counters[MetricKey::new(pipe, kind).index()])
    }

    pub fn latest(&self, pipe: Pipe, kind: MetricKind) -> Option<Point> {
        self.series(pipe, kind).latest()
    }

    /// 비어 있지 않은 시계열의 최신 점 목록 (pipe 우선 순서)
    pub fn latest_all(&self) -> Vec<(MetricKey, Point)> {
        MetricKey::all()
            .filter_map(|key| self.series[key.index()].latest().map(|p| (key, p)))
            .collect()
    }

    /// 전체 점 개수
    pub fn total_points(&self) -> usize {
        self.series.iter().map(TimeSeries::len).sum()
    }
}
