//! 그래프 바인딩.
//!
//! 렌더링 협력자(차트 라이브러리)와의 계약 데이터: 그래프 옵션, 선 스타일,
//! 그래프별로 어떤 시계열을 어떤 색으로 그릴지. 실제 그리기는 여기서 하지 않는다.
//! 외부 렌더러에는 JSON으로 직렬화해 넘긴다 (`Serialize`).
//! 터미널 환경에서는 상태 리포터가 [`chart_bindings`]의 그래프 단위로 요약한다.

use packetq_core::models::metric::{MetricKey, MetricKind, Pipe};
use serde::Serialize;

/// 그래프 공통 옵션
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphOptions {
    /// 가로 1픽셀당 밀리초
    pub millis_per_pixel: u32,
    /// 세로축 최솟값
    pub min_value: f64,
    /// 스트리밍 지연 (밀리초). 폴링 주기만큼 늦게 그려야 끊기지 않는다
    pub stream_delay_ms: u64,
}

pub const GRAPH_OPTIONS: GraphOptions = GraphOptions {
    millis_per_pixel: 40,
    min_value: 0.0,
    stream_delay_ms: 1000,
};

/// 선 스타일 {두께, 선 색, 채움 색}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineStyle {
    pub width: u32,
    pub stroke: &'static str,
    pub fill: &'static str,
}

pub const BLUE_LINE: LineStyle = LineStyle {
    width: 3,
    stroke: "rgb(80, 120, 255)",
    fill: "rgba(80, 120, 255, 0.3)",
};

pub const RED_LINE: LineStyle = LineStyle {
    width: 3,
    stroke: "rgb(255, 120, 120)",
    fill: "rgba(255, 120, 120, 0.3)",
};

/// 그래프 하나에 그릴 선
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesLine {
    pub kind: MetricKind,
    pub style: LineStyle,
}

/// 그래프 하나. `<pipe>-<graph>` 캔버스에 대응
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBinding {
    pub pipe: Pipe,
    /// "buffer", "latency", "bytes"
    pub graph: &'static str,
    pub lines: Vec<SeriesLine>,
}

impl ChartBinding {
    /// 캔버스 ID (예: "up-bytes")
    pub fn canvas_id(&self) -> String {
        format!("{}-{}", self.pipe, self.graph)
    }

    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.lines.iter().map(|l| MetricKey::new(self.pipe, l.kind))
    }
}

/// 방향별 buffer, latency, bytes(deliver 파랑 + drop 빨강) 그래프
pub fn chart_bindings() -> Vec<ChartBinding> {
    Pipe::ALL
        .into_iter()
        .flat_map(|pipe| {
            [
                ChartBinding {
                    pipe,
                    graph: "buffer",
                    lines: vec![SeriesLine {
                        kind: MetricKind::Buffer,
                        style: BLUE_LINE,
                    }],
                },
                ChartBinding {
                    pipe,
                    graph: "latency",
                    lines: vec![SeriesLine {
                        kind: MetricKind::Latency,
                        style: BLUE_LINE,
                    }],
                },
                ChartBinding {
                    pipe,
                    graph: "bytes",
                    lines: vec![
                        SeriesLine {
                            kind: MetricKind::Deliver,
                            style: BLUE_LINE,
                        },
                        SeriesLine {
                            kind: MetricKind::Drop,
                            style: RED_LINE,
                        },
                    ],
                },
            ]
        })
        .collect()
}
