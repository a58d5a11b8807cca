//! # packetq-telemetry
//!
//! 텔레메트리 파이프라인.
//! 서버 이벤트 로그를 폴링해 시계를 보정하고, 누적 바이트 카운터를
//! 렌더링 가능한 시계열로 변환한다. 셰이핑 파라미터의 조회/제출/초기화를
//! 담당하는 컨트롤러와 그 상태(폼 패널)도 여기에 있다.
//!
//! - [`clock_sync`] — 서버/로컬 시계 오프셋 계산
//! - [`metric_store`] — (pipe, metric)별 시계열 + 카운터 누계
//! - [`ingestor`] — `GET /events` 폴링 → 시계열 반영
//! - [`param_controller`] — 파라미터 부트스트랩/제출/초기화
//! - [`panel`] — 편집 입력, 표시값, 에러 슬롯
//! - [`input`] — 폼 입력 숫자 파싱
//! - [`chart`] — 렌더러에 넘기는 그래프 바인딩과 선 스타일

pub mod chart;
pub mod clock_sync;
pub mod ingestor;
pub mod input;
pub mod metric_store;
pub mod panel;
pub mod param_controller;

#[cfg(test)]
pub(crate) mod test_support;
