//! 셰이핑 파라미터 컨트롤러.
//!
//! 부트스트랩(`GET /pipes`), 제출(`PUT /pipes`), 초기화(`DELETE /pipes`),
//! 바이트 미터 조회(`GET /bytes`). 결과는 [`ParamsPanel`]에 반영한다.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use packetq_core::error::CoreError;
use packetq_core::models::meter::ByteMeter;
use packetq_core::models::params::{CandidateParams, ParamKey, ParamsPatch};
use packetq_core::ports::pipe_api::PipeApi;
use tracing::{debug, info, warn};

use crate::input::{parse_float_prefix, parse_int_prefix};
use crate::panel::{ParamsPanel, SharedPanel};

/// 응답 본문이 비었거나 서버가 거부했을 때
pub const UPDATE_FAILED_MESSAGE: &str = "Updating params failed. Check the server log.";

/// 요청이 완료되지 못했을 때
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Is the packet queue running?";

/// 제출/초기화 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 서버 응답을 반영함 (반영한 필드 수)
    Applied(usize),
    /// 빈 응답 또는 서버 거부 ("update failed" 표시)
    UpdateFailed,
    /// 전송 실패 ("network error" 표시)
    NetworkError,
    /// 더 새로운 제출이 시작되어 응답을 버림
    Superseded,
}

/// 파라미터 컨트롤러
pub struct ParamController {
    api: Arc<dyn PipeApi>,
    panel: SharedPanel,
    /// 제출/초기화 요청 세대 번호
    generation: AtomicU64,
    supersede_stale: bool,
}

impl ParamController {
    pub fn new(api: Arc<dyn PipeApi>, panel: SharedPanel) -> Self {
        Self {
            api,
            panel,
            generation: AtomicU64::new(0),
            supersede_stale: false,
        }
    }

    /// 늦게 도착한 이전 세대 응답을 버릴지 설정
    pub fn with_supersede_stale(mut self, enabled: bool) -> Self {
        self.supersede_stale = enabled;
        self
    }

    pub fn panel(&self) -> &SharedPanel {
        &self.panel
    }

    /// 현재 서버 파라미터로 패널을 채운다.
    ///
    /// 실패하면 기본값을 그대로 두고 에러는 표시하지 않는다.
    /// 서버 값을 반영했으면 `true`.
    pub async fn bootstrap(&self) -> bool {
        match self.api.fetch_params().await {
            Ok(Some(patch)) => {
                let applied = self.panel.write().apply_echo(&patch);
                info!("서버 파라미터 로드 ({applied}개 필드)");
                true
            }
            Ok(None) => {
                warn!("서버 파라미터 응답이 비어 있음, 기본값 유지");
                false
            }
            Err(e) => {
                warn!("서버 파라미터 로드 실패, 기본값 유지: {e}");
                false
            }
        }
    }

    /// 현재 입력값으로 제출 본문을 만든다 (검증 없음)
    pub fn candidate(&self) -> CandidateParams {
        candidate_from(&self.panel.read())
    }

    /// 입력값 제출
    ///
    /// 결과를 알기 전에 이전 에러 메시지를 먼저 지운다.
    pub async fn submit(&self) -> SubmitOutcome {
        let candidate = self.candidate();
        let generation = self.begin();
        debug!("파라미터 제출 #{generation}: {candidate:?}");

        let result = self.api.update_params(&candidate).await;
        self.finish(generation, result)
    }

    /// 서버 기동 시 파라미터로 초기화. 응답 처리는 제출과 같다.
    pub async fn reset(&self) -> SubmitOutcome {
        let generation = self.begin();
        debug!("파라미터 초기화 #{generation}");

        let result = self.api.reset_params().await;
        self.finish(generation, result)
    }

    /// 방향별 바이트 미터 조회
    pub async fn meter(&self) -> Result<ByteMeter, CoreError> {
        self.api.fetch_meter().await
    }

    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.panel.write().clear_error();
        generation
    }

    fn finish(
        &self,
        generation: u64,
        result: Result<Option<ParamsPatch>, CoreError>,
    ) -> SubmitOutcome {
        if self.supersede_stale && self.generation.load(Ordering::SeqCst) != generation {
            debug!("파라미터 응답 #{generation} 무시 (더 새로운 요청 존재)");
            return SubmitOutcome::Superseded;
        }

        let mut panel = self.panel.write();
        match result {
            Ok(Some(patch)) => SubmitOutcome::Applied(panel.apply_echo(&patch)),
            Ok(None) => {
                warn!("파라미터 갱신 응답이 비어 있음");
                panel.show_error(UPDATE_FAILED_MESSAGE);
                SubmitOutcome::UpdateFailed
            }
            Err(e) if e.is_transport() => {
                warn!("파라미터 요청 실패: {e}");
                panel.show_error(NETWORK_ERROR_MESSAGE);
                SubmitOutcome::NetworkError
            }
            Err(e) => {
                warn!("파라미터 갱신 거부: {e}");
                panel.show_error(UPDATE_FAILED_MESSAGE);
                SubmitOutcome::UpdateFailed
            }
        }
    }
}

/// 패널 입력값 → 제출 본문
fn candidate_from(panel: &ParamsPanel) -> CandidateParams {
    CandidateParams {
        bandwidth: parse_int_prefix(panel.input(ParamKey::Bandwidth)),
        buffer: parse_int_prefix(panel.input(ParamKey::Buffer)),
        delay: parse_float_prefix(panel.input(ParamKey::Delay)),
        loss: parse_float_prefix(panel.input(ParamKey::Loss)),
    }
}
