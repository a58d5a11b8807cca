//! packet queue REST API 포트.
//!
//! 구현: `packetq-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::event::EventBatch;
use crate::models::meter::ByteMeter;
use crate::models::params::{CandidateParams, ParamsPatch};

/// packet queue 서버 클라이언트
///
/// 재시도/백오프는 하지 않는다. 다음 주기의 호출이 곧 재시도다.
#[async_trait]
pub trait PipeApi: Send + Sync {
    /// `GET /events` — 마지막 호출 이후 쌓인 이벤트
    async fn fetch_events(&self) -> Result<EventBatch, CoreError>;

    /// `GET /pipes` — 현재 파라미터. 본문이 비어 있으면 `None`
    async fn fetch_params(&self) -> Result<Option<ParamsPatch>, CoreError>;

    /// `PUT /pipes` — 파라미터 갱신. 서버 응답(부분 가능)을 반환하며
    /// 본문이 비어 있거나 falsy면 `None`
    async fn update_params(
        &self,
        params: &CandidateParams,
    ) -> Result<Option<ParamsPatch>, CoreError>;

    /// `DELETE /pipes` — 서버 기동 시의 파라미터로 복원
    async fn reset_params(&self) -> Result<Option<ParamsPatch>, CoreError>;

    /// `GET /bytes` — 방향별 바이트 미터
    async fn fetch_meter(&self) -> Result<ByteMeter, CoreError>;
}
