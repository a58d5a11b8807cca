//! packetq 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 전송 계층 에러를 `CoreError`로 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 요청이 완료되지 못함 (연결 실패, 타임아웃 등)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 2xx 이외의 응답 상태
    #[error("HTTP 에러 ({status}): {body}")]
    Http {
        /// 응답 상태 코드
        status: u16,
        /// 응답 본문 (진단용)
        body: String,
    },

    /// 응답 본문을 해석할 수 없음 (`events`/`now` 누락 등)
    #[error("잘못된 응답: {0}")]
    MalformedResponse(String),

    /// 알 수 없는 pipe/type 조합
    #[error("알 수 없는 메트릭: pipe={pipe}, type={kind}")]
    UnknownMetric {
        /// 서버가 보낸 pipe 값
        pipe: String,
        /// 서버가 보낸 type 값
        kind: String,
    },

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 더 새로운 사이클에 의해 취소됨
    #[error("취소됨: {0}")]
    Cancelled(String),
}

impl CoreError {
    /// 전송 계층 실패 여부 (요청 자체가 완료되지 않음)
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Network(_))
    }
}
