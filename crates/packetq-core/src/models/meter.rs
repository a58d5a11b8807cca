//! 바이트 미터 모델.
//!
//! `GET /bytes` 응답. 방향별 시도/전달 바이트 누계.

use serde::{Deserialize, Serialize};

use crate::models::metric::Pipe;

/// 방향별 바이트 미터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteMeter {
    pub up_bytes_attempted: u64,
    pub up_bytes_delivered: u64,
    pub down_bytes_attempted: u64,
    pub down_bytes_delivered: u64,
}

impl ByteMeter {
    /// (시도, 전달) 바이트
    pub fn for_pipe(&self, pipe: Pipe) -> (u64, u64) {
        match pipe {
            Pipe::Up => (self.up_bytes_attempted, self.up_bytes_delivered),
            Pipe::Down => (self.down_bytes_attempted, self.down_bytes_delivered),
        }
    }

    /// 드롭된 바이트 (시도 - 전달)
    ///
    /// 지연 중인 패킷도 아직 전달되지 않았으므로 포함된다.
    pub fn undelivered(&self, pipe: Pipe) -> u64 {
        let (attempted, delivered) = self.for_pipe(pipe);
        attempted.saturating_sub(delivered)
    }
}
