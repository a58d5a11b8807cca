//! 셰이핑 파라미터 모델.
//!
//! 서버가 소유하는 단일(전역) 파라미터 세트와, 제출/응답에 쓰이는 변형들.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 파라미터 키. 입력 요소 `param-<key>`, 표시 요소 `param-value-<key>`에 대응
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKey {
    Bandwidth,
    Buffer,
    Delay,
    Loss,
}

impl ParamKey {
    /// 폼 표시 순서
    pub const ALL: [ParamKey; 4] = [
        ParamKey::Bandwidth,
        ParamKey::Buffer,
        ParamKey::Delay,
        ParamKey::Loss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::Bandwidth => "bandwidth",
            ParamKey::Buffer => "buffer",
            ParamKey::Delay => "delay",
            ParamKey::Loss => "loss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bandwidth" => Some(ParamKey::Bandwidth),
            "buffer" => Some(ParamKey::Buffer),
            "delay" => Some(ParamKey::Delay),
            "loss" => Some(ParamKey::Loss),
            _ => None,
        }
    }

    /// 정수 필드 여부 (bandwidth, buffer)
    pub fn is_integer(&self) -> bool {
        matches!(self, ParamKey::Bandwidth | ParamKey::Buffer)
    }

    /// 편집 입력 요소 ID
    pub fn input_id(&self) -> String {
        format!("param-{}", self.as_str())
    }

    /// 표시 요소 ID
    pub fn display_id(&self) -> String {
        format!("param-value-{}", self.as_str())
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 셰이핑 파라미터 (전 방향 공통)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapingParams {
    /// 초당 바이트, -1이면 무제한
    pub bandwidth: i64,
    /// 버퍼 최대 바이트, -1이면 무제한
    pub buffer: i64,
    /// 단방향 지연 (초)
    pub delay: f64,
    /// 패킷 손실률 (0.0-1.0)
    pub loss: f64,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            bandwidth: -1,
            buffer: -1,
            delay: 0.0,
            loss: 0.0,
        }
    }
}

/// 서버의 권위 있는 응답. 존재하는 필드만 반영한다
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
}

impl ParamsPatch {
    /// 존재하는 필드를 (키, 표시 문자열) 목록으로 반환
    pub fn entries(&self) -> Vec<(ParamKey, String)> {
        let mut out = Vec::with_capacity(ParamKey::ALL.len());
        if let Some(v) = self.bandwidth {
            out.push((ParamKey::Bandwidth, v.to_string()));
        }
        if let Some(v) = self.buffer {
            out.push((ParamKey::Buffer, v.to_string()));
        }
        if let Some(v) = self.delay {
            out.push((ParamKey::Delay, v.to_string()));
        }
        if let Some(v) = self.loss {
            out.push((ParamKey::Loss, v.to_string()));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.bandwidth.is_none()
            && self.buffer.is_none()
            && self.delay.is_none()
            && self.loss.is_none()
    }
}

impl From<ShapingParams> for ParamsPatch {
    fn from(p: ShapingParams) -> Self {
        Self {
            bandwidth: Some(p.bandwidth),
            buffer: Some(p.buffer),
            delay: Some(p.delay),
            loss: Some(p.loss),
        }
    }
}

/// `PUT /pipes` 요청 본문
///
/// 입력값 검증은 하지 않는다. 정수 파싱 실패는 `None`, 실수 파싱 실패는
/// `NaN`이며 둘 다 JSON에서 `null`로 직렬화된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateParams {
    pub bandwidth: Option<i64>,
    pub buffer: Option<i64>,
    pub delay: f64,
    pub loss: f64,
}

impl From<ShapingParams> for CandidateParams {
    fn from(p: ShapingParams) -> Self {
        Self {
            bandwidth: Some(p.bandwidth),
            buffer: Some(p.buffer),
            delay: p.delay,
            loss: p.loss,
        }
    }
}
