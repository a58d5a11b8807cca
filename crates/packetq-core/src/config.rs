//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 폴링/리포트 주기, 폴링 중첩 정책, 콘솔 사용 여부 등
//! 런타임 설정을 정의한다. [`crate::config_manager::ConfigManager`]가 JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 폴링 드라이버 설정
    #[serde(default)]
    pub poller: PollerConfig,
    /// 콘솔(파라미터 편집) 설정
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// packet queue REST API 기본 URL (예: "http://localhost:9000")
    pub base_url: String,
    /// 요청 타임아웃 (밀리초). 없으면 전송 계층 기본값
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

/// 진행 중인 폴링과 새 폴링이 겹칠 때의 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOverlap {
    /// 겹침 허용. 늦게 도착한 응답도 그대로 반영
    #[default]
    Overlap,
    /// 새 사이클이 시작되면 이전 사이클을 취소
    CancelStale,
}

/// 폴링 드라이버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// 이벤트 폴링 주기 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 상태 요약 로그 주기 (밀리초)
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
    /// 폴링 중첩 정책
    #[serde(default)]
    pub overlap: PollOverlap,
    /// 더 새로운 제출이 시작된 뒤 도착한 응답 무시
    #[serde(default)]
    pub supersede_stale_submits: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            report_interval_ms: default_report_interval_ms(),
            overlap: PollOverlap::Overlap,
            supersede_stale_submits: false,
        }
    }
}

/// 콘솔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// stdin 명령 콘솔 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: default_base_url(),
                request_timeout_ms: None,
            },
            poller: PollerConfig::default(),
            console: ConsoleConfig::default(),
        }
    }

    /// 값 검증. 주기가 0이면 타이머를 만들 수 없다
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.poller.poll_interval_ms == 0 {
            return Err(CoreError::Config(
                "poll_interval_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.poller.report_interval_ms == 0 {
            return Err(CoreError::Config(
                "report_interval_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.server.request_timeout_ms == Some(0) {
            return Err(CoreError::Config(
                "request_timeout_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Option<Duration> {
        self.server.request_timeout_ms.map(Duration::from_millis)
    }

    /// 이벤트 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poller.poll_interval_ms)
    }

    /// 상태 요약 주기를 Duration으로 반환
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.poller.report_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

/// packet queue REST API 기본 포트는 9000
fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}
fn default_poll_interval_ms() -> u64 {
    1_000
}
fn default_report_interval_ms() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_conversions() {
        let config = AppConfig::default_config();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.report_interval(), Duration::from_secs(5));
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn sparse_file_fills_defaults() {
        let json = r#"{"server":{"base_url":"http://10.0.0.2:9000"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.poller.poll_interval_ms, 1_000);
        assert_eq!(config.poller.overlap, PollOverlap::Overlap);
        assert!(!config.poller.supersede_stale_submits);
        assert!(config.console.enabled);
    }

    #[test]
    fn zero_intervals_are_rejected() {
        assert!(AppConfig::default_config().validate().is_ok());

        let mut config = AppConfig::default_config();
        config.poller.poll_interval_ms = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = AppConfig::default_config();
        config.poller.report_interval_ms = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = AppConfig::default_config();
        config.server.request_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn overlap_policy_wire_names() {
        let json = r#"{"server":{"base_url":"x"},"poller":{"overlap":"cancel_stale"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.poller.overlap, PollOverlap::CancelStale);
    }
}
