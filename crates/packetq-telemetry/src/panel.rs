//! 파라미터 패널 상태.
//!
//! 폼을 대신하는 명시적 상태 객체. 편집 입력(`param-<key>`), 표시값
//! (`param-value-<key>`), 그리고 에러 메시지 슬롯(`params-error`) 하나를 가진다.

use packetq_core::models::params::{ParamKey, ParamsPatch, ShapingParams};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 컨트롤러와 콘솔이 공유하는 패널 핸들
pub type SharedPanel = Arc<RwLock<ParamsPanel>>;

/// 파라미터 패널
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsPanel {
    inputs: BTreeMap<ParamKey, String>,
    displayed: BTreeMap<ParamKey, String>,
    error: String,
}

impl ParamsPanel {
    /// 기본 파라미터로 채운 패널
    pub fn new() -> Self {
        Self::with_params(ShapingParams::default())
    }

    pub fn with_params(params: ShapingParams) -> Self {
        let mut panel = Self {
            inputs: BTreeMap::new(),
            displayed: BTreeMap::new(),
            error: String::new(),
        };
        panel.apply_echo(&ParamsPatch::from(params));
        panel
    }

    pub fn shared() -> SharedPanel {
        Arc::new(RwLock::new(Self::new()))
    }

    /// 사용자 편집. 표시값은 바꾸지 않는다
    pub fn set_input(&mut self, key: ParamKey, value: impl Into<String>) {
        self.inputs.insert(key, value.into());
    }

    pub fn input(&self, key: ParamKey) -> &str {
        self.inputs.get(&key).map(String::as_str).unwrap_or_default()
    }

    pub fn display(&self, key: ParamKey) -> &str {
        self.displayed.get(&key).map(String::as_str).unwrap_or_default()
    }

    /// 서버 응답 반영. 존재하는 키만 입력과 표시값 모두 덮어쓴다.
    /// 반영한 필드 수를 반환한다.
    pub fn apply_echo(&mut self, patch: &ParamsPatch) -> usize {
        let entries = patch.entries();
        let applied = entries.len();
        for (key, value) in entries {
            self.inputs.insert(key, value.clone());
            self.displayed.insert(key, value);
        }
        applied
    }

    /// 에러 슬롯 설정 (이전 메시지는 대체됨)
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    /// 현재 에러 메시지. 없으면 빈 문자열
    pub fn error(&self) -> &str {
        &self.error
    }

    /// 콘솔 한 줄 요약
    ///
    /// 예: `bandwidth=5 buffer=10 delay=1.5 loss=0.1`, 편집 중인 값은 `(입력: ...)`로 표기
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = ParamKey::ALL
            .iter()
            .map(|key| {
                let shown = self.display(*key);
                let typed = self.input(*key);
                if typed == shown {
                    format!("{key}={shown}")
                } else {
                    format!("{key}={shown} (입력: {typed})")
                }
            })
            .collect();
        if !self.error.is_empty() {
            parts.push(format!("[{}]", self.error));
        }
        parts.join(" ")
    }
}

impl Default for ParamsPanel {
    fn default() -> Self {
        Self::new()
    }
}
