//! HTTP REST API 클라이언트.
//!
//! `PipeApi` 포트 구현. 재시도는 하지 않는다. 폴링 주기가 곧 재시도다.

use async_trait::async_trait;
use packetq_core::error::CoreError;
use packetq_core::models::event::EventBatch;
use packetq_core::models::meter::ByteMeter;
use packetq_core::models::params::{CandidateParams, ParamsPatch};
use packetq_core::ports::pipe_api::PipeApi;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// JS 기준 falsy 본문 판별 (`""`, `null`, `false`, `0`)
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// REST API 클라이언트 — `PipeApi` 포트 구현
pub struct HttpPipeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPipeApi {
    /// 새 HTTP 클라이언트 생성
    ///
    /// `timeout`이 없으면 reqwest 기본 동작(무제한)을 따른다.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 서버 기본 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// 요청 전송 + 상태 코드 확인 후 본문 텍스트 반환
    async fn send(&self, req: reqwest::RequestBuilder, what: &str) -> Result<String, CoreError> {
        let resp = req
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{what} 요청 실패: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("{what} 응답 읽기 실패: {e}")))?;

        if !status.is_success() {
            return Err(CoreError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    /// 본문을 필수 JSON으로 해석
    fn decode<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, CoreError> {
        serde_json::from_str(text)
            .map_err(|e| CoreError::MalformedResponse(format!("{what} 응답 파싱 실패: {e}")))
    }

    /// 본문을 선택적 파라미터로 해석. 비어 있거나 falsy면 `None`
    fn decode_params(text: &str, what: &str) -> Result<Option<ParamsPatch>, CoreError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = Self::decode(text, what)?;
        if is_falsy(&value) {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CoreError::MalformedResponse(format!("{what} 응답 파싱 실패: {e}")))
    }
}

#[async_trait]
impl PipeApi for HttpPipeApi {
    async fn fetch_events(&self) -> Result<EventBatch, CoreError> {
        let text = self
            .send(self.request(reqwest::Method::GET, "/events"), "이벤트 조회")
            .await?;
        let batch: EventBatch = Self::decode(&text, "이벤트 조회")?;
        debug!("이벤트 {}개 수신 (now={})", batch.events.len(), batch.now);
        Ok(batch)
    }

    async fn fetch_params(&self) -> Result<Option<ParamsPatch>, CoreError> {
        let text = self
            .send(self.request(reqwest::Method::GET, "/pipes"), "파라미터 조회")
            .await?;
        Self::decode_params(&text, "파라미터 조회")
    }

    async fn update_params(
        &self,
        params: &CandidateParams,
    ) -> Result<Option<ParamsPatch>, CoreError> {
        debug!("파라미터 갱신 요청: {params:?}");
        let req = self.request(reqwest::Method::PUT, "/pipes").json(params);
        let text = self.send(req, "파라미터 갱신").await?;
        Self::decode_params(&text, "파라미터 갱신")
    }

    async fn reset_params(&self) -> Result<Option<ParamsPatch>, CoreError> {
        debug!("파라미터 초기화 요청");
        let text = self
            .send(self.request(reqwest::Method::DELETE, "/pipes"), "파라미터 초기화")
            .await?;
        Self::decode_params(&text, "파라미터 초기화")
    }

    async fn fetch_meter(&self) -> Result<ByteMeter, CoreError> {
        let text = self
            .send(self.request(reqwest::Method::GET, "/bytes"), "미터 조회")
            .await?;
        Self::decode(&text, "미터 조회")
    }
}
