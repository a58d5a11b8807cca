//! # packetq-network
//!
//! packet queue REST API 네트워크 어댑터.
//! `GET /events`, `GET|PUT|DELETE /pipes`, `GET /bytes` 호출을 담당하며
//! 전송 계층 에러를 [`packetq_core::error::CoreError`]로 매핑한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use packetq_network::http_client::HttpPipeApi;
//!
//! let api = HttpPipeApi::new("http://localhost:9000", None)?;
//! let batch = api.fetch_events().await?;
//! ```

pub mod http_client;
