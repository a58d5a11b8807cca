//! packetq 도메인 모델.
//!
//! packet queue 서버와 주고받는 데이터 구조체를 정의한다.
//! 와이어 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod event;
pub mod meter;
pub mod metric;
pub mod params;
