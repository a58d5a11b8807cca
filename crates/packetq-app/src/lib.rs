//! # packetq-app
//!
//! packetq 클라이언트 오케스트레이션.
//! 폴링 드라이버, 대화형 콘솔, 상태 리포터, 라이프사이클 관리.
//! 바이너리(`main.rs`)는 여기의 구성요소를 조립만 한다.

pub mod console;
pub mod lifecycle;
pub mod poller;
pub mod reporter;
