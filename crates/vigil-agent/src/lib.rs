//! # vigil-agent
//!
//! 텔레메트리 에이전트.
//! 수집기, 리포터, 연결 관리자, 저장소를 배선하고 플러시 스케줄
//! (주기/재연결/치명-즉시)을 오케스트레이션하는 수명주기 서비스.
//!
//! 임베더는 `TelemetryAgent`를 명시적으로 생성해 `start()`/`stop()`으로
//! 수명주기를 제어한다 — 전역 싱글턴이나 암묵적 초기화는 없다.

pub mod agent;

pub use agent::TelemetryAgent;
