//! # vigil-collector
//!
//! 웹 바이탈 수집 어댑터.
//! 신호별 관측 스트림을 구독해 `MetricSample`로 정규화하고,
//! 정적 임계값으로 평가한 뒤 실시간 상태 맵을 갱신한다.
//! 이질적인 캡처 이벤트를 `ErrorKind`로 사상하는 지점별 어댑터도 제공.

pub mod adapters;
pub mod collector;
pub mod evaluator;
pub mod state;
