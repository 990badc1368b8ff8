//! # vigil-reporter
//!
//! 리포터 어댑터.
//! 에러 레코드를 유계 큐에 쌓고, 모든 변경을 로컬 저장소에 미러링하며,
//! 온라인/주기/치명-즉시 스케줄에 따라 HTTP 엔드포인트로 플러시한다.
//!
//! ## 모듈
//! - `reporter`: 유계 영속 큐 + 플러시 상태 기계
//! - `connectivity`: 온라인/오프라인 상태 관리
//! - `http_client`: `ReportSink` 포트 구현 (reqwest)

pub mod connectivity;
pub mod http_client;
pub mod reporter;
