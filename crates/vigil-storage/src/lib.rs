//! # vigil-storage
//!
//! 로컬 저장소 어댑터.
//! 리포트 큐를 단일 네임스페이스 키에 JSON으로 통째로 저장/복원해
//! 페이지 리로드(프로세스 재시작) 간에 미전송 리포트를 보존한다.
//!
//! ## 모듈
//! - `sqlite`: SQLite 큐 저장소 (QueueStore 구현)
//! - `memory`: 인메모리 큐 저장소 (테스트/미지원 환경용)
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod sqlite;
