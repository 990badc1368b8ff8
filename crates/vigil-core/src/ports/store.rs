//! 리포트 큐 영속화 포트.
//!
//! 구현: `vigil-storage` crate (rusqlite)
//!
//! ingest 경로에서 반환 전에 동기적으로 호출되므로 sync trait다.
//! 큐 전체를 단일 키에 통째로 덮어쓰는 의미론 — 모든 변경 후
//! 메모리 큐와 저장소 큐가 수렴한다.

use crate::error::TelemetryError;
use crate::models::report::ErrorRecord;

/// 리포트 큐 저장소
pub trait QueueStore: Send + Sync {
    /// 큐 전체를 통째로 덮어쓴다
    fn save(&self, records: &[ErrorRecord]) -> Result<(), TelemetryError>;

    /// 저장된 큐 전체를 순서대로 복원. 저장된 큐가 없으면 빈 Vec.
    fn load(&self) -> Result<Vec<ErrorRecord>, TelemetryError>;

    /// 저장된 큐 제거 (플러시 성공 시)
    fn clear(&self) -> Result<(), TelemetryError>;
}
