//! 인메모리 큐 저장소.
//!
//! `QueueStore` 포트의 비영속 구현. 테스트와 로컬 저장소를 쓸 수 없는
//! 환경(저장 권한 거부 등)의 폴백으로 사용한다.

use std::sync::Mutex;
use vigil_core::error::TelemetryError;
use vigil_core::models::report::ErrorRecord;
use vigil_core::ports::store::QueueStore;

/// 인메모리 큐 저장소
#[derive(Default)]
pub struct MemoryQueueStore {
    records: Mutex<Vec<ErrorRecord>>,
}

impl MemoryQueueStore {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 미리 채워진 저장소 생성 (복원 테스트용)
    pub fn with_records(records: Vec<ErrorRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl QueueStore for MemoryQueueStore {
    fn save(&self, records: &[ErrorRecord]) -> Result<(), TelemetryError> {
        let mut inner = self
            .records
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;
        *inner = records.to_vec();
        Ok(())
    }

    fn load(&self) -> Result<Vec<ErrorRecord>, TelemetryError> {
        let inner = self
            .records
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;
        Ok(inner.clone())
    }

    fn clear(&self) -> Result<(), TelemetryError> {
        let mut inner = self
            .records
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;
        inner.clear();
        Ok(())
    }
}
