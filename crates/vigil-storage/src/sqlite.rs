//! SQLite 큐 저장소 어댑터.
//!
//! `QueueStore` 포트 구현. 큐 전체를 단일 네임스페이스 키에
//! 통째로 덮어쓰는 방식이라, 저장이 성공한 시점마다 메모리 큐와
//! 저장소 큐가 수렴한다. 플러시 성공 시 키를 통째로 제거한다.

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use vigil_core::error::TelemetryError;
use vigil_core::models::report::ErrorRecord;
use vigil_core::ports::store::QueueStore;

use crate::migration;

/// SQLite 큐 저장소 — `QueueStore` 포트 구현
pub struct SqliteQueueStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteQueueStore {
    /// 파일 기반 저장소 생성
    pub fn open(path: &Path, namespace: &str) -> Result<Self, TelemetryError> {
        let conn = Connection::open(path)
            .map_err(|e| TelemetryError::Storage(format!("SQLite 열기 실패: {e}")))?;

        // 성능 최적화 PRAGMA 설정
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| TelemetryError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| TelemetryError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("리포트 큐 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// 인메모리 저장소 생성 (테스트용)
    pub fn open_in_memory(namespace: &str) -> Result<Self, TelemetryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TelemetryError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| TelemetryError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// 저장 네임스페이스
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl QueueStore for SqliteQueueStore {
    fn save(&self, records: &[ErrorRecord]) -> Result<(), TelemetryError> {
        let payload = serde_json::to_string(records)?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;

        conn.execute(
            "INSERT OR REPLACE INTO report_queue (namespace, payload, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                self.namespace,
                payload,
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| TelemetryError::Storage(format!("큐 저장 실패: {e}")))?;

        debug!("리포트 큐 저장: {}건", records.len());
        Ok(())
    }

    fn load(&self) -> Result<Vec<ErrorRecord>, TelemetryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM report_queue WHERE namespace = ?1",
                rusqlite::params![self.namespace],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| TelemetryError::Storage(format!("큐 조회 실패: {e}")))?;

        match payload {
            None => Ok(Vec::new()),
            Some(payload) => Ok(serde_json::from_str(&payload)?),
        }
    }

    fn clear(&self) -> Result<(), TelemetryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TelemetryError::Storage(format!("잠금 획득 실패: {e}")))?;

        conn.execute(
            "DELETE FROM report_queue WHERE namespace = ?1",
            rusqlite::params![self.namespace],
        )
        .map_err(|e| TelemetryError::Storage(format!("큐 삭제 실패: {e}")))?;

        debug!("리포트 큐 삭제");
        Ok(())
    }
}
