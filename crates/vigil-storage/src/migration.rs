//! 스키마 마이그레이션.
//!
//! `PRAGMA user_version`으로 버전을 추적하고 순차 적용한다.

use rusqlite::Connection;
use tracing::info;

/// 현재 스키마 버전
const SCHEMA_VERSION: i32 = 1;

/// 필요한 마이그레이션을 순서대로 적용
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS report_queue (
                namespace TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            PRAGMA user_version = 1;",
        )?;
        info!("스키마 마이그레이션 적용: v0 → v1");
    }

    debug_assert!(version <= SCHEMA_VERSION);
    Ok(())
}
