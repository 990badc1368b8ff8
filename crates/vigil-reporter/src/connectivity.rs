//! 연결 상태 관리.
//!
//! 플랫폼 연결 이벤트(online/offline)를 반영하고,
//! 연속 플러시 실패로도 오프라인 전환을 감지한다.
//! 온라인 플래그는 플러시 진입을 게이트하는 직교 상태다.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 연결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// 온라인 — 플러시 가능
    Online,
    /// 오프라인 — 플러시 보류, 큐 누적
    Offline,
    /// 실패 누적 중 (아직 온라인)
    Degraded,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Online => write!(f, "Online"),
            ConnectionStatus::Offline => write!(f, "Offline"),
            ConnectionStatus::Degraded => write!(f, "Degraded"),
        }
    }
}

/// 연결 상태 관리자
///
/// 플랫폼 연결 이벤트와 플러시 성공/실패 기록을 모두 반영해
/// 온라인 플래그를 유지하고, 상태 전환을 `watch` 채널로 브로드캐스트한다.
pub struct ConnectivityManager {
    /// 현재 온라인 상태 (atomic for lock-free access)
    is_online: AtomicBool,
    /// 마지막 성공한 전송 시각 (Unix timestamp)
    last_success: AtomicU64,
    /// 연속 실패 횟수
    failure_count: AtomicU64,
    /// 상태 변경 브로드캐스트
    status_tx: watch::Sender<ConnectionStatus>,
    /// 상태 수신기 (복제 가능)
    status_rx: watch::Receiver<ConnectionStatus>,
    /// 오프라인 전환 임계값 (연속 실패 횟수)
    offline_threshold: u64,
}

impl ConnectivityManager {
    /// 새 연결 관리자 생성
    ///
    /// `offline_threshold`: 이 횟수만큼 연속 실패하면 오프라인 전환
    pub fn new(offline_threshold: u64) -> Self {
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Online);
        Self {
            is_online: AtomicBool::new(true),
            last_success: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            status_tx,
            status_rx,
            offline_threshold,
        }
    }

    /// 기본 임계값(3회 실패)으로 생성
    pub fn default_threshold() -> Self {
        Self::new(3)
    }

    /// 현재 온라인 상태
    pub fn is_online(&self) -> bool {
        self.is_online.load(Ordering::Relaxed)
    }

    /// 현재 연결 상태
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// 상태 변경 수신기 생성
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// 플랫폼 연결 복구 이벤트 반영
    ///
    /// 즉시 온라인 전환 + 실패 카운터 리셋.
    pub fn set_online(&self) {
        let was_offline = !self.is_online.swap(true, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);

        if was_offline {
            info!("연결 복구 이벤트 - 온라인 모드");
            let _ = self.status_tx.send(ConnectionStatus::Online);
        }
    }

    /// 플랫폼 연결 끊김 이벤트 반영
    pub fn set_offline(&self) {
        let was_online = self.is_online.swap(false, Ordering::Relaxed);
        if was_online {
            info!("연결 끊김 이벤트 - 오프라인 모드 (리포트 로컬 누적)");
            let _ = self.status_tx.send(ConnectionStatus::Offline);
        }
    }

    /// 전송 성공 기록
    ///
    /// 온라인 상태로 전환하고 실패 카운터 리셋.
    pub fn record_success(&self) {
        let was_offline = !self.is_online.load(Ordering::Relaxed);
        self.is_online.store(true, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_success.store(now, Ordering::Relaxed);

        if was_offline {
            info!("전송 성공 - 온라인 모드 복귀");
            let _ = self.status_tx.send(ConnectionStatus::Online);
        }
    }

    /// 전송 실패 기록
    ///
    /// 임계값 도달 시 오프라인 전환.
    pub fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("전송 실패 기록 (연속 {}회)", count);

        if count >= self.offline_threshold {
            let was_online = self.is_online.swap(false, Ordering::Relaxed);
            if was_online {
                warn!(
                    "연속 {}회 실패 - 오프라인 모드 전환 (대기 리포트 로컬 보존)",
                    count
                );
                let _ = self.status_tx.send(ConnectionStatus::Offline);
            }
        } else {
            let _ = self.status_tx.send(ConnectionStatus::Degraded);
        }
    }

    /// 연속 실패 횟수
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// 마지막 성공 전송 이후 경과 시간
    pub fn time_since_last_success(&self) -> Duration {
        let last = self.last_success.load(Ordering::Relaxed);
        if last == 0 {
            return Duration::ZERO;
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Duration::from_secs(now.saturating_sub(last))
    }

    /// 연결 상태 통계
    pub fn stats(&self) -> ConnectivityStats {
        ConnectivityStats {
            is_online: self.is_online(),
            status: self.status(),
            failure_count: self.failure_count(),
            time_since_last_success: self.time_since_last_success(),
        }
    }
}

impl Default for ConnectivityManager {
    fn default() -> Self {
        Self::default_threshold()
    }
}

/// 연결 상태 통계
#[derive(Debug, Clone)]
pub struct ConnectivityStats {
    /// 현재 온라인 여부
    pub is_online: bool,
    /// 현재 연결 상태
    pub status: ConnectionStatus,
    /// 연속 실패 횟수
    pub failure_count: u64,
    /// 마지막 성공 이후 경과 시간
    pub time_since_last_success: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_online() {
        let mgr = ConnectivityManager::default();
        assert!(mgr.is_online());
        assert_eq!(mgr.status(), ConnectionStatus::Online);
        assert_eq!(mgr.failure_count(), 0);
    }

    #[test]
    fn success_resets_failures() {
        let mgr = ConnectivityManager::new(3);

        mgr.record_failure();
        mgr.record_failure();
        assert_eq!(mgr.failure_count(), 2);

        mgr.record_success();
        assert_eq!(mgr.failure_count(), 0);
        assert!(mgr.is_online());
    }

    #[test]
    fn threshold_triggers_offline() {
        let mgr = ConnectivityManager::new(3);

        mgr.record_failure();
        assert!(mgr.is_online()); // 1회 - 아직 온라인

        mgr.record_failure();
        assert!(mgr.is_online()); // 2회 - 아직 온라인

        mgr.record_failure();
        assert!(!mgr.is_online()); // 3회 - 오프라인!
        assert_eq!(mgr.status(), ConnectionStatus::Offline);
    }

    #[test]
    fn platform_events_override_immediately() {
        let mgr = ConnectivityManager::new(3);

        // 실패 누적 없이도 플랫폼 이벤트는 즉시 반영
        mgr.set_offline();
        assert!(!mgr.is_online());
        assert_eq!(mgr.status(), ConnectionStatus::Offline);

        mgr.set_online();
        assert!(mgr.is_online());
        assert_eq!(mgr.status(), ConnectionStatus::Online);
        assert_eq!(mgr.failure_count(), 0);
    }

    #[test]
    fn recovery_after_offline() {
        let mgr = ConnectivityManager::new(2);

        mgr.record_failure();
        mgr.record_failure();
        assert!(!mgr.is_online()); // 오프라인

        mgr.record_success();
        assert!(mgr.is_online()); // 복구됨
        assert_eq!(mgr.status(), ConnectionStatus::Online);
    }

    #[tokio::test]
    async fn subscribe_receives_changes() {
        let mgr = ConnectivityManager::new(1);
        let mut rx = mgr.subscribe();

        // 초기 상태
        assert_eq!(*rx.borrow(), ConnectionStatus::Online);

        // 실패 → 오프라인
        mgr.record_failure();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ConnectionStatus::Offline);

        // 성공 → 온라인
        mgr.record_success();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ConnectionStatus::Online);
    }
}
