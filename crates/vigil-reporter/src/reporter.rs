//! 에러 리포터 — 유계 큐 + 영속화 + 기회적 플러시.
//!
//! 리포터는 이 시스템에서 유일하게 상태 기계를 가진 컴포넌트다:
//! Idle → (캡처) → Queued → (플러시 시도) → Flushing → 성공 시 Idle /
//! 실패 시 Queued (레코드 복원). 온라인/오프라인은 Flushing 진입을
//! 게이트하는 직교 플래그다.
//!
//! 큐의 모든 변경은 반환 전에 저장소로 통째로 미러링된다 —
//! 다음 플러시 전에 세션이 끝나도 레코드를 잃지 않는다.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vigil_core::config::ReporterConfig;
use vigil_core::error::TelemetryError;
use vigil_core::models::report::{
    ErrorKind, ErrorRecord, ReportBatch, ReportContext, Severity,
};
use vigil_core::ports::sink::ReportSink;
use vigil_core::ports::store::QueueStore;

use crate::connectivity::ConnectivityManager;

/// 페이지/런타임 컨텍스트 — 임베더가 갱신한다
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// 현재 페이지 URL
    pub url: String,
    /// 사용자 에이전트
    pub user_agent: String,
    /// 뷰포트 크기 (width, height)
    pub viewport: Option<(u32, u32)>,
    /// 연결 유형 ("4g", "wifi" 등)
    pub connection_type: Option<String>,
}

/// 에러 리포터
///
/// 전역 싱글턴이 아니라 명시적으로 생성해 참조로 전달하는 서비스 객체다.
/// 생성 시 저장소에서 이전 세션의 미전송 큐를 복원한다.
pub struct ErrorReporter {
    config: ReporterConfig,
    sink: Option<Arc<dyn ReportSink>>,
    store: Arc<dyn QueueStore>,
    connectivity: Arc<ConnectivityManager>,
    /// 페이지 로드당 한 번 생성되는 세션 ID
    session_id: String,
    /// 수용량 유계 FIFO 큐 — 이벤트 전달 순서 그대로 적재
    queue: Mutex<VecDeque<ErrorRecord>>,
    /// 캡처 컨텍스트 (임베더가 갱신)
    page: RwLock<PageContext>,
    /// 수용량 초과로 폐기된 레코드 누계
    dropped: AtomicU64,
}

impl ErrorReporter {
    /// 새 리포터 생성. 저장소에 남은 미전송 큐가 있으면 복원한다.
    pub fn new(
        config: ReporterConfig,
        sink: Option<Arc<dyn ReportSink>>,
        store: Arc<dyn QueueStore>,
        connectivity: Arc<ConnectivityManager>,
    ) -> Self {
        let queue: VecDeque<ErrorRecord> = match store.load() {
            Ok(records) => {
                if !records.is_empty() {
                    info!("이전 세션 미전송 리포트 {}건 복원", records.len());
                }
                records.into()
            }
            Err(e) => {
                warn!("큐 복원 실패, 빈 큐로 시작: {e}");
                VecDeque::new()
            }
        };

        Self {
            config,
            sink,
            store,
            connectivity,
            session_id: Uuid::new_v4().to_string(),
            queue: Mutex::new(queue),
            page: RwLock::new(PageContext::default()),
            dropped: AtomicU64::new(0),
        }
    }

    /// 세션 ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 페이지 컨텍스트 갱신 (라우트 전환 등)
    pub fn set_page_context(&self, page: PageContext) {
        *self.page.write() = page;
    }

    /// 에러 리포트 접수.
    ///
    /// 샘플링에서 탈락하면 `None`. 심각도를 지정하지 않으면 종류별
    /// 기본값을 추론한다. 레코드 적재와 영속화는 반환 전에 끝나고,
    /// Critical이면 주기 스케줄을 기다리지 않고 즉시 플러시를 시도한다.
    /// 캡처 경로의 저장 실패는 삼키고 로깅만 한다 — 앱으로 되던지지 않는다.
    pub async fn report(
        &self,
        kind: ErrorKind,
        severity: Option<Severity>,
        metadata: serde_json::Value,
    ) -> Option<Uuid> {
        if !self.config.enabled {
            return None;
        }
        if self.config.sample_rate < 1.0 && rand::random::<f64>() >= self.config.sample_rate {
            debug!("샘플링 탈락 (비율 {})", self.config.sample_rate);
            return None;
        }

        let severity = severity.unwrap_or_else(|| kind.default_severity());
        let record = ErrorRecord {
            id: Uuid::new_v4(),
            kind,
            severity,
            context: self.capture_context(),
            metadata,
        };
        let id = record.id;

        {
            let mut queue = self.queue.lock();
            queue.push_back(record);
            self.evict_over_capacity(&mut queue);
            self.persist_locked(&queue);
        }

        if severity == Severity::Critical {
            // 치명 에러는 즉시 전송 시도. 실패해도 큐에 복원되므로 무시.
            if let Err(e) = self.flush().await {
                warn!("치명 에러 즉시 플러시 실패 (재큐잉됨): {e}");
            }
        }

        Some(id)
    }

    /// 큐 플러시.
    ///
    /// (온라인 ∧ 큐 비어있지 않음 ∧ 싱크 구성) 조건에서만 전송한다.
    /// 큐 스냅샷을 원자적으로 가져가므로(단일 락 구간) 경합하는 플러시는
    /// 빈 큐를 보고 no-op — 스케줄 경합이 안전하다.
    /// 실패 시 시도분을 큐 앞쪽에 복원한다.
    ///
    /// 전송 중 시도분은 메모리 큐에서 빠져 있다. 그 사이 새 레코드가
    /// 들어와 저장소를 덮어쓰면 실패 복원의 재영속화 전까지 시도분이
    /// 저장소에 없다 — 이 구간의 프로세스 종료는 시도분을 잃는다
    /// (명시적으로 수용한 손실 경계).
    pub async fn flush(&self) -> Result<usize, TelemetryError> {
        if !self.config.enabled {
            return Ok(0);
        }
        let Some(sink) = &self.sink else {
            return Ok(0);
        };
        if !self.connectivity.is_online() {
            debug!("오프라인 - 플러시 보류 ({}건 대기)", self.queue_len());
            return Ok(0);
        }

        let claimed: Vec<ErrorRecord> = {
            let mut queue = self.queue.lock();
            if queue.is_empty() {
                return Ok(0);
            }
            queue.drain(..).collect()
        };

        let batch = ReportBatch {
            errors: claimed,
            session_id: self.session_id.clone(),
            timestamp: chrono::Utc::now(),
        };

        match sink.upload_reports(&batch).await {
            Ok(()) => {
                self.connectivity.record_success();
                if let Err(e) = self.store.clear() {
                    warn!("저장소 큐 정리 실패: {e}");
                }
                debug!("플러시 성공: {}건", batch.errors.len());
                Ok(batch.errors.len())
            }
            Err(e) => {
                self.connectivity.record_failure();
                self.restore_front(batch.errors);
                Err(e)
            }
        }
    }

    /// 종료 처리 — 현재 큐를 영속화해 다음 세션에서 복원되게 한다.
    ///
    /// 진행 중인 플러시는 기다리지 않는다 (페이지 언로드 의미론).
    pub fn shutdown(&self) {
        let queue = self.queue.lock();
        self.persist_locked(&queue);
        if !queue.is_empty() {
            info!("리포터 종료 - 미전송 {}건 보존", queue.len());
        }
    }

    /// 현재 큐 길이
    pub fn queue_len(&self) -> usize {
        self.queue.lock().len()
    }

    /// 큐 스냅샷 (검사용 복제본)
    pub fn queue_snapshot(&self) -> Vec<ErrorRecord> {
        self.queue.lock().iter().cloned().collect()
    }

    /// 리포터 통계
    pub fn stats(&self) -> ReporterStats {
        ReporterStats {
            queue_size: self.queue_len(),
            dropped_total: self.dropped.load(Ordering::Relaxed),
            is_online: self.connectivity.is_online(),
            session_id: self.session_id.clone(),
        }
    }

    /// 현재 페이지 컨텍스트로 캡처 컨텍스트 구성
    fn capture_context(&self) -> ReportContext {
        let page = self.page.read().clone();
        ReportContext {
            session_id: self.session_id.clone(),
            url: page.url,
            user_agent: page.user_agent,
            timestamp: chrono::Utc::now(),
            viewport: page.viewport,
            connection_type: page.connection_type,
        }
    }

    /// 수용량 초과분을 가장 오래된 것부터 폐기.
    ///
    /// 폐기 자체는 별도 리포트로 만들지 않는다 — 명시적으로 수용한
    /// 데이터 손실 경계다.
    fn evict_over_capacity(&self, queue: &mut VecDeque<ErrorRecord>) {
        while queue.len() > self.config.max_queue_size {
            queue.pop_front();
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("큐 수용량 초과 - 가장 오래된 리포트 폐기 (누계 {dropped}건)");
        }
    }

    /// 큐 전체를 저장소에 통째로 미러링. 실패는 삼킨다 (best-effort).
    fn persist_locked(&self, queue: &VecDeque<ErrorRecord>) {
        let records: Vec<ErrorRecord> = queue.iter().cloned().collect();
        if let Err(e) = self.store.save(&records) {
            warn!("리포트 큐 영속화 실패: {e}");
        }
    }

    /// 실패한 배치를 큐 앞쪽에 복원. 시도 중 쌓인 새 레코드는 뒤에 남아
    /// 원래 상대 순서가 유지된다. 같은 id가 이미 있으면 건너뛴다 —
    /// 한 큐에 레코드가 중복 적재되지 않는다.
    fn restore_front(&self, attempted: Vec<ErrorRecord>) {
        let restored = attempted.len();
        let mut queue = self.queue.lock();
        let existing: HashSet<Uuid> = queue.iter().map(|r| r.id).collect();

        for record in attempted.into_iter().rev() {
            if existing.contains(&record.id) {
                continue;
            }
            queue.push_front(record);
        }
        self.evict_over_capacity(&mut queue);
        self.persist_locked(&queue);

        warn!("플러시 실패 - 리포트 {restored}건 재큐잉 (현재 큐 {}건)", queue.len());
    }
}

/// 리포터 통계
#[derive(Debug, Clone)]
pub struct ReporterStats {
    /// 현재 큐 크기
    pub queue_size: usize,
    /// 수용량 초과로 폐기된 누계
    pub dropped_total: u64,
    /// 현재 온라인 여부
    pub is_online: bool,
    /// 세션 ID
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Notify;
    use vigil_storage::memory::MemoryQueueStore;

    /// 성공/실패를 전환할 수 있는 목 싱크
    struct MockSink {
        should_fail: AtomicBool,
        batches: Mutex<Vec<ReportBatch>>,
    }

    impl MockSink {
        fn new(should_fail: bool) -> Self {
            Self {
                should_fail: AtomicBool::new(should_fail),
                batches: Mutex::new(Vec::new()),
            }
        }

        fn upload_count(&self) -> usize {
            self.batches.lock().len()
        }

        fn last_batch(&self) -> ReportBatch {
            self.batches.lock().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReportSink for MockSink {
        async fn upload_reports(&self, batch: &ReportBatch) -> Result<(), TelemetryError> {
            self.batches.lock().push(batch.clone());
            if self.should_fail.load(Ordering::Relaxed) {
                Err(TelemetryError::Network("mock 실패".to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// 업로드 진입 후 신호를 기다렸다가 실패하는 싱크 (경합 테스트용)
    struct GatedSink {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ReportSink for GatedSink {
        async fn upload_reports(&self, _batch: &ReportBatch) -> Result<(), TelemetryError> {
            self.entered.notify_one();
            self.release.notified().await;
            Err(TelemetryError::Network("게이트 실패".to_string()))
        }
    }

    fn make_config(max_queue_size: usize) -> ReporterConfig {
        ReporterConfig {
            enabled: true,
            sample_rate: 1.0,
            max_queue_size,
            flush_interval_secs: 30,
            offline_threshold: 3,
        }
    }

    fn make_reporter(
        sink: Option<Arc<dyn ReportSink>>,
        store: Arc<dyn QueueStore>,
        config: ReporterConfig,
    ) -> (Arc<ErrorReporter>, Arc<ConnectivityManager>) {
        let connectivity = Arc::new(ConnectivityManager::default_threshold());
        let reporter = Arc::new(ErrorReporter::new(
            config,
            sink,
            store,
            Arc::clone(&connectivity),
        ));
        (reporter, connectivity)
    }

    fn custom(message: &str) -> ErrorKind {
        ErrorKind::Custom {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn critical_triggers_immediate_flush() {
        let sink = Arc::new(MockSink::new(false));
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            Some(Arc::clone(&sink) as Arc<dyn ReportSink>),
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        // low, medium은 큐잉만
        reporter
            .report(custom("low"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();
        reporter
            .report(custom("medium"), Some(Severity::Medium), serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(reporter.queue_len(), 2);
        assert_eq!(sink.upload_count(), 0);

        // critical이 3건 전부를 실어 즉시 플러시
        reporter
            .report(
                custom("critical"),
                Some(Severity::Critical),
                serde_json::Value::Null,
            )
            .await
            .unwrap();

        assert_eq!(sink.upload_count(), 1);
        let batch = sink.last_batch();
        assert_eq!(batch.errors.len(), 3);
        assert_eq!(batch.errors[0].severity, Severity::Low);
        assert_eq!(batch.errors[2].severity, Severity::Critical);
        // 메모리 큐와 저장소 모두 비워짐
        assert_eq!(reporter.queue_len(), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_flush_restores_records_in_order() {
        let sink = Arc::new(MockSink::new(true));
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            Some(Arc::clone(&sink) as Arc<dyn ReportSink>),
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        let ids = [
            reporter
                .report(custom("a"), Some(Severity::Low), serde_json::Value::Null)
                .await
                .unwrap(),
            reporter
                .report(custom("b"), Some(Severity::Medium), serde_json::Value::Null)
                .await
                .unwrap(),
            reporter
                .report(
                    custom("c"),
                    Some(Severity::Critical),
                    serde_json::Value::Null,
                )
                .await
                .unwrap(),
        ];

        // critical 플러시가 실패했고, 3건 전부 원래 순서로 복원됨
        assert_eq!(sink.upload_count(), 1);
        let snapshot = reporter.queue_snapshot();
        assert_eq!(snapshot.len(), 3);
        for (record, expected) in snapshot.iter().zip(ids.iter()) {
            assert_eq!(record.id, *expected);
        }
        // 저장소도 같은 내용으로 수렴
        let stored = store.load().unwrap();
        assert_eq!(stored.len(), 3);
        for (record, expected) in stored.iter().zip(ids.iter()) {
            assert_eq!(record.id, *expected);
        }
    }

    #[tokio::test]
    async fn restore_skips_ids_already_queued() {
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            None,
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        let id_a = reporter
            .report(custom("a"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();
        let id_b = reporter
            .report(custom("b"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();

        // 복원 배치가 이미 큐에 있는 레코드(a)와 겹치는 경우:
        // 부분 기록된 서버 응답 뒤 재시도가 같은 레코드를 다시 실어올 수 있다
        let requeued_a = reporter.queue_snapshot()[0].clone();
        assert_eq!(requeued_a.id, id_a);
        let fresh = ErrorRecord {
            id: Uuid::new_v4(),
            kind: custom("c"),
            severity: Severity::Low,
            context: ReportContext {
                session_id: reporter.session_id().to_string(),
                url: String::new(),
                user_agent: String::new(),
                timestamp: chrono::Utc::now(),
                viewport: None,
                connection_type: None,
            },
            metadata: serde_json::Value::Null,
        };

        reporter.restore_front(vec![requeued_a, fresh.clone()]);

        // a는 건너뛰고 c만 앞에 들어간다 — 같은 id가 두 번 적재되지 않는다
        let order: Vec<Uuid> = reporter.queue_snapshot().iter().map(|r| r.id).collect();
        assert_eq!(order, vec![fresh.id, id_a, id_b]);
        let unique: HashSet<Uuid> = order.iter().copied().collect();
        assert_eq!(unique.len(), order.len());

        // 저장소도 같은 내용으로 수렴
        let stored: Vec<Uuid> = store.load().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn records_arriving_mid_flush_keep_relative_order() {
        let sink = Arc::new(GatedSink {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            Some(Arc::clone(&sink) as Arc<dyn ReportSink>),
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        let id_a = reporter
            .report(custom("a"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();
        let id_b = reporter
            .report(custom("b"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();

        // 플러시가 a, b를 가져간 채 네트워크에서 대기
        let flush_task = {
            let reporter = Arc::clone(&reporter);
            tokio::spawn(async move { reporter.flush().await })
        };
        sink.entered.notified().await;
        assert_eq!(reporter.queue_len(), 0);

        // 시도 중 새 레코드 도착
        let id_c = reporter
            .report(custom("c"), Some(Severity::Low), serde_json::Value::Null)
            .await
            .unwrap();

        // 플러시 실패 → a, b가 c 앞에 복원
        sink.release.notify_one();
        assert!(flush_task.await.unwrap().is_err());

        let snapshot = reporter.queue_snapshot();
        let order: Vec<Uuid> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![id_a, id_b, id_c]);
    }

    #[tokio::test]
    async fn queue_is_capacity_bounded() {
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            None,
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(5),
        );

        let mut ids = Vec::new();
        for i in 0..8 {
            ids.push(
                reporter
                    .report(
                        custom(&format!("err-{i}")),
                        Some(Severity::Low),
                        serde_json::Value::Null,
                    )
                    .await
                    .unwrap(),
            );
        }

        // 가장 오래된 3건이 폐기되고 최근 5건만 남는다
        let snapshot = reporter.queue_snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[0].id, ids[3]);
        assert_eq!(snapshot[4].id, ids[7]);
        assert_eq!(reporter.stats().dropped_total, 3);
        // 저장소도 같은 5건
        assert_eq!(store.load().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn offline_gates_flush() {
        let sink = Arc::new(MockSink::new(false));
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, connectivity) = make_reporter(
            Some(Arc::clone(&sink) as Arc<dyn ReportSink>),
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        connectivity.set_offline();

        // critical조차 오프라인에서는 전송되지 않는다
        reporter
            .report(
                custom("critical"),
                Some(Severity::Critical),
                serde_json::Value::Null,
            )
            .await
            .unwrap();

        assert_eq!(sink.upload_count(), 0);
        assert_eq!(reporter.queue_len(), 1);

        // 온라인 복귀 후 플러시 성공
        connectivity.set_online();
        let sent = reporter.flush().await.unwrap();
        assert_eq!(sent, 1);
        assert_eq!(reporter.queue_len(), 0);
    }

    #[tokio::test]
    async fn empty_queue_flush_is_noop() {
        let sink = Arc::new(MockSink::new(false));
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            Some(Arc::clone(&sink) as Arc<dyn ReportSink>),
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        let sent = reporter.flush().await.unwrap();
        assert_eq!(sent, 0);
        assert_eq!(sink.upload_count(), 0);
    }

    #[tokio::test]
    async fn zero_sample_rate_drops_everything() {
        let store = Arc::new(MemoryQueueStore::new());
        let config = ReporterConfig {
            sample_rate: 0.0,
            ..make_config(100)
        };
        let (reporter, _) = make_reporter(
            None,
            Arc::clone(&store) as Arc<dyn QueueStore>,
            config,
        );

        let result = reporter
            .report(custom("sampled-out"), None, serde_json::Value::Null)
            .await;
        assert!(result.is_none());
        assert_eq!(reporter.queue_len(), 0);
    }

    #[tokio::test]
    async fn disabled_reporter_ignores_everything() {
        let store = Arc::new(MemoryQueueStore::new());
        let config = ReporterConfig {
            enabled: false,
            ..make_config(100)
        };
        let (reporter, _) = make_reporter(None, Arc::clone(&store) as Arc<dyn QueueStore>, config);

        assert!(reporter
            .report(custom("ignored"), None, serde_json::Value::Null)
            .await
            .is_none());
        assert_eq!(reporter.flush().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn hydrates_queue_from_store() {
        let store = Arc::new(MemoryQueueStore::new());

        // 이전 세션이 2건을 남기고 종료
        {
            let (reporter, _) = make_reporter(
                None,
                Arc::clone(&store) as Arc<dyn QueueStore>,
                make_config(100),
            );
            reporter
                .report(custom("left-1"), Some(Severity::Low), serde_json::Value::Null)
                .await
                .unwrap();
            reporter
                .report(custom("left-2"), Some(Severity::Low), serde_json::Value::Null)
                .await
                .unwrap();
            reporter.shutdown();
        }

        // 새 세션이 복원
        let (restored, _) = make_reporter(
            None,
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );
        assert_eq!(restored.queue_len(), 2);
    }

    #[tokio::test]
    async fn inferred_severity_and_context_attached() {
        let store = Arc::new(MemoryQueueStore::new());
        let (reporter, _) = make_reporter(
            None,
            Arc::clone(&store) as Arc<dyn QueueStore>,
            make_config(100),
        );

        reporter.set_page_context(PageContext {
            url: "https://app.example.com/creator/42".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            viewport: Some((390, 844)),
            connection_type: Some("4g".to_string()),
        });

        reporter
            .report(
                ErrorKind::Api {
                    endpoint: "/api/subscriptions".to_string(),
                    status: Some(502),
                    message: "Bad Gateway".to_string(),
                },
                None,
                serde_json::json!({ "attempt": 1 }),
            )
            .await
            .unwrap();

        let snapshot = reporter.queue_snapshot();
        let record = &snapshot[0];
        assert_eq!(record.severity, Severity::High); // api-error 기본값
        assert_eq!(record.context.session_id, reporter.session_id());
        assert_eq!(record.context.url, "https://app.example.com/creator/42");
        assert_eq!(record.context.viewport, Some((390, 844)));
        assert_eq!(record.metadata["attempt"], 1);
        assert_eq!(Utc::now().signed_duration_since(record.context.timestamp).num_minutes(), 0);
    }
}
