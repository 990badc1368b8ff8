//! 텔레메트리 에이전트 — 배선 + 플러시 스케줄 오케스트레이션.
//!
//! 3-루프 구성: 메트릭 펌프(Poor 등급 → 성능 리포트),
//! 주기 플러시(기본 30초, 첫 틱 즉시 — 복원된 큐를 기동 직후 배출),
//! 재연결 감시(온라인 전환 → 즉시 플러시).
//! 치명 에러의 즉시 플러시는 리포터 내부에서 처리된다.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vigil_collector::adapters;
use vigil_collector::collector::VitalsCollector;
use vigil_collector::state::VitalsState;
use vigil_core::config::TelemetryConfig;
use vigil_core::config_manager;
use vigil_core::error::TelemetryError;
use vigil_core::models::metric::{EvaluatedMetric, MetricName, Rating};
use vigil_core::models::report::{ErrorKind, Severity};
use vigil_core::ports::signal::SignalSource;
use vigil_core::ports::sink::ReportSink;
use vigil_core::ports::store::QueueStore;
use vigil_reporter::connectivity::{ConnectionStatus, ConnectivityManager, ConnectivityStats};
use vigil_reporter::http_client::HttpReportSink;
use vigil_reporter::reporter::{ErrorReporter, PageContext, ReporterStats};
use vigil_storage::sqlite::SqliteQueueStore;

/// 큐 DB 파일명 (플랫폼 데이터 디렉토리 기준)
const QUEUE_DB_FILE: &str = "report_queue.db";

/// 텔레메트리 에이전트
///
/// 수집기/리포터/연결 관리자를 묶는 수명주기 서비스 객체.
/// `start()`는 tokio 런타임 컨텍스트에서 호출해야 하고,
/// `stop()` 이후 재시작은 지원하지 않는다 — 새 에이전트를 생성한다.
pub struct TelemetryAgent {
    config: TelemetryConfig,
    collector: VitalsCollector,
    vitals: Arc<VitalsState>,
    reporter: Arc<ErrorReporter>,
    connectivity: Arc<ConnectivityManager>,
    /// 평가 메트릭 수신기 — `start()`가 펌프 태스크로 가져간다
    metric_rx: Mutex<Option<mpsc::UnboundedReceiver<EvaluatedMetric>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TelemetryAgent {
    /// 설정으로 에이전트 생성 — SQLite 큐 저장소와 HTTP 싱크를 배선한다.
    ///
    /// 엔드포인트 URL이 없으면 싱크 없이 생성된다 (큐잉만 수행).
    pub fn new(
        config: TelemetryConfig,
        source: Arc<dyn SignalSource>,
    ) -> Result<Self, TelemetryError> {
        let db_path = match &config.storage.db_path {
            Some(path) => path.clone(),
            None => config_manager::data_dir()?.join(QUEUE_DB_FILE),
        };
        let store = Arc::new(SqliteQueueStore::open(&db_path, &config.storage.namespace)?);

        let sink = HttpReportSink::from_config(&config.endpoint)?
            .map(|s| Arc::new(s) as Arc<dyn ReportSink>);

        Ok(Self::with_parts(config, source, store, sink))
    }

    /// 구성 요소를 직접 주입해 생성 (테스트/커스텀 배선용)
    pub fn with_parts(
        config: TelemetryConfig,
        source: Arc<dyn SignalSource>,
        store: Arc<dyn QueueStore>,
        sink: Option<Arc<dyn ReportSink>>,
    ) -> Self {
        let connectivity = Arc::new(ConnectivityManager::new(config.reporter.offline_threshold));
        let reporter = Arc::new(ErrorReporter::new(
            config.reporter.clone(),
            sink,
            store,
            Arc::clone(&connectivity),
        ));

        let vitals = Arc::new(VitalsState::new());
        let (metric_tx, metric_rx) = mpsc::unbounded_channel();
        let collector = VitalsCollector::new(source, Arc::clone(&vitals), metric_tx);

        Self {
            config,
            collector,
            vitals,
            reporter,
            connectivity,
            metric_rx: Mutex::new(Some(metric_rx)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// 에이전트 시작 — 수집 구독 + 3개 루프 기동. 이미 시작되었으면 no-op.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        info!(
            "텔레메트리 에이전트 시작: 세션 {}, 플러시 주기 {}초",
            self.reporter.session_id(),
            self.config.reporter.flush_interval_secs,
        );

        // 1. 메트릭 펌프 — Poor 등급을 성능 리포트로 변환
        if let Some(rx) = self.metric_rx.lock().take() {
            let reporter = Arc::clone(&self.reporter);
            tasks.push(tokio::spawn(pump_metrics(rx, reporter)));
        }

        // 2. 주기 플러시 — 첫 틱이 즉시 발화해 복원된 큐를 기동 직후 배출
        if self.config.reporter.enabled {
            let reporter = Arc::clone(&self.reporter);
            let interval = self.config.reporter.flush_interval();
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    match reporter.flush().await {
                        Ok(count) if count > 0 => debug!("주기 플러시: {count}건 전송"),
                        Ok(_) => {}
                        Err(e) => warn!("주기 플러시 실패: {e}"),
                    }
                }
            }));
        }

        // 3. 재연결 감시 — 온라인 전환 시 대기 큐 즉시 배출
        {
            let reporter = Arc::clone(&self.reporter);
            let mut status_rx = self.connectivity.subscribe();
            tasks.push(tokio::spawn(async move {
                while status_rx.changed().await.is_ok() {
                    let status = *status_rx.borrow();
                    if status != ConnectionStatus::Online {
                        continue;
                    }
                    match reporter.flush().await {
                        Ok(count) if count > 0 => info!("재연결 플러시: {count}건 전송"),
                        Ok(_) => {}
                        Err(e) => warn!("재연결 플러시 실패: {e}"),
                    }
                }
            }));
        }

        self.collector.start();
    }

    /// 에이전트 종료 — 구독 해제, 루프 중단, 최종 플러시 후 큐 영속화. 멱등.
    pub async fn stop(&self) {
        self.collector.stop();
        {
            let mut tasks = self.tasks.lock();
            for task in tasks.drain(..) {
                task.abort();
            }
        }

        // 전송 가능한 만큼 비우고 나머지는 다음 세션용으로 보존
        if let Err(e) = self.reporter.flush().await {
            warn!("종료 플러시 실패 (큐 보존됨): {e}");
        }
        self.reporter.shutdown();
        info!("텔레메트리 에이전트 종료");
    }

    /// 에러 리포트 접수 (리포터 위임)
    pub async fn report_error(
        &self,
        kind: ErrorKind,
        severity: Option<Severity>,
        metadata: serde_json::Value,
    ) -> Option<Uuid> {
        self.reporter.report(kind, severity, metadata).await
    }

    /// 수동 플러시
    pub async fn flush(&self) -> Result<usize, TelemetryError> {
        self.reporter.flush().await
    }

    /// 페이지 컨텍스트 갱신 (라우트 전환 시 호출)
    pub fn set_page_context(&self, page: PageContext) {
        self.reporter.set_page_context(page);
    }

    /// 플랫폼 연결 복구 이벤트 — 재연결 감시 루프가 플러시를 이어받는다
    pub fn set_online(&self) {
        self.connectivity.set_online();
    }

    /// 플랫폼 연결 끊김 이벤트
    pub fn set_offline(&self) {
        self.connectivity.set_offline();
    }

    /// 현재 바이탈 상태 맵 참조
    pub fn vitals(&self) -> &Arc<VitalsState> {
        &self.vitals
    }

    /// 리포터 통계
    pub fn reporter_stats(&self) -> ReporterStats {
        self.reporter.stats()
    }

    /// 연결 상태 통계 (실패 누적, 마지막 성공 이후 경과 시간 포함)
    pub fn connectivity_stats(&self) -> ConnectivityStats {
        self.connectivity.stats()
    }

    /// 현재 활성 수집 신호 수
    pub fn active_signals(&self) -> usize {
        self.collector.active_signals()
    }
}

/// 메트릭 펌프 루프.
///
/// Poor 등급 메트릭을 성능 리포트로 변환한다. 같은 신호의 반복 위반은
/// 세션당 한 번만 보고한다 — LCP 같은 신호는 페이지 수명 동안 같은
/// 위반을 여러 번 갱신하므로 그대로 흘리면 큐가 중복으로 찬다.
async fn pump_metrics(
    mut rx: mpsc::UnboundedReceiver<EvaluatedMetric>,
    reporter: Arc<ErrorReporter>,
) {
    let mut breached: HashSet<MetricName> = HashSet::new();

    while let Some(metric) = rx.recv().await {
        if metric.rating != Rating::Poor {
            continue;
        }
        if !breached.insert(metric.sample.name) {
            continue;
        }

        let metadata = serde_json::json!({
            "delta": metric.sample.delta,
            "metricId": metric.sample.id,
            "navigationType": metric.sample.navigation_type,
        });
        let kind = adapters::from_threshold_breach(&metric);

        if reporter.report(kind, None, metadata).await.is_none() {
            // 샘플링 탈락 — 다음 위반에서 다시 시도할 수 있게 되돌린다
            breached.remove(&metric.sample.name);
        }
    }
}
