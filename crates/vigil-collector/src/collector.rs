//! 웹 바이탈 수집기.
//!
//! 신호별 관측 태스크를 띄워 원시 항목을 `MetricSample`로 정규화한다.
//! CLS는 누적 신호라 value가 세션 합계, delta가 개별 기여분이다.
//! 미지원 신호는 조용히 비활성으로 남는다 — 텔레메트리 저하일 뿐
//! 애플리케이션 장애가 아니다.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;
use vigil_core::error::TelemetryError;
use vigil_core::models::metric::{EvaluatedMetric, MetricName, MetricSample, PerfEntry};
use vigil_core::ports::signal::SignalSource;

use crate::evaluator;
use crate::state::VitalsState;

/// 웹 바이탈 수집기
///
/// `start()`는 tokio 런타임 컨텍스트에서 호출해야 한다.
/// `stop()`은 모든 관측 태스크를 중단한다 (scoped acquisition).
pub struct VitalsCollector {
    source: Arc<dyn SignalSource>,
    state: Arc<VitalsState>,
    emit_tx: mpsc::UnboundedSender<EvaluatedMetric>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl VitalsCollector {
    /// 새 수집기 생성. 평가 결과는 `state` 갱신 후 `emit_tx`로도 방출된다.
    pub fn new(
        source: Arc<dyn SignalSource>,
        state: Arc<VitalsState>,
        emit_tx: mpsc::UnboundedSender<EvaluatedMetric>,
    ) -> Self {
        Self {
            source,
            state,
            emit_tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// 6개 신호 전부 구독 시작. 이미 시작되었으면 no-op.
    ///
    /// 미지원 신호는 debug 로그만 남기고 해당 신호만 비활성으로 둔다.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        for name in MetricName::ALL {
            match self.source.subscribe(name) {
                Ok(rx) => {
                    let state = Arc::clone(&self.state);
                    let tx = self.emit_tx.clone();
                    tasks.push(tokio::spawn(observe_signal(name, rx, state, tx)));
                }
                Err(TelemetryError::Unsupported(reason)) => {
                    debug!("{name} 신호 미지원, 수집 비활성: {reason}");
                }
                Err(e) => {
                    warn!("{name} 신호 구독 실패: {e}");
                }
            }
        }

        debug!("바이탈 수집 시작: 활성 신호 {}개", tasks.len());
    }

    /// 모든 관측 태스크 중단. 멱등.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock();
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// 현재 활성 관측 태스크 수
    pub fn active_signals(&self) -> usize {
        self.tasks.lock().len()
    }
}

/// 신호 하나의 관측 루프 — 원시 항목을 정규화해 평가/방출한다
async fn observe_signal(
    name: MetricName,
    mut rx: mpsc::UnboundedReceiver<PerfEntry>,
    state: Arc<VitalsState>,
    tx: mpsc::UnboundedSender<EvaluatedMetric>,
) {
    // 같은 신호의 연속 샘플은 같은 ID를 공유한다 (세션 범위)
    let id = format!("{}-{}", name, Uuid::new_v4().simple());
    let mut reported_value = 0.0f64;
    let mut last_timestamp = chrono::DateTime::<chrono::Utc>::MIN_UTC;
    let accumulating = name.is_accumulating();

    while let Some(entry) = rx.recv().await {
        let (value, delta) = if accumulating {
            // CLS: value는 누적 합계, delta는 이번 기여분
            (reported_value + entry.value, entry.value)
        } else {
            (entry.value, entry.value - reported_value)
        };
        reported_value = value;

        // 신호별 타임스탬프 단조 증가 보장
        let timestamp = entry.timestamp.max(last_timestamp);
        last_timestamp = timestamp;

        let sample = MetricSample {
            name,
            value,
            id: id.clone(),
            delta,
            navigation_type: entry.navigation_type,
            timestamp,
        };

        let evaluated = evaluator::evaluate(sample);
        debug!(
            "{name} 샘플: 값 {:.2}, delta {:.2}, 등급 {:?}",
            evaluated.sample.value, evaluated.sample.delta, evaluated.rating
        );

        state.update(evaluated.clone());
        if tx.send(evaluated).is_err() {
            // 수신자가 사라짐 — 이 신호의 관측 종료
            break;
        }
    }
}
