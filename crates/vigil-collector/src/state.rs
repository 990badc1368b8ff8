//! 실시간 바이탈 상태.
//!
//! 신호별 최신 평가 결과 하나만 유지한다 — 새 샘플이 이전 값을 덮어쓰고,
//! 세션(페이지 로드) 범위로만 존재한다.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use vigil_core::models::metric::{EvaluatedMetric, MetricName};

/// 신호별 최신 평가 결과 맵
#[derive(Default)]
pub struct VitalsState {
    inner: RwLock<HashMap<MetricName, EvaluatedMetric>>,
}

impl VitalsState {
    /// 빈 상태 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 최신 값 반영. 같은 신호의 이전 값은 덮어쓴다.
    pub fn update(&self, metric: EvaluatedMetric) {
        let mut inner = self.inner.write();
        let previous = inner.insert(metric.sample.name, metric.clone());

        if let Some(prev) = previous {
            if prev.rating != metric.rating {
                debug!(
                    "{} 등급 변경: {:?} → {:?} (값 {:.2})",
                    metric.sample.name, prev.rating, metric.rating, metric.sample.value
                );
            }
        }
    }

    /// 특정 신호의 최신 값
    pub fn get(&self, name: MetricName) -> Option<EvaluatedMetric> {
        self.inner.read().get(&name).cloned()
    }

    /// 전체 스냅샷 (복제본)
    pub fn snapshot(&self) -> HashMap<MetricName, EvaluatedMetric> {
        self.inner.read().clone()
    }

    /// 관측된 신호 수
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// 아직 아무 신호도 관측되지 않았는지
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
