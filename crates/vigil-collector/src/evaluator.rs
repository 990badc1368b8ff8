//! 메트릭 임계값 평가.
//!
//! (신호 이름, 값) → 등급의 순수 함수. 경계값은 더 좋은 구간에 속한다:
//! good 경계 정확히 일치 → Good, poor 경계 정확히 일치 → NeedsImprovement.

use vigil_core::models::metric::{EvaluatedMetric, MetricName, MetricSample, Rating};

/// 신호별 good/poor 임계값 쌍 (good < poor)
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    /// 이하이면 Good
    pub good: f64,
    /// 초과이면 Poor
    pub poor: f64,
}

/// 신호별 정적 임계값. 모든 신호에 정의되어 있어 실패 경로가 없다.
pub fn threshold_for(name: MetricName) -> Threshold {
    match name {
        MetricName::Fcp => Threshold {
            good: 1800.0,
            poor: 3000.0,
        },
        MetricName::Lcp => Threshold {
            good: 2500.0,
            poor: 4000.0,
        },
        MetricName::Cls => Threshold {
            good: 0.1,
            poor: 0.25,
        },
        MetricName::Fid => Threshold {
            good: 100.0,
            poor: 300.0,
        },
        MetricName::Inp => Threshold {
            good: 200.0,
            poor: 500.0,
        },
        MetricName::Ttfb => Threshold {
            good: 800.0,
            poor: 1800.0,
        },
    }
}

/// 값을 임계값에 대조해 등급 산출
pub fn rate(name: MetricName, value: f64) -> Rating {
    let t = threshold_for(name);
    if value <= t.good {
        Rating::Good
    } else if value <= t.poor {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// 샘플에 평가 등급 부착
pub fn evaluate(sample: MetricSample) -> EvaluatedMetric {
    let rating = rate(sample.name, sample.value);
    EvaluatedMetric { sample, rating }
}
