//! 캡처 지점별 에러 어댑터.
//!
//! 이질적인 캡처 이벤트(전역 에러, 리소스 실패, API 실패, 임계값 위반)를
//! 명시적 생성자를 통해 `ErrorKind` tagged union으로 사상한다.
//! 타입 없는 맵을 그대로 흘리는 경로는 없다.

use vigil_core::models::metric::EvaluatedMetric;
use vigil_core::models::report::ErrorKind;

/// 전역 스크립트 에러 / unhandled rejection
pub fn from_script_error(message: impl Into<String>, stack: Option<String>) -> ErrorKind {
    ErrorKind::Script {
        message: message.into(),
        stack,
    }
}

/// 리소스(이미지/스크립트/스타일시트) 로드 실패
pub fn from_resource_error(url: impl Into<String>, element: Option<String>) -> ErrorKind {
    ErrorKind::Resource {
        url: url.into(),
        element,
    }
}

/// 백엔드 API 호출 실패
pub fn from_api_failure(
    endpoint: impl Into<String>,
    status: Option<u16>,
    message: impl Into<String>,
) -> ErrorKind {
    ErrorKind::Api {
        endpoint: endpoint.into(),
        status,
        message: message.into(),
    }
}

/// 애플리케이션이 직접 보고하는 에러
pub fn from_custom(message: impl Into<String>) -> ErrorKind {
    ErrorKind::Custom {
        message: message.into(),
    }
}

/// 성능 임계값 위반 — Poor 등급 메트릭에서 생성
pub fn from_threshold_breach(metric: &EvaluatedMetric) -> ErrorKind {
    ErrorKind::Performance {
        metric: metric.sample.name,
        value: metric.sample.value,
        rating: metric.rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vigil_core::models::metric::{MetricName, MetricSample, NavigationType, Rating};
    use vigil_core::models::report::Severity;

    #[test]
    fn script_adapter_carries_stack() {
        let kind = from_script_error("TypeError: x is undefined", Some("at feed.js:10".into()));
        match &kind {
            ErrorKind::Script { message, stack } => {
                assert!(message.contains("TypeError"));
                assert!(stack.is_some());
            }
            other => panic!("잘못된 variant: {other:?}"),
        }
        assert_eq!(kind.default_severity(), Severity::Medium);
    }

    #[test]
    fn chunk_load_failure_is_critical() {
        let kind = from_script_error("ChunkLoadError: Loading chunk 42 failed", None);
        assert_eq!(kind.default_severity(), Severity::Critical);
    }

    #[test]
    fn api_adapter_defaults_high() {
        let kind = from_api_failure("/api/subscriptions", Some(500), "Internal Server Error");
        assert_eq!(kind.default_severity(), Severity::High);
    }

    #[test]
    fn threshold_breach_adapter() {
        let metric = EvaluatedMetric {
            sample: MetricSample {
                name: MetricName::Inp,
                value: 750.0,
                id: "inp-test".to_string(),
                delta: 750.0,
                navigation_type: NavigationType::Navigate,
                timestamp: Utc::now(),
            },
            rating: Rating::Poor,
        };

        let kind = from_threshold_breach(&metric);
        match kind {
            ErrorKind::Performance {
                metric: name,
                value,
                rating,
            } => {
                assert_eq!(name, MetricName::Inp);
                assert!((value - 750.0).abs() < f64::EPSILON);
                assert_eq!(rating, Rating::Poor);
            }
            other => panic!("잘못된 variant: {other:?}"),
        }
    }
}
