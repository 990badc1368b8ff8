//! 웹 바이탈 메트릭 모델.
//!
//! 관측 원시 항목, 정규화된 샘플, 임계값 평가 등급을 정의.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 표준 웹 바이탈 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricName {
    /// First Contentful Paint (ms)
    Fcp,
    /// Largest Contentful Paint (ms)
    Lcp,
    /// Cumulative Layout Shift (단위 없음, 누적)
    Cls,
    /// First Input Delay (ms)
    Fid,
    /// Interaction to Next Paint (ms)
    Inp,
    /// Time to First Byte (ms)
    Ttfb,
}

impl MetricName {
    /// 수집 대상 신호 전체
    pub const ALL: [MetricName; 6] = [
        MetricName::Fcp,
        MetricName::Lcp,
        MetricName::Cls,
        MetricName::Fid,
        MetricName::Inp,
        MetricName::Ttfb,
    ];

    /// 소문자 신호 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Fcp => "fcp",
            MetricName::Lcp => "lcp",
            MetricName::Cls => "cls",
            MetricName::Fid => "fid",
            MetricName::Inp => "inp",
            MetricName::Ttfb => "ttfb",
        }
    }

    /// 누적형 신호 여부 (CLS는 페이지 수명 동안 기여분이 합산된다)
    pub fn is_accumulating(&self) -> bool {
        matches!(self, MetricName::Cls)
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 페이지 진입 유형
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationType {
    /// 일반 탐색
    #[default]
    Navigate,
    /// 새로고침
    Reload,
    /// 뒤로/앞으로 (bfcache 복원 포함)
    BackForward,
    /// 프리렌더 진입
    Prerender,
}

/// 관측 원시 항목 (정규화 전)
///
/// 신호 소스가 전달하는 단위 관측. 누적형 신호는 개별 기여분을 담는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfEntry {
    /// 관측된 신호
    pub kind: MetricName,
    /// 관측 값 (누적형은 이번 기여분)
    pub value: f64,
    /// 페이지 진입 유형
    #[serde(default)]
    pub navigation_type: NavigationType,
    /// 관측 시각
    pub timestamp: DateTime<Utc>,
}

/// 정규화된 메트릭 샘플 — 생성 후 불변
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    /// 신호 이름
    pub name: MetricName,
    /// 현재 값 (누적형은 누적 합계)
    pub value: f64,
    /// 신호별 세션 고유 ID (같은 신호의 연속 샘플은 같은 ID를 공유)
    pub id: String,
    /// 직전 관측 이후 변화량
    pub delta: f64,
    /// 페이지 진입 유형
    pub navigation_type: NavigationType,
    /// 방출 시각 (신호별 단조 증가 보장)
    pub timestamp: DateTime<Utc>,
}

/// 임계값 평가 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    /// 양호
    Good,
    /// 개선 필요
    NeedsImprovement,
    /// 불량
    Poor,
}

/// 평가 등급이 붙은 메트릭
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedMetric {
    /// 원본 샘플
    #[serde(flatten)]
    pub sample: MetricSample,
    /// 평가 등급
    pub rating: Rating,
}
