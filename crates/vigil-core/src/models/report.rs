//! 에러 리포트 모델.
//!
//! 캡처 지점별 에러 종류(tagged union), 심각도, 실행 컨텍스트,
//! 서버 전송용 배치를 정의.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metric::{MetricName, Rating};

/// 심각도 — 파생 순서가 곧 우선순위 (Low < Medium < High < Critical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// 메시지에 포함되면 스크립트 에러를 Critical로 승격하는 패턴
const CRITICAL_MESSAGE_PATTERNS: &[&str] = &[
    "out of memory",
    "maximum call stack",
    "chunkloaderror",
    "loading chunk",
    "securityerror",
];

/// 캡처 지점별 에러 종류
///
/// 이질적인 캡처 이벤트를 타입 없는 맵으로 흘리지 않도록
/// 명시적 variant로 고정한다. 생성은 `vigil-collector::adapters`의
/// 지점별 어댑터 함수를 통한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ErrorKind {
    /// 스크립트 실행 에러 (전역 에러/unhandled rejection 대응)
    #[serde(rename = "js-error")]
    Script {
        /// 에러 메시지
        message: String,
        /// 스택 트레이스 (가용한 경우)
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    /// 리소스 로드 실패 (이미지, 스크립트, 스타일시트)
    #[serde(rename = "resource-error")]
    Resource {
        /// 실패한 리소스 URL
        url: String,
        /// 리소스를 참조한 요소 태그
        #[serde(skip_serializing_if = "Option::is_none")]
        element: Option<String>,
    },
    /// 백엔드 API 호출 실패
    #[serde(rename = "api-error")]
    Api {
        /// 호출 엔드포인트
        endpoint: String,
        /// HTTP 상태 코드 (응답을 받은 경우)
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// 실패 메시지
        message: String,
    },
    /// 애플리케이션이 직접 보고한 에러
    Custom {
        /// 에러 메시지
        message: String,
    },
    /// 성능 임계값 위반 (Poor 등급 메트릭)
    Performance {
        /// 위반한 신호
        metric: MetricName,
        /// 관측 값
        value: f64,
        /// 평가 등급
        rating: Rating,
    },
}

impl ErrorKind {
    /// 종류별 기본 심각도.
    ///
    /// 스크립트 에러는 Medium이되, 메시지가 알려진 치명 패턴에 걸리면
    /// Critical로 승격된다.
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorKind::Script { message, .. } => {
                if is_critical_message(message) {
                    Severity::Critical
                } else {
                    Severity::Medium
                }
            }
            ErrorKind::Resource { .. } => Severity::Medium,
            ErrorKind::Api { .. } => Severity::High,
            ErrorKind::Custom { .. } => Severity::Low,
            ErrorKind::Performance { .. } => Severity::Medium,
        }
    }
}

/// 알려진 치명 패턴 포함 여부 (대소문자 무시)
fn is_critical_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    CRITICAL_MESSAGE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// 리포트 생성 시점의 실행 컨텍스트
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    /// 페이지 로드당 한 번 생성되는 세션 ID
    pub session_id: String,
    /// 현재 페이지 URL
    pub url: String,
    /// 사용자 에이전트
    pub user_agent: String,
    /// 캡처 시각 (와이어 포맷은 epoch-ms)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// 뷰포트 크기 (width, height)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<(u32, u32)>,
    /// 연결 유형 ("4g", "wifi" 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
}

/// 에러 레코드 — 캡처 시 생성, 이후 불변.
///
/// 플러시가 확인되거나 수용량 초과로 방출될 때만 큐에서 제거된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// 레코드 고유 ID (서버 측 중복 제거 키)
    pub id: Uuid,
    /// 에러 종류
    #[serde(flatten)]
    pub kind: ErrorKind,
    /// 심각도
    pub severity: Severity,
    /// 캡처 컨텍스트
    pub context: ReportContext,
    /// 호출자가 첨부한 부가 데이터
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

/// 서버 전송용 리포트 배치
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBatch {
    /// 큐에 쌓인 순서 그대로의 레코드 목록
    pub errors: Vec<ErrorRecord>,
    /// 세션 ID
    pub session_id: String,
    /// 배치 생성 시각 (와이어 포맷은 epoch-ms)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}
