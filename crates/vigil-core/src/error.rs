//! Vigil 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `TelemetryError`로 매핑한다.
//! 캡처 경로(관측, 큐 영속화)의 실패는 호출자에게 되돌려지지 않고
//! 각 어댑터에서 삼켜진다 — 텔레메트리는 best-effort다.

use thiserror::Error;

/// 텔레메트리 코어 에러.
/// 직렬화, 설정, 네트워크, 저장소 등 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 인증 실패 (API 키 오류 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// Rate Limit 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 로컬 저장소 에러 (큐 영속화 실패)
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 관측 불가능한 신호 (플랫폼 미지원)
    #[error("신호 미지원: {0}")]
    Unsupported(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
