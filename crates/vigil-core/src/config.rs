//! 텔레메트리 설정 구조체.
//!
//! 엔드포인트, 리포터(큐/샘플링/플러시 주기), 저장소 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드/저장.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 텔레메트리 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// 리포트 수신 엔드포인트 설정
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// 리포터(큐/플러시) 설정
    #[serde(default)]
    pub reporter: ReporterConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TelemetryConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 엔드포인트 설정
// ============================================================

/// 리포트 수신 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// 리포트 수신 URL (None이면 전송 비활성 — 큐잉만 수행)
    #[serde(default)]
    pub url: Option<String>,
    /// API 키 (`x-api-key` 헤더)
    #[serde(default)]
    pub api_key: String,
    /// 서비스 이름 (`x-service-name` 헤더)
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// 서비스 버전 (`x-service-version` 헤더)
    #[serde(default = "default_service_version")]
    pub service_version: String,
    /// 배포 환경 (`x-environment` 헤더)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: String::new(),
            service_name: default_service_name(),
            service_version: default_service_version(),
            environment: default_environment(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl EndpointConfig {
    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_service_name() -> String {
    "vigil-client".to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// ============================================================
// 리포터 설정
// ============================================================

/// 리포터 설정 — 큐 수용량, 샘플링, 플러시 스케줄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// 리포팅 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 확률적 샘플링 비율 (0.0–1.0, 1.0이면 전수 수집)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    /// 큐 수용량 (초과 시 가장 오래된 레코드부터 폐기)
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    /// 주기 플러시 간격 (초)
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// 오프라인 전환 임계값 (연속 플러시 실패 횟수)
    #[serde(default = "default_offline_threshold")]
    pub offline_threshold: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: default_sample_rate(),
            max_queue_size: default_max_queue_size(),
            flush_interval_secs: default_flush_interval_secs(),
            offline_threshold: default_offline_threshold(),
        }
    }
}

impl ReporterConfig {
    /// 주기 플러시 간격
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}

fn default_sample_rate() -> f64 {
    1.0
}

fn default_max_queue_size() -> usize {
    100
}

fn default_flush_interval_secs() -> u64 {
    30
}

fn default_offline_threshold() -> u64 {
    3
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 큐가 저장되는 네임스페이스 키
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// DB 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            db_path: None,
        }
    }
}

fn default_namespace() -> String {
    "vigil.report_queue".to_string()
}

fn default_true() -> bool {
    true
}
