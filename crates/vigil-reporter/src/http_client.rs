//! HTTP 리포트 싱크.
//!
//! `ReportSink` 포트 구현. 배치 JSON POST + 서비스 식별 헤더.
//! 전송 재시도는 하지 않는다 — 실패한 배치는 리포터 큐가 복원해
//! 다음 스케줄에 통째로 재전송하므로, 싱크에서 또 재시도하면
//! 같은 배치가 이중 전송될 수 있다.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use vigil_core::config::EndpointConfig;
use vigil_core::error::TelemetryError;
use vigil_core::models::report::ReportBatch;
use vigil_core::ports::sink::ReportSink;

/// Rate Limit 기본 대기 시간 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP 리포트 싱크 — `ReportSink` 포트 구현
pub struct HttpReportSink {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    service_name: String,
    service_version: String,
    environment: String,
}

impl HttpReportSink {
    /// 엔드포인트 설정으로 싱크 생성.
    ///
    /// URL이 설정되지 않았으면 `Ok(None)` — 전송 비활성 (큐잉만 수행).
    pub fn from_config(config: &EndpointConfig) -> Result<Option<Self>, TelemetryError> {
        let Some(url) = &config.url else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TelemetryError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Some(Self {
            client,
            endpoint: url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            service_name: config.service_name.clone(),
            service_version: config.service_version.clone(),
            environment: config.environment.clone(),
        }))
    }

    /// 응답 상태 코드 확인 및 에러 매핑. 2xx만 성공.
    async fn check_response(&self, resp: reqwest::Response) -> Result<(), TelemetryError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(());
        }

        let status_code = status.as_u16();
        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status_code {
            401 | 403 => Err(TelemetryError::Auth(format!("인증 실패: {text}"))),
            429 => Err(TelemetryError::RateLimit {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            }),
            503 => Err(TelemetryError::ServiceUnavailable(text)),
            _ => Err(TelemetryError::Internal(format!(
                "리포트 엔드포인트 에러 ({status}): {text}"
            ))),
        }
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn upload_reports(&self, batch: &ReportBatch) -> Result<(), TelemetryError> {
        debug!("리포트 배치 업로드: {}건", batch.errors.len());

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("x-service-name", &self.service_name)
            .header("x-service-version", &self.service_version)
            .header("x-environment", &self.environment)
            .json(batch)
            .send()
            .await
            .map_err(|e| TelemetryError::Network(format!("리포트 업로드 요청 실패: {e}")))?;

        self.check_response(resp).await?;
        debug!("리포트 배치 업로드 성공");
        Ok(())
    }
}
