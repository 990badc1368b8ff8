//! 리포트 전송 포트.
//!
//! 구현: `vigil-reporter` crate (reqwest)

use async_trait::async_trait;

use crate::error::TelemetryError;
use crate::models::report::ReportBatch;

/// 리포트 수신 엔드포인트 클라이언트
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// 에러 레코드 배치 업로드.
    ///
    /// 2xx 응답만 성공으로 간주한다. 실패한 배치의 재시도는
    /// 호출 측(리포터 큐)의 책임이다.
    async fn upload_reports(&self, batch: &ReportBatch) -> Result<(), TelemetryError>;
}
