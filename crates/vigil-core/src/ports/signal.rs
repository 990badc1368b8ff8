//! 성능 신호 관측 포트.
//!
//! 구현: 플랫폼별 어댑터 (브라우저 Performance Observer 브리지,
//! 웹뷰 임베더 등). 테스트에서는 채널 기반 목 소스를 사용한다.

use tokio::sync::mpsc;

use crate::error::TelemetryError;
use crate::models::metric::{MetricName, PerfEntry};

/// 신호 관측 소스
///
/// 신호 하나를 구독하면 해당 신호의 원시 관측 항목 스트림을 돌려준다.
/// 페이지가 진행되며 같은 신호가 여러 번 관측될 수 있다 (CLS 누적 등).
pub trait SignalSource: Send + Sync {
    /// 신호 구독.
    ///
    /// 플랫폼이 해당 신호를 관측할 수 없으면
    /// [`TelemetryError::Unsupported`]를 반환한다 — 수집기는 이를 삼키고
    /// 그 신호만 비활성으로 둔다 (텔레메트리 저하, 앱 장애 아님).
    fn subscribe(
        &self,
        name: MetricName,
    ) -> Result<mpsc::UnboundedReceiver<PerfEntry>, TelemetryError>;
}
