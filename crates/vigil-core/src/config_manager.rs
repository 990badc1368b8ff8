//! 설정 파일 관리.
//!
//! 플랫폼 설정 디렉토리의 JSON 파일 하나로 설정을 유지한다.
//! 파일이 없으면 기본 설정을 생성해 저장하고, 변경은 항상 파일에
//! 먼저 반영된 뒤 메모리에 적용된다.

use crate::config::TelemetryConfig;
use crate::error::TelemetryError;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 앱 디렉토리 이름
const APP_DIR_NAME: &str = "vigil";

/// 홈 디렉토리 경로
#[cfg(not(target_os = "windows"))]
fn home_dir() -> Result<PathBuf, TelemetryError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| TelemetryError::Config("HOME 환경 변수가 없습니다".to_string()))
}

/// 플랫폼별 설정 디렉토리
pub fn config_dir() -> Result<PathBuf, TelemetryError> {
    #[cfg(target_os = "windows")]
    {
        // Windows: %APPDATA%\vigil\
        std::env::var_os("APPDATA")
            .map(|base| PathBuf::from(base).join(APP_DIR_NAME))
            .ok_or_else(|| TelemetryError::Config("APPDATA 환경 변수가 없습니다".to_string()))
    }

    #[cfg(target_os = "macos")]
    {
        // macOS: ~/Library/Application Support/vigil/
        Ok(home_dir()?
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // Linux 등: ~/.config/vigil/
        Ok(home_dir()?.join(".config").join(APP_DIR_NAME))
    }
}

/// 플랫폼별 데이터 디렉토리 (영속 큐 DB 등)
pub fn data_dir() -> Result<PathBuf, TelemetryError> {
    #[cfg(target_os = "windows")]
    {
        // Windows: %LOCALAPPDATA%\vigil\data\
        std::env::var_os("LOCALAPPDATA")
            .map(|base| PathBuf::from(base).join(APP_DIR_NAME).join("data"))
            .ok_or_else(|| {
                TelemetryError::Config("LOCALAPPDATA 환경 변수가 없습니다".to_string())
            })
    }

    #[cfg(target_os = "macos")]
    {
        // macOS: 설정 디렉토리 아래 data/
        Ok(config_dir()?.join("data"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // Linux 등: ~/.local/share/vigil/
        Ok(home_dir()?.join(".local").join("share").join(APP_DIR_NAME))
    }
}

/// 설정 관리자
///
/// 파일 하나에 묶인 현재 설정의 스레드 안전한 사본을 유지한다.
pub struct ConfigManager {
    path: PathBuf,
    current: RwLock<TelemetryConfig>,
}

impl ConfigManager {
    /// 플랫폼 기본 경로의 설정 파일을 연다
    pub fn open_default() -> Result<Self, TelemetryError> {
        Self::open(config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정 경로의 설정 파일을 연다. 없으면 기본 설정을 생성해 저장한다.
    pub fn open(path: PathBuf) -> Result<Self, TelemetryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TelemetryError::Config(format!(
                    "설정 디렉토리 생성 실패: {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let config = if path.exists() {
            read_config(&path)?
        } else {
            let default_config = TelemetryConfig::default_config();
            write_config(&path, &default_config)?;
            info!("기본 설정 파일 생성: {}", path.display());
            default_config
        };

        Ok(Self {
            path,
            current: RwLock::new(config),
        })
    }

    /// 현재 설정 (복제본)
    pub fn get(&self) -> TelemetryConfig {
        self.current.read().clone()
    }

    /// 설정 수정 — 파일 저장이 성공한 경우에만 메모리에 반영한다
    pub fn update_with<F>(&self, updater: F) -> Result<TelemetryConfig, TelemetryError>
    where
        F: FnOnce(&mut TelemetryConfig),
    {
        let mut updated = self.get();
        updater(&mut updated);

        write_config(&self.path, &updated)?;
        *self.current.write() = updated.clone();
        debug!("설정 저장: {}", self.path.display());

        Ok(updated)
    }

    /// 설정 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_config(path: &Path) -> Result<TelemetryConfig, TelemetryError> {
    let content = fs::read_to_string(path).map_err(|e| {
        TelemetryError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        TelemetryError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })
}

fn write_config(path: &Path, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| TelemetryError::Config(format!("설정 직렬화 실패: {e}")))?;
    fs::write(path, content).map_err(|e| {
        TelemetryError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display()))
    })
}
