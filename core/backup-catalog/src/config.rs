//! Catalog configuration
//!
//! 설정 로딩 순서: 기본값 → JSON 파일 → 환경 변수.
//! 카탈로그 엔진이 사용하는 값은 스킵 테이블 패턴과 embedded backup 디스크 이름뿐입니다.

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 스킵 테이블 패턴 환경 변수 (쉼표 구분)
pub const ENV_SKIP_TABLES: &str = "CLICKHOUSE_SKIP_TABLES";

/// Embedded backup 디스크 환경 변수
pub const ENV_EMBEDDED_BACKUP_DISK: &str = "CLICKHOUSE_EMBEDDED_BACKUP_DISK";

/// 카탈로그 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 백업에서 제외할 테이블 glob 패턴 (`database.table`)
    pub skip_tables: Vec<String>,

    /// `.sql` 메타데이터에서 복원한 파트를 기록할 디스크 이름
    pub embedded_backup_disk: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            skip_tables: vec![
                "system.*".to_string(),
                "INFORMATION_SCHEMA.*".to_string(),
                "information_schema.*".to_string(),
                "_temporary_and_external_tables.*".to_string(),
            ],
            embedded_backup_disk: "backups".to_string(),
        }
    }
}

impl CatalogConfig {
    /// 기본 설정 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 스킵 테이블 패턴 설정
    pub fn with_skip_tables<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_tables = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Embedded backup 디스크 이름 설정
    pub fn with_embedded_backup_disk(mut self, disk: impl Into<String>) -> Self {
        self.embedded_backup_disk = disk.into();
        self
    }

    /// JSON 파일에서 로드: 누락된 필드는 기본값 사용
    pub fn load_from_file(path: &Path) -> CatalogResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: CatalogConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// 환경 변수 적용
    pub fn apply_env(self) -> CatalogResult<Self> {
        self.apply_env_with(|key| env::var(key).ok())
    }

    /// 주어진 조회 함수로 환경 변수 적용 (테스트용)
    pub fn apply_env_with<F>(mut self, lookup: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SKIP_TABLES) {
            self.skip_tables = value
                .split(',')
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = lookup(ENV_EMBEDDED_BACKUP_DISK) {
            self.embedded_backup_disk = value.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.embedded_backup_disk.is_empty() {
            return Err(CatalogError::Config(
                "embedded_backup_disk must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
