//! Table Catalog Engine: 백업에 포함될 테이블 목록 생성
//!
//! 메타데이터 출처에 따라 두 가지 진입점을 제공합니다:
//!
//! - [`CatalogEngine::build_local`]: 로컬 백업 디렉토리 순회
//! - [`CatalogEngine::build_remote`]: 원격 백업 매니페스트 + 테이블별 JSON
//!
//! 두 경로 모두 information schema 제외 → 스킵 패턴 → include 패턴 →
//! 파티션 필터 → 병합 → 우선순위 정렬 순서로 처리합니다.

pub mod local;
pub mod remote;

use crate::config::CatalogConfig;
use crate::metadata::TableTitle;
use crate::pattern::{TablePatterns, is_information_schema};
use tracing::debug;

pub use remote::RemoteStorage;

/// 카탈로그 엔진: 설정과 컴파일된 스킵 패턴을 보관
#[derive(Debug, Clone)]
pub struct CatalogEngine {
    config: CatalogConfig,
    skip: TablePatterns,
}

impl CatalogEngine {
    /// 설정으로 엔진 생성
    pub fn new(config: CatalogConfig) -> Self {
        let skip = TablePatterns::from_list(&config.skip_tables);
        Self { config, skip }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Information schema databases never take part in a backup
    fn is_virtual_database(&self, database: &str) -> bool {
        if is_information_schema(database) {
            debug!(database = %database, "skip information schema database");
            return true;
        }
        false
    }

    /// 스킵 패턴 확인: include 패턴보다 우선
    fn is_skipped(&self, name: &str) -> bool {
        if self.skip.matches(name) {
            debug!(table = %name, "skip table by skip_tables pattern");
            return true;
        }
        false
    }
}

impl Default for CatalogEngine {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

/// Choose which tables to download before their metadata is fetched.
///
/// Keeps each identity matching any include pattern once, in input order.
/// Skip patterns and the information-schema exclusion do not apply here.
pub fn filter_tables_for_download(tables: &[TableTitle], pattern: &str) -> Vec<TableTitle> {
    let include = TablePatterns::parse(pattern);
    tables
        .iter()
        .filter(|title| include.matches(&title.full_name()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<TableTitle> {
        vec![
            TableTitle::new("default", "hits"),
            TableTitle::new("default", "visits"),
            TableTitle::new("logs", "events"),
            TableTitle::new("system", "parts"),
            TableTitle::new("information_schema", "tables"),
        ]
    }

    #[test]
    fn test_download_filter_empty_pattern_keeps_all() {
        let selected = filter_tables_for_download(&titles(), "");
        assert_eq!(selected, titles());
    }

    #[test]
    fn test_download_filter_by_pattern() {
        let selected = filter_tables_for_download(&titles(), "default.*");
        assert_eq!(
            selected,
            vec![TableTitle::new("default", "hits"), TableTitle::new("default", "visits")]
        );
    }

    #[test]
    fn test_download_filter_overlapping_patterns_once() {
        let selected = filter_tables_for_download(&titles(), "logs.*, logs.events, *.events");
        assert_eq!(selected, vec![TableTitle::new("logs", "events")]);
    }

    #[test]
    fn test_download_filter_ignores_skip_and_information_schema() {
        let selected = filter_tables_for_download(&titles(), "system.*,information_schema.*");
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_engine_skip_from_config() {
        let engine = CatalogEngine::new(CatalogConfig::new().with_skip_tables(["db.tmp_*"]));
        assert!(engine.is_skipped("db.tmp_1"));
        assert!(!engine.is_skipped("system.parts"));
    }

    #[test]
    fn test_engine_default_skips_system() {
        assert!(CatalogEngine::default().is_skipped("system.parts"));
    }
}
