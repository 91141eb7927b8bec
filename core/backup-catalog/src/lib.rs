//! # backup-catalog: Table Catalog & Ordering Engine
//!
//! 컬럼형 데이터베이스 백업/복원 도구에서 "어떤 테이블을, 어떤 순서로"
//! 처리할지 결정하는 카탈로그 엔진입니다.
//!
//! ## 주요 특징
//!
//! - **테이블 선택**: 쉼표 구분 glob 패턴 (include / skip), information schema 자동 제외
//! - **두 가지 메타데이터 출처**: 로컬 백업 디렉토리 순회, 원격 매니페스트 + 테이블별 JSON
//! - **파티션 필터**: 파트 이름의 파티션 ID로 선택
//! - **의존성 순서**: 생성 시 기반 테이블 → MV 내부 테이블 → 뷰 → 딕셔너리 → Distributed/Kafka
//! - **데이터베이스 리매핑**: 생성 쿼리의 데이터베이스 이름 치환 및 UUID 재발급
//!
//! ## 빠른 시작
//!
//! ```rust
//! use backup_catalog::{Direction, TableCatalog, TableMetadata};
//!
//! let mut catalog: TableCatalog = [
//!     TableMetadata::new("db", "mv")
//!         .with_query("CREATE MATERIALIZED VIEW db.mv TO db.t AS SELECT 1"),
//!     TableMetadata::new("db", "t").with_query("CREATE TABLE db.t (x UInt8) ENGINE = Memory"),
//! ]
//! .into_iter()
//! .collect();
//!
//! catalog.sort(Direction::Create);
//! let names: Vec<_> = catalog.iter().map(|t| t.full_name()).collect();
//! assert_eq!(names, vec!["db.t", "db.mv"]);
//! ```
//!
//! ### 데이터베이스 리매핑
//!
//! ```rust
//! use backup_catalog::{DatabaseRemapRule, TableCatalog, TableMetadata};
//!
//! # fn main() -> backup_catalog::CatalogResult<()> {
//! let mut catalog: TableCatalog = std::iter::once(
//!     TableMetadata::new("db1", "t").with_query("CREATE TABLE db1.t (x UInt8) ENGINE = Memory"),
//! )
//! .collect();
//!
//! catalog.remap_databases(&DatabaseRemapRule::parse("db1:db2")?)?;
//! let table = catalog.get("db2", "t").unwrap();
//! assert!(table.query.starts_with("CREATE TABLE db2.t"));
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`pattern`]: glob 패턴 매칭
//! - [`partition`]: 파티션 선택 및 파트 필터
//! - [`metadata`]: 테이블 메타데이터 레코드, 경로 인코딩
//! - [`catalog`]: 카탈로그 병합, 우선순위 정렬, 데이터베이스 리매핑
//! - [`discovery`]: 로컬/원격 카탈로그 생성 ([`CatalogEngine`])
//! - [`config`]: 엔진 설정
//! - [`error`]: 에러 타입

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod partition;
pub mod pattern;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use catalog::{DatabaseRemapRule, Direction, StatementClass, TableCatalog};
pub use config::CatalogConfig;
pub use discovery::{CatalogEngine, RemoteStorage, filter_tables_for_download};
pub use error::{CatalogError, CatalogResult};
pub use metadata::{BackupManifest, Part, TableMetadata, TableTitle};
pub use partition::PartitionSelection;
pub use pattern::TablePatterns;
