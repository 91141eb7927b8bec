//! Local metadata traversal
//!
//! A local backup keeps one file per table under
//! `<backup>/metadata/<database>/<table>.{json,sql}`:
//!
//! - `.json`: full [`TableMetadata`] sidecar written by the backup tool
//! - `.sql`: raw captured statement of an embedded (server-side) backup; its
//!   parts are listed from `<backup>/data/<database>/<table>/`

use crate::catalog::{Direction, TableCatalog};
use crate::discovery::CatalogEngine;
use crate::error::CatalogResult;
use crate::metadata::{Part, TableMetadata, decode_table_path};
use crate::partition::{PartitionSelection, filter_parts};
use crate::pattern::TablePatterns;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

const SQL_SUFFIX: &str = ".sql";
const JSON_SUFFIX: &str = ".json";

const METADATA_DIR: &str = "metadata";
const DATA_DIR: &str = "data";

/// Kind of per-table metadata file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataFile {
    /// `.sql` captured statement (embedded backup)
    Statement,
    /// `.json` table metadata
    Sidecar,
}

impl CatalogEngine {
    /// 로컬 백업 메타데이터 디렉토리에서 테이블 카탈로그 생성
    ///
    /// # 인자
    ///
    /// * `metadata_path` - 백업의 `metadata` 디렉토리
    /// * `pattern` - 쉼표로 구분된 include glob 패턴 (빈 문자열 = 전체)
    /// * `partitions` - 파티션 선택자 (비어 있으면 전체 파트)
    /// * `direction` - 정렬 방향 (생성/삭제)
    ///
    /// # 예제
    ///
    /// ```no_run
    /// use backup_catalog::{CatalogEngine, Direction, PartitionSelection};
    /// use std::path::Path;
    ///
    /// # fn main() -> backup_catalog::CatalogResult<()> {
    /// let engine = CatalogEngine::default();
    /// let catalog = engine.build_local(
    ///     Path::new("/var/lib/clickhouse/backup/daily/metadata"),
    ///     "default.*",
    ///     &PartitionSelection::new(),
    ///     Direction::Create,
    /// )?;
    /// for table in &catalog {
    ///     println!("{}", table.full_name());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, metadata_path, partitions), fields(path = %metadata_path.display()))]
    pub fn build_local(
        &self,
        metadata_path: &Path,
        pattern: &str,
        partitions: &PartitionSelection,
        direction: Direction,
    ) -> CatalogResult<TableCatalog> {
        let include = TablePatterns::parse(pattern);
        let mut catalog = TableCatalog::new();

        for entry in WalkDir::new(metadata_path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some((kind, database_segment, table_segment)) =
                split_metadata_path(metadata_path, entry.path())
            else {
                continue;
            };

            let database = decode_table_path(database_segment);
            if self.is_virtual_database(&database) {
                continue;
            }
            let table = decode_table_path(table_segment);
            let name = format!("{database}.{table}");
            if self.is_skipped(&name) || !include.matches(&name) {
                continue;
            }

            let mut record = match kind {
                MetadataFile::Statement => {
                    let data_path = data_parts_path(metadata_path)
                        .join(database_segment)
                        .join(table_segment);
                    self.read_statement_file(entry.path(), &data_path, database, table)?
                }
                MetadataFile::Sidecar => read_sidecar_file(entry.path())?,
            };
            debug!(table = %record.full_name(), parts = record.part_count(), "accept table");

            filter_parts(&mut record, partitions);
            catalog.merge(record);
        }

        catalog.sort(direction);
        info!(tables = catalog.len(), "local table catalog built");
        Ok(catalog)
    }

    /// `.sql` 파일에서 레코드 재구성: 파트는 embedded backup 디스크 하나에 기록
    fn read_statement_file(
        &self,
        path: &Path,
        data_path: &Path,
        database: String,
        table: String,
    ) -> CatalogResult<TableMetadata> {
        let data = fs::read(path)?;
        let query = normalize_statement(&String::from_utf8_lossy(&data));
        let parts = list_data_parts(data_path)?;

        Ok(TableMetadata {
            database,
            table,
            query,
            parts: BTreeMap::from([(self.config.embedded_backup_disk.clone(), parts)]),
            ..Default::default()
        })
    }
}

/// Split `<root>/<database>/<table>.<suffix>` into its kind and raw segments.
///
/// Anything not exactly two levels below the root is ignored.
fn split_metadata_path<'a>(root: &Path, path: &'a Path) -> Option<(MetadataFile, &'a str, &'a str)> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = relative.iter().map(|segment| segment.to_str());
    let database = segments.next()??;
    let file_name = segments.next()??;
    if segments.next().is_some() {
        return None;
    }

    if let Some(table) = file_name.strip_suffix(SQL_SUFFIX) {
        Some((MetadataFile::Statement, database, table))
    } else if let Some(table) = file_name.strip_suffix(JSON_SUFFIX) {
        Some((MetadataFile::Sidecar, database, table))
    } else {
        None
    }
}

/// Embedded backups may store only object keys in the `.sql` file.
///
/// A real statement is kept with its `ATTACH` prefix turned into `CREATE`;
/// anything else yields an empty query to be filled by a later observation.
fn normalize_statement(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("ATTACH") {
        format!("CREATE{rest}")
    } else if text.starts_with("CREATE") {
        text.to_string()
    } else {
        String::new()
    }
}

/// `<backup>/metadata` → `<backup>/data`
fn data_parts_path(metadata_path: &Path) -> PathBuf {
    match (metadata_path.file_name(), metadata_path.parent()) {
        (Some(name), Some(parent)) if name == METADATA_DIR => parent.join(DATA_DIR),
        _ => PathBuf::from(
            metadata_path
                .to_string_lossy()
                .replacen("/metadata", "/data", 1),
        ),
    }
}

/// 데이터 파트 디렉토리 목록 조회
///
/// A missing directory means a table without data. Any other stat failure is
/// fatal; a listing failure is only logged.
fn list_data_parts(data_path: &Path) -> CatalogResult<Vec<Part>> {
    if let Err(err) = fs::metadata(data_path) {
        if err.kind() != ErrorKind::NotFound {
            return Err(err.into());
        }
    }

    let entries = match fs::read_dir(data_path).and_then(|dir| dir.collect::<Result<Vec<_>, _>>()) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %data_path.display(), error = %err, "can't list data parts");
            return Ok(Vec::new());
        }
    };

    let mut names: Vec<String> = entries
        .iter()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names.into_iter().map(Part::new).collect())
}

fn read_sidecar_file(path: &Path) -> CatalogResult<TableMetadata> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
