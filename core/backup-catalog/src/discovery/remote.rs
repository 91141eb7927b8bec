//! Remote metadata discovery
//!
//! The remote build never lists the bucket: it walks the backup manifest and
//! fetches one metadata JSON per selected table through [`RemoteStorage`].

use crate::catalog::{Direction, TableCatalog};
use crate::discovery::CatalogEngine;
use crate::error::{CatalogError, CatalogResult};
use crate::metadata::{BackupManifest, TableMetadata, remote_table_metadata_path};
use crate::partition::{PartitionSelection, filter_parts};
use crate::pattern::TablePatterns;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Read access to the object storage holding remote backups.
///
/// Implementations report their own failures as [`CatalogError::Storage`] or
/// [`CatalogError::Io`]; the catalog engine never retries.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Open a reader for the object at `path` (relative to the backup root).
    ///
    /// The reader is closed when dropped.
    async fn get_file_reader(&self, path: &str) -> CatalogResult<Box<dyn AsyncRead + Send + Unpin>>;
}

impl CatalogEngine {
    /// 원격 백업 매니페스트에서 테이블 카탈로그 생성
    ///
    /// `cancel` is checked before every include-pattern candidate of every
    /// table, and a pending metadata read is abandoned as soon as it fires.
    #[instrument(skip_all, fields(backup = %manifest.backup_name, pattern = %pattern))]
    pub async fn build_remote<S>(
        &self,
        storage: &S,
        manifest: &BackupManifest,
        pattern: &str,
        partitions: &PartitionSelection,
        direction: Direction,
        cancel: &CancellationToken,
    ) -> CatalogResult<TableCatalog>
    where
        S: RemoteStorage + ?Sized,
    {
        let include = TablePatterns::parse(pattern);
        let mut catalog = TableCatalog::new();

        for title in &manifest.tables {
            if self.is_virtual_database(&title.database) {
                continue;
            }
            let name = title.full_name();
            let skipped = self.is_skipped(&name);

            for candidate in &include {
                if cancel.is_cancelled() {
                    return Err(CatalogError::Cancelled);
                }
                if skipped || !candidate.matches(&name) {
                    continue;
                }

                let path = remote_table_metadata_path(&manifest.backup_name, &title.database, &title.table);
                let mut record = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
                    fetched = fetch_table_metadata(storage, &path) => fetched?,
                };
                debug!(table = %name, pattern = %candidate.as_str(), parts = record.part_count(), "accept table");

                filter_parts(&mut record, partitions);
                catalog.merge(record);
                break;
            }
        }

        catalog.sort(direction);
        info!(tables = catalog.len(), "remote table catalog built");
        Ok(catalog)
    }
}

/// 테이블 메타데이터 JSON 다운로드 및 디코딩
async fn fetch_table_metadata<S>(storage: &S, path: &str) -> CatalogResult<TableMetadata>
where
    S: RemoteStorage + ?Sized,
{
    let mut reader = storage.get_file_reader(path).await?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    drop(reader);

    Ok(serde_json::from_slice(&data)?)
}
