//! Backup Metadata: per-table records and the remote backup manifest
//!
//! Every table, view, dictionary or function captured in a backup is described
//! by one [`TableMetadata`] JSON document. The remote side also keeps a
//! [`BackupManifest`] listing the table identities of the backup.

pub mod path;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use path::{decode_table_path, encode_table_path, remote_table_metadata_path};

// ════════════════════════════════════════════
// Metadata Structures
// ════════════════════════════════════════════

/// One physical data-part directory of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Part directory name, e.g. `20220102_1_1_0`
    pub name: String,

    /// Part must be taken from the base backup (incremental backups)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// Serializable table metadata, one document per table in a backup.
///
/// `parts` maps disk name → part list. A table spread over several disks has
/// several keys; a disk may map to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub files: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub table: String,

    /// Empty only for standalone functions
    #[serde(default)]
    pub database: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: BTreeMap<String, Vec<Part>>,

    /// Captured CREATE/ATTACH statement, empty when only parts were recovered
    #[serde(default)]
    pub query: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub size: BTreeMap<String, i64>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_bytes: u64,

    #[serde(default)]
    pub dependencies_table: String,

    #[serde(default)]
    pub dependencies_database: String,

    #[serde(default)]
    pub metadata_only: bool,
}

impl TableMetadata {
    /// Create a record with no query and no parts
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    /// Set the captured create query
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the part list of one disk
    pub fn with_disk_parts<I, S>(mut self, disk: impl Into<String>, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts
            .insert(disk.into(), parts.into_iter().map(Part::new).collect());
        self
    }

    /// `database.table`, the string patterns are matched against
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    /// Whether `other` describes the same `(database, table)`
    pub fn same_identity(&self, other: &TableMetadata) -> bool {
        self.database == other.database && self.table == other.table
    }

    /// Total number of parts over all disks
    pub fn part_count(&self) -> usize {
        self.parts.values().map(Vec::len).sum()
    }
}

/// Bare table identity, as listed in a backup manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableTitle {
    pub database: String,
    pub table: String,
}

impl TableTitle {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }

    /// `database.table`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}

impl fmt::Display for TableTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

impl From<&TableMetadata> for TableTitle {
    fn from(table: &TableMetadata) -> Self {
        TableTitle::new(table.database.clone(), table.table.clone())
    }
}

/// Remote backup manifest: which tables belong to the backup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: Vec<TableTitle>,
}

impl BackupManifest {
    pub fn new(backup_name: impl Into<String>, tables: Vec<TableTitle>) -> Self {
        Self {
            backup_name: backup_name.into(),
            tables,
        }
    }
}

// ════════════════════════════════════════════
// Serde Helpers
// ════════════════════════════════════════════

/// Backups written by older tools store absent maps as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
