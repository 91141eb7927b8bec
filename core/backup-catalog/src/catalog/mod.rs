//! Table Catalog: ordered, deduplicated list of tables in a backup
//!
//! The catalog is built by merging one observation at a time, then sorted
//! into a safe processing order for the requested [`Direction`].

pub mod order;
pub mod remap;

use crate::metadata::{TableMetadata, TableTitle};
use std::slice;
use tracing::debug;

pub use order::{Direction, StatementClass, priority};
pub use remap::DatabaseRemapRule;

/// Ordered list of tables; `(database, table)` is unique within it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCatalog {
    tables: Vec<TableMetadata>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one observation of a table into the catalog.
    ///
    /// An existing entry only gains data: an empty `query` is filled from a
    /// non-empty incoming one, empty `parts` from non-empty incoming parts.
    /// Unknown identities are appended, keeping traversal order.
    pub fn merge(&mut self, table: TableMetadata) {
        let Some(existing) = self.tables.iter_mut().find(|t| t.same_identity(&table)) else {
            self.tables.push(table);
            return;
        };

        if existing.query.is_empty() && !table.query.is_empty() {
            debug!(table = %existing.full_name(), "enrich query from later observation");
            existing.query = table.query;
        }
        if existing.parts.is_empty() && !table.parts.is_empty() {
            debug!(table = %existing.full_name(), "enrich parts from later observation");
            existing.parts = table.parts;
        }
    }

    /// Accumulator form of [`TableCatalog::merge`] for folds.
    pub fn merged(mut self, table: TableMetadata) -> Self {
        self.merge(table);
        self
    }

    /// Stable sort by dependency priority; equal priorities keep their order.
    pub fn sort(&mut self, direction: Direction) {
        self.tables
            .sort_by_key(|table| priority(&table.query, direction));
    }

    /// Look up a table by identity
    pub fn get(&self, database: &str, table: &str) -> Option<&TableMetadata> {
        self.tables
            .iter()
            .find(|t| t.database == database && t.table == table)
    }

    /// Identities in catalog order
    pub fn titles(&self) -> Vec<TableTitle> {
        self.tables.iter().map(TableTitle::from).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, TableMetadata> {
        self.tables.iter()
    }

    pub fn as_slice(&self) -> &[TableMetadata] {
        &self.tables
    }

    pub fn into_vec(self) -> Vec<TableMetadata> {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub(crate) fn tables_mut(&mut self) -> slice::IterMut<'_, TableMetadata> {
        self.tables.iter_mut()
    }
}

impl FromIterator<TableMetadata> for TableCatalog {
    fn from_iter<I: IntoIterator<Item = TableMetadata>>(iter: I) -> Self {
        iter.into_iter().fold(TableCatalog::new(), TableCatalog::merged)
    }
}

impl IntoIterator for TableCatalog {
    type Item = TableMetadata;
    type IntoIter = std::vec::IntoIter<TableMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableCatalog {
    type Item = &'a TableMetadata;
    type IntoIter = slice::Iter<'a, TableMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
