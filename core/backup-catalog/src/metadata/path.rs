//! Table name ↔ path segment codec
//!
//! Database and table names may contain any character, so they are
//! percent-encoded when used as path segments. `.` and `-` are escaped as well
//! so that `.inner.table` style names can never collide with file suffixes.

use tracing::warn;

/// Encode a database or table name for use as a single path segment.
pub fn encode_table_path(name: &str) -> String {
    urlencoding::encode(name)
        .replace('.', "%2E")
        .replace('-', "%2D")
}

/// Decode a path segment back to the original name.
///
/// A segment that does not decode to valid UTF-8 is returned unchanged.
pub fn decode_table_path(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            warn!(segment = %segment, error = %err, "can't decode table path segment, using it as is");
            segment.to_string()
        }
    }
}

/// Location of a table's metadata JSON inside a remote backup.
pub fn remote_table_metadata_path(backup_name: &str, database: &str, table: &str) -> String {
    format!(
        "{}/metadata/{}/{}.json",
        backup_name.trim_end_matches('/'),
        encode_table_path(database),
        encode_table_path(table)
    )
}
