//! Database remapping for cross-database restore
//!
//! Rewrites the database identifier in captured `CREATE`/`ATTACH` statements
//! and regenerates embedded `UUID '...'` literals. Only the known statement
//! heads are rewritten; anything else is rejected.

use crate::catalog::TableCatalog;
use crate::error::{CatalogError, CatalogResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;
use uuid::Uuid;

static QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^(CREATE|ATTACH) (TABLE|VIEW|MATERIALIZED VIEW|DICTIONARY|FUNCTION) ",
        r"(`?)([^\s`.]*)(`?)\.(`?)([^\s`.]*)(`?)",
        r"(?:( UUID '[^']*')?( TO )(`?)([^\s`.]*)(`?)\.)?",
    ))
    .expect("valid static regex")
});
static CREATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^CREATE").expect("valid static regex"));
static ATTACH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ATTACH").expect("valid static regex"));
static UUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"UUID '[a-f\d\-]+'").expect("valid static regex"));

/// Capture group of the primary database segment in [`QUERY_RE`]
const DATABASE_GROUP: usize = 4;
/// Capture group of the `TO` clause database segment in [`QUERY_RE`]
const TO_DATABASE_GROUP: usize = 12;

/// Source database → target database mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseRemapRule {
    mapping: HashMap<String, String>,
}

impl DatabaseRemapRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source:target[,source:target...]`.
    pub fn parse(arg: &str) -> CatalogResult<Self> {
        let mut rule = Self::new();
        for item in arg.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let Some((source, target)) = item.split_once(':') else {
                return Err(CatalogError::Config(format!(
                    "invalid database mapping `{item}`, expected `source:target`"
                )));
            };
            let (source, target) = (source.trim(), target.trim());
            if source.is_empty() || target.is_empty() {
                return Err(CatalogError::Config(format!(
                    "invalid database mapping `{item}`, database name is empty"
                )));
            }
            rule.insert(source, target);
        }
        Ok(rule)
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.mapping.insert(source.into(), target.into());
    }

    /// Target database for `source`, if mapped
    pub fn target(&self, source: &str) -> Option<&str> {
        self.mapping.get(source).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for DatabaseRemapRule {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            mapping: iter
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }
}

impl TableCatalog {
    /// Retarget every table of a mapped database.
    ///
    /// Tables with an empty query are left untouched.
    /// On error the tables processed before the failing one stay rewritten;
    /// the caller must treat the whole catalog as unusable.
    pub fn remap_databases(&mut self, rule: &DatabaseRemapRule) -> CatalogResult<()> {
        if rule.is_empty() {
            return Ok(());
        }
        for table in self.tables_mut() {
            if table.query.is_empty() {
                continue;
            }
            let Some(target) = rule.target(&table.database) else {
                continue;
            };
            let target = target.to_string();
            table.query = rewrite_query(&table.query, &table.database, &target)?;
            debug!(from = %table.database, to = %target, table = %table.table, "remap database");
            table.database = target;
        }
        Ok(())
    }
}

/// Rewrite one captured statement from `source` database to `target`.
///
/// The first statement head is rewritten: its database segment and, for
/// materialized views, the database of the `TO` clause. Every UUID literal
/// is replaced with a fresh random one.
pub fn rewrite_query(query: &str, source: &str, target: &str) -> CatalogResult<String> {
    if !CREATE_RE.is_match(query) && !ATTACH_RE.is_match(query) {
        return Err(CatalogError::RemapImpossible {
            source_database: source.to_string(),
            target_database: target.to_string(),
            query: query.to_string(),
        });
    }

    let rewritten = QUERY_RE.replacen(query, 1, |caps: &Captures<'_>| {
        replace_database_segments(caps, target)
    });
    let regenerated = UUID_RE.replace_all(&rewritten, |_: &Captures<'_>| {
        format!("UUID '{}'", Uuid::new_v4())
    });
    Ok(regenerated.into_owned())
}

/// 매치된 구문 헤더에서 데이터베이스 세그먼트만 교체 (백틱 유지)
fn replace_database_segments(caps: &Captures<'_>, target: &str) -> String {
    let head = &caps[0];
    let offset = caps.get(0).map_or(0, |m| m.start());

    let mut out = String::with_capacity(head.len() + 2 * target.len());
    let mut cursor = 0;
    for group in [DATABASE_GROUP, TO_DATABASE_GROUP] {
        if let Some(segment) = caps.get(group) {
            out.push_str(&head[cursor..segment.start() - offset]);
            out.push_str(target);
            cursor = segment.end() - offset;
        }
    }
    out.push_str(&head[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TableMetadata;

    const UUID_A: &str = "a1b2c3d4-0000-4000-8000-000000000001";

    fn remap(query: &str, target: &str) -> String {
        rewrite_query(query, "src", target).unwrap()
    }

    // ── statement shape matrix ──

    #[test]
    fn test_create_table() {
        assert_eq!(
            remap("CREATE TABLE src.t (id UInt64) ENGINE = MergeTree ORDER BY id", "dst"),
            "CREATE TABLE dst.t (id UInt64) ENGINE = MergeTree ORDER BY id"
        );
    }

    #[test]
    fn test_create_table_backticks() {
        assert_eq!(
            remap("CREATE TABLE `src`.`t t` (id UInt64) ENGINE = Memory", "dst"),
            "CREATE TABLE `dst`.`t t` (id UInt64) ENGINE = Memory"
        );
    }

    #[test]
    fn test_create_view() {
        assert_eq!(
            remap("CREATE VIEW src.v AS SELECT count() FROM src.t", "dst"),
            "CREATE VIEW dst.v AS SELECT count() FROM src.t"
        );
    }

    #[test]
    fn test_create_materialized_view_to() {
        assert_eq!(
            remap("CREATE MATERIALIZED VIEW src.mv TO src.dst_table AS SELECT max(id) AS id FROM src.t", "dst"),
            "CREATE MATERIALIZED VIEW dst.mv TO dst.dst_table AS SELECT max(id) AS id FROM src.t"
        );
    }

    #[test]
    fn test_create_materialized_view_to_backticks() {
        assert_eq!(
            remap("CREATE MATERIALIZED VIEW `src`.`mv` TO `src`.`dst_table` AS SELECT 1", "dst"),
            "CREATE MATERIALIZED VIEW `dst`.`mv` TO `dst`.`dst_table` AS SELECT 1"
        );
    }

    #[test]
    fn test_create_materialized_view_inner_engine() {
        assert_eq!(
            remap("CREATE MATERIALIZED VIEW src.mv (id UInt64) ENGINE = MergeTree ORDER BY id AS SELECT 1", "dst"),
            "CREATE MATERIALIZED VIEW dst.mv (id UInt64) ENGINE = MergeTree ORDER BY id AS SELECT 1"
        );
    }

    #[test]
    fn test_create_dictionary() {
        assert_eq!(
            remap("CREATE DICTIONARY src.d (id UInt64) PRIMARY KEY id LAYOUT(HASHED()) LIFETIME(60)", "dst"),
            "CREATE DICTIONARY dst.d (id UInt64) PRIMARY KEY id LAYOUT(HASHED()) LIFETIME(60)"
        );
    }

    #[test]
    fn test_create_function_without_database_unchanged() {
        let query = "CREATE FUNCTION test_function AS (a, b) -> a + b";
        assert_eq!(remap(query, "dst"), query);
    }

    #[test]
    fn test_attach_table() {
        assert_eq!(
            remap("ATTACH TABLE src.t (id UInt64) ENGINE = MergeTree ORDER BY id", "dst"),
            "ATTACH TABLE dst.t (id UInt64) ENGINE = MergeTree ORDER BY id"
        );
    }

    #[test]
    fn test_attach_materialized_view_to() {
        assert_eq!(
            remap("ATTACH MATERIALIZED VIEW src.mv TO src.dst_table AS SELECT 1", "dst"),
            "ATTACH MATERIALIZED VIEW dst.mv TO dst.dst_table AS SELECT 1"
        );
    }

    #[test]
    fn test_attach_view_and_dictionary() {
        assert_eq!(
            remap("ATTACH VIEW src.v AS SELECT 1", "dst"),
            "ATTACH VIEW dst.v AS SELECT 1"
        );
        assert_eq!(
            remap("ATTACH DICTIONARY src.d (id UInt64) PRIMARY KEY id", "dst"),
            "ATTACH DICTIONARY dst.d (id UInt64) PRIMARY KEY id"
        );
    }

    #[test]
    fn test_inner_table_name_kept() {
        assert_eq!(
            remap("CREATE TABLE src.`.inner.mv` (id UInt64) ENGINE = MergeTree ORDER BY id", "dst"),
            "CREATE TABLE dst.`.inner.mv` (id UInt64) ENGINE = MergeTree ORDER BY id"
        );
    }

    #[test]
    fn test_multiline_statement_head_on_later_line() {
        assert_eq!(
            remap("-- captured\nCREATE TABLE src.t\n(\n    id UInt64\n)\nENGINE = Memory", "dst"),
            "-- captured\nCREATE TABLE dst.t\n(\n    id UInt64\n)\nENGINE = Memory"
        );
    }

    #[test]
    fn test_only_first_head_rewritten() {
        assert_eq!(
            remap("CREATE TABLE src.a (x UInt8)\nCREATE TABLE src.b (x UInt8)", "dst"),
            "CREATE TABLE dst.a (x UInt8)\nCREATE TABLE src.b (x UInt8)"
        );
    }

    #[test]
    fn test_target_inserted_literally() {
        assert_eq!(
            remap("CREATE TABLE src.t (x UInt8) ENGINE = Memory", "db$1"),
            "CREATE TABLE db$1.t (x UInt8) ENGINE = Memory"
        );
    }

    // ── UUID regeneration ──

    #[test]
    fn test_uuid_regenerated() {
        let query = format!("CREATE TABLE src.t UUID '{UUID_A}' (id UInt64) ENGINE = MergeTree ORDER BY id");
        let rewritten = remap(&query, "dst");

        assert!(rewritten.starts_with("CREATE TABLE dst.t UUID '"));
        assert!(!rewritten.contains(UUID_A));
        let caps = UUID_RE.find(&rewritten).unwrap();
        let literal = &caps.as_str()["UUID '".len()..caps.as_str().len() - 1];
        assert!(Uuid::parse_str(literal).is_ok());
    }

    #[test]
    fn test_each_uuid_literal_regenerated_separately() {
        let query = format!(
            "CREATE MATERIALIZED VIEW src.mv UUID '{UUID_A}' TO INNER UUID '{UUID_A}' (id UInt64) ENGINE = MergeTree ORDER BY id AS SELECT 1"
        );
        let rewritten = remap(&query, "dst");
        let literals: Vec<&str> = UUID_RE.find_iter(&rewritten).map(|m| m.as_str()).collect();
        assert_eq!(literals.len(), 2);
        assert_ne!(literals[0], literals[1]);
    }

    #[test]
    fn test_uuid_between_name_and_to_clause() {
        let query = format!("CREATE MATERIALIZED VIEW src.mv UUID '{UUID_A}' TO src.dst_table AS SELECT 1");
        let rewritten = remap(&query, "dst");
        assert!(rewritten.starts_with("CREATE MATERIALIZED VIEW dst.mv UUID '"));
        assert!(rewritten.contains(" TO dst.dst_table AS SELECT 1"));
    }

    // ── errors ──

    #[test]
    fn test_unrecognized_statement_fails() {
        let err = rewrite_query("SELECT 1", "src", "dst").unwrap_err();
        match err {
            CatalogError::RemapImpossible {
                source_database,
                target_database,
                query,
            } => {
                assert_eq!(source_database, "src");
                assert_eq!(target_database, "dst");
                assert_eq!(query, "SELECT 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lowercase_create_is_not_recognized() {
        assert!(rewrite_query("create table src.t (x UInt8)", "src", "dst").is_err());
    }

    // ── catalog level ──

    #[test]
    fn test_catalog_round_trip() {
        let original = "CREATE TABLE a.b (id UInt64) ENGINE = MergeTree ORDER BY id";
        let mut catalog: TableCatalog = [TableMetadata::new("a", "b").with_query(original)]
            .into_iter()
            .collect();

        catalog.remap_databases(&DatabaseRemapRule::parse("a:c").unwrap()).unwrap();
        let table = catalog.get("c", "b").unwrap();
        assert_eq!(table.query, "CREATE TABLE c.b (id UInt64) ENGINE = MergeTree ORDER BY id");

        catalog.remap_databases(&DatabaseRemapRule::parse("c:a").unwrap()).unwrap();
        let table = catalog.get("a", "b").unwrap();
        assert_eq!(table.query, original);
    }

    #[test]
    fn test_catalog_empty_query_is_noop() {
        let mut catalog: TableCatalog = [TableMetadata::new("a", "b").with_disk_parts("default", ["all_1_1_0"])]
            .into_iter()
            .collect();
        let rule: DatabaseRemapRule = [("a", "c")].into_iter().collect();

        catalog.remap_databases(&rule).unwrap();
        assert!(catalog.get("c", "b").is_none());
        let table = catalog.get("a", "b").unwrap();
        assert!(table.query.is_empty());
        assert_eq!(table.parts["default"], vec![crate::metadata::Part::new("all_1_1_0")]);
    }

    #[test]
    fn test_catalog_empty_query_skipped_among_mapped_tables() {
        let mut catalog: TableCatalog = [
            TableMetadata::new("a", "keys_only"),
            TableMetadata::new("a", "t").with_query("CREATE TABLE a.t (x UInt8) ENGINE = Memory"),
        ]
        .into_iter()
        .collect();

        catalog.remap_databases(&DatabaseRemapRule::parse("a:c").unwrap()).unwrap();
        let names: Vec<_> = catalog.iter().map(TableMetadata::full_name).collect();
        assert_eq!(names, vec!["a.keys_only", "c.t"]);
    }

    #[test]
    fn test_catalog_unmapped_database_untouched() {
        let query = "CREATE TABLE other.t (x UInt8) ENGINE = Memory";
        let mut catalog: TableCatalog = [TableMetadata::new("other", "t").with_query(query)]
            .into_iter()
            .collect();
        catalog.remap_databases(&DatabaseRemapRule::parse("a:c").unwrap()).unwrap();
        assert_eq!(catalog.get("other", "t").unwrap().query, query);
    }

    #[test]
    fn test_catalog_failure_leaves_earlier_tables_rewritten() {
        let mut catalog: TableCatalog = [
            TableMetadata::new("a", "first").with_query("CREATE TABLE a.first (x UInt8) ENGINE = Memory"),
            TableMetadata::new("a", "broken").with_query("DROP TABLE a.broken"),
            TableMetadata::new("a", "last").with_query("CREATE TABLE a.last (x UInt8) ENGINE = Memory"),
        ]
        .into_iter()
        .collect();

        let result = catalog.remap_databases(&DatabaseRemapRule::parse("a:c").unwrap());
        assert!(matches!(result, Err(CatalogError::RemapImpossible { .. })));
        assert!(catalog.get("c", "first").is_some());
        assert!(catalog.get("a", "broken").is_some());
        assert!(catalog.get("a", "last").is_some());
    }

    #[test]
    fn test_parse_rule() {
        let rule = DatabaseRemapRule::parse(" db1:db2, db3 : db4 ").unwrap();
        assert_eq!(rule.len(), 2);
        assert_eq!(rule.target("db1"), Some("db2"));
        assert_eq!(rule.target("db3"), Some("db4"));
        assert_eq!(rule.target("db2"), None);
        assert!(DatabaseRemapRule::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rule_rejects_malformed() {
        assert!(matches!(DatabaseRemapRule::parse("db1"), Err(CatalogError::Config(_))));
        assert!(matches!(DatabaseRemapRule::parse("db1:"), Err(CatalogError::Config(_))));
    }
}
