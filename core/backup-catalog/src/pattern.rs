//! Table Pattern Matching: shell glob matching of `database.table` names
//!
//! 패턴 문자열은 쉼표로 구분된 glob 목록입니다 (예: `default.*, logs.events_?`).
//! 잘못된 패턴은 에러가 아니라 "매치되지 않음"으로 처리됩니다. 오타 하나로
//! 전체 백업이 중단되지 않도록 하기 위함입니다.

use glob::Pattern;
use std::slice;
use tracing::debug;

/// Pattern used when the operator gives no table pattern
pub const MATCH_ALL: &str = "*";

/// Databases that only exist virtually and are never backed up
pub const INFORMATION_SCHEMA_DATABASES: [&str; 3] = [
    "INFORMATION_SCHEMA",
    "information_schema",
    "_temporary_and_external_tables",
];

const PATTERN_TRIM: &[char] = &[' ', '\t', '\r', '\n'];

/// 단일 glob 패턴 (컴파일 실패 시 항상 불일치)
#[derive(Debug, Clone)]
pub struct TablePattern {
    raw: String,
    compiled: Option<Pattern>,
}

impl TablePattern {
    /// 패턴 컴파일: 공백 제거 후 glob 파싱
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim_matches(PATTERN_TRIM).to_string();
        let Some(normalized) = to_glob_syntax(&raw) else {
            debug!(pattern = %raw, "malformed table pattern never matches: trailing escape");
            return Self { raw, compiled: None };
        };
        let compiled = match Pattern::new(&normalized) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                debug!(pattern = %raw, error = %err, "malformed table pattern never matches");
                None
            }
        };
        Self { raw, compiled }
    }

    /// `database.table` 이름이 패턴과 일치하는지 확인
    pub fn matches(&self, name: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|pattern| pattern.matches(name))
    }

    /// 공백이 제거된 원본 패턴
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 패턴이 정상적으로 컴파일되었는지 여부
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }
}

/// Translate operator glob syntax into `glob::Pattern` syntax.
///
/// - runs of `*` collapse into one `*` (`glob` only accepts `**` as a whole
///   path component)
/// - `[^...]` negation becomes `[!...]`; `[!...]` is accepted as is
/// - `\x` escapes become `[x]` for metacharacters and plain `x` otherwise
///
/// Returns `None` for a pattern ending in a lone `\`.
fn to_glob_syntax(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut chars = raw.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        if in_class {
            match c {
                '\\' => out.push(chars.next()?),
                ']' => {
                    in_class = false;
                    out.push(c);
                }
                _ => out.push(c),
            }
            continue;
        }
        match c {
            '*' => {
                out.push('*');
                while chars.next_if_eq(&'*').is_some() {}
            }
            '\\' => match chars.next()? {
                escaped @ ('*' | '?' | '[' | ']') => {
                    out.push('[');
                    out.push(escaped);
                    out.push(']');
                }
                escaped => out.push(escaped),
            },
            '[' => {
                in_class = true;
                out.push('[');
                if chars.next_if_eq(&'^').is_some() {
                    out.push('!');
                }
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

/// 패턴 목록: 하나라도 일치하면 매치
#[derive(Debug, Clone)]
pub struct TablePatterns {
    patterns: Vec<TablePattern>,
}

impl TablePatterns {
    /// Parse a comma-separated include pattern string.
    ///
    /// An empty string means "all tables" and yields the single pattern `*`.
    pub fn parse(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self {
                patterns: vec![TablePattern::new(MATCH_ALL)],
            };
        }
        Self {
            patterns: pattern.split(',').map(TablePattern::new).collect(),
        }
    }

    /// Build from an already split list (configured skip list).
    ///
    /// Unlike [`TablePatterns::parse`] an empty list matches nothing.
    pub fn from_list<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| TablePattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// 하나 이상의 패턴과 일치하는지 확인
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }

    pub fn iter(&self) -> slice::Iter<'_, TablePattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a TablePatterns {
    type Item = &'a TablePattern;
    type IntoIter = slice::Iter<'a, TablePattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Match `name` against a comma-separated pattern string.
pub fn match_table_pattern(name: &str, pattern: &str) -> bool {
    TablePatterns::parse(pattern).matches(name)
}

/// Whether `database` is one of the virtual information-schema databases
pub fn is_information_schema(database: &str) -> bool {
    INFORMATION_SCHEMA_DATABASES.contains(&database)
}
