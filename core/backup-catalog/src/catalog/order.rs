//! Dependency Order Ranker
//!
//! 테이블 생성/삭제 순서를 결정하는 우선순위 계산.
//! 뷰와 MV 내부 테이블은 기반 테이블 이후에 생성되고, 삭제 시에는 먼저
//! 삭제되어야 합니다. Distributed/Kafka/RabbitMQ 테이블은 방향과 무관하게
//! 항상 마지막입니다.

/// Engine markers of tables that only route data to other tables
const STREAMING_ENGINE_MARKERS: [&str; 3] = [
    "ENGINE = Distributed",
    "ENGINE = Kafka",
    "ENGINE = RabbitMQ",
];

const DICTIONARY_PREFIX: &str = "CREATE DICTIONARY";

const VIEW_PREFIXES: [&str; 6] = [
    "CREATE VIEW",
    "CREATE LIVE VIEW",
    "CREATE WINDOW VIEW",
    "ATTACH WINDOW VIEW",
    "CREATE MATERIALIZED VIEW",
    "ATTACH MATERIALIZED VIEW",
];

const TABLE_PREFIX: &str = "CREATE TABLE";

/// Name markers of the hidden table backing a materialized view
const INNER_TABLE_MARKERS: [&str; 2] = [".inner_id.", ".inner."];

/// 처리 방향: 생성(restore) 또는 삭제(drop-before-restore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Create = 0,
    Drop = 1,
}

impl Direction {
    /// `true` → [`Direction::Drop`]
    pub fn from_drop_flag(drop_table: bool) -> Self {
        if drop_table {
            Direction::Drop
        } else {
            Direction::Create
        }
    }
}

/// 생성 쿼리 형태에 따른 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementClass {
    /// 일반 테이블
    Plain = 0,
    /// MV 내부 테이블 (`.inner.` / `.inner_id.`)
    InnerTable = 1,
    /// VIEW / MATERIALIZED VIEW / LIVE VIEW / WINDOW VIEW
    View = 2,
    /// DICTIONARY
    Dictionary = 3,
    /// Distributed, Kafka, RabbitMQ 엔진
    StreamingEngine = 4,
}

/// 우선순위 테이블: `[class][direction]`, 낮을수록 먼저 처리
const PRIORITY_TABLE: [[u8; 2]; 5] = [
    // Create, Drop
    [0, 0], // Plain
    [1, 2], // InnerTable
    [2, 1], // View
    [3, 3], // Dictionary
    [4, 4], // StreamingEngine
];

impl StatementClass {
    /// Classify a captured statement; the first matching rule wins.
    pub fn classify(query: &str) -> Self {
        if STREAMING_ENGINE_MARKERS
            .iter()
            .any(|marker| query.contains(marker))
        {
            return StatementClass::StreamingEngine;
        }
        if query.starts_with(DICTIONARY_PREFIX) {
            return StatementClass::Dictionary;
        }
        if VIEW_PREFIXES.iter().any(|prefix| query.starts_with(prefix)) {
            return StatementClass::View;
        }
        if query.starts_with(TABLE_PREFIX)
            && INNER_TABLE_MARKERS
                .iter()
                .any(|marker| query.contains(marker))
        {
            return StatementClass::InnerTable;
        }
        StatementClass::Plain
    }

    /// 방향별 우선순위 조회
    pub fn priority(self, direction: Direction) -> u8 {
        PRIORITY_TABLE[self as usize][direction as usize]
    }
}

/// Priority of a captured statement for `direction`; lower sorts first.
pub fn priority(query: &str, direction: Direction) -> u8 {
    StatementClass::classify(query).priority(direction)
}
