//! Partition Filter: 파티션 선택자에 따라 테이블의 데이터 파트를 축소
//!
//! 파트 디렉토리 이름은 `<partition_id>_<min_block>_<max_block>_<level>` 형식이며,
//! 첫 번째 `_` 앞부분이 파티션 ID입니다.

use crate::metadata::TableMetadata;
use std::collections::HashSet;

/// 파티션 선택자: 비어 있으면 "모든 파티션"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionSelection {
    ids: HashSet<String>,
}

impl PartitionSelection {
    /// 빈 선택자 생성 (필터 없음)
    pub fn new() -> Self {
        Self::default()
    }

    /// `--partitions` 인자 파싱 (예: `20220102,20220103`)
    ///
    /// Items are trimmed; empty items are dropped.
    pub fn parse(arg: &str) -> Self {
        arg.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// 파티션 ID 포함 여부
    pub fn contains(&self, partition_id: &str) -> bool {
        self.ids.contains(partition_id)
    }

    /// 파트 이름이 선택된 파티션에 속하는지 확인
    pub fn contains_part(&self, part_name: &str) -> bool {
        self.contains(part_partition_id(part_name))
    }
}

impl FromIterator<String> for PartitionSelection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// 파트 이름에서 파티션 ID 추출: 첫 번째 `_` 앞부분
pub fn part_partition_id(part_name: &str) -> &str {
    part_name
        .split_once('_')
        .map_or(part_name, |(partition_id, _)| partition_id)
}

/// Trim every disk's part list to the parts of the selected partitions.
///
/// No-op for an empty selection. Disks keep their key even when no part
/// survives; the table itself always stays in the catalog.
pub fn filter_parts(table: &mut TableMetadata, selection: &PartitionSelection) {
    if selection.is_empty() {
        return;
    }
    for parts in table.parts.values_mut() {
        parts.retain(|part| selection.contains_part(&part.name));
    }
}
