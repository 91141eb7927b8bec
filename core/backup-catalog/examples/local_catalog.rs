//! 로컬 백업 카탈로그 출력 예제
//!
//! 실행: RUST_LOG=debug cargo run --example local_catalog --features logging -- <backup>/metadata [pattern] [partitions]

use backup_catalog::{CatalogConfig, CatalogEngine, Direction, PartitionSelection};
use std::env;
use std::path::PathBuf;

fn main() -> backup_catalog::CatalogResult<()> {
    // 로깅 초기화
    #[cfg(feature = "logging")]
    backup_catalog::logging::init();

    let mut args = env::args().skip(1);
    let Some(metadata_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: local_catalog <backup>/metadata [pattern] [partitions]");
        return Ok(());
    };
    let pattern = args.next().unwrap_or_default();
    let partitions = PartitionSelection::parse(&args.next().unwrap_or_default());

    let engine = CatalogEngine::new(CatalogConfig::new().apply_env()?);

    for direction in [Direction::Create, Direction::Drop] {
        let catalog = engine.build_local(&metadata_path, &pattern, &partitions, direction)?;
        println!("=== {direction:?} order ({} tables) ===", catalog.len());
        for table in &catalog {
            println!("  {:<48} parts={}", table.full_name(), table.part_count());
        }
    }

    Ok(())
}
