use ecofactor_core::batch::{BatchManager, BatchOptions, CatalogInserter, DedupOptions};
use ecofactor_core::error::EcofactorError;
use ecofactor_core::store::MemoryStore;
use std::path::Path;

use crate::output;

pub fn options(threshold: f64, batch_size: usize, dedup: bool, dedup_threshold: f64) -> BatchOptions {
    BatchOptions {
        threshold,
        batch_size,
        dedup: dedup.then(|| DedupOptions {
            similarity_threshold: dedup_threshold,
            ..Default::default()
        }),
    }
}

pub async fn run(store_path: &Path, options: BatchOptions, output_format: &str) -> Result<(), EcofactorError> {
    let store = MemoryStore::load(store_path)?;
    let inserter = CatalogInserter::new(&store);

    let run = BatchManager::new(&store, &inserter, options)
        .on_progress(|p| log::info!("progress: {}/{} ({}%)", p.current, p.total, p.percent))
        .run_eligible()
        .await?;

    store.save(store_path)?;

    match output_format {
        "json" => output::json::print(&run)?,
        _ => output::table::print_batch(&run),
    }

    Ok(())
}
