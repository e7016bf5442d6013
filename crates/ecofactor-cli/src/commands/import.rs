use ecofactor_core::error::EcofactorError;
use ecofactor_core::import::{self, DuplicatePolicy, ImportOptions, Resolution};
use ecofactor_core::store::MemoryStore;
use std::path::Path;

use crate::output;

pub async fn run(
    input_file: &Path,
    store_path: &Path,
    policy: Option<&str>,
    dry_run: bool,
    output_format: &str,
) -> Result<(), EcofactorError> {
    let resolution = policy.map(str::parse::<Resolution>).transpose()?;
    let store = MemoryStore::open(store_path)?;
    let options = ImportOptions {
        dry_run,
        ..Default::default()
    };

    let report = import::import_file(
        &store,
        input_file,
        resolution.as_ref().map(|r| r as &dyn DuplicatePolicy),
        &options,
    )
    .await?;

    if !dry_run {
        store.save(store_path)?;
        log::info!("store written to {}", store_path.display());
    }

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_import(&report),
    }

    Ok(())
}
