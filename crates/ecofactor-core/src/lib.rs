pub mod batch;
pub mod calc;
pub mod catalog;
pub mod dedup;
pub mod error;
pub mod import;
pub mod model;
pub mod parsing;
pub mod store;

pub use batch::{BatchManager, BatchOptions, BatchResult, BatchStatus, CatalogInserter};
pub use calc::{calculate_emissions, calculate_inventory, EmissionResult, InventoryResult};
pub use catalog::builtin::default_catalog;
pub use catalog::schema::FuelCatalog;
pub use dedup::{find_duplicate, similarity};
pub use error::EcofactorError;
pub use import::{import_file, import_rows, ImportOptions, ImportReport, Resolution};
pub use store::{BatchStore, FactorStore, MemoryStore};
