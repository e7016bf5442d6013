pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod validate;

pub use orchestrator::{import_csv, import_file, import_rows, ImportOptions};
pub use policy::{DuplicatePolicy, Resolution};
pub use report::{DuplicateRef, ImportOutcome, ImportReport, ImportStatus};
pub use validate::{validate_row, RowValidation};
