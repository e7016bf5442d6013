pub mod batch;
pub mod calc;
pub mod fuels;
pub mod import;

use ecofactor_core::catalog::{self, schema::FuelCatalog};
use ecofactor_core::error::EcofactorError;
use std::path::Path;

/// The catalog at `path`, or the built-in one.
fn load_catalog(path: Option<&Path>) -> Result<FuelCatalog, EcofactorError> {
    match path {
        Some(p) => catalog::load_catalog(p),
        None => catalog::builtin::default_catalog(),
    }
}
