use super::parse_catalog_str;
use super::schema::FuelCatalog;
use crate::error::EcofactorError;

const DEFAULT_FUELS_JSON: &str = include_str!("../../../../data/fuels.json");

/// Load the embedded default fuel catalog.
///
/// Parsed and validated on every call; callers load it once and pass the
/// catalog around.
pub fn default_catalog() -> Result<FuelCatalog, EcofactorError> {
    parse_catalog_str(DEFAULT_FUELS_JSON)
}
