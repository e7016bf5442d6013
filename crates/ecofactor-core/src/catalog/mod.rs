pub mod builtin;
pub mod schema;

use crate::error::EcofactorError;
use rust_decimal::Decimal;
use schema::FuelCatalog;
use std::collections::HashSet;
use std::path::Path;

use crate::parsing::normalize::normalize_name;

/// Load a fuel catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<FuelCatalog, EcofactorError> {
    let content = std::fs::read_to_string(path).map_err(|e| EcofactorError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a fuel catalog from a JSON string.
pub fn parse_catalog(json: &str, source: &Path) -> Result<FuelCatalog, EcofactorError> {
    let catalog: FuelCatalog =
        serde_json::from_str(json).map_err(|e| EcofactorError::CatalogLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse a fuel catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<FuelCatalog, EcofactorError> {
    let catalog: FuelCatalog = serde_json::from_str(json).map_err(EcofactorError::Json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate that a catalog is well-formed.
pub fn validate_catalog(catalog: &FuelCatalog) -> Result<(), EcofactorError> {
    if catalog.fuels.is_empty() {
        return Err(EcofactorError::CatalogInvalid(
            "fuels must not be empty".into(),
        ));
    }

    let mut seen_names = HashSet::new();

    for fuel in &catalog.fuels {
        if fuel.name.trim().is_empty() {
            return Err(EcofactorError::CatalogInvalid(
                "fuel name must not be empty".into(),
            ));
        }

        for name in std::iter::once(&fuel.name).chain(fuel.aliases.iter()) {
            if !seen_names.insert(normalize_name(name)) {
                return Err(EcofactorError::CatalogInvalid(format!(
                    "name or alias '{}' is used more than once",
                    name
                )));
            }
        }

        if fuel.calorific_value <= Decimal::ZERO {
            return Err(EcofactorError::CatalogInvalid(format!(
                "fuel '{}' must have a positive calorific value",
                fuel.name
            )));
        }

        if let Some(density) = fuel.density {
            if density <= Decimal::ZERO {
                return Err(EcofactorError::CatalogInvalid(format!(
                    "fuel '{}' has non-positive density {}",
                    fuel.name, density
                )));
            }
        }

        for (gas, factor) in [
            ("co2_factor", fuel.co2_factor),
            ("ch4_factor", fuel.ch4_factor),
            ("n2o_factor", fuel.n2o_factor),
        ] {
            if factor < Decimal::ZERO {
                return Err(EcofactorError::CatalogInvalid(format!(
                    "fuel '{}' has negative {}",
                    fuel.name, gas
                )));
            }
        }

        if fuel.biogenic_fraction < Decimal::ZERO || fuel.biogenic_fraction > Decimal::ONE {
            return Err(EcofactorError::CatalogInvalid(format!(
                "fuel '{}' has biogenic fraction {} outside 0..=1",
                fuel.name, fuel.biogenic_fraction
            )));
        }

        if fuel.activity_unit.trim().is_empty() {
            return Err(EcofactorError::CatalogInvalid(format!(
                "fuel '{}' has no activity unit",
                fuel.name
            )));
        }
    }

    for conversion in &catalog.conversions {
        if conversion.factor <= Decimal::ZERO {
            return Err(EcofactorError::CatalogInvalid(format!(
                "conversion {} -> {} must have a positive factor",
                conversion.from, conversion.to
            )));
        }
    }

    Ok(())
}
