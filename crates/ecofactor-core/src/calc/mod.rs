pub mod engine;
pub mod mass;
pub mod outcome;

pub use engine::compute;
pub use mass::normalize_mass;
pub use outcome::{EmissionDetails, EmissionResult, EmissionTotals, InventoryEntry, InventoryResult};

use crate::catalog::schema::FuelCatalog;
use crate::error::EcofactorError;
use crate::model::ConsumptionRecord;
use rust_decimal::Decimal;

/// Calculate emissions for one consumption record.
///
/// Resolves the fuel, rejects sector mismatches before any arithmetic,
/// normalizes the quantity to kg and runs the emission calculation.
pub fn calculate_emissions(
    catalog: &FuelCatalog,
    record: &ConsumptionRecord,
) -> Result<EmissionResult, EcofactorError> {
    let fuel = catalog.fuel(&record.fuel)?;

    if let Some(sector) = record.sector.as_deref().filter(|s| !s.trim().is_empty()) {
        if !fuel.valid_for_sector(sector) {
            return Err(EcofactorError::SectorMismatch {
                fuel: fuel.name.clone(),
                sector: sector.trim().to_string(),
            });
        }
    }

    if record.quantity < Decimal::ZERO {
        return Err(EcofactorError::InvalidInput(format!(
            "quantity for '{}' must not be negative (got {})",
            record.fuel, record.quantity
        )));
    }

    let mass_kg = mass::mass_for_fuel(catalog, fuel, record.quantity, &record.unit)?;
    engine::compute(fuel, mass_kg)
}

/// Calculate a set of consumption records.
///
/// Each record succeeds or fails on its own; totals cover the successful ones.
pub fn calculate_inventory(catalog: &FuelCatalog, records: &[ConsumptionRecord]) -> InventoryResult {
    let mut entries = Vec::with_capacity(records.len());
    let mut totals = EmissionTotals::default();
    let mut failed = 0;

    for (index, record) in records.iter().enumerate() {
        match calculate_emissions(catalog, record).and_then(|r| totals.add(&r).map(|_| r)) {
            Ok(result) => {
                entries.push(InventoryEntry {
                    index,
                    fuel: record.fuel.clone(),
                    result: Some(result),
                    error: None,
                });
            }
            Err(e) => {
                log::warn!("consumption record {} ({}) failed: {}", index, record.fuel, e);
                failed += 1;
                entries.push(InventoryEntry {
                    index,
                    fuel: record.fuel.clone(),
                    result: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    InventoryResult {
        entries,
        totals,
        failed,
    }
}
