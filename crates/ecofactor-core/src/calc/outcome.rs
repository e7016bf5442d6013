use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EcofactorError;

/// Intermediate values behind an emission result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionDetails {
    /// Energy content in TJ.
    pub energy_tj: Decimal,
    /// Calorific value used, TJ/Gg.
    pub calorific_value: Decimal,
    /// GWP applied to CH4 (27 for biofuels, 30 otherwise).
    pub ch4_gwp: Decimal,
    /// GWP applied to N2O.
    pub n2o_gwp: Decimal,
    /// CH4 contribution in t CO2e.
    pub ch4_co2e: Decimal,
    /// N2O contribution in t CO2e.
    pub n2o_co2e: Decimal,
    pub fossil_fraction: Decimal,
    pub biogenic_fraction: Decimal,
}

/// Emissions for one fuel quantity. Magnitudes are in tonnes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionResult {
    /// Catalog name of the fuel.
    pub fuel: String,
    /// Normalized mass in kg.
    pub mass_kg: Decimal,
    /// Fossil CO2 share plus CH4 and N2O contributions, t CO2e.
    pub fossil_co2e: Decimal,
    /// Biogenic CO2 share, t CO2e. Reported outside the fossil total.
    pub biogenic_co2e: Decimal,
    /// `fossil_co2e + biogenic_co2e`.
    pub total_co2e: Decimal,
    /// Raw CO2, t.
    pub co2: Decimal,
    /// Raw CH4, t.
    pub ch4: Decimal,
    /// Raw N2O, t.
    pub n2o: Decimal,
    pub details: EmissionDetails,
}

/// One line of an inventory calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// 0-based position of the consumption record.
    pub index: usize,
    pub fuel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EmissionResult>,
    /// Why this record could not be calculated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summed emissions over the successfully calculated records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionTotals {
    pub fossil_co2e: Decimal,
    pub biogenic_co2e: Decimal,
    pub total_co2e: Decimal,
    pub co2: Decimal,
    pub ch4: Decimal,
    pub n2o: Decimal,
}

impl EmissionTotals {
    /// Add one result. On overflow the totals are left unchanged.
    pub fn add(&mut self, result: &EmissionResult) -> Result<(), EcofactorError> {
        let sum = |a: Decimal, b: Decimal| {
            a.checked_add(b).ok_or_else(|| {
                EcofactorError::InvalidInput(format!(
                    "adding '{}' overflows the inventory totals",
                    result.fuel
                ))
            })
        };
        *self = EmissionTotals {
            fossil_co2e: sum(self.fossil_co2e, result.fossil_co2e)?,
            biogenic_co2e: sum(self.biogenic_co2e, result.biogenic_co2e)?,
            total_co2e: sum(self.total_co2e, result.total_co2e)?,
            co2: sum(self.co2, result.co2)?,
            ch4: sum(self.ch4, result.ch4)?,
            n2o: sum(self.n2o, result.n2o)?,
        };
        Ok(())
    }
}

/// Result of calculating a set of consumption records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResult {
    pub entries: Vec<InventoryEntry>,
    pub totals: EmissionTotals,
    pub failed: usize,
}
