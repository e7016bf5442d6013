use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EcofactorError;
use crate::model::PhysicalState;
use crate::parsing::normalize::normalize_name;

/// A fuel reference catalog: immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelCatalog {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub fuels: Vec<FuelReference>,
    /// Generic unit conversions used when a fuel has no density.
    #[serde(default)]
    pub conversions: Vec<ConversionFactor>,
}

/// One fuel's reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelReference {
    pub name: String,
    /// Other names accepted by lookup (e.g. "diesel" for "Óleo Diesel").
    #[serde(default)]
    pub aliases: Vec<String>,
    pub state: PhysicalState,
    /// Net calorific value in TJ/Gg.
    pub calorific_value: Decimal,
    /// Density in kg/m³.
    #[serde(default)]
    pub density: Option<Decimal>,
    /// t CO2 per TJ.
    pub co2_factor: Decimal,
    /// kg CH4 per TJ.
    pub ch4_factor: Decimal,
    /// kg N2O per TJ.
    pub n2o_factor: Decimal,
    /// Share of carbon that is biologically cycled, 0..=1.
    #[serde(default)]
    pub biogenic_fraction: Decimal,
    /// Classified as a biofuel (selects the lower CH4 GWP).
    #[serde(default)]
    pub biofuel: bool,
    pub activity_unit: String,
    /// Sectors this entry is valid for. Empty means all sectors.
    #[serde(default)]
    pub sectors: Vec<String>,
}

impl FuelReference {
    /// True if `name` matches this fuel's name or one of its aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        let wanted = normalize_name(name);
        normalize_name(&self.name) == wanted
            || self.aliases.iter().any(|a| normalize_name(a) == wanted)
    }

    pub fn valid_for_sector(&self, sector: &str) -> bool {
        if self.sectors.is_empty() {
            return true;
        }
        let wanted = normalize_name(sector);
        self.sectors.iter().any(|s| normalize_name(s) == wanted)
    }
}

/// A generic conversion `from` → `to`, optionally restricted to one physical state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionFactor {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub state: Option<PhysicalState>,
    pub factor: Decimal,
}

impl FuelCatalog {
    /// Look up a fuel by name or alias (case- and space-insensitive).
    pub fn fuel(&self, name: &str) -> Result<&FuelReference, EcofactorError> {
        self.fuels
            .iter()
            .find(|f| f.matches_name(name))
            .ok_or_else(|| EcofactorError::FuelNotFound {
                name: name.trim().to_string(),
            })
    }

    /// Find the conversion factor for `(from, to, state)`.
    ///
    /// An entry for the exact state wins over a state-less one. Returns `None`
    /// when the table has no entry at all.
    pub fn conversion_factor(&self, from: &str, to: &str, state: PhysicalState) -> Option<Decimal> {
        let from = from.trim().to_lowercase();
        let to = to.trim().to_lowercase();
        let candidates = || {
            self.conversions
                .iter()
                .filter(|c| c.from.trim().to_lowercase() == from && c.to.trim().to_lowercase() == to)
        };

        candidates()
            .find(|c| c.state == Some(state))
            .or_else(|| candidates().find(|c| c.state.is_none()))
            .map(|c| c.factor)
    }
}
