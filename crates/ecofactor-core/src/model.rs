use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EcofactorError;

/// Who owns an emission factor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorOrigin {
    /// Seeded reference data, read-only.
    System,
    /// User-owned, editable and deletable.
    Custom,
}

impl fmt::Display for FactorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorOrigin::System => write!(f, "system"),
            FactorOrigin::Custom => write!(f, "custom"),
        }
    }
}

/// Per-gas emission factors. Each gas is optional but a persisted record
/// carries at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFactors {
    #[serde(default)]
    pub co2: Option<Decimal>,
    #[serde(default)]
    pub ch4: Option<Decimal>,
    #[serde(default)]
    pub n2o: Option<Decimal>,
}

impl GasFactors {
    pub fn is_empty(&self) -> bool {
        self.co2.is_none() && self.ch4.is_none() && self.n2o.is_none()
    }
}

/// The editable content of an emission factor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorData {
    pub name: String,
    pub category: String,
    pub unit: String,
    #[serde(flatten)]
    pub factors: GasFactors,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub validity_year: Option<i32>,
}

impl FactorData {
    /// Check the invariant every persisted record must satisfy.
    pub fn check_invariants(&self) -> Result<(), EcofactorError> {
        if self.name.trim().is_empty() {
            return Err(EcofactorError::InvalidRecord("name must not be empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(EcofactorError::InvalidRecord(format!(
                "'{}': category must not be empty",
                self.name
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(EcofactorError::InvalidRecord(format!(
                "'{}': unit must not be empty",
                self.name
            )));
        }
        if self.factors.is_empty() {
            return Err(EcofactorError::InvalidRecord(format!(
                "'{}': at least one gas factor (CO2, CH4, N2O) is required",
                self.name
            )));
        }
        Ok(())
    }
}

/// A persisted emission factor catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionFactorRecord {
    pub id: String,
    pub origin: FactorOrigin,
    #[serde(flatten)]
    pub data: FactorData,
}

impl EmissionFactorRecord {
    pub fn is_editable(&self) -> bool {
        self.origin == FactorOrigin::Custom
    }
}

/// Physical state of a fuel, used to scope generic unit conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalState {
    Liquid,
    Gas,
    Solid,
}

impl fmt::Display for PhysicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalState::Liquid => write!(f, "liquid"),
            PhysicalState::Gas => write!(f, "gas"),
            PhysicalState::Solid => write!(f, "solid"),
        }
    }
}

/// Unit of a consumption quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityUnit {
    Kilogram,
    Liter,
    CubicMeter,
    /// Anything else; carried as the trimmed raw string for table lookup.
    Other(String),
}

impl ActivityUnit {
    pub fn from_str_loose(s: &str) -> ActivityUnit {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "kg" | "quilograma" | "quilogramas" | "kilogram" | "kilograms" => {
                ActivityUnit::Kilogram
            }
            "l" | "litro" | "litros" | "liter" | "liters" | "litre" | "litres" => {
                ActivityUnit::Liter
            }
            "m3" | "m³" | "metro cubico" | "metros cubicos" => ActivityUnit::CubicMeter,
            _ => ActivityUnit::Other(trimmed.to_string()),
        }
    }

    pub fn is_volume(&self) -> bool {
        matches!(self, ActivityUnit::Liter | ActivityUnit::CubicMeter)
    }

    /// Key used against the conversion-factor table.
    pub fn table_key(&self) -> String {
        match self {
            ActivityUnit::Kilogram => "kg".into(),
            ActivityUnit::Liter => "l".into(),
            ActivityUnit::CubicMeter => "m3".into(),
            ActivityUnit::Other(s) => s.to_lowercase(),
        }
    }
}

impl fmt::Display for ActivityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityUnit::Kilogram => write!(f, "kg"),
            ActivityUnit::Liter => write!(f, "L"),
            ActivityUnit::CubicMeter => write!(f, "m³"),
            ActivityUnit::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One fuel-consumption entry to convert into CO2e.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub fuel: String,
    pub quantity: Decimal,
    pub unit: String,
    #[serde(default)]
    pub sector: Option<String>,
}
