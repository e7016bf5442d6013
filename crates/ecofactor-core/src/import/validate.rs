use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{FactorData, GasFactors};
use crate::parsing::values::{parse_optional_decimal, parse_year};
use crate::parsing::ImportRow;

/// Earliest validity year accepted without a warning.
pub const MIN_VALIDITY_YEAR: i32 = 1990;

/// Outcome of validating one import row.
///
/// `data` is present exactly when `errors` is empty. Warnings never block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowValidation {
    pub data: Option<FactorData>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a raw import row into factor data.
///
/// Blocking errors: a missing name, category or unit, a non-numeric or
/// negative gas factor, or no gas factor at all. An unparseable or
/// out-of-range validity year is only a warning and the year is dropped.
pub fn validate_row(row: &ImportRow, today: NaiveDate) -> RowValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let name = required(&row.name, "name", &mut errors);
    let category = required(&row.category, "category", &mut errors);
    let unit = required(&row.unit, "unit", &mut errors);

    let before_gases = errors.len();
    let co2 = gas_factor(&row.co2, "CO2", &mut errors);
    let ch4 = gas_factor(&row.ch4, "CH4", &mut errors);
    let n2o = gas_factor(&row.n2o, "N2O", &mut errors);
    let factors = GasFactors { co2, ch4, n2o };

    if factors.is_empty() && errors.len() == before_gases {
        errors.push("at least one gas factor (CO2, CH4 or N2O) is required".into());
    }

    let validity_year = row
        .year
        .as_deref()
        .and_then(|raw| check_year(raw, today.year() + 1, &mut warnings));

    if !errors.is_empty() {
        return RowValidation {
            data: None,
            errors,
            warnings,
        };
    }

    let data = FactorData {
        name: name.unwrap_or_default(),
        category: category.unwrap_or_default(),
        unit: unit.unwrap_or_default(),
        factors,
        source: row.source.clone(),
        validity_year,
    };

    RowValidation {
        data: Some(data),
        errors,
        warnings,
    }
}

fn required(value: &Option<String>, field: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.push(format!("{} is required", field));
            None
        }
    }
}

fn gas_factor(value: &Option<String>, gas: &str, errors: &mut Vec<String>) -> Option<Decimal> {
    match parse_optional_decimal(value.as_deref()) {
        Ok(Some(v)) if v < Decimal::ZERO => {
            errors.push(format!("{} factor must not be negative (got {})", gas, v));
            None
        }
        Ok(v) => v,
        Err(_) => {
            errors.push(format!(
                "{} factor '{}' is not a number",
                gas,
                value.as_deref().unwrap_or_default()
            ));
            None
        }
    }
}

fn check_year(raw: &str, max_year: i32, warnings: &mut Vec<String>) -> Option<i32> {
    match parse_year(raw) {
        Some(year) if (MIN_VALIDITY_YEAR..=max_year).contains(&year) => Some(year),
        Some(year) => {
            warnings.push(format!(
                "validity year {} is outside {}..={}; ignored",
                year, MIN_VALIDITY_YEAR, max_year
            ));
            None
        }
        None => {
            warnings.push(format!("validity year '{}' is not a valid year; ignored", raw));
            None
        }
    }
}
