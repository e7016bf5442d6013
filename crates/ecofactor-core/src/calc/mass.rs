use crate::catalog::schema::{FuelCatalog, FuelReference};
use crate::error::EcofactorError;
use crate::model::ActivityUnit;
use rust_decimal::Decimal;

const LITERS_PER_M3: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Convert a consumption quantity of the named fuel into kilograms.
pub fn normalize_mass(
    catalog: &FuelCatalog,
    fuel_name: &str,
    quantity: Decimal,
    unit: &str,
) -> Result<Decimal, EcofactorError> {
    let fuel = catalog.fuel(fuel_name)?;
    mass_for_fuel(catalog, fuel, quantity, unit)
}

/// Convert a quantity of an already-resolved fuel into kilograms.
///
/// Mass passes through, volumes use the fuel's density when it has one, and
/// everything else goes through the catalog's conversion table. Conversions
/// are best-effort: with no table entry the factor is 1. A mass outside the
/// `Decimal` range is an input error.
pub fn mass_for_fuel(
    catalog: &FuelCatalog,
    fuel: &FuelReference,
    quantity: Decimal,
    unit: &str,
) -> Result<Decimal, EcofactorError> {
    let unit = ActivityUnit::from_str_loose(unit);
    let too_large = || {
        EcofactorError::InvalidInput(format!(
            "{} {} of '{}' is too large to convert to kg",
            quantity, unit, fuel.name
        ))
    };

    if unit == ActivityUnit::Kilogram {
        return Ok(quantity);
    }

    if let Some(density) = fuel.density {
        match unit {
            ActivityUnit::Liter => {
                return quantity
                    .checked_mul(density)
                    .and_then(|v| v.checked_div(LITERS_PER_M3))
                    .ok_or_else(too_large)
            }
            ActivityUnit::CubicMeter => return quantity.checked_mul(density).ok_or_else(too_large),
            _ => {}
        }
    }

    let factor = match catalog.conversion_factor(&unit.table_key(), "kg", fuel.state) {
        Some(f) => f,
        None => {
            log::warn!(
                "no conversion from '{}' to kg for {} fuel '{}'; using factor 1",
                unit,
                fuel.state,
                fuel.name
            );
            Decimal::ONE
        }
    };
    quantity.checked_mul(factor).ok_or_else(too_large)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::ConversionFactor;
    use crate::model::PhysicalState;
    use rust_decimal_macros::dec;

    fn fuel(name: &str, state: PhysicalState, density: Option<Decimal>) -> FuelReference {
        FuelReference {
            name: name.into(),
            aliases: vec![],
            state,
            calorific_value: dec!(43.0),
            density,
            co2_factor: dec!(74.1),
            ch4_factor: dec!(3),
            n2o_factor: dec!(0.6),
            biogenic_fraction: dec!(0),
            biofuel: false,
            activity_unit: "L".into(),
            sectors: vec![],
        }
    }

    fn catalog() -> FuelCatalog {
        FuelCatalog {
            name: "Test".into(),
            description: None,
            version: "1".into(),
            fuels: vec![
                fuel("Diesel", PhysicalState::Liquid, Some(dec!(840))),
                fuel("Óleo Sem Densidade", PhysicalState::Liquid, None),
                fuel("Lenha", PhysicalState::Solid, None),
            ],
            conversions: vec![
                ConversionFactor {
                    from: "t".into(),
                    to: "kg".into(),
                    state: None,
                    factor: dec!(1000),
                },
                ConversionFactor {
                    from: "l".into(),
                    to: "kg".into(),
                    state: Some(PhysicalState::Liquid),
                    factor: dec!(0.8),
                },
            ],
        }
    }

    #[test]
    fn test_kg_passthrough() {
        let c = catalog();
        assert_eq!(normalize_mass(&c, "Diesel", dec!(123.4), "kg").unwrap(), dec!(123.4));
    }

    #[test]
    fn test_liters_use_density() {
        let c = catalog();
        // 1000 L × 840 kg/m³ / 1000 = 840 kg
        assert_eq!(normalize_mass(&c, "Diesel", dec!(1000), "L").unwrap(), dec!(840));
    }

    #[test]
    fn test_cubic_meters_use_density() {
        let c = catalog();
        assert_eq!(normalize_mass(&c, "Diesel", dec!(2), "m3").unwrap(), dec!(1680));
    }

    #[test]
    fn test_volume_without_density_uses_table() {
        let c = catalog();
        assert_eq!(
            normalize_mass(&c, "Óleo Sem Densidade", dec!(100), "litros").unwrap(),
            dec!(80.0)
        );
    }

    #[test]
    fn test_tonnes_use_table() {
        let c = catalog();
        assert_eq!(normalize_mass(&c, "Lenha", dec!(2.5), "t").unwrap(), dec!(2500.0));
    }

    #[test]
    fn test_missing_conversion_falls_back_to_one() {
        let c = catalog();
        assert_eq!(normalize_mass(&c, "Lenha", dec!(7), "saco").unwrap(), dec!(7));
    }

    #[test]
    fn test_unknown_fuel_is_error() {
        let c = catalog();
        assert!(matches!(
            normalize_mass(&c, "Querosene", dec!(1), "kg"),
            Err(EcofactorError::FuelNotFound { .. })
        ));
    }

    #[test]
    fn test_overflowing_quantity_is_error() {
        let c = catalog();
        for unit in ["L", "m3", "t"] {
            let fuel = if unit == "t" { "Lenha" } else { "Diesel" };
            assert!(matches!(
                normalize_mass(&c, fuel, Decimal::MAX / dec!(10), unit),
                Err(EcofactorError::InvalidInput(_))
            ));
        }
    }
}
