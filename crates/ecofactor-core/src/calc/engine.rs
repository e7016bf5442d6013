use crate::calc::outcome::{EmissionDetails, EmissionResult};
use crate::catalog::schema::FuelReference;
use crate::error::EcofactorError;
use rust_decimal::{Decimal, RoundingStrategy};

/// kg per Gg: calorific values are expressed per gigagram.
const KG_PER_GG: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// CH4 and N2O factors are kg/TJ; CO2 is t/TJ.
const KG_PER_TONNE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// IPCC AR6, 100-year horizon.
pub const GWP_CH4_FOSSIL: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
pub const GWP_CH4_BIOGENIC: Decimal = Decimal::from_parts(27, 0, 0, false, 0);
pub const GWP_N2O: Decimal = Decimal::from_parts(273, 0, 0, false, 0);

/// Compute emissions for a mass of fuel.
///
/// `energy = mass / 1e6 × calorific_value`; CO2 = energy × co2_factor,
/// CH4/N2O = energy × factor / 1000. CH4 and N2O enter the fossil total
/// through their GWPs; CO2 is split by the fuel's biogenic fraction.
/// Values outside the `Decimal` range are rejected as invalid input.
pub fn compute(fuel: &FuelReference, mass_kg: Decimal) -> Result<EmissionResult, EcofactorError> {
    let too_large = || {
        EcofactorError::InvalidInput(format!(
            "{} kg of '{}' is too large to calculate",
            mass_kg, fuel.name
        ))
    };

    let energy_tj = (mass_kg / KG_PER_GG)
        .checked_mul(fuel.calorific_value)
        .ok_or_else(too_large)?;

    let co2 = energy_tj.checked_mul(fuel.co2_factor).ok_or_else(too_large)?;
    let ch4 = energy_tj
        .checked_mul(fuel.ch4_factor)
        .and_then(|v| v.checked_div(KG_PER_TONNE))
        .ok_or_else(too_large)?;
    let n2o = energy_tj
        .checked_mul(fuel.n2o_factor)
        .and_then(|v| v.checked_div(KG_PER_TONNE))
        .ok_or_else(too_large)?;

    let ch4_gwp = if fuel.biofuel {
        GWP_CH4_BIOGENIC
    } else {
        GWP_CH4_FOSSIL
    };
    let ch4_co2e = ch4.checked_mul(ch4_gwp).ok_or_else(too_large)?;
    let n2o_co2e = n2o.checked_mul(GWP_N2O).ok_or_else(too_large)?;

    let biogenic_fraction = fuel.biogenic_fraction;
    let fossil_fraction = Decimal::ONE - biogenic_fraction;

    let fossil = co2
        .checked_mul(fossil_fraction)
        .and_then(|v| v.checked_add(ch4_co2e))
        .and_then(|v| v.checked_add(n2o_co2e))
        .ok_or_else(too_large)?;
    let biogenic = co2.checked_mul(biogenic_fraction).ok_or_else(too_large)?;

    let fossil_co2e = round_tonnes(fossil);
    let biogenic_co2e = round_tonnes(biogenic);
    let total_co2e = fossil_co2e
        .checked_add(biogenic_co2e)
        .ok_or_else(too_large)?;

    Ok(EmissionResult {
        fuel: fuel.name.clone(),
        mass_kg,
        fossil_co2e,
        biogenic_co2e,
        total_co2e,
        co2: round_tonnes(co2),
        ch4: round_trace(ch4),
        n2o: round_trace(n2o),
        details: EmissionDetails {
            energy_tj,
            calorific_value: fuel.calorific_value,
            ch4_gwp,
            n2o_gwp: GWP_N2O,
            ch4_co2e: round_trace(ch4_co2e),
            n2o_co2e: round_trace(n2o_co2e),
            fossil_fraction,
            biogenic_fraction,
        },
    })
}

fn round_tonnes(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

fn round_trace(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero)
}
