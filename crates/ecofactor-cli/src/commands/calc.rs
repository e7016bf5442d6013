use ecofactor_core::calc;
use ecofactor_core::error::EcofactorError;
use ecofactor_core::model::ConsumptionRecord;
use ecofactor_core::parsing::values::parse_decimal;
use std::path::Path;

use crate::output;

pub fn run(
    fuel: &str,
    quantity: &str,
    unit: &str,
    sector: Option<String>,
    catalog_path: Option<&Path>,
    output_format: &str,
) -> Result<(), EcofactorError> {
    let catalog = super::load_catalog(catalog_path)?;
    let record = ConsumptionRecord {
        fuel: fuel.to_string(),
        quantity: parse_decimal(quantity)?,
        unit: unit.to_string(),
        sector,
    };

    let result = calc::calculate_emissions(&catalog, &record)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_emission(&record, &result),
    }

    Ok(())
}
