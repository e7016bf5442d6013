use ecofactor_core::catalog;
use ecofactor_core::error::EcofactorError;
use std::path::Path;

pub fn list(catalog_path: Option<&Path>) -> Result<(), EcofactorError> {
    let cat = super::load_catalog(catalog_path)?;

    println!("{} (v{})\n", cat.name, cat.version);
    if let Some(ref desc) = cat.description {
        println!("{}\n", desc);
    }

    let width = cat.fuels.iter().map(|f| f.name.chars().count()).max().unwrap_or(20);
    println!(
        "  {:<width$}  {:>8}  {:>8}  {:>7}  {:>6}  {:>6}  {:>5}  Unit",
        "Fuel",
        "NCV",
        "Density",
        "CO2",
        "CH4",
        "N2O",
        "Bio",
        width = width
    );
    for fuel in &cat.fuels {
        let density = fuel
            .density
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<width$}  {:>8}  {:>8}  {:>7}  {:>6}  {:>6}  {:>5}  {}",
            fuel.name,
            fuel.calorific_value,
            density,
            fuel.co2_factor,
            fuel.ch4_factor,
            fuel.n2o_factor,
            fuel.biogenic_fraction,
            fuel.activity_unit,
            width = width
        );
        if !fuel.sectors.is_empty() {
            println!("  {:<width$}  sectors: {}", "", fuel.sectors.join(", "), width = width);
        }
    }

    println!("\nNCV in TJ/Gg, density in kg/m³, CO2 in t/TJ, CH4 and N2O in kg/TJ.");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), EcofactorError> {
    let cat = catalog::load_catalog(file)?;
    println!(
        "Valid: {} (v{}), {} fuels, {} conversions",
        cat.name,
        cat.version,
        cat.fuels.len(),
        cat.conversions.len()
    );
    Ok(())
}
