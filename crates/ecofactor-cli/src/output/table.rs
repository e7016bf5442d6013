use ecofactor_core::batch::{BatchRun, BatchStatus};
use ecofactor_core::calc::EmissionResult;
use ecofactor_core::import::{ImportReport, ImportStatus};
use ecofactor_core::model::ConsumptionRecord;

pub fn print_import(report: &ImportReport) {
    if report.dry_run {
        println!("=== Import (dry run, nothing written) ===\n");
    } else {
        println!("=== Import ===\n");
    }

    println!(
        "  {} rows: {} success, {} warnings, {} errors, {} duplicates",
        report.total, report.success, report.warnings, report.errors, report.duplicates
    );
    println!(
        "  {} created, {} updated, {} kept both\n",
        report.created, report.updated, report.kept_both
    );

    if !report.ignored_headers.is_empty() {
        println!("  Ignored columns: {}\n", report.ignored_headers.join(", "));
    }

    for outcome in &report.outcomes {
        let marker = match outcome.status {
            ImportStatus::Success => "ok",
            ImportStatus::Warning => "warn",
            ImportStatus::Error => "ERROR",
            ImportStatus::Duplicate => "dup",
        };
        println!("  row {:>4}  {:<5}  {}", outcome.row, marker, outcome.message);
    }
}

pub fn print_emission(record: &ConsumptionRecord, result: &EmissionResult) {
    println!("=== {} ===\n", result.fuel);

    println!("  Consumption:  {} {}", record.quantity, record.unit);
    if let Some(ref sector) = record.sector {
        println!("  Sector:       {}", sector);
    }
    println!("  Mass:         {} kg", result.mass_kg.normalize());
    println!(
        "  Energy:       {} TJ (NCV {} TJ/Gg)\n",
        result.details.energy_tj.normalize(),
        result.details.calorific_value
    );

    println!("  CO2:          {} t", result.co2);
    println!(
        "  CH4:          {} t  (x{} = {} t CO2e)",
        result.ch4, result.details.ch4_gwp, result.details.ch4_co2e
    );
    println!(
        "  N2O:          {} t  (x{} = {} t CO2e)\n",
        result.n2o, result.details.n2o_gwp, result.details.n2o_co2e
    );

    println!("  Fossil:       {} t CO2e", result.fossil_co2e);
    println!(
        "  Biogenic:     {} t CO2e  (fraction {})",
        result.biogenic_co2e, result.details.biogenic_fraction
    );
    println!("  Total:        {} t CO2e", result.total_co2e);
}

pub fn print_batch(run: &BatchRun) {
    println!("=== Batch ===\n");

    println!(
        "  {} success, {} failed, {} skipped",
        run.count(BatchStatus::Success),
        run.count(BatchStatus::Failed),
        run.count(BatchStatus::Skipped)
    );
    if run.cancelled {
        println!("  Run was cancelled before completion.");
    }
    if let Some(remaining) = run.eligible_remaining {
        println!("  Eligible records remaining: {}", remaining);
    }
    println!();

    let width = run.results.iter().map(|r| r.id.len()).max().unwrap_or(8);
    for result in &run.results {
        println!(
            "  {:<width$}  {:<7}  {}",
            result.id,
            result.status.to_string(),
            result.message,
            width = width
        );
    }
}
