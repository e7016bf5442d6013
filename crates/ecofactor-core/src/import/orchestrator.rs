use chrono::NaiveDate;
use std::path::Path;

use super::policy::{DuplicatePolicy, Resolution};
use super::report::{DuplicateRef, ImportOutcome, ImportReport, ImportStatus};
use super::validate::validate_row;
use crate::dedup::{find_duplicate, DuplicateMatch, MatchKind};
use crate::error::EcofactorError;
use crate::model::{EmissionFactorRecord, FactorData, FactorOrigin};
use crate::parsing::{check_supported_path, parse_factor_csv, ImportRow};
use crate::store::FactorStore;

/// Runtime options for an import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Date used for validity-year bounds and keep-both name suffixes.
    pub today: NaiveDate,
    /// Validate and detect duplicates without writing to the store.
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            dry_run: false,
        }
    }
}

/// Import a factor file into the store.
///
/// Spreadsheet extensions are rejected before the file is touched, and an
/// unreadable or unparseable file fails the whole import before any row runs.
pub async fn import_file(
    store: &dyn FactorStore,
    path: &Path,
    policy: Option<&dyn DuplicatePolicy>,
    options: &ImportOptions,
) -> Result<ImportReport, EcofactorError> {
    check_supported_path(path)?;
    let bytes = std::fs::read(path)?;
    log::info!("importing {} ({} bytes)", path.display(), bytes.len());
    import_csv(store, &bytes, policy, options).await
}

/// Import comma-separated factor data into the store.
pub async fn import_csv(
    store: &dyn FactorStore,
    bytes: &[u8],
    policy: Option<&dyn DuplicatePolicy>,
    options: &ImportOptions,
) -> Result<ImportReport, EcofactorError> {
    let parsed = parse_factor_csv(bytes)?;
    if !parsed.ignored_headers.is_empty() {
        log::info!("ignoring unrecognized columns: {}", parsed.ignored_headers.join(", "));
    }
    let mut report = import_rows(store, &parsed.rows, policy, options).await?;
    report.ignored_headers = parsed.ignored_headers;
    Ok(report)
}

/// Validate, deduplicate and persist rows one at a time.
///
/// Each row sees the records created or updated by the rows before it.
/// Row-level failures become outcomes; only listing the existing corpus can
/// fail the whole run. Without a policy, duplicates are skipped.
pub async fn import_rows(
    store: &dyn FactorStore,
    rows: &[ImportRow],
    policy: Option<&dyn DuplicatePolicy>,
    options: &ImportOptions,
) -> Result<ImportReport, EcofactorError> {
    let corpus = store.list_existing_factors().await?;
    log::debug!("existing corpus has {} records", corpus.len());

    let mut run = ImportRun {
        store,
        options,
        corpus,
        report: ImportReport {
            dry_run: options.dry_run,
            ..Default::default()
        },
    };

    for row in rows {
        let outcome = run.process(row, policy).await;
        log::debug!("row {}: {} ({})", outcome.row, outcome.status, outcome.message);
        run.report.push(outcome);
    }

    let report = run.report;
    log::info!(
        "import finished: {} rows, {} success, {} warnings, {} errors, {} duplicates",
        report.total,
        report.success,
        report.warnings,
        report.errors,
        report.duplicates
    );
    Ok(report)
}

struct ImportRun<'a> {
    store: &'a dyn FactorStore,
    options: &'a ImportOptions,
    corpus: Vec<EmissionFactorRecord>,
    report: ImportReport,
}

impl ImportRun<'_> {
    async fn process(&mut self, row: &ImportRow, policy: Option<&dyn DuplicatePolicy>) -> ImportOutcome {
        let validation = validate_row(row, self.options.today);
        let warnings = validation.warnings;
        let Some(data) = validation.data else {
            return outcome(row.index, ImportStatus::Error, validation.errors.join("; "));
        };

        let Some(duplicate) = find_duplicate(&self.corpus, &data) else {
            let name = data.name.clone();
            return match self.create(row.index, data).await {
                Ok(record) => {
                    let status = if warnings.is_empty() {
                        ImportStatus::Success
                    } else {
                        ImportStatus::Warning
                    };
                    let message = with_warnings(format!("{} '{}'", self.verb("created"), name), &warnings);
                    ImportOutcome {
                        record_id: Some(record.id),
                        ..outcome(row.index, status, message)
                    }
                }
                Err(e) => persist_failed(row.index, &e),
            };
        };

        let resolution = policy.map_or(Resolution::Skip, |p| p.resolve(&data, &duplicate));
        let duplicate_of = Some(duplicate_ref(&duplicate));

        let result = match resolution {
            Resolution::Skip => {
                let message = format!("{}; skipped", describe(&duplicate));
                return ImportOutcome {
                    duplicate_of,
                    ..outcome(row.index, ImportStatus::Duplicate, with_warnings(message, &warnings))
                };
            }
            Resolution::Replace => self.replace(row.index, &duplicate.record, data).await,
            Resolution::KeepBoth => self.keep_both(row.index, data).await,
        };

        match result {
            Ok((record, message)) => ImportOutcome {
                record_id: Some(record.id),
                duplicate_of,
                kept_both: resolution == Resolution::KeepBoth,
                ..outcome(row.index, ImportStatus::Success, with_warnings(message, &warnings))
            },
            Err(e) => ImportOutcome {
                duplicate_of,
                ..persist_failed(row.index, &e)
            },
        }
    }

    async fn replace(
        &mut self,
        row: usize,
        existing: &EmissionFactorRecord,
        mut data: FactorData,
    ) -> Result<(EmissionFactorRecord, String), EcofactorError> {
        if existing.is_editable() {
            let record = self.update(&existing.id, data).await?;
            let message = format!("{} '{}'", self.verb("replaced"), existing.data.name);
            return Ok((record, message));
        }

        data.name = format!("{} (custom)", data.name);
        let name = data.name.clone();
        let (record, past) = self.save_copy(row, data).await?;
        let message = format!(
            "'{}' is a system record; {} custom copy '{}'",
            existing.data.name,
            self.verb(past),
            name
        );
        Ok((record, message))
    }

    async fn keep_both(
        &mut self,
        row: usize,
        mut data: FactorData,
    ) -> Result<(EmissionFactorRecord, String), EcofactorError> {
        data.name = format!("{} ({})", data.name, self.options.today.format("%Y-%m-%d"));
        let name = data.name.clone();
        let (record, past) = self.save_copy(row, data).await?;
        Ok((record, format!("kept both; {} '{}'", self.verb(past), name)))
    }

    /// Persist a renamed copy. An editable record already carrying the copy's
    /// name is updated rather than joined by another identical copy.
    async fn save_copy(
        &mut self,
        row: usize,
        data: FactorData,
    ) -> Result<(EmissionFactorRecord, &'static str), EcofactorError> {
        let earlier = find_duplicate(&self.corpus, &data)
            .filter(|m| m.kind == MatchKind::Exact && m.record.is_editable());
        match earlier {
            Some(m) => Ok((self.update(&m.record.id, data).await?, "updated")),
            None => Ok((self.create(row, data).await?, "created")),
        }
    }

    async fn create(&mut self, row: usize, data: FactorData) -> Result<EmissionFactorRecord, EcofactorError> {
        let record = if self.options.dry_run {
            data.check_invariants()?;
            EmissionFactorRecord {
                id: format!("pending-row-{}", row),
                origin: FactorOrigin::Custom,
                data,
            }
        } else {
            self.store.create_factor(data).await?
        };
        self.report.created += 1;
        self.corpus.push(record.clone());
        Ok(record)
    }

    async fn update(&mut self, id: &str, data: FactorData) -> Result<EmissionFactorRecord, EcofactorError> {
        let record = if self.options.dry_run {
            data.check_invariants()?;
            EmissionFactorRecord {
                id: id.to_string(),
                origin: FactorOrigin::Custom,
                data,
            }
        } else {
            self.store.update_factor(id, data).await?
        };
        self.report.updated += 1;
        if let Some(slot) = self.corpus.iter_mut().find(|r| r.id == record.id) {
            *slot = record.clone();
        }
        Ok(record)
    }

    fn verb(&self, past: &str) -> String {
        if self.options.dry_run {
            let present = past.strip_suffix('d').unwrap_or(past);
            format!("would {}", present)
        } else {
            past.to_string()
        }
    }
}

fn outcome(row: usize, status: ImportStatus, message: String) -> ImportOutcome {
    ImportOutcome {
        row,
        status,
        message,
        record_id: None,
        duplicate_of: None,
        kept_both: false,
    }
}

fn persist_failed(row: usize, e: &EcofactorError) -> ImportOutcome {
    log::warn!("row {}: failed to save: {}", row, e);
    outcome(row, ImportStatus::Error, format!("failed to save: {}", e))
}

fn duplicate_ref(m: &DuplicateMatch) -> DuplicateRef {
    DuplicateRef {
        id: m.record.id.clone(),
        name: m.record.data.name.clone(),
        kind: m.kind,
        similarity: m.similarity,
    }
}

fn describe(m: &DuplicateMatch) -> String {
    match m.kind {
        MatchKind::Exact => format!("duplicate of '{}'", m.record.data.name),
        MatchKind::Fuzzy => format!(
            "possible duplicate of '{}' (similarity {:.2})",
            m.record.data.name, m.similarity
        ),
    }
}

fn with_warnings(message: String, warnings: &[String]) -> String {
    if warnings.is_empty() {
        message
    } else {
        format!("{} (warnings: {})", message, warnings.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GasFactors;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    const CAT: &str = "Combustão Estacionária";

    fn options() -> ImportOptions {
        ImportOptions {
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            dry_run: false,
        }
    }

    fn row(index: usize, name: &str, unit: &str) -> ImportRow {
        ImportRow {
            index,
            name: Some(name.into()),
            category: Some(CAT.into()),
            unit: Some(unit.into()),
            co2: Some("74.1".into()),
            source: Some("X".into()),
            year: Some("2025".into()),
            ..Default::default()
        }
    }

    fn system_data(name: &str) -> FactorData {
        FactorData {
            name: name.into(),
            category: CAT.into(),
            unit: "L".into(),
            factors: GasFactors {
                co2: Some(dec!(74.1)),
                ..Default::default()
            },
            source: None,
            validity_year: None,
        }
    }

    #[tokio::test]
    async fn test_new_row_is_created() {
        let store = MemoryStore::new();
        let report = import_rows(&store, &[row(1, "Diesel", "L")], None, &options())
            .await
            .unwrap();
        assert_eq!(report.success, 1);
        assert_eq!(report.created, 1);
        let factors = store.factors().unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].origin, FactorOrigin::Custom);
        assert_eq!(report.outcomes[0].record_id.as_deref(), Some(factors[0].id.as_str()));
    }

    #[tokio::test]
    async fn test_later_rows_see_earlier_rows() {
        let store = MemoryStore::new();
        let rows = [row(1, "Diesel", "L"), row(2, "Gasolina", "L"), row(3, "diesel", "L")];
        let report = import_rows(&store, &rows, None, &options()).await.unwrap();
        assert_eq!(report.success, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.outcomes[2].status, ImportStatus::Duplicate);
        assert_eq!(store.factors().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_same_name_different_unit_is_not_duplicate() {
        let store = MemoryStore::new();
        let rows = [row(1, "Diesel", "L"), row(2, "Diesel", "kg")];
        let report = import_rows(&store, &rows, None, &options()).await.unwrap();
        assert_eq!(report.success, 2);
        assert_eq!(report.duplicates, 0);
    }

    #[tokio::test]
    async fn test_replace_custom_updates_in_place() {
        let store = MemoryStore::new();
        import_rows(&store, &[row(1, "Diesel", "L")], None, &options())
            .await
            .unwrap();

        let mut again = row(1, "Diesel", "L");
        again.co2 = Some("75,2".into());
        let policy = Resolution::Replace;
        let report = import_rows(&store, &[again], Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.updated, 1);
        let factors = store.factors().unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].data.factors.co2, Some(dec!(75.2)));
    }

    #[tokio::test]
    async fn test_replace_system_creates_custom_copy() {
        let store = MemoryStore::new();
        store.seed_system_factor(system_data("Diesel")).unwrap();

        let policy = Resolution::Replace;
        let report = import_rows(&store, &[row(1, "Diesel", "L")], Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.created, 1);
        let factors = store.factors().unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].origin, FactorOrigin::System);
        assert_eq!(factors[0].data.factors.co2, Some(dec!(74.1)));
        assert_eq!(factors[1].data.name, "Diesel (custom)");
    }

    #[tokio::test]
    async fn test_keep_both_double_counts() {
        let store = MemoryStore::new();
        import_rows(&store, &[row(1, "Diesel", "L")], None, &options())
            .await
            .unwrap();

        let policy = Resolution::KeepBoth;
        let report = import_rows(&store, &[row(1, "Diesel", "L")], Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.kept_both, 1);
        assert!(report.outcomes[0].kept_both);
        assert_eq!(store.factors().unwrap()[1].data.name, "Diesel (2025-06-01)");
    }

    #[tokio::test]
    async fn test_repeated_replace_of_system_reuses_custom_copy() {
        let store = MemoryStore::new();
        store.seed_system_factor(system_data("Diesel")).unwrap();

        let mut second = row(2, "Diesel", "L");
        second.co2 = Some("75".into());
        let policy = Resolution::Replace;
        let report = import_rows(&store, &[row(1, "Diesel", "L"), second], Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.success, 2);
        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
        assert!(report.outcomes[1].message.contains("updated custom copy"));
        let factors = store.factors().unwrap();
        let names: Vec<&str> = factors.iter().map(|f| f.data.name.as_str()).collect();
        assert_eq!(names, vec!["Diesel", "Diesel (custom)"]);
        assert_eq!(factors[0].data.factors.co2, Some(dec!(74.1)));
        assert_eq!(factors[1].data.factors.co2, Some(dec!(75)));
        assert_eq!(report.outcomes[0].record_id, report.outcomes[1].record_id);
    }

    #[tokio::test]
    async fn test_keep_both_same_day_reuses_dated_copy() {
        let store = MemoryStore::new();
        let rows = [row(1, "Diesel", "L"), row(2, "Diesel", "L"), row(3, "Diesel", "L")];
        let policy = Resolution::KeepBoth;
        let report = import_rows(&store, &rows, Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.success, 3);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.kept_both, 2);
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 1);
        let names: Vec<String> = store
            .factors()
            .unwrap()
            .into_iter()
            .map(|f| f.data.name)
            .collect();
        assert_eq!(names, vec!["Diesel", "Diesel (2025-06-01)"]);
    }

    #[tokio::test]
    async fn test_dry_run_keep_both_reports_update_of_pending_copy() {
        let store = MemoryStore::new();
        let opts = ImportOptions {
            dry_run: true,
            ..options()
        };
        let rows = [row(1, "Diesel", "L"), row(2, "Diesel", "L"), row(3, "Diesel", "L")];
        let policy = Resolution::KeepBoth;
        let report = import_rows(&store, &rows, Some(&policy), &opts).await.unwrap();

        assert!(report.outcomes[2].message.contains("would update"));
        assert_eq!(report.outcomes[2].record_id.as_deref(), Some("pending-row-2"));
        assert!(store.factors().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closure_policy_sees_match() {
        let store = MemoryStore::new();
        import_rows(&store, &[row(1, "Diesel", "L")], None, &options())
            .await
            .unwrap();

        let policy = |_: &FactorData, m: &DuplicateMatch| match m.kind {
            MatchKind::Exact => Resolution::Skip,
            MatchKind::Fuzzy => Resolution::KeepBoth,
        };
        let rows = [row(1, "Diesel", "L"), row(2, "Dieesel", "L")];
        let report = import_rows(&store, &rows, Some(&policy), &options())
            .await
            .unwrap();

        assert_eq!(report.outcomes[0].status, ImportStatus::Duplicate);
        assert!(report.outcomes[1].kept_both);
    }

    #[tokio::test]
    async fn test_warning_row_still_persists() {
        let store = MemoryStore::new();
        let mut r = row(1, "Diesel", "L");
        r.year = Some("1850".into());
        let report = import_rows(&store, &[r], None, &options()).await.unwrap();
        assert_eq!(report.warnings, 1);
        assert_eq!(report.outcomes[0].status, ImportStatus::Warning);
        assert_eq!(store.factors().unwrap()[0].data.validity_year, None);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = MemoryStore::new();
        let opts = ImportOptions {
            dry_run: true,
            ..options()
        };
        let rows = [row(1, "Diesel", "L"), row(2, "Diesel", "L")];
        let report = import_rows(&store, &rows, None, &opts).await.unwrap();
        assert!(report.dry_run);
        assert_eq!(report.success, 1);
        assert_eq!(report.duplicates, 1);
        assert!(report.outcomes[0].message.starts_with("would create"));
        assert!(store.factors().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_every_row_gets_one_outcome() {
        let store = MemoryStore::new();
        let mut no_unit = row(2, "Gasolina", "L");
        no_unit.unit = None;
        let mut bad_year = row(4, "GLP", "kg");
        bad_year.year = Some("ano".into());
        let rows = [row(1, "Diesel", "L"), no_unit, row(3, "Dieesel", "L"), bad_year];

        let report = import_rows(&store, &rows, None, &options()).await.unwrap();
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(
            report.success + report.errors + report.warnings + report.duplicates,
            rows.len()
        );
        let indexes: Vec<usize> = report.outcomes.iter().map(|o| o.row).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
    }
}
