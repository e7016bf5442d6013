use async_trait::async_trait;

use super::{BatchProcessor, DedupOptions, MergeStrategy, Processed};
use crate::dedup::similarity;
use crate::error::EcofactorError;
use crate::model::{EmissionFactorRecord, FactorData, GasFactors};
use crate::parsing::normalize::normalize_name;
use crate::store::{BatchRecord, FactorStore};

/// Inserts approved candidates into the factor catalog as custom records.
///
/// With deduplication enabled, a candidate whose name is at least
/// `similarity_threshold` similar to an editable record of the same category
/// and unit is merged into that record instead of creating a new one.
pub struct CatalogInserter<'a> {
    store: &'a dyn FactorStore,
}

impl<'a> CatalogInserter<'a> {
    pub fn new(store: &'a dyn FactorStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchProcessor for CatalogInserter<'_> {
    async fn process(
        &self,
        record: &BatchRecord,
        dedup: Option<&DedupOptions>,
    ) -> Result<Processed, EcofactorError> {
        if let Some(opts) = dedup {
            let existing = self.store.list_existing_factors().await?;
            if let Some(target) = merge_target(&existing, &record.data, opts.similarity_threshold) {
                let merged = merge(&target.data, &record.data, opts.strategy);
                let updated = self.store.update_factor(&target.id, merged).await?;
                log::debug!("candidate {} merged into {}", record.id, updated.id);
                return Ok(Processed {
                    factor_id: updated.id.clone(),
                    merged_into: Some(updated.id),
                });
            }
        }

        let created = self.store.create_factor(record.data.clone()).await?;
        Ok(Processed {
            factor_id: created.id,
            merged_into: None,
        })
    }
}

/// Most similar editable record in the same category and unit.
fn merge_target<'r>(
    existing: &'r [EmissionFactorRecord],
    candidate: &FactorData,
    threshold: f64,
) -> Option<&'r EmissionFactorRecord> {
    let wanted = normalize_name(&candidate.name);
    existing
        .iter()
        .filter(|r| r.is_editable())
        .filter(|r| {
            r.data.category.trim() == candidate.category.trim()
                && r.data.unit.trim() == candidate.unit.trim()
        })
        .map(|r| (r, similarity(&normalize_name(&r.data.name), &wanted)))
        .filter(|(_, score)| *score >= threshold)
        .fold(None, |best: Option<(&EmissionFactorRecord, f64)>, (r, score)| match best {
            Some((_, s)) if s >= score => best,
            _ => Some((r, score)),
        })
        .map(|(r, _)| r)
}

fn merge(existing: &FactorData, incoming: &FactorData, strategy: MergeStrategy) -> FactorData {
    match strategy {
        MergeStrategy::PreferNonEmpty => FactorData {
            name: existing.name.clone(),
            category: existing.category.clone(),
            unit: existing.unit.clone(),
            factors: GasFactors {
                co2: incoming.factors.co2.or(existing.factors.co2),
                ch4: incoming.factors.ch4.or(existing.factors.ch4),
                n2o: incoming.factors.n2o.or(existing.factors.n2o),
            },
            source: non_empty(&incoming.source).or_else(|| non_empty(&existing.source)),
            validity_year: incoming.validity_year.or(existing.validity_year),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn data(name: &str, co2: Option<rust_decimal::Decimal>, ch4: Option<rust_decimal::Decimal>) -> FactorData {
        FactorData {
            name: name.into(),
            category: "Combustão Estacionária".into(),
            unit: "L".into(),
            factors: GasFactors { co2, ch4, n2o: None },
            source: None,
            validity_year: None,
        }
    }

    fn candidate(name: &str, co2: Option<rust_decimal::Decimal>, ch4: Option<rust_decimal::Decimal>) -> BatchRecord {
        BatchRecord {
            id: "c1".into(),
            data: data(name, co2, ch4),
            confidence_score: 0.95,
            decision: None,
        }
    }

    #[tokio::test]
    async fn test_creates_without_dedup() {
        let store = MemoryStore::new();
        store.create_factor(data("Diesel", Some(dec!(74.1)), None)).await.unwrap();
        let inserter = CatalogInserter::new(&store);

        let p = inserter
            .process(&candidate("Diesel", None, Some(dec!(3))), None)
            .await
            .unwrap();

        assert!(p.merged_into.is_none());
        assert_eq!(store.factors().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_merge_prefers_non_empty() {
        let store = MemoryStore::new();
        let mut existing = data("Óleo Diesel", Some(dec!(74.1)), None);
        existing.source = Some("IPCC 2006".into());
        let target = store.create_factor(existing).await.unwrap();
        let inserter = CatalogInserter::new(&store);

        let p = inserter
            .process(
                &candidate("oleo diesel", None, Some(dec!(3))),
                Some(&DedupOptions {
                    similarity_threshold: 0.9,
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        assert_eq!(p.merged_into.as_deref(), Some(target.id.as_str()));
        let factors = store.factors().unwrap();
        assert_eq!(factors.len(), 1);
        let merged = &factors[0].data;
        assert_eq!(merged.name, "Óleo Diesel");
        assert_eq!(merged.factors.co2, Some(dec!(74.1)));
        assert_eq!(merged.factors.ch4, Some(dec!(3)));
        assert_eq!(merged.source.as_deref(), Some("IPCC 2006"));
    }

    #[tokio::test]
    async fn test_system_records_are_never_merge_targets() {
        let store = MemoryStore::new();
        store
            .seed_system_factor(data("Diesel", Some(dec!(74.1)), None))
            .unwrap();
        let inserter = CatalogInserter::new(&store);

        let p = inserter
            .process(&candidate("Diesel", Some(dec!(75)), None), Some(&DedupOptions::default()))
            .await
            .unwrap();

        assert!(p.merged_into.is_none());
        assert_eq!(store.factors().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_below_threshold_creates() {
        let store = MemoryStore::new();
        store.create_factor(data("Diesel", Some(dec!(74.1)), None)).await.unwrap();
        let inserter = CatalogInserter::new(&store);

        let p = inserter
            .process(&candidate("Dieesel", Some(dec!(75)), None), Some(&DedupOptions::default()))
            .await
            .unwrap();

        // 6/7 is under the default 0.9
        assert!(p.merged_into.is_none());
    }
}
