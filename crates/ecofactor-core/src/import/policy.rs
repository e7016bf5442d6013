use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dedup::DuplicateMatch;
use crate::error::EcofactorError;
use crate::model::FactorData;

/// What to do with an incoming row that duplicates an existing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Record a duplicate outcome and persist nothing.
    #[default]
    Skip,
    /// Overwrite a custom record in place; system records get a custom copy.
    Replace,
    /// Persist the row as a new record with a dated name.
    KeepBoth,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Skip => write!(f, "skip"),
            Resolution::Replace => write!(f, "replace"),
            Resolution::KeepBoth => write!(f, "keep-both"),
        }
    }
}

impl FromStr for Resolution {
    type Err = EcofactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "skip" => Ok(Resolution::Skip),
            "replace" => Ok(Resolution::Replace),
            "keep-both" | "keepboth" => Ok(Resolution::KeepBoth),
            other => Err(EcofactorError::InvalidInput(format!(
                "unknown duplicate policy '{}' (expected skip, replace or keep-both)",
                other
            ))),
        }
    }
}

/// Decides how each duplicate found during an import is resolved.
pub trait DuplicatePolicy: Send + Sync {
    fn resolve(&self, incoming: &FactorData, existing: &DuplicateMatch) -> Resolution;
}

/// A fixed resolution applied to every duplicate.
impl DuplicatePolicy for Resolution {
    fn resolve(&self, _incoming: &FactorData, _existing: &DuplicateMatch) -> Resolution {
        *self
    }
}

/// Per-duplicate decisions, e.g. from an interactive prompt.
impl<F> DuplicatePolicy for F
where
    F: Fn(&FactorData, &DuplicateMatch) -> Resolution + Send + Sync,
{
    fn resolve(&self, incoming: &FactorData, existing: &DuplicateMatch) -> Resolution {
        self(incoming, existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::MatchKind;
    use crate::model::{EmissionFactorRecord, FactorOrigin, GasFactors};

    fn data(name: &str) -> FactorData {
        FactorData {
            name: name.into(),
            category: "Combustão Estacionária".into(),
            unit: "L".into(),
            factors: GasFactors::default(),
            source: None,
            validity_year: None,
        }
    }

    fn exact(name: &str) -> DuplicateMatch {
        DuplicateMatch {
            record: EmissionFactorRecord {
                id: "1".into(),
                origin: FactorOrigin::Custom,
                data: data(name),
            },
            kind: MatchKind::Exact,
            similarity: 1.0,
        }
    }

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("skip".parse::<Resolution>().unwrap(), Resolution::Skip);
        assert_eq!("Replace".parse::<Resolution>().unwrap(), Resolution::Replace);
        assert_eq!("keep_both".parse::<Resolution>().unwrap(), Resolution::KeepBoth);
        assert!("merge".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_default_is_skip() {
        assert_eq!(Resolution::default(), Resolution::Skip);
    }

    #[test]
    fn test_fixed_policy() {
        let policy: &dyn DuplicatePolicy = &Resolution::KeepBoth;
        assert_eq!(policy.resolve(&data("a"), &exact("a")), Resolution::KeepBoth);
    }

    #[test]
    fn test_closure_policy() {
        let policy = |_: &FactorData, m: &DuplicateMatch| match m.kind {
            MatchKind::Exact => Resolution::Replace,
            MatchKind::Fuzzy => Resolution::Skip,
        };
        assert_eq!(policy.resolve(&data("a"), &exact("a")), Resolution::Replace);
    }
}
