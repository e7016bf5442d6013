use std::collections::HashMap;
use std::sync::LazyLock;

use super::normalize::normalize_header;

/// Canonical import field a CSV column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorField {
    Name,
    Category,
    Unit,
    Co2,
    Ch4,
    N2o,
    Source,
    Year,
}

static HEADER_SYNONYMS: LazyLock<HashMap<&'static str, FactorField>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("name", FactorField::Name);
    m.insert("nome", FactorField::Name);
    m.insert("fuel", FactorField::Name);
    m.insert("combustivel", FactorField::Name);
    m.insert("fator", FactorField::Name);
    m.insert("descricao", FactorField::Name);

    m.insert("category", FactorField::Category);
    m.insert("categoria", FactorField::Category);
    m.insert("tipo", FactorField::Category);

    m.insert("unit", FactorField::Unit);
    m.insert("unidade", FactorField::Unit);
    m.insert("unidade_medida", FactorField::Unit);

    m.insert("co2", FactorField::Co2);
    m.insert("co2_factor", FactorField::Co2);
    m.insert("fator_co2", FactorField::Co2);
    m.insert("fe_co2", FactorField::Co2);

    m.insert("ch4", FactorField::Ch4);
    m.insert("ch4_factor", FactorField::Ch4);
    m.insert("fator_ch4", FactorField::Ch4);
    m.insert("fe_ch4", FactorField::Ch4);

    m.insert("n2o", FactorField::N2o);
    m.insert("n2o_factor", FactorField::N2o);
    m.insert("fator_n2o", FactorField::N2o);
    m.insert("fe_n2o", FactorField::N2o);

    m.insert("source", FactorField::Source);
    m.insert("fonte", FactorField::Source);
    m.insert("referencia", FactorField::Source);

    m.insert("year", FactorField::Year);
    m.insert("validity_year", FactorField::Year);
    m.insert("ano", FactorField::Year);
    m.insert("ano_validade", FactorField::Year);
    m.insert("ano_referencia", FactorField::Year);

    m
});

/// Map one raw header cell to its canonical field, if recognized.
pub fn map_header(raw: &str) -> Option<FactorField> {
    HEADER_SYNONYMS.get(normalize_header(raw).as_str()).copied()
}

/// Column positions of recognized fields in one header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: HashMap<FactorField, usize>,
    /// Header cells that matched no field.
    pub ignored: Vec<String>,
}

impl HeaderMap {
    /// Build the map from header cells. The first column for a field wins.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> HeaderMap {
        let mut map = HeaderMap::default();
        for (idx, raw) in headers.into_iter().enumerate() {
            match map_header(raw) {
                Some(field) => {
                    map.columns.entry(field).or_insert(idx);
                }
                None => {
                    let trimmed = raw.trim();
                    if !trimmed.is_empty() {
                        map.ignored.push(trimmed.to_string());
                    }
                }
            }
        }
        map
    }

    pub fn column(&self, field: FactorField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
