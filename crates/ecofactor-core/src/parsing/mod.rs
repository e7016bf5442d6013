pub mod header;
pub mod normalize;
pub mod values;

use crate::error::EcofactorError;
use header::{FactorField, HeaderMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spreadsheet extensions that are recognized but deliberately not parsed.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// One line of an uploaded factor file, with raw (trimmed, non-empty) cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based position of the data record in the file, header excluded.
    /// Blank records are counted even though they produce no row.
    pub index: usize,
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub co2: Option<String>,
    pub ch4: Option<String>,
    pub n2o: Option<String>,
    pub source: Option<String>,
    pub year: Option<String>,
}

/// Result of parsing a factor file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRows {
    pub rows: Vec<ImportRow>,
    /// Header cells that matched no known field.
    pub ignored_headers: Vec<String>,
}

/// Reject spreadsheet formats by file extension.
pub fn check_supported_path(path: &Path) -> Result<(), EcofactorError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        return Err(EcofactorError::UnsupportedFormat(format!(
            "'.{}' spreadsheets are not supported",
            ext
        )));
    }
    Ok(())
}

/// Reject binary spreadsheet content (zip-based or OLE2 workbooks).
pub fn check_supported_bytes(bytes: &[u8]) -> Result<(), EcofactorError> {
    const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
    const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        return Err(EcofactorError::UnsupportedFormat(
            "binary workbook content".into(),
        ));
    }
    Ok(())
}

/// Parse comma-separated factor data into import rows.
///
/// The header row is mapped through the synonym table; unrecognized columns
/// are ignored. A header with semicolons and no commas switches the delimiter
/// to `;`. Blank lines produce no rows.
pub fn parse_factor_csv(bytes: &[u8]) -> Result<ParsedRows, EcofactorError> {
    check_supported_bytes(bytes)?;

    let delimiter = detect_delimiter(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(EcofactorError::ParseError(
            "file has no header row".into(),
        ));
    }

    let header_map = HeaderMap::from_headers(headers.iter().map(String::as_str));
    if header_map.is_empty() {
        return Err(EcofactorError::ParseError(format!(
            "no recognized columns in header: {}",
            headers.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (position, result) in reader.byte_records().enumerate() {
        let record = result?;
        let cell = |field: FactorField| -> Option<String> {
            let idx = header_map.column(field)?;
            let raw = record.get(idx)?;
            let text = String::from_utf8_lossy(raw);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let row = ImportRow {
            index: position + 1,
            name: cell(FactorField::Name),
            category: cell(FactorField::Category),
            unit: cell(FactorField::Unit),
            co2: cell(FactorField::Co2),
            ch4: cell(FactorField::Ch4),
            n2o: cell(FactorField::N2o),
            source: cell(FactorField::Source),
            year: cell(FactorField::Year),
        };

        if is_blank(&row) && record.iter().all(|c| c.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        rows.push(row);
    }

    Ok(ParsedRows {
        rows,
        ignored_headers: header_map.ignored,
    })
}

/// Pick `;` when the first line has semicolons but no commas.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let has_comma = first_line.contains(&b',');
    let has_semicolon = first_line.contains(&b';');
    if has_semicolon && !has_comma {
        b';'
    } else {
        b','
    }
}

fn is_blank(row: &ImportRow) -> bool {
    row.name.is_none()
        && row.category.is_none()
        && row.unit.is_none()
        && row.co2.is_none()
        && row.ch4.is_none()
        && row.n2o.is_none()
        && row.source.is_none()
        && row.year.is_none()
}
