/// Normalize a record or fuel name for comparison.
///
/// Lowercases, trims, and collapses internal whitespace runs to a single space.
/// Accents are kept: "Óleo" and "Oleo" are different names.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a CSV header cell to a lookup key.
///
/// Steps:
/// 1. Strip a byte-order mark and surrounding whitespace
/// 2. Lowercase and fold Portuguese accents
/// 3. Replace spaces, hyphens, dots and slashes with underscores
/// 4. Collapse multiple underscores
pub fn normalize_header(raw: &str) -> String {
    let s = raw.trim_start_matches('\u{feff}').trim().to_lowercase();

    let mut normalized = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'a'..='z' | '0'..='9' => normalized.push(c),
            'á' | 'à' | 'â' | 'ã' | 'ä' => normalized.push('a'),
            'é' | 'è' | 'ê' | 'ë' => normalized.push('e'),
            'í' | 'ì' | 'î' | 'ï' => normalized.push('i'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => normalized.push('o'),
            'ú' | 'ù' | 'û' | 'ü' => normalized.push('u'),
            'ç' => normalized.push('c'),
            '₂' => normalized.push('2'),
            '₄' => normalized.push('4'),
            _ => normalized.push('_'),
        }
    }

    let mut result = String::with_capacity(normalized.len());
    let mut prev_underscore = true; // skip leading underscores
    for c in normalized.chars() {
        if c == '_' {
            if !prev_underscore {
                result.push('_');
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }

    result
}
