//! Diacritic folding applied to names at load time and to queries at search time.
//!
//! Folding decomposes Latin letters (NFD), drops the marks attached to them
//! and rewrites the handful of Latin letters that have no canonical
//! decomposition. Other scripts are left exactly as written. Case is
//! preserved; comparisons lowercase separately.

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use super::record::FieldValue;

/// Whether `c` belongs to ASCII or one of the Latin letter blocks.
fn is_latin(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{007F}'
        | '\u{00C0}'..='\u{024F}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{AB30}'..='\u{AB6F}')
}

/// Letters and symbols NFD leaves intact but that have an obvious ASCII form.
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'ẞ' => "SS",
        'Æ' => "AE",
        'æ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'Ø' => "O",
        'ø' => "o",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Ł' => "L",
        'ł' => "l",
        'Ħ' => "H",
        'ħ' => "h",
        'Þ' => "Th",
        'þ' => "th",
        'ı' => "i",
        'º' => "o",
        'ª' => "a",
        '\u{00A0}' => " ",
        '‘' | '’' => "'",
        '“' | '”' => "\"",
        '–' | '—' => "-",
        _ => return None,
    };
    Some(folded)
}

/// Strip diacritics from Latin letters in `text`, keeping case and everything else as-is.
///
/// Marks that follow a non-Latin base (Devanagari vowel signs, for one) are
/// kept, and Hangul syllables are not split into jamo.
///
/// Total and idempotent: `fold_diacritics(&fold_diacritics(x)) == fold_diacritics(x)`.
pub fn fold_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut parts: Vec<char> = Vec::with_capacity(4);
    // Whether marks at this point attach to a folded Latin base.
    let mut after_latin = false;

    for c in text.chars() {
        if is_combining_mark(c) {
            if !after_latin {
                out.push(c);
            }
            continue;
        }

        parts.clear();
        decompose_canonical(c, |d| parts.push(d));

        if parts.first().copied().is_some_and(is_latin) {
            after_latin = true;
            for &d in parts.iter().filter(|d| !is_combining_mark(**d)) {
                push_folded(&mut out, d);
            }
        } else {
            after_latin = fold_letter(c).is_some();
            push_folded(&mut out, c);
        }
    }
    out
}

fn push_folded(out: &mut String, c: char) {
    match fold_letter(c) {
        Some(replacement) => out.push_str(replacement),
        None => out.push(c),
    }
}

/// Normalize an optional text value. Absent stays absent.
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(fold_diacritics)
}

/// Normalize a cell of any type: non-absent values are rendered to text first.
pub fn normalize_field(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Absent => None,
        FieldValue::Text(text) => Some(fold_diacritics(text)),
        other => Some(fold_diacritics(&other.to_string())),
    }
}

/// Render the tax id column, which is always a string.
///
/// Absent ids become the literal `"None"` and numeric ids their decimal text;
/// existing consumers of the export depend on both.
pub fn normalize_tax_id(value: &FieldValue) -> String {
    value.to_string()
}
