//! View derivation: search filter + sort over the base records

use std::cmp::Ordering;

use crate::state::{DisplayRecord, SortKey};

/// Build the visible list. The base records are never touched; the result is
/// a filtered, stably sorted copy.
pub fn derive_view(records: &[DisplayRecord], search_term: &str, sort_key: SortKey) -> Vec<DisplayRecord> {
    let mut visible: Vec<DisplayRecord> = records
        .iter()
        .filter(|record| matches_search(record, search_term))
        .cloned()
        .collect();
    sort_records(&mut visible, sort_key);
    visible
}

/// Name contains the term case-insensitively, or the decimal id contains it literally
pub fn matches_search(record: &DisplayRecord, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    record
        .name
        .to_lowercase()
        .contains(&search_term.to_lowercase())
        || record.id.to_string().contains(search_term)
}

pub fn sort_records(records: &mut [DisplayRecord], sort_key: SortKey) {
    match sort_key {
        SortKey::Id => records.sort_by_key(|record| record.id),
        SortKey::Name => records.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
    }
}

/// Collation close to an English locale compare. Names are compared on base
/// letters first (punctuation before digits before letters), then accents,
/// then case (lowercase first), then code points.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(fold_char)
        .map(primary_weight)
        .cmp(b.chars().flat_map(fold_char).map(primary_weight));
    primary
        .then_with(|| a.chars().map(accent_weight).cmp(b.chars().map(accent_weight)))
        .then_with(|| a.chars().map(case_weight).cmp(b.chars().map(case_weight)))
        .then_with(|| a.cmp(b))
}

/// Punctuation in collation order; anything unlisted sorts after it by code point.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn primary_weight(ch: char) -> (u8, u32) {
    if ch.is_whitespace() {
        (0, ch as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.chars().position(|p| p == ch) {
        (1, rank as u32)
    } else if ch.is_ascii_punctuation() {
        (1, PUNCTUATION_ORDER.len() as u32 + ch as u32)
    } else if ch.is_numeric() {
        (2, ch as u32)
    } else {
        (3, ch as u32)
    }
}

fn fold_char(ch: char) -> std::char::ToLowercase {
    strip_accent(ch).to_lowercase()
}

fn accent_weight(ch: char) -> u8 {
    if strip_accent(ch) == ch {
        0
    } else {
        1
    }
}

fn case_weight(ch: char) -> u8 {
    if ch.is_uppercase() {
        1
    } else {
        0
    }
}

fn strip_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        _ => ch,
    }
}

/// `7` -> `#007`; ids past 999 are printed in full
pub fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}

/// File name of the sprite image, or a placeholder
pub fn sprite_label(sprite: Option<&str>) -> String {
    match sprite {
        Some(url) => url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(url)
            .to_string(),
        None => "no sprite".to_string(),
    }
}
