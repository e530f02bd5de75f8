//! Name normalization for destination matching
//!
//! Reference files spell countries in upper-case Turkish ("BİRLEŞİK KRALLIK"),
//! users type English, Turkish with or without diacritics, or city names. All
//! of them are reduced to lower-case ASCII words separated by single spaces
//! before any table lookup.

/// Normalize a free-text name into a lookup key
pub fn normalize_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        let folded = fold_char(c);
        if folded.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(folded);
        } else if folded.is_whitespace() || matches!(folded, '-' | '_' | '/' | ',' | ';') {
            pending_space = true;
        }
        // everything else (dots, quotes, parentheses) is dropped in place
    }

    out
}

fn fold_char(c: char) -> char {
    match c {
        'İ' | 'I' | 'ı' | 'i' | 'Í' | 'í' | 'Ì' | 'ì' | 'Î' | 'î' | 'Ï' | 'ï' => 'i',
        'Ç' | 'ç' => 'c',
        'Ğ' | 'ğ' => 'g',
        'Ş' | 'ş' | 'ß' => 's',
        'Ö' | 'ö' | 'Ó' | 'ó' | 'Ò' | 'ò' | 'Ô' | 'ô' | 'Õ' | 'õ' | 'Ø' | 'ø' => 'o',
        'Ü' | 'ü' | 'Ú' | 'ú' | 'Ù' | 'ù' | 'Û' | 'û' => 'u',
        'Á' | 'á' | 'À' | 'à' | 'Â' | 'â' | 'Ä' | 'ä' | 'Ã' | 'ã' | 'Å' | 'å' => 'a',
        'É' | 'é' | 'È' | 'è' | 'Ê' | 'ê' | 'Ë' | 'ë' => 'e',
        'Ñ' | 'ñ' => 'n',
        other => other.to_ascii_lowercase(),
    }
}
