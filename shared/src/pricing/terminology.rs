//! Recognition of generic cargo terms ("FAK", "general cargo", "documents")

use serde::{Deserialize, Serialize};

use super::normalize::normalize_name;
use crate::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoCategory {
    GeneralCargo,
    Documents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyMatch {
    pub category: CargoCategory,
    pub matched_term: String,
}

/// Normalized terms, checked in order
const CARGO_TERMS: &[(&str, CargoCategory)] = &[
    ("freight all kinds", CargoCategory::GeneralCargo),
    ("general cargo", CargoCategory::GeneralCargo),
    ("mixed cargo", CargoCategory::GeneralCargo),
    ("various products", CargoCategory::GeneralCargo),
    ("miscellaneous goods", CargoCategory::GeneralCargo),
    ("assorted items", CargoCategory::GeneralCargo),
    ("fak", CargoCategory::GeneralCargo),
    ("genel kargo", CargoCategory::GeneralCargo),
    ("cesitli urunler", CargoCategory::GeneralCargo),
    ("karisik kargo", CargoCategory::GeneralCargo),
    ("documents", CargoCategory::Documents),
    ("docs", CargoCategory::Documents),
    ("papers", CargoCategory::Documents),
    ("evrak", CargoCategory::Documents),
    ("dokuman", CargoCategory::Documents),
    ("belgeler", CargoCategory::Documents),
];

/// Identify a generic cargo term in a content description
pub fn identify_cargo_category(content: &str) -> Option<TerminologyMatch> {
    let padded = format!(" {} ", normalize_name(content));

    CARGO_TERMS
        .iter()
        .find(|(term, _)| padded.contains(&format!(" {} ", term)))
        .map(|(term, category)| TerminologyMatch {
            category: *category,
            matched_term: term.to_string(),
        })
}

/// Reply shown when content alone was given
pub fn content_approval_message(matched: Option<&TerminologyMatch>, language: Language) -> String {
    let ask_more = match language {
        Language::En => "Please provide the destination country and weight to calculate pricing.",
        Language::Tr => "Fiyat hesaplamak için lütfen varış ülkesini ve ağırlığı belirtin.",
    };

    let lead = match (matched, language) {
        (Some(m), Language::En) if m.category == CargoCategory::GeneralCargo => format!(
            "I understand you want to ship \"{}\" (general cargo). This covers various non-prohibited products.",
            m.matched_term
        ),
        (Some(m), Language::Tr) if m.category == CargoCategory::GeneralCargo => format!(
            "\"{}\" (genel kargo) göndermek istediğinizi anlıyorum. Bu, yasaklı olmayan çeşitli ürünleri kapsar.",
            m.matched_term
        ),
        (Some(_), Language::En) => {
            "I see you're shipping documents. Documents have simplified shipping requirements.".to_string()
        }
        (Some(_), Language::Tr) => {
            "Evrak gönderdiğinizi görüyorum. Evrakların basitleştirilmiş gönderim gereksinimleri vardır.".to_string()
        }
        (None, Language::En) => "This item can be shipped.".to_string(),
        (None, Language::Tr) => "Bu ürün gönderilebilir.".to_string(),
    };

    format!("{} {}", lead, ask_more)
}
