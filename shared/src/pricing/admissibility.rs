//! Prohibited-goods screening of content descriptions

use serde::{Deserialize, Serialize};

use super::normalize::normalize_name;

/// Fixed message returned for any prohibited content
pub const PROHIBITED_MESSAGE: &str = "We apologize, but we cannot ship this type of product. \
We do not accept liquids, food items, chemicals, cosmetics (including perfumes and deodorants), \
medicines, or branded products from companies like Nike, Adidas, Timberland, and other major brands. \
Please contact us if you have any questions about acceptable items.";

/// Category stems; a content word starting with one of these is prohibited
const PROHIBITED_CATEGORIES: &[&str] = &[
    "liquid",
    "food",
    "chemical",
    "cosmetic",
    "perfume",
    "deodorant",
    "spray",
    "beverage",
    "drink",
    "medicine",
    "medication",
    "pharmaceutical",
    "drug",
    "weapon",
    "firearm",
    "ammunition",
    "explosive",
    "live animal",
    "alcohol",
    "battery",
    "batteries",
    "powder",
    "magnet",
    "jewel",
    "tobacco",
    "brand",
    // Turkish
    "sivi",
    "gida",
    "yiyecek",
    "kimyasal",
    "kozmetik",
    "parfum",
    "ilac",
    "silah",
    "canli hayvan",
    "batarya",
    // trailing space: whole word only, "pilot" is fine
    "pil ",
    "pili ",
    "piller",
    "miknatis",
    "mucevher",
    "tutun",
    "marka",
];

/// Brand names, matched as whole words
const PROHIBITED_BRANDS: &[&str] = &[
    "nike",
    "adidas",
    "timberland",
    "puma",
    "reebok",
    "new balance",
    "under armour",
    "converse",
    "vans",
    "fila",
    "champion",
    "the north face",
    "columbia",
    "patagonia",
    "gucci",
    "prada",
    "louis vuitton",
    "chanel",
    "dior",
    "versace",
    "armani",
    "burberry",
    "balenciaga",
    "rolex",
    "apple",
    "samsung",
    "sony",
    "microsoft",
    "dell",
    "hp",
    "lenovo",
    "asus",
    "acer",
    "lg",
    "panasonic",
    "canon",
    "nikon",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProhibitionCategory {
    RestrictedGoods,
    BrandedGoods,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissibilityCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub category: Option<ProhibitionCategory>,
    pub matched_term: Option<String>,
}

impl AdmissibilityCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            category: None,
            matched_term: None,
        }
    }

    fn prohibited(category: ProhibitionCategory, term: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(PROHIBITED_MESSAGE.to_string()),
            category: Some(category),
            matched_term: Some(term.to_string()),
        }
    }
}

/// Screen a content description against the restricted category and brand lists
pub fn check_admissibility(content: &str) -> AdmissibilityCheck {
    let normalized = normalize_name(content);
    if normalized.is_empty() {
        return AdmissibilityCheck::allowed();
    }
    let padded = format!(" {} ", normalized);

    let category_hit = PROHIBITED_CATEGORIES.iter().find(|stem| {
        // word prefix: "liquids", "drinking" and "perfumes" all hit their stems
        padded.contains(&format!(" {}", stem))
    });
    if let Some(stem) = category_hit {
        return AdmissibilityCheck::prohibited(ProhibitionCategory::RestrictedGoods, stem);
    }

    let brand_hit = PROHIBITED_BRANDS
        .iter()
        .find(|brand| padded.contains(&format!(" {} ", brand)));
    if let Some(brand) = brand_hit {
        return AdmissibilityCheck::prohibited(ProhibitionCategory::BrandedGoods, brand);
    }

    AdmissibilityCheck::allowed()
}
