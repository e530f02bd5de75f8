//! Destination resolution: free text to a carrier's pricing region

use std::fmt;

use serde::{Deserialize, Serialize};

use super::carrier::{Carrier, TableShape};
use super::error::PricingError;
use super::normalize::normalize_name;
use super::reference::RateTable;

/// How sure the resolver is about a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationResolution {
    /// Normalized key of the matched entry in the carrier's table
    pub canonical_country: String,
    pub is_city_alias: bool,
    pub original_city_name: Option<String>,
    pub confidence: Confidence,
}

/// Where a destination sits in a carrier's rate table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PricingRegion {
    Zone(u8),
    Country(String),
}

impl fmt::Display for PricingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingRegion::Zone(zone) => write!(f, "{}", zone),
            PricingRegion::Country(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDestination {
    pub resolution: DestinationResolution,
    pub region: PricingRegion,
}

// ============================================================================
// Alias tables (normalized keys)
// ============================================================================

/// City → English country name
const CITY_ALIASES: &[(&str, &str)] = &[
    ("london", "united kingdom"),
    ("manchester", "united kingdom"),
    ("paris", "france"),
    ("berlin", "germany"),
    ("munich", "germany"),
    ("hamburg", "germany"),
    ("frankfurt", "germany"),
    ("madrid", "spain"),
    ("barcelona", "spain"),
    ("rome", "italy"),
    ("milan", "italy"),
    ("amsterdam", "netherlands"),
    ("rotterdam", "netherlands"),
    ("brussels", "belgium"),
    ("vienna", "austria"),
    ("zurich", "switzerland"),
    ("geneva", "switzerland"),
    ("stockholm", "sweden"),
    ("oslo", "norway"),
    ("copenhagen", "denmark"),
    ("athens", "greece"),
    ("sofia", "bulgaria"),
    ("bucharest", "romania"),
    ("warsaw", "poland"),
    ("prague", "czech republic"),
    ("budapest", "hungary"),
    ("lisbon", "portugal"),
    ("dublin", "ireland"),
    ("tokyo", "japan"),
    ("osaka", "japan"),
    ("beijing", "china"),
    ("shanghai", "china"),
    ("singapore", "singapore"),
    ("bangkok", "thailand"),
    ("jakarta", "indonesia"),
    ("manila", "philippines"),
    ("kuala lumpur", "malaysia"),
    ("seoul", "south korea"),
    ("mumbai", "india"),
    ("new delhi", "india"),
    ("istanbul", "turkey"),
    ("ankara", "turkey"),
    ("dubai", "united arab emirates"),
    ("abu dhabi", "united arab emirates"),
    ("sharjah", "united arab emirates"),
    ("riyadh", "saudi arabia"),
    ("jeddah", "saudi arabia"),
    ("doha", "qatar"),
    ("kuwait city", "kuwait"),
    ("manama", "bahrain"),
    ("muscat", "oman"),
    ("amman", "jordan"),
    ("beirut", "lebanon"),
    ("cairo", "egypt"),
    ("tel aviv", "israel"),
    ("new york", "united states"),
    ("los angeles", "united states"),
    ("chicago", "united states"),
    ("houston", "united states"),
    ("miami", "united states"),
    ("toronto", "canada"),
    ("montreal", "canada"),
    ("vancouver", "canada"),
    ("mexico city", "mexico"),
    ("sao paulo", "brazil"),
    ("rio de janeiro", "brazil"),
    ("buenos aires", "argentina"),
    ("santiago", "chile"),
    ("bogota", "colombia"),
    ("lima", "peru"),
    ("sydney", "australia"),
    ("melbourne", "australia"),
    ("auckland", "new zealand"),
    ("johannesburg", "south africa"),
    ("cape town", "south africa"),
    ("lagos", "nigeria"),
    ("nairobi", "kenya"),
    ("casablanca", "morocco"),
];

const UAE_NAMES: &[&str] = &[
    "united arab emirates",
    "uae",
    "dubai",
    "abu dhabi",
    "sharjah",
    "emirates",
    "emirate",
    "dxb",
];

/// English (and common variants) → Turkish keys used by region-based carriers.
/// Candidates are tried in order; carriers spell some countries differently.
const TURKISH_NAMES: &[(&str, &[&str])] = &[
    ("austria", &["avusturya"]),
    ("belgium", &["belcika"]),
    ("bulgaria", &["bulgaristan"]),
    ("switzerland", &["isvicre"]),
    ("denmark", &["danimarka"]),
    ("spain", &["ispanya"]),
    ("france", &["fransa"]),
    ("united kingdom", &["birlesik krallik", "ingiltere"]),
    ("uk", &["birlesik krallik", "ingiltere"]),
    ("great britain", &["birlesik krallik", "ingiltere"]),
    ("england", &["ingiltere", "birlesik krallik"]),
    ("greece", &["yunanistan"]),
    ("ireland", &["irlanda"]),
    ("italy", &["italya"]),
    ("germany", &["almanya"]),
    ("netherlands", &["hollanda"]),
    ("holland", &["hollanda"]),
    ("the netherlands", &["hollanda"]),
    ("luxembourg", &["luksemburg"]),
    ("monaco", &["monako"]),
    ("vatican", &["vatikan"]),
    ("czech republic", &["cek cumhuriyeti", "cekya"]),
    ("czechia", &["cekya", "cek cumhuriyeti"]),
    ("finland", &["finlandiya"]),
    ("hungary", &["macaristan"]),
    ("norway", &["norvec"]),
    ("poland", &["polonya"]),
    ("portugal", &["portekiz"]),
    ("romania", &["romanya"]),
    ("sweden", &["isvec"]),
    ("slovenia", &["slovenya"]),
    ("slovakia", &["slovakya"]),
    ("croatia", &["hirvatistan"]),
    ("lithuania", &["litvanya"]),
    ("latvia", &["letonya"]),
    ("estonia", &["estonya"]),
    ("serbia", &["sirbistan"]),
    ("saudi arabia", &["suudi arabistan"]),
    ("qatar", &["katar"]),
    ("kuwait", &["kuveyt"]),
    ("bahrain", &["bahreyn"]),
    ("oman", &["umman"]),
    ("israel", &["israil"]),
    ("jordan", &["urdun"]),
    ("lebanon", &["lubnan"]),
    ("egypt", &["misir"]),
    ("united states", &["abd", "amerika birlesik devletleri"]),
    ("united states of america", &["abd", "amerika birlesik devletleri"]),
    ("usa", &["abd", "amerika birlesik devletleri"]),
    ("us", &["abd", "amerika birlesik devletleri"]),
    ("america", &["abd", "amerika birlesik devletleri"]),
    ("canada", &["kanada"]),
    ("mexico", &["meksika"]),
    ("china", &["cin"]),
    ("japan", &["japonya"]),
    ("south korea", &["guney kore", "kore"]),
    ("korea", &["guney kore", "kore"]),
    ("hong kong", &["hong kong"]),
    ("singapore", &["singapur"]),
    ("taiwan", &["tayvan"]),
    ("australia", &["avustralya"]),
    ("new zealand", &["yeni zelanda"]),
    ("india", &["hindistan"]),
    ("thailand", &["tayland"]),
    ("indonesia", &["endonezya"]),
    ("philippines", &["filipinler"]),
    ("malaysia", &["malezya"]),
    ("brazil", &["brezilya"]),
    ("argentina", &["arjantin"]),
    ("chile", &["sili"]),
    ("colombia", &["kolombiya"]),
    ("peru", &["peru"]),
    ("south africa", &["guney afrika"]),
    ("nigeria", &["nijerya"]),
    ("kenya", &["kenya"]),
    ("morocco", &["fas"]),
    ("algeria", &["cezayir"]),
    ("tunisia", &["tunus"]),
];

const TURKISH_UAE_KEYS: &[&str] = &["birlesik arap emirlikleri", "bae"];

/// English and Turkish names → keys of the flat-rate table
const ARAMEX_NAMES: &[(&str, &str)] = &[
    ("saudi arabia", "saudi arabia"),
    ("ksa", "saudi arabia"),
    ("suudi arabistan", "saudi arabia"),
    ("qatar", "qatar"),
    ("katar", "qatar"),
    ("kuwait", "kuwait"),
    ("kuveyt", "kuwait"),
    ("bahrain", "bahrain"),
    ("bahreyn", "bahrain"),
    ("oman", "oman"),
    ("umman", "oman"),
    ("jordan", "jordan"),
    ("urdun", "jordan"),
    ("lebanon", "lebanon"),
    ("lubnan", "lebanon"),
    ("egypt", "egypt"),
    ("misir", "egypt"),
    ("birlesik arap emirlikleri", "uae"),
    ("bae", "uae"),
];

fn city_country(normalized: &str) -> Option<&'static str> {
    CITY_ALIASES
        .iter()
        .find(|(city, _)| *city == normalized)
        .map(|(_, country)| *country)
}

fn translation_candidates(shape: TableShape, name: &str) -> Vec<&'static str> {
    let is_uae = UAE_NAMES.contains(&name) || TURKISH_UAE_KEYS.contains(&name);
    match shape {
        TableShape::RegionBased => {
            if is_uae {
                return TURKISH_UAE_KEYS.to_vec();
            }
            TURKISH_NAMES
                .iter()
                .find(|(english, _)| *english == name)
                .map(|(_, keys)| keys.to_vec())
                .unwrap_or_default()
        }
        TableShape::CountryBased => {
            if is_uae {
                return vec!["uae"];
            }
            ARAMEX_NAMES
                .iter()
                .filter(|(alias, _)| *alias == name)
                .map(|(_, key)| *key)
                .collect()
        }
    }
}

// ============================================================================
// Fuzzy matching
// ============================================================================

/// Last-resort matching of a normalized name against table keys
pub trait FuzzyMatcher: Send + Sync {
    fn best_match(&self, input: &str, keys: &[&str]) -> Option<(String, Confidence)>;
}

/// Plain substring containment in either direction, plus the emirates heuristic.
///
/// Suffixed Turkish forms ("almanyada") and prefixes ("Ita") both match.
/// Ties prefer higher confidence, then the longer key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentMatcher;

impl ContainmentMatcher {
    fn score(input: &str, key: &str) -> Option<Confidence> {
        if input.contains(key) || key.contains(input) {
            return Some(Confidence::Medium);
        }
        emirates_score(input, key)
    }
}

impl FuzzyMatcher for ContainmentMatcher {
    fn best_match(&self, input: &str, keys: &[&str]) -> Option<(String, Confidence)> {
        pick_best(keys, |key| Self::score(input, key))
    }
}

/// Stricter containment: a key must appear as whole words in the input, and
/// the input must be at least four characters to match inside a key.
///
/// Opt in with [`DestinationResolver::with_matcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBoundedMatcher;

impl WordBoundedMatcher {
    /// Inputs shorter than this never match as a substring of a key
    const MIN_INPUT_LEN: usize = 4;
    const MIN_KEY_LEN: usize = 3;

    fn score(input: &str, key: &str) -> Option<Confidence> {
        let key_in_input = key.len() >= Self::MIN_KEY_LEN
            && format!(" {} ", input).contains(&format!(" {} ", key));
        let input_in_key = input.len() >= Self::MIN_INPUT_LEN && key.contains(input);

        if key_in_input || input_in_key {
            return Some(Confidence::Medium);
        }
        emirates_score(input, key)
    }
}

impl FuzzyMatcher for WordBoundedMatcher {
    fn best_match(&self, input: &str, keys: &[&str]) -> Option<(String, Confidence)> {
        pick_best(keys, |key| Self::score(input, key))
    }
}

fn emirates_score(input: &str, key: &str) -> Option<Confidence> {
    let mentions_emirates = ["emirat", "uae", "dubai"].iter().any(|t| input.contains(t));
    let key_is_emirates = ["emirlik", "arap"].iter().any(|t| key.contains(t));
    (mentions_emirates && key_is_emirates).then_some(Confidence::Low)
}

fn pick_best(keys: &[&str], score: impl Fn(&str) -> Option<Confidence>) -> Option<(String, Confidence)> {
    let mut best: Option<(&str, Confidence)> = None;

    for &key in keys {
        let Some(confidence) = score(key) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_key, best_conf)) => (confidence, key.len()) > (best_conf, best_key.len()),
        };
        if better {
            best = Some((key, confidence));
        }
    }

    best.map(|(key, confidence)| (key.to_string(), confidence))
}

// ============================================================================
// Resolver
// ============================================================================

/// Maps free-text destinations onto a carrier's rate table
pub struct DestinationResolver {
    matcher: Box<dyn FuzzyMatcher>,
}

impl Default for DestinationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationResolver {
    pub fn new() -> Self {
        Self::with_matcher(Box::new(ContainmentMatcher))
    }

    pub fn with_matcher(matcher: Box<dyn FuzzyMatcher>) -> Self {
        Self { matcher }
    }

    /// Resolve `input` against `table`, which must belong to `carrier`
    pub fn resolve(
        &self,
        carrier: Carrier,
        table: &RateTable,
        input: &str,
    ) -> Result<ResolvedDestination, PricingError> {
        let not_found = || PricingError::DestinationNotFound {
            input: input.trim().to_string(),
            carrier,
        };

        let normalized = normalize_name(input);
        if normalized.is_empty() {
            return Err(not_found());
        }

        let (lookup, city) = match city_country(&normalized) {
            Some(country) => (country.to_string(), Some(input.trim().to_string())),
            None => (normalized, None),
        };

        let (key, confidence) = self.match_key(table, &lookup).ok_or_else(not_found)?;

        let region = match table {
            RateTable::RegionBased(t) => {
                PricingRegion::Zone(*t.region_of.get(&key).ok_or_else(not_found)?)
            }
            RateTable::CountryBased(_) => PricingRegion::Country(key.clone()),
        };

        Ok(ResolvedDestination {
            resolution: DestinationResolution {
                canonical_country: key,
                is_city_alias: city.is_some(),
                original_city_name: city,
                confidence,
            },
            region,
        })
    }

    fn match_key(&self, table: &RateTable, lookup: &str) -> Option<(String, Confidence)> {
        if let Some(key) = translation_candidates(table.shape(), lookup)
            .into_iter()
            .find(|candidate| table.contains_key(candidate))
        {
            return Some((key.to_string(), Confidence::High));
        }

        if table.contains_key(lookup) {
            return Some((lookup.to_string(), Confidence::High));
        }

        let keys: Vec<&str> = table.keys().collect();
        self.matcher.best_match(lookup, &keys)
    }
}
