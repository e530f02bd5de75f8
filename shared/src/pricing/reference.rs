//! Reference data loading: carrier rate text into lookup tables

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use rust_decimal::Decimal;

use super::carrier::{Carrier, ReferenceKind, TableShape};
use super::error::PricingError;
use super::normalize::normalize_name;

/// Number of zones a region-based carrier publishes
pub const ZONE_COUNT: u8 = 9;

/// Markers that open a zone block in a regions file (`3.BÖLGE: ...`)
const REGION_MARKERS: [&str; 3] = ["BÖLGE:", "REGION:", "ZONE:"];

// ============================================================================
// Sources
// ============================================================================

/// Where reference text comes from
pub trait ReferenceSource: Send + Sync {
    /// Read the full text of one reference file
    fn read(&self, carrier: Carrier, file_name: &str) -> Result<String, PricingError>;
}

/// Reads reference files from a data directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReferenceSource for DirectorySource {
    fn read(&self, carrier: Carrier, file_name: &str) -> Result<String, PricingError> {
        let path = self.root.join(file_name);
        std::fs::read_to_string(&path).map_err(|e| PricingError::ReferenceDataUnavailable {
            carrier,
            detail: format!("{}: {}", path.display(), e),
        })
    }
}

/// Holds reference files in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: HashMap<String, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(file_name.into(), text.into());
        self
    }
}

impl ReferenceSource for InMemorySource {
    fn read(&self, carrier: Carrier, file_name: &str) -> Result<String, PricingError> {
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| PricingError::ReferenceDataUnavailable {
                carrier,
                detail: format!("{} not loaded", file_name),
            })
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Weight row of a region price grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeightBracket {
    Kg(Decimal),
    /// Per-kg rate applied above the overage threshold
    Overage,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionRateTable {
    pub region_of: BTreeMap<String, u8>,
    pub price_at: BTreeMap<(WeightBracket, u8), Decimal>,
    /// Tabulated weights, ascending, without the overage row
    pub sorted_brackets: Vec<Decimal>,
}

impl RegionRateTable {
    pub fn price(&self, bracket: WeightBracket, zone: u8) -> Option<Decimal> {
        self.price_at.get(&(bracket, zone)).copied()
    }

    pub fn overage_rate(&self, zone: u8) -> Option<Decimal> {
        self.price(WeightBracket::Overage, zone)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryRateTable {
    pub rate_of: BTreeMap<String, Decimal>,
}

/// Parsed rate data of one carrier
#[derive(Debug, Clone, PartialEq)]
pub enum RateTable {
    RegionBased(RegionRateTable),
    CountryBased(CountryRateTable),
}

impl RateTable {
    pub fn shape(&self) -> TableShape {
        match self {
            RateTable::RegionBased(_) => TableShape::RegionBased,
            RateTable::CountryBased(_) => TableShape::CountryBased,
        }
    }

    /// Every normalized destination key the table knows
    pub fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            RateTable::RegionBased(t) => Box::new(t.region_of.keys().map(String::as_str)),
            RateTable::CountryBased(t) => Box::new(t.rate_of.keys().map(String::as_str)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            RateTable::RegionBased(t) => t.region_of.contains_key(key),
            RateTable::CountryBased(t) => t.rate_of.contains_key(key),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Read and parse every reference file of a carrier
pub fn load_rate_table(
    carrier: Carrier,
    source: &dyn ReferenceSource,
) -> Result<RateTable, PricingError> {
    let file = |kind: ReferenceKind| {
        carrier
            .reference_file(kind)
            .ok_or_else(|| PricingError::ReferenceDataUnavailable {
                carrier,
                detail: format!("no {:?} file configured", kind),
            })
    };

    match carrier.table_shape() {
        TableShape::RegionBased => {
            let regions_text = source.read(carrier, file(ReferenceKind::Regions)?)?;
            let pricing_text = source.read(carrier, file(ReferenceKind::Pricing)?)?;

            let region_of = parse_regions(&regions_text);
            if region_of.is_empty() {
                return Err(PricingError::ReferenceDataUnavailable {
                    carrier,
                    detail: "regions file has no countries".to_string(),
                });
            }

            let (price_at, sorted_brackets) = parse_price_grid(&pricing_text);
            if sorted_brackets.is_empty() {
                return Err(PricingError::ReferenceDataUnavailable {
                    carrier,
                    detail: "pricing file has no weight rows".to_string(),
                });
            }

            Ok(RateTable::RegionBased(RegionRateTable {
                region_of,
                price_at,
                sorted_brackets,
            }))
        }
        TableShape::CountryBased => {
            let text = source.read(carrier, file(ReferenceKind::CountryRates)?)?;
            let rate_of = parse_country_rates(&text);
            if rate_of.is_empty() {
                return Err(PricingError::ReferenceDataUnavailable {
                    carrier,
                    detail: "country rate file has no rows".to_string(),
                });
            }
            Ok(RateTable::CountryBased(CountryRateTable { rate_of }))
        }
    }
}

/// Parse a regions file into normalized country → zone
pub fn parse_regions(text: &str) -> BTreeMap<String, u8> {
    let mut region_of = BTreeMap::new();
    let mut current_zone: Option<u8> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let countries = match zone_marker(line) {
            Some((zone, rest)) => {
                current_zone = Some(zone);
                rest
            }
            None => line,
        };

        let Some(zone) = current_zone else { continue };

        for token in countries.split([',', ';']) {
            let token = token.trim();
            if token.is_empty() || token.chars().all(|c| c.is_ascii_digit() || c == '.') {
                continue;
            }
            let key = normalize_name(token);
            if key.is_empty() || key.contains("bolge yapisi") {
                continue;
            }
            region_of.entry(key).or_insert(zone);
        }
    }

    region_of
}

/// Split `N.BÖLGE: rest` into (N, rest)
fn zone_marker(line: &str) -> Option<(u8, &str)> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let zone: u8 = line[..digits_end].parse().ok()?;
    let after_dot = line[digits_end..].strip_prefix('.')?.trim_start();
    let upper = after_dot.to_uppercase();

    REGION_MARKERS.iter().find_map(|marker| {
        upper.starts_with(marker).then(|| {
            // markers are ASCII apart from Ö, whose upper-casing keeps its byte length
            let rest = after_dot.get(marker.len()..).unwrap_or("");
            (zone, rest)
        })
    })
    .filter(|(zone, _)| (1..=ZONE_COUNT).contains(zone))
}

/// Parse a semicolon-delimited price grid.
///
/// Returns the price map and the ascending list of tabulated weights.
pub fn parse_price_grid(text: &str) -> (BTreeMap<(WeightBracket, u8), Decimal>, Vec<Decimal>) {
    let mut price_at = BTreeMap::new();
    let mut brackets = Vec::new();

    for record in semicolon_records(text) {
        let Some(bracket) = record.get(0).and_then(parse_bracket) else {
            continue;
        };

        let mut row_has_price = false;
        for zone in 1..=ZONE_COUNT {
            if let Some(price) = record.get(zone as usize).and_then(parse_decimal) {
                price_at.insert((bracket, zone), price);
                row_has_price = true;
            }
        }

        if let (WeightBracket::Kg(weight), true) = (bracket, row_has_price) {
            brackets.push(weight);
        }
    }

    brackets.sort();
    brackets.dedup();
    (price_at, brackets)
}

/// Parse `COUNTRY;PER_KG_PRICE` rows into normalized country → rate
pub fn parse_country_rates(text: &str) -> BTreeMap<String, Decimal> {
    let mut rate_of = BTreeMap::new();

    for record in semicolon_records(text) {
        let (Some(country), Some(rate)) = (record.get(0), record.get(1).and_then(parse_decimal))
        else {
            continue;
        };
        let key = normalize_name(country);
        if !key.is_empty() {
            rate_of.insert(key, rate);
        }
    }

    rate_of
}

fn semicolon_records(text: &str) -> impl Iterator<Item = csv::StringRecord> + '_ {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
        .into_records()
        .filter_map(Result::ok)
}

/// `"0,5 kg"`, `"12"`, `"70 kg+"`
fn parse_bracket(cell: &str) -> Option<WeightBracket> {
    let lowered = cell.trim().to_lowercase();
    let overage = lowered.ends_with('+');
    let number = lowered.trim_end_matches('+').trim_end().trim_end_matches("kg");
    let weight = parse_decimal(number)?;

    if weight <= Decimal::ZERO {
        return None;
    }
    Some(if overage {
        WeightBracket::Overage
    } else {
        WeightBracket::Kg(weight)
    })
}

/// Decimal with either `,` or `.` as the decimal separator
pub(crate) fn parse_decimal(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    let cleaned = if cell.contains(',') {
        cell.replace('.', "").replace(',', ".")
    } else {
        cell.to_string()
    };
    cleaned.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const REGIONS: &str = "UPS EXPRESS SAVER BÖLGE YAPISI;;;\n\
        ;;;\n\
        1.BÖLGE: BULGARİSTAN, YUNANİSTAN\n\
        2.BÖLGE: ALMANYA, FRANSA\n\
        HOLLANDA; 12\n\
        \n\
        3.ZONE: İSPANYA\n";

    #[test]
    fn test_parse_regions_markers_and_continuations() {
        let regions = parse_regions(REGIONS);
        assert_eq!(regions.get("bulgaristan"), Some(&1));
        assert_eq!(regions.get("almanya"), Some(&2));
        assert_eq!(regions.get("hollanda"), Some(&2));
        assert_eq!(regions.get("ispanya"), Some(&3));
        assert!(!regions.contains_key("12"));
        assert_eq!(regions.len(), 6);
    }

    #[test]
    fn test_parse_regions_skips_lines_before_first_marker() {
        let regions = parse_regions("ALMANYA\n1.BÖLGE: FRANSA\n");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions.get("fransa"), Some(&1));
    }

    #[test]
    fn test_parse_price_grid() {
        let text = "KGDS/BÖLGE;1;2\n0,5 kg;20,00;22,25\n1 kg;22,00;24,50\n70 kg+;3,90;4,40\n;;\n";
        let (prices, brackets) = parse_price_grid(text);
        assert_eq!(brackets, vec![dec("0.5"), dec("1")]);
        assert_eq!(prices.get(&(WeightBracket::Kg(dec("0.5")), 2)), Some(&dec("22.25")));
        assert_eq!(prices.get(&(WeightBracket::Overage, 1)), Some(&dec("3.90")));
        assert_eq!(prices.get(&(WeightBracket::Kg(dec("1")), 3)), None);
    }

    #[test]
    fn test_parse_country_rates_skips_header() {
        let rates = parse_country_rates("ÜLKE;KG FİYATI\nUAE;12,00\nSAUDI ARABIA;13,50\nBROKEN\n");
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("uae"), Some(&dec("12.00")));
        assert_eq!(rates.get("saudi arabia"), Some(&dec("13.50")));
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("42,50"), Some(dec("42.50")));
        assert_eq!(parse_decimal("42.50"), Some(dec("42.50")));
        assert_eq!(parse_decimal("1.234,50"), Some(dec("1234.50")));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_load_empty_regions_is_unavailable() {
        let source = InMemorySource::new()
            .with_file("regions.csv", "nothing here")
            .with_file("pricing.csv", "1 kg;10;10;10;10;10;10;10;10;10");
        let err = load_rate_table(Carrier::Ups, &source).unwrap_err();
        assert!(matches!(err, PricingError::ReferenceDataUnavailable { carrier: Carrier::Ups, .. }));
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let err = load_rate_table(Carrier::Aramex, &InMemorySource::new()).unwrap_err();
        assert!(matches!(err, PricingError::ReferenceDataUnavailable { carrier: Carrier::Aramex, .. }));
    }

    #[test]
    fn test_load_country_table() {
        let source = InMemorySource::new().with_file("aramex-countries.csv", "UAE;12,00\n");
        let table = load_rate_table(Carrier::Aramex, &source).unwrap();
        assert_eq!(table.shape(), TableShape::CountryBased);
        assert!(table.contains_key("uae"));
    }
}
