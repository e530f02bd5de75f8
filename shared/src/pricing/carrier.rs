//! Carrier identity and per-carrier reference data layout

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PricingError;
use super::normalize::normalize_name;

/// Supported carriers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Carrier {
    Ups,
    Dhl,
    Aramex,
}

/// Shape of the rate table a carrier publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Country to zone, plus weight bracket by zone price grid
    RegionBased,
    /// Flat per-kg price per country
    CountryBased,
}

/// Kind of reference file a carrier reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Regions,
    Pricing,
    CountryRates,
}

impl Carrier {
    pub const ALL: [Carrier; 3] = [Carrier::Ups, Carrier::Dhl, Carrier::Aramex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Ups => "UPS",
            Carrier::Dhl => "DHL",
            Carrier::Aramex => "ARAMEX",
        }
    }

    pub fn table_shape(&self) -> TableShape {
        match self {
            Carrier::Ups | Carrier::Dhl => TableShape::RegionBased,
            Carrier::Aramex => TableShape::CountryBased,
        }
    }

    /// Product name shown next to a quote
    pub fn service_type(&self) -> String {
        format!("{} Express", self.as_str())
    }

    /// Reference files this carrier needs, relative to the data directory
    pub fn reference_files(&self) -> &'static [(ReferenceKind, &'static str)] {
        match self {
            Carrier::Ups => &[
                (ReferenceKind::Regions, "regions.csv"),
                (ReferenceKind::Pricing, "pricing.csv"),
            ],
            Carrier::Dhl => &[
                (ReferenceKind::Regions, "dhl-regions.csv"),
                (ReferenceKind::Pricing, "dhl-pricing.csv"),
            ],
            Carrier::Aramex => &[(ReferenceKind::CountryRates, "aramex-countries.csv")],
        }
    }

    /// File name for one kind of reference data, if the carrier uses it
    pub fn reference_file(&self, kind: ReferenceKind) -> Option<&'static str> {
        self.reference_files()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carrier {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPS" => Ok(Carrier::Ups),
            "DHL" => Ok(Carrier::Dhl),
            "ARAMEX" => Ok(Carrier::Aramex),
            other => Err(PricingError::InvalidInput(format!(
                "Unknown carrier \"{}\". Supported carriers are UPS, DHL and ARAMEX.",
                other
            ))),
        }
    }
}

/// Carrier explicitly named in a content description.
///
/// Whole words only, checked in the order DHL, ARAMEX, UPS.
pub fn detect_carrier(content: &str) -> Option<Carrier> {
    let normalized = normalize_name(content);
    let mentions = |word: &str| normalized.split(' ').any(|token| token == word);

    if mentions("dhl") {
        Some(Carrier::Dhl)
    } else if mentions("aramex") {
        Some(Carrier::Aramex)
    } else if mentions("ups") {
        Some(Carrier::Ups)
    } else {
        None
    }
}
