//! Process-lifetime cache of parsed rate tables

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::carrier::Carrier;
use super::error::PricingError;
use super::reference::RateTable;

/// Write-once, read-many store of one [`RateTable`] per carrier.
///
/// Concurrent misses for the same carrier may both build a table; the first
/// one stored wins and every later caller receives that instance.
#[derive(Debug, Default)]
pub struct RateTableCache {
    tables: RwLock<HashMap<Carrier, Arc<RateTable>>>,
}

impl RateTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, carrier: Carrier) -> Option<Arc<RateTable>> {
        self.tables.read().get(&carrier).cloned()
    }

    /// Return the cached table, building and storing it on a miss.
    ///
    /// A failed build leaves the cache untouched so the next call retries.
    pub fn get_or_build<F>(&self, carrier: Carrier, build: F) -> Result<Arc<RateTable>, PricingError>
    where
        F: FnOnce() -> Result<RateTable, PricingError>,
    {
        if let Some(table) = self.get(carrier) {
            return Ok(table);
        }

        // parse outside the lock; the write below keeps whichever table landed first
        let built = Arc::new(build()?);
        let mut tables = self.tables.write();
        Ok(tables.entry(carrier).or_insert(built).clone())
    }

    pub fn is_loaded(&self, carrier: Carrier) -> bool {
        self.tables.read().contains_key(&carrier)
    }
}
