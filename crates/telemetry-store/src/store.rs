//! Main store implementation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, trace};

use telemetry_types::{PowerSample, Reading};

use crate::power;
use crate::queries::ReadingQuery;

/// In-memory store of telemetry readings.
///
/// Readings are kept under their composite key (`"<timestamp>-<name>"`), so a
/// later write for the same timestamp and metric replaces the earlier value.
/// Nothing is ever evicted; the store lives as long as its owner.
#[derive(Debug, Default, Clone)]
pub struct Store {
    readings: HashMap<String, Reading>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Write operations ===

    /// Store `reading` under `key`, replacing any previous reading there.
    ///
    /// The key is taken as given and is not checked against the reading.
    /// Use [`Store::insert`] to derive it from the reading instead.
    pub fn add_reading(&mut self, key: impl Into<String>, reading: Reading) -> &Reading {
        match self.readings.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                trace!("Overwriting reading at {}", entry.key());
                entry.insert(reading);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(reading),
        }
    }

    /// Store `reading` under its own composite key.
    pub fn insert(&mut self, reading: Reading) -> &Reading {
        let key = reading.key();
        self.add_reading(key, reading)
    }

    /// Store every reading in order and return how many were written.
    ///
    /// Duplicates within `readings` resolve to the last one.
    pub fn insert_batch<I>(&mut self, readings: I) -> usize
    where
        I: IntoIterator<Item = Reading>,
    {
        let mut count = 0;
        for reading in readings {
            self.insert(reading);
            count += 1;
        }
        debug!("Stored {} readings ({} total)", count, self.readings.len());
        count
    }

    // === Read operations ===

    /// Look up a reading by composite key.
    pub fn get(&self, key: &str) -> Option<&Reading> {
        self.readings.get(key)
    }

    /// Number of stored readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the store holds no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate over all stored readings in no particular order.
    pub fn readings(&self) -> impl Iterator<Item = &Reading> {
        self.readings.values()
    }

    /// Readings matching `query`, oldest first.
    ///
    /// Readings sharing a timestamp are ordered by name.
    pub fn query_readings(&self, query: &ReadingQuery) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .readings()
            .filter(|reading| query.matches(reading))
            .cloned()
            .collect();

        readings.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });

        readings
    }

    /// Daily power for readings matching `query`, one sample per UTC day.
    pub fn daily_power(&self, query: &ReadingQuery) -> Vec<PowerSample> {
        power::daily_power(self.readings().filter(|reading| query.matches(reading)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn april_14() -> ReadingQuery {
        ReadingQuery::range(
            datetime!(2022-04-14 00:00 UTC),
            datetime!(2022-04-15 00:00 UTC),
        )
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = Store::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.query_readings(&ReadingQuery::new()).is_empty());
    }

    #[test]
    fn test_add_reading() {
        let mut store = Store::new();
        let reading = Reading::new(1649941817, "Voltage", 1.34);

        let stored = store.add_reading("1649941817-Voltage", reading.clone());
        assert_eq!(stored, &reading);

        assert_eq!(store.get("1649941817-Voltage"), Some(&reading));
    }

    #[test]
    fn test_add_reading_uses_key_as_given() {
        let mut store = Store::new();
        store.add_reading("custom", Reading::new(1, "Voltage", 1.0));
        assert!(store.get("custom").is_some());
        assert!(store.get("1-Voltage").is_none());
    }

    #[test]
    fn test_insert_overwrites_same_timestamp_and_name() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.34));
        store.insert(Reading::new(1649941817, "Voltage", 1.50));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1649941817-Voltage").unwrap().value, 1.50);
    }

    #[test]
    fn test_insert_distinct_names_share_timestamp() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.34));
        store.insert(Reading::new(1649941817, "Current", 12.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_batch_last_duplicate_wins() {
        let mut store = Store::new();
        let written = store.insert_batch(vec![
            Reading::new(1, "Voltage", 1.0),
            Reading::new(2, "Voltage", 2.0),
            Reading::new(1, "Voltage", 3.0),
        ]);

        assert_eq!(written, 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1-Voltage").unwrap().value, 3.0);
    }

    #[test]
    fn test_query_readings_in_range() {
        let mut store = Store::new();
        let reading1 = Reading::new(1649941817, "Voltage", 1.34);
        let reading2 = Reading::new(1649941818, "Current", 12.0);
        let reading3 = Reading::new(1649941819, "Voltage", 1.35);

        // Insert out of order; results come back chronologically.
        store.insert(reading3.clone());
        store.insert(reading1.clone());
        store.insert(reading2.clone());

        let result = store.query_readings(&april_14());
        assert_eq!(result, vec![reading1, reading2, reading3]);
    }

    #[test]
    fn test_query_readings_outside_range() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.34));

        let query = ReadingQuery::range(
            datetime!(2022-04-15 00:00 UTC),
            datetime!(2022-04-16 00:00 UTC),
        );
        assert!(store.query_readings(&query).is_empty());
        assert!(store.daily_power(&query).is_empty());
    }

    #[test]
    fn test_query_readings_includes_both_bounds() {
        let mut store = Store::new();
        // Exactly 2022-04-14T00:00:00Z and 2022-04-15T00:00:00Z.
        store.insert(Reading::new(1649894400, "Voltage", 2.0));
        store.insert(Reading::new(1649980800, "Current", 3.0));

        let readings = store.query_readings(&april_14());
        assert_eq!(readings.len(), 2);

        let power = store.daily_power(&april_14());
        let days: Vec<_> = power.iter().map(|s| s.day()).collect();
        assert_eq!(days, vec![date!(2022 - 04 - 14), date!(2022 - 04 - 15)]);
    }

    #[test]
    fn test_query_readings_orders_ties_by_name() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.0));
        store.insert(Reading::new(1649941817, "Current", 2.0));

        let names: Vec<_> = store
            .query_readings(&april_14())
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Current", "Voltage"]);
    }

    #[test]
    fn test_daily_power() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.34));
        store.insert(Reading::new(1649941818, "Current", 12.0));
        store.insert(Reading::new(1649941819, "Voltage", 1.35));
        store.insert(Reading::new(1649941820, "Current", 14.0));

        let power = store.daily_power(&april_14());

        assert_eq!(power.len(), 1);
        assert_eq!(power[0].day(), date!(2022 - 04 - 14));
        let expected = ((1.34 + 1.35) / 2.0) * ((12.0 + 14.0) / 2.0);
        assert!((power[0].value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_daily_power_respects_range() {
        let mut store = Store::new();
        store.insert(Reading::new(1649941817, "Voltage", 1.0));
        store.insert(Reading::new(1649941818, "Current", 2.0));
        // Next day, outside the query.
        store.insert(Reading::new(1650000000, "Voltage", 100.0));

        let query = ReadingQuery::range(
            datetime!(2022-04-14 00:00 UTC),
            datetime!(2022-04-14 23:59:59 UTC),
        );
        let power = store.daily_power(&query);

        assert_eq!(power.len(), 1);
        assert_eq!(power[0].value, 2.0);
    }

    #[test]
    fn test_daily_power_empty_store() {
        let store = Store::new();
        assert!(store.daily_power(&april_14()).is_empty());
    }
}
