//! Daily power aggregation.
//!
//! Readings are bucketed by the UTC calendar day of their timestamp. For each
//! day, `Current` and `Voltage` readings are averaged separately and the
//! product of the two averages is reported as that day's power. Other metric
//! names are ignored.
//!
//! A day that has current readings but no voltage readings (or the reverse)
//! averages the missing metric over zero samples, so its power is NaN.

use std::collections::BTreeMap;

use telemetry_types::{Metric, PowerSample, Reading};
use time::Date;

/// Running totals for a single metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    /// Sum of all values seen.
    pub total: f64,
    /// Number of values seen.
    pub count: u64,
}

impl Accumulator {
    /// Add a value.
    pub fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    /// Mean of the values seen, NaN if none were.
    pub fn average(&self) -> f64 {
        self.total / self.count as f64
    }
}

/// Current and voltage totals for one UTC day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyTotals {
    /// Readings named `Current`.
    pub current: Accumulator,
    /// Readings named `Voltage`.
    pub voltage: Accumulator,
}

impl DailyTotals {
    /// Average voltage times average current.
    pub fn power(&self) -> f64 {
        self.current.average() * self.voltage.average()
    }
}

/// Bucket readings by UTC day and compute one [`PowerSample`] per day.
///
/// The caller is responsible for filtering; every reading passed in is
/// counted. Samples are returned in ascending day order. Days with no
/// `Current` or `Voltage` reading produce no sample.
pub fn daily_power<'a, I>(readings: I) -> Vec<PowerSample>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut days: BTreeMap<Date, DailyTotals> = BTreeMap::new();

    for reading in readings {
        let (Some(instant), Some(metric @ (Metric::Current | Metric::Voltage))) =
            (reading.instant(), reading.metric())
        else {
            continue;
        };

        let totals = days.entry(instant.date()).or_default();
        if metric == Metric::Current {
            totals.current.add(reading.value);
        } else {
            totals.voltage.add(reading.value);
        }
    }

    days.into_iter()
        .map(|(day, totals)| PowerSample::new(day, totals.power()))
        .collect()
}
