use serde::{Deserialize, Serialize};

use crate::model::entry::FuelEntry;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    #[serde(flatten)]
    pub entry: FuelEntry,
    pub distance_since_reference: f64, // km
    pub total_cost: f64,
    pub consumption_rate: f64,  // L/100km
    pub cost_per_distance: f64, // currency/100km
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AggregateStats {
    pub total_distance: f64,
    pub total_liters: f64,
    pub total_cost: f64,
    pub average_consumption: f64,
    pub average_cost_per_liter: f64,
    pub average_cost_per_distance: f64,

    // Recent window
    pub sliding_average_consumption: f64,
    pub recent_average_price_per_liter: f64,
    pub estimated_range: f64, // km on a full tank
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub key: String,   // "YYYY-MM"
    pub label: String, // "Jan 2025"
    pub total_cost: f64,
    pub total_liters: f64,
    pub average_consumption: f64,
    pub fill_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CalculatedData {
    pub enriched_entries: Vec<EnrichedEntry>,
    pub stats: AggregateStats,
    pub monthly_stats: Vec<MonthlyBucket>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TripEstimate {
    pub distance: f64,
    pub liters_estimated: f64,
    pub cost_estimated: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionRating {
    Efficient,
    Moderate,
    High,
}

impl ConsumptionRating {
    /// `None` when the rate was not computable.
    pub fn from_rate(rate: f64) -> Option<Self> {
        if rate <= 0.0 {
            None
        } else if rate < 6.0 {
            Some(ConsumptionRating::Efficient)
        } else if rate < 8.0 {
            Some(ConsumptionRating::Moderate)
        } else {
            Some(ConsumptionRating::High)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(ConsumptionRating::from_rate(0.0), None);
        assert_eq!(ConsumptionRating::from_rate(5.99), Some(ConsumptionRating::Efficient));
        assert_eq!(ConsumptionRating::from_rate(6.0), Some(ConsumptionRating::Moderate));
        assert_eq!(ConsumptionRating::from_rate(7.5), Some(ConsumptionRating::Moderate));
        assert_eq!(ConsumptionRating::from_rate(8.0), Some(ConsumptionRating::High));
    }
}
