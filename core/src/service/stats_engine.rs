use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::entry::FuelEntry;
use crate::model::stats::{AggregateStats, CalculatedData, EnrichedEntry, MonthlyBucket, TripEstimate};

/// Output of the enrichment pass, before reduction.
struct Enrichment {
    entries: Vec<EnrichedEntry>,
    consumption_samples: Vec<f64>,
    total_distance: f64,
    total_liters: f64,
    total_cost: f64,
}

#[derive(Default)]
struct MonthAccumulator {
    total_cost: f64,
    total_liters: f64,
    weighted_liters: f64,
    weighted_distance: f64,
    fill_count: u32,
}

/// Derives per-entry metrics, lifetime stats and monthly rollups.
///
/// Entries may come in any order. The computation is pure: the same input
/// always yields the same output.
pub fn calculate_stats(entries: &[FuelEntry], config: &EngineConfig) -> CalculatedData {
    let sorted = sort_entries(entries);
    let enrichment = enrich(&sorted);
    let stats = reduce(&enrichment, config);
    let monthly_stats = monthly_rollup(&enrichment.entries);

    debug!(
        entries = sorted.len(),
        samples = enrichment.consumption_samples.len(),
        months = monthly_stats.len(),
        "calculated fuel stats"
    );

    CalculatedData {
        enriched_entries: enrichment.entries,
        stats,
        monthly_stats,
    }
}

/// Ascending by date. Entries sharing a date keep their relative order.
pub fn sort_entries(entries: &[FuelEntry]) -> Vec<FuelEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.date);
    sorted
}

fn enrich(sorted: &[FuelEntry]) -> Enrichment {
    let mut enriched = Vec::with_capacity(sorted.len());
    let mut consumption_samples = Vec::new();
    let mut total_distance = 0.0;
    let mut total_liters = 0.0;
    let mut total_cost = 0.0;

    // Nearest full tank with an odometer reading seen so far, and the fuel
    // bought after it (up to and including the current entry).
    let mut reference: Option<&FuelEntry> = None;
    let mut interval_liters = 0.0;
    let mut interval_cost = 0.0;

    for (i, entry) in sorted.iter().enumerate() {
        let cost = entry.total_cost();
        let mut distance_since_reference = 0.0;
        let mut consumption_rate = 0.0;
        let mut cost_per_distance = 0.0;

        interval_liters += entry.liters;
        interval_cost += cost;

        if entry.is_reference_candidate() {
            if let Some(previous_full) = reference {
                let distance = entry.odometer - previous_full.odometer;
                if distance > 0.0 {
                    distance_since_reference = distance;
                    consumption_rate = interval_liters / distance * 100.0;
                    cost_per_distance = interval_cost / distance * 100.0;

                    consumption_samples.push(consumption_rate);
                    total_distance += distance;
                }
            }

            reference = Some(entry);
            interval_liters = 0.0;
            interval_cost = 0.0;
        } else if i > 0 {
            // Display only: distance since the previous entry of any kind.
            let previous = &sorted[i - 1];
            if entry.has_odometer() && previous.has_odometer() {
                distance_since_reference = (entry.odometer - previous.odometer).max(0.0);
            }
        }

        total_liters += entry.liters;
        total_cost += cost;

        enriched.push(EnrichedEntry {
            entry: entry.clone(),
            distance_since_reference,
            total_cost: cost,
            consumption_rate,
            cost_per_distance,
        });
    }

    Enrichment {
        entries: enriched,
        consumption_samples,
        total_distance,
        total_liters,
        total_cost,
    }
}

fn reduce(enrichment: &Enrichment, config: &EngineConfig) -> AggregateStats {
    let total_distance = enrichment.total_distance;
    let total_liters = enrichment.total_liters;
    let total_cost = enrichment.total_cost;

    let average_consumption = per_hundred(total_liters, total_distance);
    let average_cost_per_liter = if total_liters > 0.0 { total_cost / total_liters } else { 0.0 };
    let average_cost_per_distance = per_hundred(total_cost, total_distance);

    let samples = &enrichment.consumption_samples;
    let window_start = samples.len().saturating_sub(config.recent_window);
    let sliding_average_consumption = mean(&samples[window_start..]);

    let recent_prices: Vec<f64> = enrichment
        .entries
        .iter()
        .rev()
        .filter(|e| e.entry.liters > 0.0)
        .take(config.recent_window)
        .map(|e| e.entry.price_per_liter)
        .collect();
    let recent_average_price_per_liter = mean(&recent_prices);

    let estimated_range = if sliding_average_consumption > 0.0 {
        config.tank_capacity / sliding_average_consumption * 100.0
    } else {
        0.0
    };

    AggregateStats {
        total_distance,
        total_liters,
        total_cost,
        average_consumption,
        average_cost_per_liter,
        average_cost_per_distance,
        sliding_average_consumption,
        recent_average_price_per_liter,
        estimated_range,
    }
}

fn monthly_rollup(entries: &[EnrichedEntry]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();

    for enriched in entries {
        let key = (enriched.entry.date.year(), enriched.entry.date.month());
        let acc = months.entry(key).or_default();

        acc.total_cost += enriched.total_cost;
        acc.total_liters += enriched.entry.liters;
        acc.fill_count += 1;

        if enriched.distance_since_reference > 0.0 && enriched.consumption_rate > 0.0 {
            acc.weighted_liters += enriched.entry.liters;
            acc.weighted_distance += enriched.distance_since_reference;
        }
    }

    months
        .into_iter()
        .map(|((year, month), acc)| MonthlyBucket {
            year,
            month,
            key: format!("{:04}-{:02}", year, month),
            label: month_label(year, month),
            total_cost: acc.total_cost,
            total_liters: acc.total_liters,
            average_consumption: per_hundred(acc.weighted_liters, acc.weighted_distance),
            fill_count: acc.fill_count,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}

pub fn estimate_trip(distance: f64, consumption_rate: f64, price_per_liter: f64) -> TripEstimate {
    let liters_estimated = distance * consumption_rate / 100.0;
    TripEstimate {
        distance,
        liters_estimated,
        cost_estimated: liters_estimated * price_per_liter,
    }
}

pub fn estimate_full_tank_cost(tank_capacity: f64, price_per_liter: f64) -> f64 {
    tank_capacity * price_per_liter
}

fn per_hundred(amount: f64, distance: f64) -> f64 {
    if distance > 0.0 {
        amount / distance * 100.0
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
#[path = "stats_engine_test.rs"]
mod tests;
