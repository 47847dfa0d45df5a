use std::collections::BTreeMap;

use chrono::Datelike;
use fuellog_core::{ConsumptionRating, EnrichedEntry, MonthlyBucket};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;

// Helper struct for Table Row
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tank")]
    tank: String,
    #[tabled(rename = "Odometer")]
    odometer: String,
    #[tabled(rename = "Km")]
    distance: String,
    #[tabled(rename = "Liters")]
    liters: String,
    #[tabled(rename = "Price/L")]
    price: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "L/100km")]
    consumption: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    label: String,
    #[tabled(rename = "Fill-ups")]
    fills: u32,
    #[tabled(rename = "Liters")]
    liters: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "L/100km")]
    consumption: String,
}

pub fn show_entries(entries: &[EnrichedEntry]) {
    if entries.is_empty() {
        println!("No fuel entries found.");
        return;
    }

    // Key: (Year, Month), newest first
    let mut by_month: BTreeMap<(i32, u32), Vec<&EnrichedEntry>> = BTreeMap::new();
    for e in entries {
        by_month.entry((e.entry.date.year(), e.entry.date.month())).or_default().push(e);
    }

    for ((year, month), month_entries) in by_month.iter().rev() {
        let liters: f64 = month_entries.iter().map(|e| e.entry.liters).sum();
        let cost: f64 = month_entries.iter().map(|e| e.total_cost).sum();

        println!("\n\x1b[1;36m{:04}-{:02}\x1b[0m ({} fill-ups, {:.1} L, {:.2})", year, month, month_entries.len(), liters, cost);

        let rows: Vec<EntryRow> = month_entries.iter().rev().map(|e| entry_row(e)).collect();

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

        println!("{}", table);
    }
}

fn entry_row(e: &EnrichedEntry) -> EntryRow {
    let id_str = e.entry.id.to_string();
    let optional = |value: f64, precision: usize| {
        if value > 0.0 { format!("{:.*}", precision, value) } else { "-".to_string() }
    };

    EntryRow {
        date: e.entry.date.format("%Y-%m-%d (%a)").to_string(),
        id: id_str[..8].to_string(),
        tank: if e.entry.is_full_tank { "full".to_string() } else { "partial".to_string() },
        odometer: optional(e.entry.odometer, 0),
        distance: optional(e.distance_since_reference, 0),
        liters: format!("{:.2}", e.entry.liters),
        price: format!("{:.3}", e.entry.price_per_liter),
        cost: format!("{:.2}", e.total_cost),
        consumption: format_consumption(e.consumption_rate),
    }
}

pub fn format_consumption(rate: f64) -> String {
    match ConsumptionRating::from_rate(rate) {
        None => "-".to_string(),
        Some(ConsumptionRating::Efficient) => format!("{:.1} \u{2193}", rate),
        Some(ConsumptionRating::Moderate) => format!("{:.1}", rate),
        Some(ConsumptionRating::High) => format!("{:.1} \u{2191}", rate),
    }
}

pub fn show_monthly(months: &[MonthlyBucket]) {
    if months.is_empty() {
        println!("No monthly data yet.");
        return;
    }

    let rows: Vec<MonthRow> = months
        .iter()
        .rev()
        .map(|m| MonthRow {
            label: m.label.clone(),
            fills: m.fill_count,
            liters: format!("{:.1}", m.total_liters),
            cost: format!("{:.2}", m.total_cost),
            consumption: format_consumption(m.average_consumption),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    println!("{}", table);
}
