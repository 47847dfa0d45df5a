mod history;
mod stats;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fuellog_core::{
    config::resolve_data_dir,
    input::{build_new_entry, resolve_entry_fields},
    parse_args, parse_human_date, AppConfig, DashboardUseCase, EntryService, FileEntryRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fuellog")]
#[command(about = "Track fill-ups and derive fuel consumption statistics", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.fuellog)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Tank capacity in liters, overrides config.toml
    #[arg(long, global = true)]
    tank_capacity: Option<f64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record a fill-up (usage: add 2025-01-15 100650 42 1.72 full:no)
    Add {
        /// date odometer liters price, positionally or as key:value (odometer may be 0)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List fill-ups with derived consumption
    List,
    /// Delete a fill-up by ID or unique ID prefix
    Delete {
        id: String,
    },
    /// Show lifetime and recent statistics
    Stats,
    /// Show monthly rollups
    Monthly,
    /// Estimate fuel and cost for a trip
    Trip {
        /// Distance in km
        distance: f64,
    },
    /// Estimate the cost of a full tank at the recent price
    TankCost,
    /// Export entries and computed statistics as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import entries from a JSON export or entry list
    Import {
        file: PathBuf,
    },
    /// Show or update the vehicle configuration
    Config {
        /// Tank capacity in liters
        #[arg(long)]
        capacity: Option<f64>,
        /// Number of recent samples used for rolling averages
        #[arg(long)]
        window: Option<usize>,
    },
    /// Open the dashboard TUI
    Dashboard,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let mut config = AppConfig::load(&data_dir)?;
    if let Some(capacity) = cli.tank_capacity {
        config.tank_capacity = capacity;
        config.validate()?;
    }
    tracing::debug!(data_dir = %data_dir.display(), ?config, "starting");

    let repo = FileEntryRepository::new(Some(data_dir.clone()))?;
    let service = EntryService::new(repo);
    let engine = config.engine();

    match cli.command {
        Some(Commands::Add { args }) => {
            let (fields, warnings) = resolve_entry_fields(parse_args(&args));
            for warning in warnings {
                eprintln!("Warning: {}", warning);
            }

            let new_entry = build_new_entry(&fields, parse_human_date)?;

            let created = service.add_entry(new_entry)?;
            println!("Entry added: {} (ID: {})", created.date, created.id);
            println!("  Liters: {:.2} @ {:.3} = {:.2}", created.liters, created.price_per_liter, created.total_cost());
            if created.has_odometer() {
                println!("  Odometer: {:.0} km", created.odometer);
            }
            println!("  Tank: {}", if created.is_full_tank { "full" } else { "partial" });
        },
        Some(Commands::List) => {
            let data = service.summary(&engine)?;
            history::show_entries(&data.enriched_entries);
        },
        Some(Commands::Delete { id }) => {
            let deleted = service.delete_entry(&id)?;
            println!("Entry deleted: {} (ID: {})", deleted.date, deleted.id);
        },
        Some(Commands::Stats) | None => {
            let dashboard = DashboardUseCase::new(&service, engine).build(None)?;
            print_stats(&dashboard);
        },
        Some(Commands::Monthly) => {
            let data = service.summary(&engine)?;
            history::show_monthly(&data.monthly_stats);
        },
        Some(Commands::Trip { distance }) => {
            let dashboard = DashboardUseCase::new(&service, engine).build(Some(distance))?;
            match dashboard.trip {
                Some(trip) => {
                    println!("Trip of {:.0} km at {:.1} L/100km:", trip.distance, dashboard.data.stats.sliding_average_consumption);
                    println!("  Fuel: {:.1} L", trip.liters_estimated);
                    println!("  Cost: {:.2}", trip.cost_estimated);
                },
                None => println!("Not enough data: a trip estimate needs two full tanks and a positive distance."),
            }
        },
        Some(Commands::TankCost) => {
            let dashboard = DashboardUseCase::new(&service, engine).build(None)?;
            println!(
                "Full tank ({:.0} L) at {:.3}/L: {:.2}",
                dashboard.tank_capacity,
                dashboard.data.stats.recent_average_price_per_liter,
                dashboard.full_tank_cost
            );
        },
        Some(Commands::Export { output }) => {
            let json = service.export_json(&engine)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                },
                None => println!("{}", json),
            }
        },
        Some(Commands::Import { file }) => {
            let json = fs::read_to_string(&file)?;
            let imported = service.import_json(&json)?;
            println!("Imported {} entries from {}", imported, file.display());
        },
        Some(Commands::Config { capacity, window }) => {
            if capacity.is_none() && window.is_none() {
                println!("Data directory: {}", data_dir.display());
                println!("Tank capacity:  {:.1} L", config.tank_capacity);
                println!("Recent window:  {} samples", config.recent_window);
                return Ok(());
            }
            // Persist only what the file holds, not the --tank-capacity override.
            let mut stored = AppConfig::load(&data_dir)?;
            if let Some(c) = capacity {
                stored.tank_capacity = c;
            }
            if let Some(w) = window {
                stored.recent_window = w;
            }
            stored.save(&data_dir)?;
            println!("Configuration saved.");
        },
        Some(Commands::Dashboard) => {
            let dashboard = DashboardUseCase::new(&service, engine).build(None)?;
            stats::run(dashboard)?;
        },
    }
    Ok(())
}

fn print_stats(dashboard: &fuellog_core::service::dto::Dashboard) {
    let data = &dashboard.data;
    if data.enriched_entries.is_empty() {
        println!("No fuel entries found.");
        return;
    }

    let s = &data.stats;
    println!("\x1b[1;36mLifetime\x1b[0m ({} fill-ups)", data.enriched_entries.len());
    println!("  {:<24} {:.0} km", "Distance", s.total_distance);
    println!("  {:<24} {:.2} L", "Fuel", s.total_liters);
    println!("  {:<24} {:.2}", "Spent", s.total_cost);
    println!("  {:<24} {}", "Consumption (L/100km)", history::format_consumption(s.average_consumption));
    println!("  {:<24} {:.3}", "Price per liter", s.average_cost_per_liter);
    println!("  {:<24} {:.2}", "Cost per 100 km", s.average_cost_per_distance);

    println!("\n\x1b[1;36mRecent\x1b[0m");
    println!("  {:<24} {}", "Consumption (L/100km)", history::format_consumption(s.sliding_average_consumption));
    println!("  {:<24} {:.3}", "Price per liter", s.recent_average_price_per_liter);
    println!("  {:<24} {:.0} km", "Estimated range", s.estimated_range);
    println!("  {:<24} {:.2} ({:.0} L)", "Full tank cost", dashboard.full_tank_cost, dashboard.tank_capacity);

    if let Some(month) = &dashboard.latest_month {
        println!("\n\x1b[1;36m{}\x1b[0m", month.label);
        println!("  {:<24} {:.2}", "Spent", month.total_cost);
        println!("  {:<24} {}", "Fill-ups", month.fill_count);
    }
}
