pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{AppConfig, EngineConfig, DEFAULT_TANK_CAPACITY, RECENT_WINDOW};
pub use error::EntryError;
pub use model::entry::{FuelEntry, NewEntry};
pub use model::stats::{AggregateStats, CalculatedData, ConsumptionRating, EnrichedEntry, MonthlyBucket, TripEstimate};
pub use repository::{EntryRepository, FileEntryRepository};
pub use input::{parse_args, expand_key, ParsedInput};
pub use time::parse_human_date;
pub use service::entry_service::EntryService;
pub use service::stats_engine::{calculate_stats, estimate_full_tank_cost, estimate_trip, sort_entries};
pub use usecase::dashboard::DashboardUseCase;
