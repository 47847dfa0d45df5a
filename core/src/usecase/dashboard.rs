use crate::config::EngineConfig;
use crate::repository::EntryRepository;
use crate::service::dto::Dashboard;
use crate::service::entry_service::EntryService;
use crate::service::stats_engine::{estimate_full_tank_cost, estimate_trip};
use anyhow::Result;

pub struct DashboardUseCase<'a, R: EntryRepository> {
    service: &'a EntryService<R>,
    config: EngineConfig,
}

impl<'a, R: EntryRepository> DashboardUseCase<'a, R> {
    pub fn new(service: &'a EntryService<R>, config: EngineConfig) -> Self {
        Self { service, config }
    }

    /// Engine output plus the estimators, priced at the recent average.
    ///
    /// The trip estimate is only produced for a positive distance once a
    /// sliding consumption exists.
    pub fn build(&self, trip_distance: Option<f64>) -> Result<Dashboard> {
        let data = self.service.summary(&self.config)?;
        let stats = &data.stats;

        let full_tank_cost =
            estimate_full_tank_cost(self.config.tank_capacity, stats.recent_average_price_per_liter);

        let trip = trip_distance
            .filter(|d| *d > 0.0 && stats.sliding_average_consumption > 0.0)
            .map(|d| {
                estimate_trip(
                    d,
                    stats.sliding_average_consumption,
                    stats.recent_average_price_per_liter,
                )
            });

        let latest_month = data.monthly_stats.last().cloned();

        Ok(Dashboard {
            tank_capacity: self.config.tank_capacity,
            latest_month,
            full_tank_cost,
            trip,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntryError;
    use crate::model::entry::FuelEntry;
    use chrono::NaiveDate;
    use uuid::Uuid;

    struct MockEntryRepo {
        entries: Vec<FuelEntry>,
    }

    impl EntryRepository for MockEntryRepo {
        fn create(&self, _entry: FuelEntry) -> Result<FuelEntry> { unimplemented!() }
        fn get(&self, id: &Uuid) -> Result<FuelEntry> { Err(EntryError::NotFound(id.to_string()).into()) }
        fn delete(&self, _id: &Uuid) -> Result<()> { unimplemented!() }
        fn list(&self) -> Result<Vec<FuelEntry>> { Ok(self.entries.clone()) }
    }

    fn entry(month: u32, day: u32, odometer: f64, liters: f64, price: f64) -> FuelEntry {
        let date = NaiveDate::from_ymd_opt(2025, month, day).unwrap();
        FuelEntry::new(date, odometer, liters, price, true)
    }

    #[test]
    fn test_dashboard_with_history() {
        let repo = MockEntryRepo {
            entries: vec![
                entry(1, 1, 100000.0, 45.0, 1.70),
                entry(1, 20, 101000.0, 65.0, 1.70),
                entry(2, 10, 102000.0, 65.0, 1.70),
            ],
        };
        let service = EntryService::new(repo);
        let usecase = DashboardUseCase::new(&service, EngineConfig::with_tank_capacity(50.0));

        let dashboard = usecase.build(Some(200.0)).unwrap();

        assert_eq!(dashboard.tank_capacity, 50.0);
        assert!((dashboard.data.stats.sliding_average_consumption - 6.5).abs() < 1e-9);
        assert!((dashboard.full_tank_cost - 85.0).abs() < 1e-9);

        let trip = dashboard.trip.expect("trip estimate");
        assert!((trip.liters_estimated - 13.0).abs() < 1e-9);
        assert!((trip.cost_estimated - 22.1).abs() < 1e-9);

        let latest = dashboard.latest_month.expect("latest month");
        assert_eq!(latest.key, "2025-02");
    }

    #[test]
    fn test_no_trip_without_consumption() {
        let repo = MockEntryRepo {
            entries: vec![entry(1, 1, 100000.0, 45.0, 1.70)],
        };
        let service = EntryService::new(repo);
        let usecase = DashboardUseCase::new(&service, EngineConfig::default());

        let dashboard = usecase.build(Some(200.0)).unwrap();
        assert!(dashboard.trip.is_none());
        assert!((dashboard.full_tank_cost - 45.0 * 1.70).abs() < 1e-9);
    }

    #[test]
    fn test_empty_log() {
        let service = EntryService::new(MockEntryRepo { entries: vec![] });
        let usecase = DashboardUseCase::new(&service, EngineConfig::default());

        let dashboard = usecase.build(None).unwrap();
        assert!(dashboard.latest_month.is_none());
        assert_eq!(dashboard.full_tank_cost, 0.0);
        assert!(dashboard.trip.is_none());
    }
}
