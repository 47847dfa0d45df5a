use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EntryError;

fn default_full_tank() -> bool {
    // Logs written before the full/partial distinction existed only contain full tanks.
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FuelEntry {
    pub id: Uuid,
    pub date: NaiveDate,

    // 0 means the odometer was not recorded (cost-only entry).
    pub odometer: f64,
    pub liters: f64,
    pub price_per_liter: f64,

    #[serde(default = "default_full_tank")]
    pub is_full_tank: bool,
}

impl FuelEntry {
    pub fn new(date: NaiveDate, odometer: f64, liters: f64, price_per_liter: f64, is_full_tank: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            odometer,
            liters,
            price_per_liter,
            is_full_tank,
        }
    }

    pub fn has_odometer(&self) -> bool {
        self.odometer > 0.0
    }

    /// Whether this entry can open or close a consumption interval.
    pub fn is_reference_candidate(&self) -> bool {
        self.is_full_tank && self.has_odometer()
    }

    pub fn total_cost(&self) -> f64 {
        self.liters * self.price_per_liter
    }
}

/// Entry fields collected from user input, not yet checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub odometer: f64,
    pub liters: f64,
    pub price_per_liter: f64,
    pub is_full_tank: bool,
}

impl NewEntry {
    pub fn validate(&self) -> Result<(), EntryError> {
        check_amount("odometer", self.odometer)?;
        check_amount("liters", self.liters)?;
        check_amount("price", self.price_per_liter)?;
        Ok(())
    }

    pub fn into_entry(self) -> Result<FuelEntry, EntryError> {
        self.validate()?;
        Ok(FuelEntry::new(
            self.date,
            self.odometer,
            self.liters,
            self.price_per_liter,
            self.is_full_tank,
        ))
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), EntryError> {
    if !value.is_finite() {
        return Err(EntryError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(EntryError::Negative { field, value });
    }
    Ok(())
}
