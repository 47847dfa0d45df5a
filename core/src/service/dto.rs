use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

use crate::model::entry::FuelEntry;
use crate::model::stats::{CalculatedData, MonthlyBucket, TripEstimate};

/// Full dump of the log plus what was derived from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub tank_capacity: f64,
    pub entries: Vec<FuelEntry>,
    pub summary: CalculatedData,
}

/// Accepted by import: a previous export or a bare list of entries.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ImportPayload {
    Document(ExportDocument),
    Entries(Vec<FuelEntry>),
}

impl ImportPayload {
    pub fn into_entries(self) -> Vec<FuelEntry> {
        match self {
            ImportPayload::Document(doc) => doc.entries,
            ImportPayload::Entries(entries) => entries,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub data: CalculatedData,
    pub tank_capacity: f64,
    pub latest_month: Option<MonthlyBucket>,
    pub full_tank_cost: f64,
    pub trip: Option<TripEstimate>,
}
