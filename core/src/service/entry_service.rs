use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EntryError;
use crate::model::entry::{FuelEntry, NewEntry};
use crate::model::stats::CalculatedData;
use crate::repository::EntryRepository;
use crate::service::dto::{ExportDocument, ImportPayload};
use crate::service::stats_engine::{calculate_stats, sort_entries};

pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_entry(&self, new_entry: NewEntry) -> Result<FuelEntry> {
        let entry = new_entry.into_entry()?;
        let created = self.repo.create(entry)?;
        info!(id = %created.id, date = %created.date, "added fuel entry");
        Ok(created)
    }

    /// All entries in chronological order.
    pub fn list_entries(&self) -> Result<Vec<FuelEntry>> {
        let entries = self.repo.list()?;
        Ok(sort_entries(&entries))
    }

    /// Accepts a full id or a unique prefix of one.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(id_or_prefix) {
            return Ok(id);
        }

        let needle = id_or_prefix.to_lowercase();
        let matches: Vec<Uuid> = self
            .repo
            .list()?
            .into_iter()
            .map(|e| e.id)
            .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
            .collect();

        match matches.len() {
            1 => Ok(matches[0]),
            0 => Err(EntryError::NotFound(id_or_prefix.to_string()).into()),
            n => Err(EntryError::AmbiguousId(id_or_prefix.to_string(), n).into()),
        }
    }

    pub fn delete_entry(&self, id_or_prefix: &str) -> Result<FuelEntry> {
        let id = self.resolve_id(id_or_prefix)?;
        let entry = self.repo.get(&id)?;
        self.repo.delete(&id)?;
        info!(id = %id, "deleted fuel entry");
        Ok(entry)
    }

    pub fn summary(&self, config: &EngineConfig) -> Result<CalculatedData> {
        let entries = self.repo.list()?;
        Ok(calculate_stats(&entries, config))
    }

    pub fn export(&self, config: &EngineConfig) -> Result<ExportDocument> {
        let entries = self.list_entries()?;
        let summary = calculate_stats(&entries, config);
        Ok(ExportDocument {
            exported_at: Utc::now(),
            tank_capacity: config.tank_capacity,
            entries,
            summary,
        })
    }

    pub fn export_json(&self, config: &EngineConfig) -> Result<String> {
        let document = self.export(config)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Adds entries whose ids are not stored yet. Returns how many were added.
    ///
    /// Every row is checked before anything is written: one malformed row
    /// rejects the whole import and leaves the log untouched.
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let payload: ImportPayload = serde_json::from_str(json)?;
        let mut known: HashSet<Uuid> = self.repo.list()?.into_iter().map(|e| e.id).collect();

        let mut fresh = Vec::new();
        for (row, entry) in payload.into_entries().into_iter().enumerate() {
            if !known.insert(entry.id) {
                debug!(id = %entry.id, "skipping already stored entry");
                continue;
            }
            let checked = NewEntry {
                date: entry.date,
                odometer: entry.odometer,
                liters: entry.liters,
                price_per_liter: entry.price_per_liter,
                is_full_tank: entry.is_full_tank,
            };
            if let Err(e) = checked.validate() {
                warn!(row, id = %entry.id, error = %e, "rejecting import");
                return Err(e.into());
            }
            fresh.push(entry);
        }

        let imported = self.repo.create_many(fresh)?;
        info!(imported, "imported fuel entries");
        Ok(imported)
    }
}
