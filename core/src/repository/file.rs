use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde_json;
use tracing::debug;
use uuid::Uuid;

use crate::config::resolve_data_dir;
use crate::error::EntryError;
use crate::model::entry::FuelEntry;
use crate::repository::traits::EntryRepository;

const DEFAULT_FILE_NAME: &str = "entries.json";

#[derive(Clone)]
pub struct FileEntryRepository {
    file_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)?; // Ensure the directory exists
        path.push(DEFAULT_FILE_NAME);

        // Initialize with an empty JSON array
        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<FuelEntry>::new())?;
            writer.flush()?;
        }

        Ok(FileEntryRepository { file_path: path })
    }

    fn read_entries(&self) -> Result<Vec<FuelEntry>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let entries: Vec<FuelEntry> = serde_json::from_reader(reader)?;
        debug!(path = %self.file_path.display(), count = entries.len(), "read entries");
        Ok(entries)
    }

    fn write_entries(&self, entries: &[FuelEntry]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        debug!(path = %self.file_path.display(), count = entries.len(), "wrote entries");
        Ok(())
    }
}

impl EntryRepository for FileEntryRepository {
    fn create(&self, entry: FuelEntry) -> Result<FuelEntry> {
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)?;
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<FuelEntry>> {
        self.read_entries()
    }

    fn create_many(&self, new_entries: Vec<FuelEntry>) -> Result<usize> {
        if new_entries.is_empty() {
            return Ok(0);
        }
        let mut entries = self.read_entries()?;
        let count = new_entries.len();
        entries.extend(new_entries);
        self.write_entries(&entries)?;
        Ok(count)
    }

    fn get(&self, id: &Uuid) -> Result<FuelEntry> {
        self.read_entries()?
            .into_iter()
            .find(|e| e.id == *id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()).into())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut entries = self.read_entries()?;
        let initial_len = entries.len();
        entries.retain(|e| e.id != *id);

        if entries.len() == initial_len {
            return Err(EntryError::NotFound(id.to_string()).into());
        }

        self.write_entries(&entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(day: u32) -> FuelEntry {
        let date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        FuelEntry::new(date, 100000.0 + day as f64 * 100.0, 40.0, 1.7, true)
    }

    #[test]
    fn test_new_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(dir.path().join(DEFAULT_FILE_NAME).exists());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let first = repo.create(sample(1)).unwrap();
        let second = repo.create(sample(2)).unwrap();
        assert_eq!(repo.list().unwrap().len(), 2);
        assert_eq!(repo.get(&second.id).unwrap(), second);

        repo.delete(&first.id).unwrap();
        let remaining = repo.list().unwrap();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        repo.create(sample(1)).unwrap();

        assert!(repo.delete(&Uuid::new_v4()).is_err());
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_many_appends_batch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        repo.create(sample(1)).unwrap();

        assert_eq!(repo.create_many(vec![sample(2), sample(3)]).unwrap(), 2);
        assert_eq!(repo.create_many(vec![]).unwrap(), 0);
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
            repo.create(sample(3)).unwrap()
        };

        let reopened = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![created]);
    }
}
