use crate::model::entry::FuelEntry;
use anyhow::Result;
use uuid::Uuid;

pub trait EntryRepository {
    fn create(&self, entry: FuelEntry) -> Result<FuelEntry>;
    fn list(&self) -> Result<Vec<FuelEntry>>;
    fn get(&self, id: &Uuid) -> Result<FuelEntry>;
    fn delete(&self, id: &Uuid) -> Result<()>;

    /// Stores a batch. Implementations backed by a single file should write it once.
    fn create_many(&self, entries: Vec<FuelEntry>) -> Result<usize> {
        let count = entries.len();
        for entry in entries {
            self.create(entry)?;
        }
        Ok(count)
    }
}
