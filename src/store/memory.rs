use super::{LibraryStore, LoadReport, SaveReport};
use crate::model::LibraryData;

/// In-memory storage for tests. Holds the last saved snapshot and never
/// touches the filesystem.
#[derive(Default)]
pub struct InMemoryStore {
    data: LibraryData,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: LibraryData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &LibraryData {
        &self.data
    }
}

impl LibraryStore for InMemoryStore {
    fn load(&self) -> LoadReport {
        LoadReport {
            data: self.data.clone(),
            warnings: Vec::new(),
        }
    }

    fn save(&mut self, data: &LibraryData) -> SaveReport {
        self.data = data.clone();
        SaveReport::default()
    }
}
