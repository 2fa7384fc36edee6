use std::collections::HashMap;

use async_trait::async_trait;
use ephem_types::Token;
use parking_lot::RwLock;

use crate::{IndexResult, MetadataIndex, MetadataRecord};

/// In-process metadata index. Not durable, not shared across replicas —
/// the default for unit tests and the demo binary.
#[derive(Default)]
pub struct MemoryMetadataIndex {
    records: RwLock<HashMap<Token, MetadataRecord>>,
}

impl MemoryMetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataIndex for MemoryMetadataIndex {
    async fn put(&self, record: MetadataRecord) -> IndexResult<()> {
        self.records.write().insert(record.token.clone(), record);
        Ok(())
    }

    async fn get(&self, token: &Token) -> IndexResult<Option<MetadataRecord>> {
        Ok(self.records.read().get(token).cloned())
    }
}
