use std::collections::HashMap;

use tokio::sync::RwLock;

use super::PreferenceStore;
use crate::{
    error::AppResult,
    models::{PreferenceRecord, PreferenceUpdate, UserId},
};

/// Process-local preference store, used when no Redis URL is configured
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    records: RwLock<HashMap<String, PreferenceRecord>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user: &UserId) -> AppResult<Option<PreferenceRecord>> {
        let records = self.records.read().await;
        Ok(records.get(user.as_str()).cloned())
    }

    async fn set(&self, user: &UserId, record: &PreferenceRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.insert(user.as_str().to_string(), record.clone());
        Ok(())
    }

    async fn update(&self, user: &UserId, update: &PreferenceUpdate) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .entry(user.as_str().to_string())
            .or_default()
            .merge(update);
        Ok(())
    }
}
