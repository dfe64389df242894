use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::collections::HashMap;
use std::fmt::Display;

use crate::db::PreferenceStore;
use crate::error::AppResult;
use crate::models::{PreferenceRecord, PreferenceUpdate, UserId};

const LIKES_FIELD: &str = "likes";
const DISLIKES_FIELD: &str = "dislikes";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    User(String),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::User(name) => write!(f, "users:{}", name),
        }
    }
}

impl From<&UserId> for StoreKey {
    fn from(user: &UserId) -> Self {
        StoreKey::User(user.as_str().to_string())
    }
}

/// Creates a Redis client for the preference store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Preference store backed by one Redis hash per user
///
/// The hash at `users:{name}` has a `likes` and a `dislikes` field, each a
/// JSON array of book names.
#[derive(Clone)]
pub struct RedisPreferenceStore {
    conn: ConnectionManager,
}

impl RedisPreferenceStore {
    /// Connects through a reconnecting connection manager
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis preference store");
        Ok(Self { conn })
    }

    /// Field/value pairs for the lists present in `update`
    fn encode_fields(update: &PreferenceUpdate) -> AppResult<Vec<(&'static str, String)>> {
        let mut fields = Vec::with_capacity(2);
        if let Some(likes) = &update.likes {
            fields.push((LIKES_FIELD, serde_json::to_string(likes)?));
        }
        if let Some(dislikes) = &update.dislikes {
            fields.push((DISLIKES_FIELD, serde_json::to_string(dislikes)?));
        }
        Ok(fields)
    }

    /// Rebuilds a record from a hash. An empty hash means no record.
    fn decode_record(hash: HashMap<String, String>) -> AppResult<Option<PreferenceRecord>> {
        if hash.is_empty() {
            return Ok(None);
        }

        let decode = |field: &str| -> AppResult<Vec<String>> {
            match hash.get(field) {
                Some(json) => Ok(serde_json::from_str(json)?),
                None => Ok(Vec::new()),
            }
        };

        Ok(Some(PreferenceRecord {
            likes: decode(LIKES_FIELD)?,
            dislikes: decode(DISLIKES_FIELD)?,
        }))
    }

    async fn write_fields(&self, user: &UserId, update: &PreferenceUpdate) -> AppResult<()> {
        let fields = Self::encode_fields(update)?;
        if fields.is_empty() {
            return Ok(());
        }

        let key = StoreKey::from(user).to_string();
        let mut conn = self.conn.clone();
        let _: () = conn.hset_multiple(&key, fields.as_slice()).await.map_err(|e| {
            tracing::warn!(error = %e, key = %key, "Redis write failed");
            e
        })?;

        tracing::debug!(key = %key, fields = fields.len(), "Stored preferences");
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for RedisPreferenceStore {
    async fn get(&self, user: &UserId) -> AppResult<Option<PreferenceRecord>> {
        let key = StoreKey::from(user).to_string();
        let mut conn = self.conn.clone();
        let hash: HashMap<String, String> = conn.hgetall(&key).await.map_err(|e| {
            tracing::warn!(error = %e, key = %key, "Redis read failed");
            e
        })?;
        Self::decode_record(hash)
    }

    async fn set(&self, user: &UserId, record: &PreferenceRecord) -> AppResult<()> {
        self.write_fields(user, &record.as_update()).await
    }

    async fn update(&self, user: &UserId, update: &PreferenceUpdate) -> AppResult<()> {
        self.write_fields(user, update).await
    }
}
