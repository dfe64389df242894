pub mod memory;
pub mod redis;

pub use memory::InMemoryPreferenceStore;
pub use self::redis::create_redis_client;
pub use self::redis::RedisPreferenceStore;

use crate::{
    error::AppResult,
    models::{PreferenceRecord, PreferenceUpdate, UserId},
};

/// Document store holding each user's like and dislike lists
///
/// Implementations are addressed by user identity. None of the calls are
/// atomic with each other: a caller that reads, edits and writes back can
/// lose a concurrent write for the same user (last write wins).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Reads a user's record. Returns `None` when the user has none yet.
    async fn get(&self, user: &UserId) -> AppResult<Option<PreferenceRecord>>;

    /// Overwrites both lists
    async fn set(&self, user: &UserId, record: &PreferenceRecord) -> AppResult<()>;

    /// Writes only the lists present in `update`
    async fn update(&self, user: &UserId, update: &PreferenceUpdate) -> AppResult<()>;
}
