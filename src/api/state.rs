use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::db::{InMemoryPreferenceStore, PreferenceStore};
use crate::error::{AppError, AppResult};
use crate::models::{Catalog, Session};
use crate::services::{Recommender, VoteReconciler};

/// Sessions idle longer than this are dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// A live session and when a request last touched it
struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn PreferenceStore>,
    pub recommender: Arc<Recommender>,
    pub reconciler: Arc<VoteReconciler>,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    session_ttl: Duration,
}

impl AppState {
    /// Wires the catalog, store and recommendation engine together
    pub fn new(catalog: Catalog, store: Arc<dyn PreferenceStore>, seed: Option<u64>) -> Self {
        let catalog = Arc::new(catalog);
        let recommender = Arc::new(Recommender::new(catalog.clone(), seed));
        let reconciler = Arc::new(VoteReconciler::new(store.clone(), recommender.clone()));

        Self {
            catalog,
            store,
            recommender,
            reconciler,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Built-in catalog over an in-memory store
    pub fn in_memory(seed: Option<u64>) -> Self {
        Self::new(
            Catalog::builtin(),
            Arc::new(InMemoryPreferenceStore::new()),
            seed,
        )
    }

    /// Overrides how long an untouched session survives
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Registers a new anonymous session and returns its id
    pub async fn create_session(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        let mut sessions = self.sessions.write().await;
        Self::evict_idle(&mut sessions, self.session_ttl);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session = %id, active = sessions.len(), "Session created");
        id
    }

    /// Looks up a session and marks it as used. Each session is locked on its
    /// own so one client's events apply in order without blocking others.
    pub async fn session(&self, id: Uuid) -> AppResult<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.write().await;
        Self::evict_idle(&mut sessions, self.session_ttl);

        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} does not exist", id)))?;
        entry.last_seen = Instant::now();
        Ok(entry.session.clone())
    }

    /// Removes a session. Unknown ids are `NotFound`.
    pub async fn remove_session(&self, id: Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} does not exist", id)))?;
        tracing::debug!(session = %id, active = sessions.len(), "Session removed");
        Ok(())
    }

    /// Drops every session idle for at least the configured TTL
    pub async fn evict_idle_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        Self::evict_idle(&mut sessions, self.session_ttl)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict_idle(sessions: &mut HashMap<Uuid, SessionEntry>, ttl: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, active = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Spawns a background task that sweeps idle sessions every `every`
    pub fn spawn_session_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                state.evict_idle_sessions().await;
            }
        })
    }
}
