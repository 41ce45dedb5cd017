//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory session store.

use crate::config::Config;
use rhyme_workshop_core::{domain::Session, workflow::Workshop};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub workshop: Workshop,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: &Config, workshop: Workshop) -> Self {
        Self {
            workshop,
            sessions: Arc::new(SessionStore::new(config.session_idle_timeout)),
        }
    }
}

//=========================================================================================
// SessionStore (One Entry per Child)
//=========================================================================================

struct Entry {
    session: Arc<Mutex<Session>>,
    last_active: Instant,
}

/// Holds every live session. Each session has its own lock, so a slow
/// assistant call only blocks the session that triggered it.
///
/// A session not looked up for `idle_timeout` is evicted, together with any
/// PDF it holds. Eviction runs on every `create` and from the sweeper task.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a fresh session and returns its ID.
    pub async fn create(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        evict(&mut sessions, self.idle_timeout);
        sessions.insert(
            session_id,
            Entry {
                session: Arc::new(Mutex::new(Session::new())),
                last_active: Instant::now(),
            },
        );
        session_id
    }

    /// Returns the session and marks it as active.
    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&session_id)?;
        entry.last_active = Instant::now();
        Some(entry.session.clone())
    }

    /// Drops a session. Returns `false` if it did not exist.
    pub async fn remove(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    /// Drops every idle session and returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        evict(&mut *self.sessions.write().await, self.idle_timeout)
    }
}

fn evict(sessions: &mut HashMap<Uuid, Entry>, idle_timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_active.elapsed() < idle_timeout);
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!("Evicted {} idle session(s), {} still active.", evicted, sessions.len());
    }
    evicted
}

/// Periodically evicts idle sessions, so memory is reclaimed even when no
/// new session is created.
pub fn spawn_session_sweeper(sessions: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sessions.evict_idle().await;
        }
    })
}
