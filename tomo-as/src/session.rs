//! In-memory registry of flow sessions
//!
//! Each browser tab drives its own [`FlowController`]; the admin dashboard
//! chart handles belong to the session that opened them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tomo_common::dashboard::Dashboard;
use tomo_common::{FlowController, QuestionCatalog, SubmissionStore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chart::ChartJsPlotter;

/// One respondent or admin session
pub struct Session {
    pub flow: FlowController,
    pub dashboard: Dashboard<ChartJsPlotter>,
}

impl Session {
    pub fn new(catalog: Arc<QuestionCatalog>, store: SubmissionStore) -> Self {
        Self {
            flow: FlowController::new(catalog, store),
            dashboard: Dashboard::new(ChartJsPlotter),
        }
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// Live sessions keyed by id
///
/// Sessions untouched for longer than the idle TTL are evicted by
/// [`SessionRegistry::evict_idle`]; dropping one releases its charts.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Register a fresh session on the form page
    pub async fn create(&self, catalog: Arc<QuestionCatalog>, store: SubmissionStore) -> Uuid {
        let id = Uuid::new_v4();
        let entry = Entry {
            session: Arc::new(Mutex::new(Session::new(catalog, store))),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        id
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Drop a session; its chart handles are released with it
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Evict sessions idle for longer than the TTL; returns how many
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    /// [`evict_idle`](Self::evict_idle) as seen from `now`
    pub async fn evict_idle_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle sessions ({} remain)", evicted, sessions.len());
        }
        evicted
    }

    /// Run [`evict_idle`](Self::evict_idle) every `period` in the background
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = period.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle().await;
                debug!("Session sweep: {} evicted", evicted);
            }
        })
    }
}
