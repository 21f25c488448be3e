//! In-memory session store. Nothing survives a process restart.
//!
//! Each session sits behind its own `Mutex`; a turn holds the lock from the
//! first validation to the last transcript append, so inputs for one session
//! are strictly sequential while different sessions proceed independently.
//!
//! Sessions untouched for longer than the idle TTL are evicted, on every
//! `create` and by the background sweeper. A session whose lock is held is
//! never evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::Session;

/// Upper bound on how often the background sweeper runs.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A session plus the random source used for its clarification replies.
pub struct SessionSlot {
    pub session: Session,
    pub rng: StdRng,
}

impl SessionSlot {
    fn new(id: Uuid, total_questions: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            session: Session::new(id, total_questions),
            rng,
        }
    }

    /// Discards all conversation state, keeping the session id.
    pub fn reset(&mut self, total_questions: usize) {
        self.session = Session::new(self.session.id, total_questions);
    }
}

pub type SharedSlot = Arc<Mutex<SessionSlot>>;

struct Entry {
    slot: SharedSlot,
    last_active: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    slots: Arc<RwLock<HashMap<Uuid, Entry>>>,
    seed: Option<u64>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(seed: Option<u64>, idle_ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            seed,
            idle_ttl,
        }
    }

    /// Creates a fresh session in the `welcome` phase.
    pub async fn create(&self, total_questions: usize) -> (Uuid, SharedSlot) {
        let id = Uuid::new_v4();
        let slot = Arc::new(Mutex::new(SessionSlot::new(id, total_questions, self.seed)));
        let (evicted, live_sessions) = {
            let mut slots = self.slots.write().await;
            let evicted = evict_idle(&mut slots, self.idle_ttl);
            slots.insert(
                id,
                Entry {
                    slot: slot.clone(),
                    last_active: Instant::now(),
                },
            );
            (evicted, slots.len())
        };
        info!(
            session_id = %id,
            total_questions,
            live_sessions,
            evicted,
            "Session created"
        );
        (id, slot)
    }

    /// Looks up a session and marks it as active.
    pub async fn get(&self, id: Uuid) -> Result<SharedSlot, AppError> {
        let mut slots = self.slots.write().await;
        let entry = slots
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_active = Instant::now();
        Ok(entry.slot.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.slots
            .write()
            .await
            .remove(&id)
            .map(|_| info!(session_id = %id, "Session discarded"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops every idle session. Returns how many were evicted.
    pub async fn evict_idle(&self) -> usize {
        let evicted = evict_idle(&mut *self.slots.write().await, self.idle_ttl);
        if evicted > 0 {
            info!(evicted, "Evicted idle sessions");
        }
        evicted
    }

    /// Runs `evict_idle` periodically until the runtime shuts down.
    pub fn spawn_idle_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let every = self.idle_ttl.min(MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.evict_idle().await;
            }
        })
    }
}

fn evict_idle(slots: &mut HashMap<Uuid, Entry>, idle_ttl: Duration) -> usize {
    let now = Instant::now();
    let before = slots.len();
    slots.retain(|id, entry| {
        let fresh = now.duration_since(entry.last_active) < idle_ttl;
        let busy = entry.slot.try_lock().is_err();
        if !fresh && !busy {
            debug!(session_id = %id, "Evicting idle session");
        }
        fresh || busy
    });
    before - slots.len()
}
