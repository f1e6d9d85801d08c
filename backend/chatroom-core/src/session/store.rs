//! Session state storage using the actor pattern.
//!
//! - Actions are sent to a dedicated task over an mpsc channel
//! - The task applies them one at a time with [`SessionState::reduce`]
//! - Each dispatch gets back the [`Transition`] it caused over a oneshot
//! - Reads clone a snapshot out of an `Arc<RwLock<SessionState>>`
//!
//! Because the transition is computed inside the actor, callers can decide
//! "was my request admitted?" from `previous` without racing other tasks.

use crate::error::store::StoreError;
use crate::session::state::{Action, SessionState};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};

const ACTION_CHANNEL_CAPACITY: usize = 100;

/// State before and after one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub previous: SessionState,
    pub current: SessionState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

struct Envelope {
    action: Action,
    reply: oneshot::Sender<Transition>,
}

/// Shared handle to the session state.
///
/// `Clone` is cheap and every clone talks to the same actor.
#[derive(Clone)]
pub struct SessionStore {
    /// Channel to send actions to the actor
    action_tx: Arc<Mutex<Option<mpsc::Sender<Envelope>>>>,

    /// Latest state, written only by the actor
    state: Arc<RwLock<SessionState>>,

    /// Track if actor has been initialized
    actor_init: Arc<Mutex<bool>>,
}

impl SessionStore {
    /// Create a store holding an empty session.
    ///
    /// The actor is spawned lazily on the first dispatch, inside an async context.
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            action_tx: Arc::new(Mutex::new(None)),
            state: Arc::new(RwLock::new(state)),
            actor_init: Arc::new(Mutex::new(false)),
        }
    }

    /// Apply an action and wait until the actor has processed it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ActorUnavailable`] if the actor has stopped.
    pub async fn dispatch(&self, action: Action) -> Result<Transition, StoreError> {
        self.ensure_actor().await;

        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let tx_guard = self.action_tx.lock().await;
            let tx = tx_guard
                .as_ref()
                .ok_or_else(|| StoreError::ActorUnavailable {
                    message: "State actor not initialized".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            tx.send(Envelope {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|e| StoreError::ActorUnavailable {
                message: format!("State actor died: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        reply_rx.await.map_err(|e| StoreError::ActorUnavailable {
            message: format!("State actor dropped the reply: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Current state (read-only copy).
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    async fn ensure_actor(&self) {
        let mut init_guard = self.actor_init.lock().await;
        if !*init_guard {
            let (tx, rx) = mpsc::channel(ACTION_CHANNEL_CAPACITY);
            let state_clone = Arc::clone(&self.state);

            // Store tx BEFORE spawning to avoid race
            let mut tx_guard = self.action_tx.lock().await;
            *tx_guard = Some(tx);
            drop(tx_guard);

            tokio::spawn(session_actor(rx, state_clone));
            *init_guard = true;
            info!("Session state actor spawned");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns every state mutation and applies actions in arrival order.
///
/// Runs until all `SessionStore` handles are dropped.
async fn session_actor(mut action_rx: mpsc::Receiver<Envelope>, state: Arc<RwLock<SessionState>>) {
    info!("Session state actor started");

    while let Some(Envelope { action, reply }) = action_rx.recv().await {
        let name = action.name();

        let transition = {
            let mut state_write = state.write().await;
            let previous = state_write.clone();
            let current = previous.clone().reduce(action);
            *state_write = current.clone();
            Transition { previous, current }
        };

        if transition.changed() {
            debug!("Applied {name}");
        } else {
            debug!("Applied {name} (no change)");
        }

        if reply.send(transition).is_err() {
            warn!("Dispatcher for {name} went away before receiving its transition");
        }
    }

    info!("Session state actor stopped");
}
