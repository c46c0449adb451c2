use crate::{events::Subscription, Error};
use pegboard_types::GameState;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Notification published to store subscribers.
#[derive(Clone, Debug)]
pub enum Update {
    /// Full replacement state after a successful deal, poll, or reset.
    /// Subscribers never see a partial update.
    State(GameState),
    /// A remote call failed. Held state is untouched; the error is shared
    /// with every subscriber.
    Failed(Arc<Error>),
}

struct Inner {
    state: GameState,
    active: bool,
}

/// Holds the single live [`GameState`] plus the game-active flag.
///
/// The previous state is discarded entirely on every update; there are no
/// deltas. All mutation goes through the `apply_*` methods, serialized by
/// the inner lock, so the store is safe to clone across tasks.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
    update_tx: broadcast::Sender<Update>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: GameState::default(),
                active: false,
            })),
            update_tx,
        }
    }

    /// Snapshot of the held state.
    pub fn state(&self) -> GameState {
        match self.inner.read() {
            Ok(inner) => inner.state.clone(),
            Err(e) => {
                error!("failed to acquire read lock in state: {}", e);
                GameState::default()
            }
        }
    }

    /// Whether a game is in progress (set by deal, cleared by reset).
    pub fn active(&self) -> bool {
        match self.inner.read() {
            Ok(inner) => inner.active,
            Err(e) => {
                error!("failed to acquire read lock in active: {}", e);
                false
            }
        }
    }

    /// Subscribe to state and error notifications.
    pub fn subscribe(&self) -> Subscription<Update> {
        Subscription::new(self.update_tx.subscribe())
    }

    /// A fresh game was dealt: replace the state and mark the game active.
    pub fn apply_dealt(&self, state: GameState) {
        info!(phase = %state.phase, "game dealt");
        self.replace(state.clone(), Some(true));
        self.publish(Update::State(state));
    }

    /// A status poll landed: replace the state, activity unchanged.
    pub fn apply_polled(&self, state: GameState) {
        self.replace(state.clone(), None);
        self.publish(Update::State(state));
    }

    /// The game was reset: back to the empty state, inactive. Calling this
    /// twice in a row is a no-op the second time.
    pub fn apply_reset(&self) {
        info!("game reset");
        self.replace(GameState::default(), Some(false));
        self.publish(Update::State(GameState::default()));
    }

    /// A remote call failed. State and activity are untouched.
    pub fn apply_error(&self, err: Error) {
        self.publish(Update::Failed(Arc::new(err)));
    }

    fn replace(&self, state: GameState, active: Option<bool>) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(e) => {
                error!("failed to acquire write lock in replace: {}", e);
                return;
            }
        };
        inner.state = state;
        if let Some(active) = active {
            inner.active = active;
        }
    }

    fn publish(&self, update: Update) {
        if self.update_tx.send(update).is_err() {
            debug!("no subscribers for store update");
        }
    }
}
