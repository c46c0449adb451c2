use crate::events::Subscription;
use pegboard_types::{peg_position, GameState, PegPosition, WIN_SCORE};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::{sync::broadcast, task::JoinHandle, time::sleep};
use tracing::{debug, error, info};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Board layout and animation pacing.
#[derive(Clone, Copy, Debug)]
pub struct BoardConfig {
    /// Spacing between adjacent track holes.
    pub cell_size: f32,
    /// How long a peg takes to travel from its old score to the new one.
    pub move_duration: Duration,
    /// Pacing of intermediate position updates.
    pub frame_interval: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.5,
            move_duration: Duration::from_secs(2),
            frame_interval: Duration::from_millis(16),
        }
    }
}

/// Notification published to board subscribers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoardEvent {
    /// The animated peg reached an intermediate (or final) position.
    Moved { player: usize, position: PegPosition },
    /// The player's score reached the winning hole.
    Won { player: usize },
}

struct Inner {
    scores: [u32; 2],
    pegs: [Vec<PegPosition>; 2],
}

/// Reconciles reported scores with peg positions on the board track.
///
/// Each player keeps at most two pegs (forward and back peg); the second
/// appears the first time a player's score changes, and the most recently
/// placed peg is the one that moves. Score changes animate as linear
/// interpolation between the old and new track holes, one task per
/// player, so both players can peg at once without interfering.
///
/// The animator trusts the server's scores: a decrease animates backward
/// the same way an increase animates forward.
#[derive(Clone)]
pub struct Board {
    config: BoardConfig,
    inner: Arc<RwLock<Inner>>,
    event_tx: broadcast::Sender<BoardEvent>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let origin = peg_position(0, config.cell_size);
        Self {
            config,
            inner: Arc::new(RwLock::new(Inner {
                scores: [0, 0],
                pegs: [vec![origin], vec![origin]],
            })),
            event_tx,
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to peg movement and win notifications.
    pub fn subscribe(&self) -> Subscription<BoardEvent> {
        Subscription::new(self.event_tx.subscribe())
    }

    /// Last-known score per player.
    pub fn scores(&self) -> [u32; 2] {
        match self.inner.read() {
            Ok(inner) => inner.scores,
            Err(e) => {
                error!("failed to acquire read lock in scores: {}", e);
                [0, 0]
            }
        }
    }

    /// Current peg positions for a player, oldest first.
    pub fn pegs(&self, player: usize) -> Vec<PegPosition> {
        match self.inner.read() {
            Ok(inner) => inner.pegs.get(player).cloned().unwrap_or_default(),
            Err(e) => {
                error!("failed to acquire read lock in pegs: {}", e);
                Vec::new()
            }
        }
    }

    /// Reconcile a freshly fetched state: record both players' scores and
    /// start an animation for each one that changed. No-op unless the
    /// state carries both seats.
    pub fn apply(&self, state: &GameState) {
        if state.players.len() < 2 {
            return;
        }

        let mut changes = Vec::new();
        {
            let mut inner = match self.inner.write() {
                Ok(inner) => inner,
                Err(e) => {
                    error!("failed to acquire write lock in apply: {}", e);
                    return;
                }
            };
            for player in 0..2 {
                let new = state.players[player].score;
                let old = inner.scores[player];
                if new != old {
                    inner.scores[player] = new;
                    changes.push((player, old, new));
                }
            }
        }

        for (player, old, new) in changes {
            debug!(player, old, new, "score changed, animating peg");
            let board = self.clone();
            let handle = tokio::spawn(async move {
                board.animate(player, old, new).await;
            });
            self.track(handle);
        }
    }

    /// Move the player's leading peg from `position(old)` to
    /// `position(new)` over the configured duration. Emits a [`BoardEvent::Moved`]
    /// per frame and, once the peg lands on a winning hole, exactly one
    /// [`BoardEvent::Won`].
    pub async fn animate(&self, player: usize, old: u32, new: u32) {
        if player >= 2 || old == new {
            return;
        }

        let target = peg_position(new, self.config.cell_size);
        let Some(start) = self.place_leading_peg(player, old) else {
            return;
        };

        let duration = self.config.move_duration;
        let frame = self.config.frame_interval;
        let mut elapsed = Duration::ZERO;
        loop {
            sleep(frame).await;
            elapsed += frame;
            let t = if duration.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
            };
            // Land exactly on the target hole rather than a rounded lerp.
            let position = if t >= 1.0 { target } else { start.lerp(target, t) };
            self.move_leading_peg(player, position);
            self.publish(BoardEvent::Moved { player, position });
            if t >= 1.0 {
                break;
            }
        }

        if new >= WIN_SCORE {
            info!(player, score = new, "player pegged out");
            self.publish(BoardEvent::Won { player });
        }
    }

    /// Clear the board: stop any running animations and re-seed a single
    /// peg per player at the starting hole.
    pub fn reset(&self) {
        let handles: Vec<JoinHandle<()>> = match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(e) => {
                error!("failed to acquire task lock in reset: {}", e);
                Vec::new()
            }
        };
        for handle in handles {
            handle.abort();
        }

        let origin = peg_position(0, self.config.cell_size);
        match self.inner.write() {
            Ok(mut inner) => {
                inner.scores = [0, 0];
                inner.pegs = [vec![origin], vec![origin]];
            }
            Err(e) => error!("failed to acquire write lock in reset: {}", e),
        }
    }

    /// Ensure the player has a leading peg parked at `position(old)` and
    /// return its position. The second peg is created lazily on the first
    /// score change.
    fn place_leading_peg(&self, player: usize, old: u32) -> Option<PegPosition> {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(e) => {
                error!("failed to acquire write lock in place_leading_peg: {}", e);
                return None;
            }
        };
        let pegs = &mut inner.pegs[player];
        if pegs.len() < 2 {
            pegs.push(peg_position(old, self.config.cell_size));
        }
        pegs.last().copied()
    }

    fn move_leading_peg(&self, player: usize, position: PegPosition) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(e) => {
                error!("failed to acquire write lock in move_leading_peg: {}", e);
                return;
            }
        };
        if let Some(peg) = inner.pegs[player].last_mut() {
            *peg = position;
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.retain(|task| !task.is_finished());
                tasks.push(handle);
            }
            Err(e) => error!("failed to acquire task lock in track: {}", e),
        }
    }

    fn publish(&self, event: BoardEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("no subscribers for board event");
        }
    }
}
