use crate::{Client, Store};
use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, warn};

/// Interval between status polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Repeatedly fetches `/status` while a game is active and feeds the
/// results into the [`Store`].
///
/// The loop is wait-then-call: it sleeps the full interval, then fetches,
/// then applies the outcome before sleeping again. Ticks never overlap,
/// and a slow response pushes the next tick back by its own duration. A
/// failed poll is forwarded as an error and the loop keeps ticking; only
/// [`Poller::stop`] or the store going inactive ends it. Each tick checks
/// activity before fetching, so the first tick after a reset exits the
/// loop without touching the network.
///
/// Stopping aborts the task at its await point, so a response still in
/// flight is discarded rather than applied to a stopped game.
pub struct Poller {
    client: Client,
    store: Store,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(client: Client, store: Store) -> Self {
        Self {
            client,
            store,
            interval: DEFAULT_POLL_INTERVAL,
            handle: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Begin polling. If a loop is already running it is fully stopped
    /// first, so two timers can never tick at once.
    pub fn start(&mut self) {
        self.stop();

        let client = self.client.clone();
        let store = self.store.clone();
        let interval = self.interval;
        self.handle = Some(tokio::spawn(async move {
            loop {
                sleep(interval).await;
                if !store.active() {
                    debug!("game inactive, ending status polls");
                    break;
                }
                match client.status().await {
                    Ok(state) => store.apply_polled(state),
                    Err(err) => {
                        warn!(%err, "status poll failed");
                        store.apply_error(err);
                    }
                }
            }
        }));
    }

    /// Stop polling immediately. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
