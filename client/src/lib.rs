pub mod board;
pub mod client;
pub mod events;
pub mod poller;
pub mod store;

pub use board::{Board, BoardConfig, BoardEvent};
pub use client::{Client, RetryPolicy, DEFAULT_BASE_URL};
pub use events::Subscription;
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use store::{Store, Update};

use thiserror::Error;

/// Error type for client operations.
///
/// `Transport` and `Failed` are the transport class (the network or the
/// HTTP layer let us down); `Parse` means the server answered with a body
/// that does not match the game-state schema. All are terminal for the
/// single call that produced them and none of them mutate held state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed: {0}")]
    Failed(reqwest::StatusCode),
    #[error("malformed game state: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
