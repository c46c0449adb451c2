use serde::{Deserialize, Serialize};

use crate::card::Card;

/// One seat at the table. Hands and scores are authoritative on the
/// server; the client only ever replaces them wholesale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub hand: Vec<Card>,
    pub score: u32,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vec::new(),
            score: 0,
        }
    }
}

/// Snapshot of the table as reported by `/deal` and `/status`.
///
/// By convention index 0 is the local player and index 1 the remote
/// player; the server does not enforce this. `Default` is the empty
/// not-yet-dealt state the client starts from (and returns to on reset).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub crib: Vec<Card>,
    #[serde(default)]
    pub starter: Option<Card>,
    /// Server-defined phase label, e.g. "dealing", "playing", "counting".
    #[serde(rename = "state")]
    pub phase: String,
    /// Index of the player whose turn it is.
    pub turn: usize,
    /// Index of the dealing player.
    pub dealer: usize,
}

impl GameState {
    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }
}
