//! Local backend for pegboard.
//!
//! Serves the three endpoints the client speaks (`GET /deal`,
//! `GET /status`, `POST /reset`) over an in-memory table. Deals are real
//! shuffled hands, but no cribbage scoring runs here: scores and phases
//! only change when a test or operator scripts them through [`Simulator`]'s
//! hooks. The production server is out of scope for this repository.

use axum::{
    extract::State as AxumState,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use pegboard_types::{Card, GameState, Player, Suit};
use rand::seq::SliceRandom;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Cards dealt to each player in a two-player game.
const HAND_SIZE: usize = 6;

#[derive(Default)]
struct State {
    game: GameState,
    /// Requests left to fail with a 500 before serving normally again.
    fail_queue: u32,
    /// Total `/status` requests served (or deliberately failed).
    status_requests: u64,
}

/// Scriptable in-memory table shared by the HTTP handlers and tests.
#[derive(Clone, Default)]
pub struct Simulator {
    state: Arc<RwLock<State>>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh game: shuffled deck, six cards per player, empty
    /// crib, no starter cut yet. Non-dealer leads.
    pub fn deal(&self) -> GameState {
        let mut deck: Vec<Card> = Suit::ALL
            .iter()
            .flat_map(|&suit| (1..=13).map(move |rank| Card::new(suit, rank)))
            .collect();
        deck.shuffle(&mut rand::thread_rng());

        let mut players = vec![
            Player::new(Uuid::new_v4().to_string(), "Player 1"),
            Player::new(Uuid::new_v4().to_string(), "Player 2"),
        ];
        for player in players.iter_mut() {
            player.hand = deck.split_off(deck.len() - HAND_SIZE);
        }

        let game = GameState {
            players,
            crib: Vec::new(),
            starter: None,
            phase: "playing".to_string(),
            turn: 1,
            dealer: 0,
        };

        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in deal: {}", e);
                return game;
            }
        };
        state.game = game.clone();
        game
    }

    /// Current table snapshot; the empty not-yet-dealt state before the
    /// first deal.
    pub fn status(&self) -> GameState {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in status: {}", e);
                return GameState::default();
            }
        };
        state.status_requests += 1;
        state.game.clone()
    }

    /// Clears the table back to the not-yet-dealt state.
    pub fn reset(&self) {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in reset: {}", e);
                return;
            }
        };
        state.game = GameState::default();
    }

    /// Replaces the table wholesale. Test hook.
    pub fn set_state(&self, game: GameState) {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in set_state: {}", e);
                return;
            }
        };
        state.game = game;
    }

    /// Overwrites both players' scores, as if pegging had happened
    /// server-side. Test hook; ignores seats that were never dealt.
    pub fn set_scores(&self, scores: [u32; 2]) {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in set_scores: {}", e);
                return;
            }
        };
        for (player, score) in state.game.players.iter_mut().zip(scores) {
            player.score = score;
        }
    }

    /// Makes the next `n` requests fail with a 500. Test hook.
    pub fn fail_next(&self, n: u32) {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in fail_next: {}", e);
                return;
            }
        };
        state.fail_queue = n;
    }

    /// Number of `/status` requests seen so far.
    pub fn status_requests(&self) -> u64 {
        match self.state.read() {
            Ok(state) => state.status_requests,
            Err(e) => {
                tracing::error!("failed to acquire read lock in status_requests: {}", e);
                0
            }
        }
    }

    fn take_failure(&self) -> bool {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("failed to acquire write lock in take_failure: {}", e);
                return false;
            }
        };
        if state.fail_queue == 0 {
            return false;
        }
        state.fail_queue -= 1;
        true
    }
}

pub struct Api {
    simulator: Simulator,
}

impl Api {
    pub fn new(simulator: Simulator) -> Self {
        Self { simulator }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/deal", get(deal))
            .route("/status", get(status))
            .route("/reset", post(reset))
            .with_state(self.simulator.clone())
    }
}

async fn deal(AxumState(simulator): AxumState<Simulator>) -> impl IntoResponse {
    if simulator.take_failure() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let game = simulator.deal();
    tracing::info!(phase = %game.phase, "dealt new game");
    Json(game).into_response()
}

async fn status(AxumState(simulator): AxumState<Simulator>) -> impl IntoResponse {
    if simulator.take_failure() {
        // Still counts as a served request so tests can observe poll cadence.
        simulator.status();
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(simulator.status()).into_response()
}

async fn reset(AxumState(simulator): AxumState<Simulator>) -> StatusCode {
    if simulator.take_failure() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    simulator.reset();
    tracing::info!("table reset");
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deal_shape() {
        let simulator = Simulator::new();
        let game = simulator.deal();

        assert_eq!(game.players.len(), 2);
        assert_eq!(game.phase, "playing");
        assert_eq!(game.dealer, 0);
        assert_eq!(game.turn, 1);
        assert!(game.crib.is_empty());
        assert!(game.starter.is_none());

        let mut seen = HashSet::new();
        for player in &game.players {
            assert_eq!(player.hand.len(), HAND_SIZE);
            assert_eq!(player.score, 0);
            assert!(!player.id.is_empty());
            seen.extend(player.hand.iter().copied());
        }
        // No card dealt to both hands.
        assert_eq!(seen.len(), 2 * HAND_SIZE);
    }

    #[test]
    fn test_status_reflects_deal_and_reset() {
        let simulator = Simulator::new();
        assert_eq!(simulator.status(), GameState::default());

        let dealt = simulator.deal();
        assert_eq!(simulator.status(), dealt);

        simulator.reset();
        assert_eq!(simulator.status(), GameState::default());
    }

    #[test]
    fn test_set_scores() {
        let simulator = Simulator::new();
        simulator.deal();
        simulator.set_scores([3, 7]);
        let game = simulator.status();
        assert_eq!(game.players[0].score, 3);
        assert_eq!(game.players[1].score, 7);
    }

    #[test]
    fn test_set_state_overrides_table() {
        let simulator = Simulator::new();
        simulator.deal();

        let mut game = simulator.status();
        game.starter = Some(Card::new(Suit::Hearts, 11));
        game.phase = "counting".to_string();
        simulator.set_state(game.clone());

        assert_eq!(simulator.status(), game);
    }

    #[test]
    fn test_set_scores_before_deal_is_noop() {
        let simulator = Simulator::new();
        simulator.set_scores([3, 7]);
        assert_eq!(simulator.status(), GameState::default());
    }

    #[test]
    fn test_fail_queue_drains() {
        let simulator = Simulator::new();
        simulator.fail_next(2);
        assert!(simulator.take_failure());
        assert!(simulator.take_failure());
        assert!(!simulator.take_failure());
    }

    #[test]
    fn test_status_request_counter() {
        let simulator = Simulator::new();
        assert_eq!(simulator.status_requests(), 0);
        simulator.status();
        simulator.status();
        assert_eq!(simulator.status_requests(), 2);
    }
}
