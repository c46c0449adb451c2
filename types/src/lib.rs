pub mod board;
pub mod card;
pub mod state;

pub use board::{peg_position, track_slot, PegPosition, POINTS_PER_ROW, WIN_SCORE};
pub use card::{Card, Suit};
pub use state::{GameState, Player};
