//! Board-track geometry.
//!
//! The track is laid out as fixed-width rows: thirty holes per row,
//! wrapping upward, so a score maps to `(score % 30, score / 30)` scaled
//! by the board's cell size. The first player to reach 121 pegs out.

use serde::{Deserialize, Serialize};

/// Holes per track row before wrapping to the next row.
pub const POINTS_PER_ROW: u32 = 30;

/// Score at which a player pegs out.
pub const WIN_SCORE: u32 = 121;

/// Local-space position of a peg on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PegPosition {
    pub x: f32,
    pub y: f32,
}

impl PegPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `target`, with `t` clamped to [0, 1].
    pub fn lerp(&self, target: PegPosition, t: f32) -> PegPosition {
        let t = t.clamp(0.0, 1.0);
        PegPosition {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Unscaled `(column, row)` slot for a score.
pub fn track_slot(score: u32) -> (u32, u32) {
    (score % POINTS_PER_ROW, score / POINTS_PER_ROW)
}

/// Peg position for a score, scaled by the board's cell size.
pub fn peg_position(score: u32, cell_size: f32) -> PegPosition {
    let (col, row) = track_slot(score);
    PegPosition::new(col as f32 * cell_size, row as f32 * cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_slot_layout() {
        for score in 0..=180 {
            assert_eq!(track_slot(score), (score % 30, score / 30));
        }
        assert_eq!(track_slot(0), (0, 0));
        assert_eq!(track_slot(29), (29, 0));
        assert_eq!(track_slot(30), (0, 1));
        assert_eq!(track_slot(59), (29, 1));
        assert_eq!(track_slot(60), (0, 2));
        assert_eq!(track_slot(120), (0, 4));
        assert_eq!(track_slot(WIN_SCORE), (1, 4));
    }

    #[test]
    fn test_peg_position_scaling() {
        for score in [0, 5, 29, 30, 61, 120, 121] {
            let (col, row) = track_slot(score);
            let pos = peg_position(score, 0.5);
            assert_eq!(pos, PegPosition::new(col as f32 * 0.5, row as f32 * 0.5));
        }
    }

    #[test]
    fn test_lerp_endpoints_and_clamp() {
        let a = PegPosition::new(0.0, 0.0);
        let b = PegPosition::new(2.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), PegPosition::new(1.0, 0.5));
        // Over- and undershoot clamp to the endpoints.
        assert_eq!(a.lerp(b, 1.5), b);
        assert_eq!(a.lerp(b, -0.5), a);
    }
}
