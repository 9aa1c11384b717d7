use rand::Rng;
use serde::{Deserialize, Serialize};

use super::consts::*;
use super::state::*;

/// The computer's skill, which relaxes while the player keeps returning the ball.
///
/// A higher `difficulty` makes the computer paddle slower and more likely to skip a frame, so lowering it on a
/// long player streak makes the computer sharper.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    difficulty: f32,
    consecutive_hits: u32,
}

impl Default for Opponent {
    fn default() -> Self {
        Self {
            difficulty: INITIAL_DIFFICULTY,
            consecutive_hits: 0,
        }
    }
}

impl Opponent {
    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn consecutive_hits(&self) -> u32 {
        self.consecutive_hits
    }

    pub(crate) fn record_player_hit(&mut self) {
        self.consecutive_hits += 1;
        if self.consecutive_hits > STREAK_THRESHOLD {
            let difficulty = (self.difficulty - DIFFICULTY_STEP).max(MIN_DIFFICULTY);
            if difficulty != self.difficulty {
                log::debug!(
                    "Player streak {}, difficulty {} -> {}",
                    self.consecutive_hits,
                    self.difficulty,
                    difficulty
                );
            }
            self.difficulty = difficulty;
        }
    }

    pub(crate) fn break_streak(&mut self) {
        self.consecutive_hits = 0;
    }

    /// Per-frame speed of the computer paddle.
    pub fn paddle_speed(&self) -> f32 {
        COMPUTER_SPEED * (1.0 - self.difficulty * AI_SLOWDOWN)
    }

    /// Moves the computer paddle one frame toward a noisy guess of where the ball will arrive.
    pub(crate) fn track<R: Rng + ?Sized>(&self, ball: &Ball, paddle: &mut Paddle, rng: &mut R) {
        if rng.random::<f32>() < AI_SKIP_CHANCE * self.difficulty {
            return;
        }

        let target =
            predict_intercept(ball) + rng.random_range(-PREDICTION_ERROR..=PREDICTION_ERROR);
        let center = paddle.center();
        if center < target - AI_DEAD_ZONE {
            paddle.move_by(self.paddle_speed());
        } else if center > target + AI_DEAD_ZONE {
            paddle.move_by(-self.paddle_speed());
        }
    }
}

/// Straight-line guess of the ball's height when it reaches the computer paddle, ignoring wall bounces.
///
/// The distance is measured to the paddle's face at [`Side::paddle_x`], not to the court edge.
pub fn predict_intercept(ball: &Ball) -> f32 {
    if ball.vx == 0.0 {
        return ball.y;
    }
    let distance = Side::Computer.paddle_x() - ball.x;
    ball.y + ball.vy * (distance / ball.vx)
}
