use core::fmt;
use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    /// Left edge of this side's paddle.
    pub const fn paddle_x(self) -> f32 {
        match self {
            Self::Player => 0.0,
            Self::Computer => COURT_WIDTH - PADDLE_WIDTH,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Computer,
            Self::Computer => Self::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Player => "player",
            Self::Computer => "computer",
        })
    }
}

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing <-> Paused
/// - Playing -> GameOver
/// - any -> NotStarted (reset)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    Playing,
    Paused,
    GameOver(Side),
}

impl Phase {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::GameOver(side) => Some(side),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Ball {
    pub const fn centered(vx: f32, vy: f32) -> Self {
        Self {
            x: COURT_WIDTH / 2.0,
            y: COURT_HEIGHT / 2.0,
            vx,
            vy,
        }
    }

    pub fn moving_toward(&self, side: Side) -> bool {
        match side {
            Side::Player => self.vx < 0.0,
            Side::Computer => self.vx > 0.0,
        }
    }

    /// Ball center is inside the paddle's vertical span and within a radius of its horizontal extent.
    pub fn touches(&self, side: Side, paddle: &Paddle) -> bool {
        let left = side.paddle_x();
        self.y > paddle.y
            && self.y < paddle.bottom()
            && self.x > left - BALL_RADIUS
            && self.x < left + PADDLE_WIDTH + BALL_RADIUS
    }

    /// Reflects off the top and bottom walls, returning whether it bounced.
    pub(crate) fn bounce_off_walls(&mut self) -> bool {
        if self.y < 0.0 {
            self.y = -self.y;
            self.vy = self.vy.abs();
            true
        } else if self.y > COURT_HEIGHT {
            self.y = 2.0 * COURT_HEIGHT - self.y;
            self.vy = -self.vy.abs();
            true
        } else {
            false
        }
    }
}

/// A paddle, positioned by its top edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f32,
}

impl Paddle {
    pub const MAX_Y: f32 = COURT_HEIGHT - PADDLE_HEIGHT;

    pub const fn centered() -> Self {
        Self {
            y: (COURT_HEIGHT - PADDLE_HEIGHT) / 2.0,
        }
    }

    pub fn center(&self) -> f32 {
        self.y + PADDLE_HEIGHT / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + PADDLE_HEIGHT
    }

    /// Moves the top edge to `y`, kept inside the court. Non-finite input is ignored.
    pub fn set_y(&mut self, y: f32) {
        if y.is_finite() {
            self.y = y.clamp(0.0, Self::MAX_Y);
        }
    }

    pub fn move_by(&mut self, delta: f32) {
        self.set_y(self.y + delta);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub computer: u32,
}

impl Score {
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        }
    }

    /// Awards a point and returns the side's new total.
    pub fn add(&mut self, side: Side) -> u32 {
        let points = match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.computer,
        };
        *points += 1;
        *points
    }
}
