use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::*;

/// Something that happened during a frame, for sound effects and scoreboards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongEvent {
    WallBounce,
    PaddleHit(Side),
    Scored(Side),
    GameOver(Side),
}

pub type TickEvents = SmallVec<[PongEvent; 4]>;

/// Read-only view handed to the renderer once per frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PongSnapshot {
    pub frame: u64,
    pub phase: Phase,
    pub ball: Ball,
    pub player_paddle: Paddle,
    pub computer_paddle: Paddle,
    pub score: Score,
    pub difficulty: f32,
    pub consecutive_hits: u32,
}

/// Player versus computer pong, first to [`WIN_SCORE`].
///
/// [`Pong::step`] advances exactly one 60 Hz frame. Hosts with a variable clock call [`Pong::advance`] with
/// the elapsed time instead, which runs as many whole frames as have accumulated.
#[derive(Clone, Debug)]
pub struct Pong {
    phase: Phase,
    ball: Ball,
    player: Paddle,
    computer: Paddle,
    score: Score,
    opponent: Opponent,
    player_target: Option<f32>,
    accumulator: f32,
    frame: u64,
    rng: SmallRng,
}

impl Pong {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            phase: Phase::NotStarted,
            ball: Ball::centered(SERVE_SPEED_X, SERVE_SPEED_Y),
            player: Paddle::centered(),
            computer: Paddle::centered(),
            score: Score::default(),
            opponent: Opponent::default(),
            player_target: None,
            accumulator: 0.0,
            frame: 0,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.phase.winner()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn player_paddle(&self) -> Paddle {
        self.player
    }

    pub fn computer_paddle(&self) -> Paddle {
        self.computer
    }

    pub fn difficulty(&self) -> f32 {
        self.opponent.difficulty()
    }

    pub fn consecutive_hits(&self) -> u32 {
        self.opponent.consecutive_hits()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            frame: self.frame,
            phase: self.phase,
            ball: self.ball,
            player_paddle: self.player,
            computer_paddle: self.computer,
            score: self.score,
            difficulty: self.opponent.difficulty(),
            consecutive_hits: self.opponent.consecutive_hits(),
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            log::debug!("Pong started");
            self.phase = Phase::Playing;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => {
                log::trace!("Pause ignored in {:?}", other);
                return;
            }
        };
        self.player_target = None;
        self.accumulator = 0.0;
        log::debug!("Pong {:?}", self.phase);
    }

    /// Back to a fresh, not yet started match. The random stream carries on.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(rng);
        log::debug!("Pong reset");
    }

    /// Latest pointer position for the top of the player's paddle, applied on the next frame.
    ///
    /// Ignored unless the game is running.
    pub fn set_player_target(&mut self, y: f32) {
        if self.phase.is_running() {
            self.player_target = Some(y);
        }
    }

    /// Runs the whole frames covered by `dt` seconds of real time.
    pub fn advance(&mut self, dt: f32) -> TickEvents {
        let mut events = TickEvents::new();
        if !self.phase.is_running() {
            self.accumulator = 0.0;
            return events;
        }

        if dt.is_finite() {
            self.accumulator += dt.clamp(0.0, MAX_DT);
        }
        while self.accumulator >= FIXED_DT && self.phase.is_running() {
            self.accumulator -= FIXED_DT;
            events.extend(self.step());
        }
        events
    }

    /// Advances one frame.
    pub fn step(&mut self) -> TickEvents {
        let mut events = TickEvents::new();
        if !self.phase.is_running() {
            return events;
        }
        self.frame += 1;

        if let Some(y) = self.player_target.take() {
            self.player.set_y(y);
        }

        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;

        if self.ball.bounce_off_walls() {
            events.push(PongEvent::WallBounce);
        }

        if self.ball.moving_toward(Side::Computer) {
            self.opponent
                .track(&self.ball, &mut self.computer, &mut self.rng);
        }

        if self.ball.moving_toward(Side::Player) && self.ball.touches(Side::Player, &self.player) {
            self.return_ball(Side::Player);
            self.opponent.record_player_hit();
            events.push(PongEvent::PaddleHit(Side::Player));
        }

        if self.ball.moving_toward(Side::Computer)
            && self.ball.touches(Side::Computer, &self.computer)
        {
            self.return_ball(Side::Computer);
            self.opponent.break_streak();
            events.push(PongEvent::PaddleHit(Side::Computer));
        }

        if self.ball.x < 0.0 && self.ball.moving_toward(Side::Player) {
            self.award_point(Side::Computer, &mut events);
        } else if self.ball.x > COURT_WIDTH && self.ball.moving_toward(Side::Computer) {
            self.award_point(Side::Player, &mut events);
        }

        events
    }

    /// Sends the ball back with spin taken from where it met the paddle.
    fn return_ball(&mut self, side: Side) {
        let paddle = match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        };
        self.ball.vy = (self.ball.y - paddle.center()) * SPIN_FACTOR;
        self.ball.vx = match side {
            Side::Player => self.ball.vx.abs(),
            Side::Computer => -self.ball.vx.abs(),
        };
        log::trace!("{} returned the ball at {:?}", side, self.ball);
    }

    fn award_point(&mut self, side: Side, events: &mut TickEvents) {
        let points = self.score.add(side);
        self.opponent.break_streak();
        events.push(PongEvent::Scored(side));
        log::debug!(
            "{} scored, {}-{}",
            side,
            self.score.player,
            self.score.computer
        );

        if points >= WIN_SCORE {
            self.phase = Phase::GameOver(side);
            self.player_target = None;
            events.push(PongEvent::GameOver(side));
            log::debug!("Pong over, {} wins", side);
        } else {
            self.reset_ball();
        }
    }

    /// Serves from the center back the other way with a fresh vertical speed.
    fn reset_ball(&mut self) {
        let vy = self
            .rng
            .random_range(-RESET_MAX_SPEED_Y..RESET_MAX_SPEED_Y);
        self.ball = Ball::centered(-self.ball.vx, vy);
    }
}
