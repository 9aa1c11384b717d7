//! Tuning constants. Speeds are in court units per frame, calibrated against a 60 Hz clock.

/// Court width, the player's paddle sits on the left edge.
pub const COURT_WIDTH: f32 = 800.0;
pub const COURT_HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 100.0;

/// Also the tolerance band around each paddle's horizontal extent used for collisions.
pub const BALL_RADIUS: f32 = 10.0;

/// Ball velocity on the opening serve.
pub const SERVE_SPEED_X: f32 = 7.0;
pub const SERVE_SPEED_Y: f32 = 7.0;

/// Vertical velocity after a point is drawn uniformly from `-RESET_MAX_SPEED_Y..RESET_MAX_SPEED_Y`.
pub const RESET_MAX_SPEED_Y: f32 = 5.0;

/// Vertical velocity per unit of offset between the ball and the paddle center on a hit.
pub const SPIN_FACTOR: f32 = 0.2;

pub const COMPUTER_SPEED: f32 = 6.5;
/// Half-width of the uniform noise added to the computer's intercept prediction.
pub const PREDICTION_ERROR: f32 = 30.0;
/// The computer paddle holds still while its center is this close to the target.
pub const AI_DEAD_ZONE: f32 = 10.0;
/// Per-frame chance to skip moving, scaled by difficulty.
pub const AI_SKIP_CHANCE: f32 = 0.1;
/// Fraction of paddle speed lost per unit of difficulty.
pub const AI_SLOWDOWN: f32 = 0.2;

pub const INITIAL_DIFFICULTY: f32 = 1.0;
pub const MIN_DIFFICULTY: f32 = 0.2;
pub const DIFFICULTY_STEP: f32 = 0.1;
/// Player returns in a row before each further return lowers the difficulty.
pub const STREAK_THRESHOLD: u32 = 5;

pub const WIN_SCORE: u32 = 11;

pub const FRAME_RATE: f32 = 60.0;
pub const FIXED_DT: f32 = 1.0 / FRAME_RATE;
/// Longest elapsed time accepted by a single `advance` call.
pub const MAX_DT: f32 = 0.1;
