//! Field geometry and gameplay tuning. Everything is fixed at compile time.

// Field
pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

// Paddles
pub const PADDLE_WIDTH: f64 = 12.0;
pub const PADDLE_HEIGHT: f64 = 100.0;
/// Gap between a paddle and its side of the field.
pub const PADDLE_MARGIN: f64 = 30.0;
pub const PADDLE_SPEED: f64 = 6.0; // per tick

// Ball
pub const BALL_SIZE: f64 = 10.0;
pub const BALL_SPEED_START: f64 = 5.0;
/// Added to the horizontal speed on every paddle hit.
pub const BALL_SPEED_INC: f64 = 0.35;
/// Lower bound for the vertical speed right after a paddle hit, before spin is added.
pub const MIN_SPIN_SPEED: f64 = 2.0;

// Score
pub const WIN_SCORE: u32 = 10;

/// Paddle `y` that vertically centres it on the field.
pub fn paddle_center_y() -> f64 {
    HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0
}
