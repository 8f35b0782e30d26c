use crate::config::{
    BALL_SIZE, BALL_SPEED_INC, BALL_SPEED_START, HEIGHT, MIN_SPIN_SPEED, PADDLE_WIDTH, WIDTH,
    WIN_SCORE,
};
use crate::entity::{Ball, Paddle, Side};
use crate::renderer::Input;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Match state: both paddles, the ball, and whether the simulation is running.
///
/// The random source only decides serve directions, and is injected so tests
/// can seed it.
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub running: bool,
    rng: R,
}

impl Game<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(rng: R) -> Self {
        let mut game = Self {
            left: Paddle::new(Side::Left),
            right: Paddle::new(Side::Right),
            ball: Ball::new(WIDTH / 2.0, HEIGHT / 2.0, BALL_SPEED_START, BALL_SPEED_START),
            running: true,
            rng,
        };
        game.reset();
        game
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn apply_input(&mut self, input: Input) {
        match input {
            Input::Move {
                side,
                direction,
                held,
            } => self.paddle_mut(side).set_intent(direction, held),
            Input::TogglePause => self.toggle_pause(),
            Input::Reset => self.reset(),
            // Quitting belongs to the loop driver
            Input::Quit => {}
        }
    }

    /// Pauses or resumes play. A finished match stays frozen until `reset`.
    pub fn toggle_pause(&mut self) {
        if self.is_won() {
            return;
        }
        self.running = !self.running;
        log::info!("{}", if self.running { "Resumed" } else { "Paused" });
    }

    /// Advances the match by one tick.
    pub fn update(&mut self) {
        if !self.running {
            return;
        }

        self.left.advance();
        self.right.advance();

        self.ball.advance();

        if self.ball.bounce_off_walls() {
            log::trace!("Wall bounce at y={:.1}, vy={:.2}", self.ball.y, self.ball.vy);
        }

        // Left paddle
        if self.ball.x <= self.left.right_edge()
            && self.ball.x >= self.left.x
            && self.left.overlaps_vertically(&self.ball)
        {
            self.ball.vx = self.ball.vx.abs() + BALL_SPEED_INC;
            let hit_pos = self.left.hit_offset(&self.ball);
            self.apply_spin(hit_pos);
            // Move clear of the paddle so the same overlap cannot fire again
            self.ball.x = self.left.right_edge();
            log::debug!(
                "Left paddle hit: offset={:.2} vx={:.2} vy={:.2}",
                hit_pos,
                self.ball.vx,
                self.ball.vy
            );
        }

        // Right paddle
        if self.ball.right_edge() >= self.right.x
            && self.ball.right_edge() <= self.right.x + PADDLE_WIDTH
            && self.right.overlaps_vertically(&self.ball)
        {
            self.ball.vx = -(self.ball.vx.abs() + BALL_SPEED_INC);
            let hit_pos = self.right.hit_offset(&self.ball);
            self.apply_spin(hit_pos);
            self.ball.x = self.right.x - BALL_SIZE;
            log::debug!(
                "Right paddle hit: offset={:.2} vx={:.2} vy={:.2}",
                hit_pos,
                self.ball.vx,
                self.ball.vy
            );
        }

        if self.ball.right_edge() < 0.0 {
            self.score_point(Side::Right);
        } else if self.ball.x > WIDTH {
            self.score_point(Side::Left);
        }
    }

    /// Keeps the vertical direction, enforces a minimum vertical speed, then adds
    /// the hit offset. Spin accumulates over a rally and is only cleared by a serve.
    fn apply_spin(&mut self, hit_pos: f64) {
        let sign = if self.ball.vy < 0.0 { -1.0 } else { 1.0 };
        self.ball.vy = sign * self.ball.vy.abs().max(MIN_SPIN_SPEED);
        self.ball.vy += hit_pos;
    }

    fn score_point(&mut self, scorer: Side) {
        let paddle = self.paddle_mut(scorer);
        paddle.score += 1;
        log::info!(
            "{} scores: {} - {}",
            scorer.name(),
            self.left.score,
            self.right.score
        );

        if self.check_win() {
            // Freeze with the ball where it left the field
            self.running = false;
            log::info!("{} wins the match", scorer.name());
        } else {
            self.serve();
        }
    }

    /// Soft reset: re-centre the ball and send it off diagonally at starting speed.
    /// Scores, paddles and the running flag are left alone.
    pub fn serve(&mut self) {
        let dir_x = if self.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let dir_y = if self.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        self.ball = Ball::new(
            WIDTH / 2.0,
            HEIGHT / 2.0,
            dir_x * BALL_SPEED_START,
            dir_y * BALL_SPEED_START,
        );
    }

    /// Full reset: new serve, paddles centred, scores zeroed, play resumed.
    pub fn reset(&mut self) {
        self.serve();
        self.left.recenter();
        self.right.recenter();
        self.left.score = 0;
        self.right.score = 0;
        self.running = true;
        log::info!("New match");
    }

    pub fn check_win(&self) -> bool {
        self.left.score >= WIN_SCORE || self.right.score >= WIN_SCORE
    }

    pub fn is_won(&self) -> bool {
        !self.running && self.check_win()
    }

    pub fn is_paused(&self) -> bool {
        !self.running && !self.check_win()
    }

    /// The side with the strictly higher score, once the match is over.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_won() {
            return None;
        }
        if self.left.score > self.right.score {
            Some(Side::Left)
        } else if self.right.score > self.left.score {
            Some(Side::Right)
        } else {
            None
        }
    }
}
