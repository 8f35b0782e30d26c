use crate::config::{
    paddle_center_y, BALL_SIZE, HEIGHT, PADDLE_HEIGHT, PADDLE_MARGIN, PADDLE_SPEED, PADDLE_WIDTH,
    WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub score: u32,
    pub up: bool,
    pub down: bool,
}

impl Paddle {
    pub fn new(side: Side) -> Self {
        let x = match side {
            Side::Left => PADDLE_MARGIN,
            Side::Right => WIDTH - PADDLE_MARGIN - PADDLE_WIDTH,
        };
        Self {
            x,
            y: paddle_center_y(),
            score: 0,
            up: false,
            down: false,
        }
    }

    pub fn set_intent(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    /// Applies the movement intent for one tick and keeps the paddle on the field.
    /// Holding both directions cancels out.
    pub fn advance(&mut self) {
        if self.up {
            self.y -= PADDLE_SPEED;
        }
        if self.down {
            self.y += PADDLE_SPEED;
        }
        self.y = self.y.clamp(0.0, HEIGHT - PADDLE_HEIGHT);
    }

    pub fn center_y(&self) -> f64 {
        self.y + PADDLE_HEIGHT / 2.0
    }

    pub fn right_edge(&self) -> f64 {
        self.x + PADDLE_WIDTH
    }

    /// Inclusive overlap of the paddle's and the ball's vertical spans.
    pub fn overlaps_vertically(&self, ball: &Ball) -> bool {
        ball.y + BALL_SIZE >= self.y && ball.y <= self.y + PADDLE_HEIGHT
    }

    /// Where the ball struck, relative to the paddle centre: about -1 at the top
    /// edge, 0 dead centre, about 1 at the bottom edge.
    pub fn hit_offset(&self, ball: &Ball) -> f64 {
        (ball.center_y() - self.center_y()) / (PADDLE_HEIGHT / 2.0)
    }

    pub fn recenter(&mut self) {
        self.y = paddle_center_y();
        self.up = false;
        self.down = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Ball {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy }
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn right_edge(&self) -> f64 {
        self.x + BALL_SIZE
    }

    pub fn center_y(&self) -> f64 {
        self.y + BALL_SIZE / 2.0
    }

    /// Reflects off the top or bottom wall. Returns true on a bounce.
    pub fn bounce_off_walls(&mut self) -> bool {
        if self.y <= 0.0 || self.y + BALL_SIZE >= HEIGHT {
            self.vy = -self.vy;
            // Pull back inside so the ball cannot stick to the wall
            self.y = self.y.clamp(0.0, HEIGHT - BALL_SIZE);
            return true;
        }
        false
    }
}
