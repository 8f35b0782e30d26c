use crate::config::{BALL_SIZE, HEIGHT, PADDLE_HEIGHT, PADDLE_WIDTH, WIDTH};
use crate::entity::{Direction, Side};
use crate::error::RenderResult;
use crate::game::Game;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Key down (`held: true`) or key up (`held: false`) for one paddle direction
    Move {
        side: Side,
        direction: Direction,
        held: bool,
    },
    TogglePause,
    Reset,
    Quit,
}

/// What a bound key does, independent of whether it went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Side, Direction),
    Command(Input),
}

/// Turns one key event into game input. Paddle keys follow the key state;
/// commands fire on the first key-down only, not on auto-repeat or release.
pub fn key_input(action: KeyAction, down: bool, repeat: bool) -> Option<Input> {
    match action {
        KeyAction::Move(side, direction) => Some(Input::Move {
            side,
            direction,
            held: down,
        }),
        KeyAction::Command(input) if down && !repeat => Some(input),
        KeyAction::Command(_) => None,
    }
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> RenderResult<()>;

    /// Render the current game state
    fn render<R: Rng>(&mut self, game: &Game<R>) -> RenderResult<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> RenderResult<()>;

    /// Poll for the next pending input, if any
    fn poll_input(&mut self) -> RenderResult<Option<Input>>;
}

/// Colour roles used by the scene; each backend maps them to its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Background,
    CenterLine,
    Foreground,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Score,
    Banner,
}

/// A 2D drawing target addressed in field coordinates (`WIDTH` x `HEIGHT`).
pub trait Surface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    /// Draws `text` horizontally and vertically centred on `(x, y)`.
    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, size: TextSize, color: Color);
}

const DASH_WIDTH: f64 = 4.0;
const DASH_HEIGHT: f64 = 12.0;
const DASH_SPACING: f64 = 24.0;
// Vertical middle of the 28px score line whose baseline sits at y=40
const SCORE_Y: f64 = 30.0;

pub fn score_text<R: Rng>(game: &Game<R>) -> String {
    format!("{} : {}", game.left.score, game.right.score)
}

/// The centre banner, if the game is not running.
pub fn banner_text<R: Rng>(game: &Game<R>) -> Option<String> {
    if let Some(winner) = game.winner() {
        Some(format!("{} wins! (R to reset)", winner.name()))
    } else if game.is_paused() {
        Some("Paused (Space to resume)".to_string())
    } else {
        None
    }
}

/// Paints one frame. Shared by every backend so they all show the same scene.
pub fn draw_scene<R: Rng, S: Surface>(game: &Game<R>, surface: &mut S) {
    surface.fill_rect(0.0, 0.0, WIDTH, HEIGHT, Color::Background);

    let mut y = 0.0;
    while y < HEIGHT {
        surface.fill_rect(
            WIDTH / 2.0 - DASH_WIDTH / 2.0,
            y,
            DASH_WIDTH,
            DASH_HEIGHT,
            Color::CenterLine,
        );
        y += DASH_SPACING;
    }

    for paddle in [&game.left, &game.right] {
        surface.fill_rect(paddle.x, paddle.y, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Foreground);
    }
    surface.fill_rect(game.ball.x, game.ball.y, BALL_SIZE, BALL_SIZE, Color::Foreground);

    surface.fill_text_centered(
        &score_text(game),
        WIDTH / 2.0,
        SCORE_Y,
        TextSize::Score,
        Color::Score,
    );

    if let Some(banner) = banner_text(game) {
        surface.fill_text_centered(
            &banner,
            WIDTH / 2.0,
            HEIGHT / 2.0,
            TextSize::Banner,
            Color::Foreground,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WIN_SCORE;

    #[derive(Default)]
    struct RecordingSurface {
        rects: Vec<(f64, f64, f64, f64, Color)>,
        texts: Vec<(String, TextSize)>,
        text_positions: Vec<(f64, f64)>,
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
            self.rects.push((x, y, w, h, color));
        }

        fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, size: TextSize, _color: Color) {
            self.texts.push((text.to_string(), size));
            self.text_positions.push((x, y));
        }
    }

    fn paint(game: &Game) -> RecordingSurface {
        let mut surface = RecordingSurface::default();
        draw_scene(game, &mut surface);
        surface
    }

    #[test]
    fn test_scene_draws_background_paddles_and_ball() {
        let mut game = Game::with_seed(1);
        game.left.y = 120.0;
        game.ball.x = 222.0;
        game.ball.y = 111.0;

        let surface = paint(&game);

        assert_eq!(surface.rects[0], (0.0, 0.0, WIDTH, HEIGHT, Color::Background));
        let foreground: Vec<_> = surface
            .rects
            .iter()
            .filter(|r| r.4 == Color::Foreground)
            .collect();
        assert_eq!(foreground.len(), 3);
        assert_eq!(*foreground[0], (30.0, 120.0, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Foreground));
        assert_eq!(*foreground[1], (758.0, 250.0, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Foreground));
        assert_eq!(*foreground[2], (222.0, 111.0, BALL_SIZE, BALL_SIZE, Color::Foreground));
    }

    #[test]
    fn test_center_line_is_dashed() {
        let surface = paint(&Game::with_seed(1));
        let dashes = surface
            .rects
            .iter()
            .filter(|r| r.4 == Color::CenterLine)
            .count();
        assert_eq!(dashes, 25); // 0, 24, ..., 576
    }

    #[test]
    fn test_score_text_while_running() {
        let mut game = Game::with_seed(1);
        game.left.score = 3;
        game.right.score = 7;

        let surface = paint(&game);
        assert_eq!(surface.texts, vec![("3 : 7".to_string(), TextSize::Score)]);
    }

    #[test]
    fn test_winner_banner() {
        let mut game = Game::with_seed(1);
        game.left.score = 4;
        game.right.score = WIN_SCORE;
        game.running = false;

        let surface = paint(&game);
        assert_eq!(surface.texts.len(), 2);
        assert_eq!(surface.texts[1].0, "Right wins! (R to reset)");
        assert_eq!(surface.texts[1].1, TextSize::Banner);
    }

    #[test]
    fn test_paused_banner() {
        let mut game = Game::with_seed(1);
        game.toggle_pause();

        assert_eq!(banner_text(&game).as_deref(), Some("Paused (Space to resume)"));
    }

    #[test]
    fn test_score_sits_near_top_center() {
        let surface = paint(&Game::with_seed(1));
        // Centred on the line an alphabetic baseline at y=40 would occupy
        assert_eq!(surface.text_positions, vec![(WIDTH / 2.0, 30.0)]);
    }

    #[test]
    fn test_paddle_keys_follow_key_state() {
        let up = KeyAction::Move(Side::Left, Direction::Up);

        assert_eq!(
            key_input(up, true, false),
            Some(Input::Move {
                side: Side::Left,
                direction: Direction::Up,
                held: true
            })
        );
        // Auto-repeat keeps the paddle moving
        assert_eq!(
            key_input(up, true, true),
            Some(Input::Move {
                side: Side::Left,
                direction: Direction::Up,
                held: true
            })
        );
        assert_eq!(
            key_input(up, false, false),
            Some(Input::Move {
                side: Side::Left,
                direction: Direction::Up,
                held: false
            })
        );
    }

    #[test]
    fn test_commands_ignore_repeat_and_release() {
        let pause = KeyAction::Command(Input::TogglePause);
        let reset = KeyAction::Command(Input::Reset);

        assert_eq!(key_input(pause, true, false), Some(Input::TogglePause));
        assert_eq!(key_input(pause, true, true), None);
        assert_eq!(key_input(reset, true, true), None);
        assert_eq!(key_input(reset, false, false), None);
    }

    #[test]
    fn test_held_space_toggles_pause_once() {
        let mut game = Game::with_seed(1);
        let pause = KeyAction::Command(Input::TogglePause);

        // First key-down, three auto-repeats, then release
        let events = [(true, false), (true, true), (true, true), (true, true), (false, false)];
        for (down, repeat) in events {
            if let Some(input) = key_input(pause, down, repeat) {
                game.apply_input(input);
            }
        }

        assert!(game.is_paused());
    }
}
