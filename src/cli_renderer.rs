use crate::config::{HEIGHT, WIDTH};
use crate::entity::{Direction, Side};
use crate::error::{RenderError, RenderResult};
use crate::game::Game;
use crate::renderer::{self, key_input, Color, Input, KeyAction, Renderer, Surface, TextSize};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 16;
/// Rows below the field reserved for the controls line
const INFO_ROWS: u16 = 1;
/// Without key-release reporting, a press counts as held for this long.
/// Terminal auto-repeat keeps extending it while the key stays down.
const HOLD_TIMEOUT: Duration = Duration::from_millis(200);

const CONTROLS: &str = "W/S: left | Up/Down: right | Space: pause | R: reset | Q: quit";

fn term_color(color: Color) -> style::Color {
    match color {
        Color::Background => style::Color::Black,
        Color::CenterLine => style::Color::DarkGrey,
        Color::Foreground => style::Color::White,
        Color::Score => style::Color::Grey,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Foreground,
            bg: Color::Background,
        }
    }
}

/// The field scaled down onto a grid of terminal cells.
#[derive(Debug, Clone)]
pub struct CellBuffer {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    fn to_col(&self, x: f64) -> f64 {
        x * self.cols as f64 / WIDTH
    }

    fn to_row(&self, y: f64) -> f64 {
        y * self.rows as f64 / HEIGHT
    }

    /// Half-open cell span covering `[start, start + len)`; never empty, so thin
    /// shapes stay visible. Clipping to the grid happens afterwards.
    fn span(start: f64, len: f64) -> (i64, i64) {
        let first = start.floor() as i64;
        let mut last = (start + len).ceil() as i64;
        if last <= first {
            last = first + 1;
        }
        (first, last)
    }

    fn flush(&self, stdout: &mut impl Write) -> io::Result<()> {
        for row in 0..self.rows {
            queue!(stdout, cursor::MoveTo(0, row))?;
            let mut current: Option<(Color, Color)> = None;
            for col in 0..self.cols {
                let Some(cell) = self.cell(col, row) else {
                    continue;
                };
                if current != Some((cell.fg, cell.bg)) {
                    queue!(
                        stdout,
                        SetForegroundColor(term_color(cell.fg)),
                        SetBackgroundColor(term_color(cell.bg))
                    )?;
                    current = Some((cell.fg, cell.bg));
                }
                queue!(stdout, Print(cell.ch))?;
            }
        }
        queue!(stdout, ResetColor)?;
        Ok(())
    }
}

impl Surface for CellBuffer {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let (c0, c1) = Self::span(self.to_col(x), self.to_col(w));
        let (r0, r1) = Self::span(self.to_row(y), self.to_row(h));
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell {
                        ch: ' ',
                        fg: color,
                        bg: color,
                    };
                }
            }
        }
    }

    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, _size: TextSize, color: Color) {
        let len = text.chars().count() as i64;
        let row = self.to_row(y).floor() as i64;
        let start = self.to_col(x).round() as i64 - len / 2;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Command(Input::Quit))
        }
        KeyCode::Char('w') | KeyCode::Char('W') => Some(KeyAction::Move(Side::Left, Direction::Up)),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyAction::Move(Side::Left, Direction::Down))
        }
        KeyCode::Up => Some(KeyAction::Move(Side::Right, Direction::Up)),
        KeyCode::Down => Some(KeyAction::Move(Side::Right, Direction::Down)),
        KeyCode::Char(' ') => Some(KeyAction::Command(Input::TogglePause)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::Command(Input::Reset)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            Some(KeyAction::Command(Input::Quit))
        }
        _ => None,
    }
}

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    buffer: CellBuffer,
    active: bool,
    /// Terminal reports key releases, so held keys need no timeout
    keyboard_enhanced: bool,
    /// Held paddle keys and, in timeout mode, when they lapse
    held: HashMap<(Side, Direction), Option<Instant>>,
    pending: VecDeque<Input>,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Match the 60 Hz tick rate
            target_frame_time: Duration::from_millis(16),
            buffer: CellBuffer::new(0, 0),
            active: false,
            keyboard_enhanced: false,
            held: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.buffer = CellBuffer::new(cols, rows.saturating_sub(INFO_ROWS));
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(action) = map_key(&key) else {
            return;
        };
        let down = key.kind != KeyEventKind::Release;
        match key_input(action, down, key.kind == KeyEventKind::Repeat) {
            Some(Input::Move {
                side,
                direction,
                held: true,
            }) => self.press(side, direction, now),
            Some(Input::Move {
                side,
                direction,
                held: false,
            }) => self.release(side, direction),
            Some(input) => self.pending.push_back(input),
            None => {}
        }
    }

    fn press(&mut self, side: Side, direction: Direction, now: Instant) {
        let deadline = if self.keyboard_enhanced {
            None
        } else {
            // No release events will come for the other direction
            self.release(side, direction.opposite());
            Some(now + HOLD_TIMEOUT)
        };
        if self.held.insert((side, direction), deadline).is_none() {
            self.pending.push_back(Input::Move {
                side,
                direction,
                held: true,
            });
        }
    }

    fn release(&mut self, side: Side, direction: Direction) {
        if self.held.remove(&(side, direction)).is_some() {
            self.pending.push_back(Input::Move {
                side,
                direction,
                held: false,
            });
        }
    }

    fn expire_held_keys(&mut self, now: Instant) {
        let expired: Vec<_> = self
            .held
            .iter()
            .filter(|(_, deadline)| deadline.is_some_and(|d| d <= now))
            .map(|(key, _)| *key)
            .collect();
        for (side, direction) in expired {
            self.release(side, direction);
        }
    }

    fn draw_info(&self, stdout: &mut impl Write) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, self.buffer.rows()),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            Print(CONTROLS)
        )?;
        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> RenderResult<()> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(RenderError::TerminalTooSmall {
                cols,
                rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
            });
        }
        self.resize(cols, rows);

        terminal::enable_raw_mode()?;
        self.active = true;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;

        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!(
            "Terminal {}x{}, key release reporting {}",
            cols,
            rows,
            if self.keyboard_enhanced { "on" } else { "off" }
        );
        Ok(())
    }

    fn render<R: Rng>(&mut self, game: &Game<R>) -> RenderResult<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }
        self.last_render = Instant::now();

        renderer::draw_scene(game, &mut self.buffer);

        let mut stdout = io::stdout();
        self.buffer.flush(&mut stdout)?;
        self.draw_info(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> RenderResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> RenderResult<Option<Input>> {
        if self.pending.is_empty() {
            let now = Instant::now();
            self.expire_held_keys(now);
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key, now),
                    Event::Resize(cols, rows) => {
                        self.resize(cols, rows);
                        let mut stdout = io::stdout();
                        execute!(stdout, terminal::Clear(ClearType::All))?;
                    }
                    _ => {}
                }
            }
        }
        Ok(self.pending.pop_front())
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
