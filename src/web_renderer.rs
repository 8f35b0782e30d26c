use crate::config::{HEIGHT, WIDTH};
use crate::entity::{Direction, Side};
use crate::error::{RenderError, RenderResult};
use crate::game::Game;
use crate::renderer::{self, key_input, Color, Input, KeyAction, Renderer, Surface, TextSize};
use rand::Rng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};

// Colors (slate palette)
const COLOR_BACKGROUND: &str = "#0f172a";
const COLOR_CENTER_LINE: &str = "#334155";
const COLOR_FOREGROUND: &str = "#e2e8f0";
const COLOR_SCORE: &str = "#94a3b8";

const FONT_SCORE: &str = "bold 28px ui-sans-serif, system-ui";
const FONT_BANNER: &str = "bold 36px ui-sans-serif, system-ui";

fn css_color(color: Color) -> &'static str {
    match color {
        Color::Background => COLOR_BACKGROUND,
        Color::CenterLine => COLOR_CENTER_LINE,
        Color::Foreground => COLOR_FOREGROUND,
        Color::Score => COLOR_SCORE,
    }
}

fn js_error(value: JsValue) -> RenderError {
    RenderError::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Maps `KeyboardEvent.code`, which ignores keyboard layout.
fn map_code(code: &str) -> Option<KeyAction> {
    match code {
        "KeyW" => Some(KeyAction::Move(Side::Left, Direction::Up)),
        "KeyS" => Some(KeyAction::Move(Side::Left, Direction::Down)),
        "ArrowUp" => Some(KeyAction::Move(Side::Right, Direction::Up)),
        "ArrowDown" => Some(KeyAction::Move(Side::Right, Direction::Down)),
        "Space" => Some(KeyAction::Command(Input::TogglePause)),
        "KeyR" => Some(KeyAction::Command(Input::Reset)),
        _ => None,
    }
}

/// Canvas 2D context seen as a `Surface`. Keeps the first failed call so the
/// frame can report it.
struct CanvasSurface<'a> {
    context: &'a CanvasRenderingContext2d,
    error: Option<JsValue>,
}

impl Surface for CanvasSurface<'_> {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.context.set_fill_style_str(css_color(color));
        self.context.fill_rect(x, y, w, h);
    }

    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, size: TextSize, color: Color) {
        self.context.set_fill_style_str(css_color(color));
        self.context.set_font(match size {
            TextSize::Score => FONT_SCORE,
            TextSize::Banner => FONT_BANNER,
        });
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        if let Err(e) = self.context.fill_text(text, x, y) {
            self.error.get_or_insert(e);
        }
    }
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    device_pixel_ratio: f64,

    // Filled by DOM listeners, drained once per frame
    pending_input: Rc<RefCell<VecDeque<Input>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        // Get device pixel ratio for high DPI displays
        let device_pixel_ratio = window.device_pixel_ratio();

        Ok(Self {
            canvas,
            context,
            window,
            device_pixel_ratio,
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    fn setup_keyboard_listeners(&self) -> RenderResult<()> {
        let pending_input = self.pending_input.clone();
        let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let Some(action) = map_code(&event.code()) else {
                return;
            };
            // Auto-repeat only re-sends paddle keys
            if let Some(input) = key_input(action, true, event.repeat()) {
                pending_input.borrow_mut().push_back(input);
            }
            event.prevent_default();
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .map_err(js_error)?;
        keydown.forget(); // Keep listener alive

        let pending_input = self.pending_input.clone();
        let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let Some(action) = map_code(&event.code()) else {
                return;
            };
            if let Some(input) = key_input(action, false, false) {
                pending_input.borrow_mut().push_back(input);
            }
            event.prevent_default();
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())
            .map_err(js_error)?;
        keyup.forget();

        Ok(())
    }

    fn size_canvas(&self) -> RenderResult<()> {
        // Internal resolution (actual pixels, scaled for high DPI)
        let pixel_width = (WIDTH * self.device_pixel_ratio) as u32;
        let pixel_height = (HEIGHT * self.device_pixel_ratio) as u32;
        self.canvas.set_width(pixel_width);
        self.canvas.set_height(pixel_height);

        // CSS display size stays at field size
        let element: &HtmlElement = self.canvas.unchecked_ref();
        let style = element.style();
        style
            .set_property("width", &format!("{}px", WIDTH))
            .map_err(js_error)?;
        style
            .set_property("height", &format!("{}px", HEIGHT))
            .map_err(js_error)?;

        // Setting width/height resets the context transform
        self.context
            .scale(self.device_pixel_ratio, self.device_pixel_ratio)
            .map_err(js_error)?;
        Ok(())
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> RenderResult<()> {
        self.setup_keyboard_listeners()?;
        self.size_canvas()?;
        Ok(())
    }

    fn render<R: Rng>(&mut self, game: &Game<R>) -> RenderResult<()> {
        self.context.clear_rect(0.0, 0.0, WIDTH, HEIGHT);

        let mut surface = CanvasSurface {
            context: &self.context,
            error: None,
        };
        renderer::draw_scene(game, &mut surface);

        match surface.error {
            Some(e) => Err(js_error(e)),
            None => Ok(()),
        }
    }

    fn cleanup(&mut self) -> RenderResult<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> RenderResult<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
