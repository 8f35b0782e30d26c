use crate::{Game, Renderer, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "game";

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let game = Game::new();
        let mut renderer = WebRenderer::new(CANVAS_ID)?;
        renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { game, renderer })
    }

    /// One animation frame: apply input, advance one tick, draw.
    fn update_frame(&mut self) -> Result<(), JsValue> {
        while let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            // There is nothing to quit to in a browser tab
            self.game.apply_input(input);
        }

        self.game.update();

        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

fn request_frame(window: &web_sys::Window, closure: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    web_sys::console::log_1(&"[WASM] Starting Pong...".into());

    let game_loop = match GameLoop::new() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            web_sys::console::error_1(&format!("[WASM] Failed to create game loop: {:?}", e).into());
            return Err(e);
        }
    };

    let window = web_sys::window().ok_or("no window")?;

    // Closure re-schedules itself every frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = game_loop.borrow_mut().update_frame() {
            web_sys::console::error_1(&e);
            return; // Stop loop on error
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(closure) = f.borrow().as_ref() {
            if let Err(e) = request_frame(&window, closure) {
                web_sys::console::error_1(&e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(closure) = g.borrow().as_ref() {
        request_frame(&window, closure)?;
    }

    web_sys::console::log_1(&"[WASM] Game loop started".into());

    Ok(())
}
