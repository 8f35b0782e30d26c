pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use entity::{Ball, Direction, Paddle, Side};
pub use error::{RenderError, RenderResult};
pub use game::Game;
pub use renderer::{draw_scene, key_input, Input, KeyAction, Renderer, Surface};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
