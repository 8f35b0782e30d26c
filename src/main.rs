use pong::{CliRenderer, Game, Input, RenderResult, Renderer};
use std::process::ExitCode;
use std::time::{Duration, Instant};

// One simulation tick per display frame
const TICK_RATE: Duration = Duration::from_micros(16_667); // 60 ticks/sec
const IDLE_SLEEP: Duration = Duration::from_millis(2);

fn run() -> RenderResult<()> {
    let mut game = Game::new();
    let mut renderer = CliRenderer::new();

    renderer.init()?;
    log::info!("Match started");

    let mut next_tick = Instant::now();

    'game: loop {
        // Drain everything that arrived since the last pass
        while let Some(input) = renderer.poll_input()? {
            if input == Input::Quit {
                break 'game;
            }
            game.apply_input(input);
        }

        let now = Instant::now();
        if now >= next_tick {
            game.update();
            next_tick += TICK_RATE;
            // Don't try to catch up after a long stall
            if next_tick < now {
                next_tick = now + TICK_RATE;
            }
        } else {
            std::thread::sleep(IDLE_SLEEP.min(next_tick - now));
        }

        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    log::info!("Quit at {} : {}", game.left.score, game.right.score);
    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr; redirect it (e.g. `2>pong.log`) when raising RUST_LOG
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pong: {err}");
            ExitCode::FAILURE
        }
    }
}
