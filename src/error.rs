//! Errors raised by the frontends. The simulation itself cannot fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Terminal is smaller than the minimum playable grid
    #[error("terminal too small: need at least {min_cols}x{min_rows}, got {cols}x{rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    /// A DOM or canvas call failed
    #[error("browser error: {0}")]
    Browser(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
