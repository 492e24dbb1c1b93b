use grid_util::point::Point;
use thiserror::Error;

/// Errors reported by the maze core. None of these are retried internally;
/// the driver decides whether to fix the configuration and call again.
#[derive(Debug, Error)]
pub enum MazeError {
    /// The obstacle image could not be read or decoded.
    #[error("could not read obstacle image")]
    Load(#[from] image::ImageError),

    /// The obstacle source was readable but structurally invalid.
    #[error("malformed obstacle source: {0}")]
    Malformed(&'static str),

    /// A coordinate lies outside the grid. The grid is left untouched.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Point,
        width: usize,
        height: usize,
    },

    /// A traversal was invoked on a grid with no defined start or target.
    #[error("traversal invoked without a {0} cell")]
    InvalidConfiguration(&'static str),
}

pub type Result<T> = std::result::Result<T, MazeError>;
