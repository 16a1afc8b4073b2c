use thiserror::Error;

/// Errors raised by the game core. Self-collision is not one of them: it is a
/// normal move outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no free cell left for food ({occupied} of {capacity} cells occupied)")]
    FoodPlacementExhausted { occupied: usize, capacity: usize },
}
