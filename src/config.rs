use std::time::Duration;

use clap::Args;

use crate::error::GameError;

pub const DEFAULT_WIDTH: u16 = 32;
pub const DEFAULT_HEIGHT: u16 = 24;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;
pub const DEFAULT_INITIAL_LENGTH: u32 = 1;
pub const DEFAULT_GROWTH_PER_FOOD: u32 = 1;
pub const DEFAULT_SCORE_PER_FOOD: u32 = 1;

/// Process-wide game settings, fixed once the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Number of columns in the playing field.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WIDTH)]
    pub width: u16,
    /// Number of rows in the playing field.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_HEIGHT)]
    pub height: u16,
    /// Simulation steps per second.
    #[arg(long = "tps", value_name = "TICKS", default_value_t = DEFAULT_TICKS_PER_SECOND)]
    pub ticks_per_second: u32,
    /// Segment count the snake starts out with.
    #[arg(long, value_name = "SEGMENTS", default_value_t = DEFAULT_INITIAL_LENGTH)]
    pub initial_length: u32,
    /// Segments gained per food eaten.
    #[arg(long = "growth", value_name = "SEGMENTS", default_value_t = DEFAULT_GROWTH_PER_FOOD)]
    pub growth_per_food: u32,
    /// Points awarded per food eaten.
    #[arg(long = "points", value_name = "POINTS", default_value_t = DEFAULT_SCORE_PER_FOOD)]
    pub score_per_food: u32,
    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            initial_length: DEFAULT_INITIAL_LENGTH,
            growth_per_food: DEFAULT_GROWTH_PER_FOOD,
            score_per_food: DEFAULT_SCORE_PER_FOOD,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |msg: String| Err(GameError::InvalidConfiguration(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("grid must be at least 1x1, got {}x{}", self.width, self.height));
        }
        if self.ticks_per_second == 0 {
            return invalid("ticks per second must be positive".to_string());
        }
        if self.initial_length == 0 {
            return invalid("initial snake length must be at least 1".to_string());
        }

        let capacity = self.width as u64 * self.height as u64;
        if self.initial_length as u64 >= capacity {
            return invalid(format!(
                "initial length {} does not leave room for food on a {}x{} grid",
                self.initial_length, self.width, self.height
            ));
        }
        if self.growth_per_food == 0 {
            return invalid("growth per food must be at least 1".to_string());
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}
