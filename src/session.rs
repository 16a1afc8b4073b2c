use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::Config;
use crate::error::GameError;
use crate::food::Food;
use crate::grid::{Cell, Direction, Grid};
use crate::snake::{MoveOutcome, Snake};

/// A player command, delivered to the session in arrival order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Restart,
    Pause,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickFlow {
    Running,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Renderable {
    SnakeSegment { cell: Cell, head: bool },
    FoodItem { cell: Cell },
}

/// Read-only view of a session handed to the renderer after every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub renderables: Vec<Renderable>,
    pub direction: Direction,
    pub score: u32,
    pub game_over: bool,
    pub won: bool,
    pub paused: bool,
}

pub struct Session {
    config: Config,
    grid: Grid,
    snake: Snake,
    food: Food,
    score: u32,
    game_over: bool,
    won: bool,
    paused: bool,
    rng: StdRng,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, GameError> {
        config.validate()?;

        let grid = Grid::new(config.width, config.height);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let snake = Snake::new(grid, config.initial_length as usize);
        let food = Food::spawn(&grid, &snake.occupied(), &mut rng)?;

        info!(
            "New session on a {}x{} grid, {} ticks/s, seed {:?}",
            grid.width(), grid.height(), config.ticks_per_second, config.seed
        );

        Ok(Session { config, grid, snake, food, score: 0, game_over: false, won: false, paused: false, rng })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs one tick: applies the inputs, then advances the snake unless the
    /// game is over, paused or was restarted during this tick.
    pub fn tick<I>(&mut self, inputs: I) -> TickFlow
    where
        I: IntoIterator<Item = Input>,
    {
        let mut restarted = false;

        for input in inputs {
            match input {
                Input::Quit => {
                    info!("Quit requested with score {}", self.score);
                    return TickFlow::Quit;
                }
                Input::Turn(dir) if !self.game_over => {
                    self.snake.turn(dir);
                }
                Input::Restart if self.game_over => {
                    self.restart();
                    restarted = true;
                }
                Input::Pause if !self.game_over => {
                    self.paused = !self.paused;
                    debug!("Paused: {}", self.paused);
                }
                _ => {}
            }
        }

        if !self.game_over && !self.paused && !restarted {
            self.step();
        }

        TickFlow::Running
    }

    pub fn restart(&mut self) {
        info!("Restarting, previous score {}", self.score);

        self.snake.reset();
        self.score = 0;
        self.game_over = false;
        self.won = false;
        self.paused = false;
        self.relocate_food();
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut renderables: Vec<Renderable> = self
            .snake
            .body()
            .iter()
            .enumerate()
            .map(|(i, &cell)| Renderable::SnakeSegment { cell, head: i == 0 })
            .collect();
        renderables.push(Renderable::FoodItem { cell: self.food.cell() });

        Snapshot {
            renderables,
            direction: self.snake.direction(),
            score: self.score,
            game_over: self.game_over,
            won: self.won,
            paused: self.paused,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn step(&mut self) {
        match self.snake.move_step() {
            MoveOutcome::Collided => {
                info!("Game over, score {}", self.score);
                self.game_over = true;
            }
            MoveOutcome::Continued { new_head, .. } if new_head == self.food.cell() => {
                self.snake.grow(self.config.growth_per_food as usize);
                self.score = self.score.saturating_add(self.config.score_per_food);
                debug!("Ate food at {:?}, score {}", new_head, self.score);
                self.relocate_food();
            }
            MoveOutcome::Continued { .. } => {}
        }
    }

    fn relocate_food(&mut self) {
        let occupied = self.snake.occupied();
        if let Err(err) = self.food.relocate(&self.grid, &occupied, &mut self.rng) {
            // Nowhere left to put food: the snake covers the whole board
            warn!("{}", err);
            self.game_over = true;
            self.won = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;
    use crate::snake::SnakeState;
    use rand::Rng;
    use std::collections::HashSet;

    fn config(width: u16, height: u16) -> Config {
        Config { width, height, seed: Some(7), ..Config::default() }
    }

    fn cells(coords: &[(u16, u16)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = Config { width: 0, ..Config::default() };
        assert!(matches!(Session::new(cfg), Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn food_starts_off_the_snake() {
        for seed in 0..20 {
            let session = Session::new(Config { seed: Some(seed), ..config(3, 3) }).unwrap();
            assert!(!session.snake().contains(session.food().cell()));
        }
    }

    #[test]
    fn plain_ticks_move_the_snake() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));

        for _ in 0..4 {
            assert_eq!(session.tick(None), TickFlow::Running);
        }
        assert_eq!(session.snake().head(), Cell::new(9, 5));
        assert!(!session.is_game_over());
    }

    #[test]
    fn eating_grows_scores_and_relocates() {
        let cfg = Config { growth_per_food: 2, score_per_food: 10, ..config(10, 10) };
        let mut session = Session::new(cfg).unwrap();
        session.food = Food::at(Cell::new(6, 5));

        session.tick(None);

        assert_eq!(session.score(), 10);
        assert_eq!(session.snake().growth_credit(), 2);
        assert_eq!(session.snake().length(), 3);
        assert!(!session.snake().contains(session.food().cell()));
        assert_ne!(session.food().cell(), Cell::new(6, 5));

        session.food = Food::at(Cell::new(0, 0));
        session.tick(None);
        session.tick(None);
        assert_eq!(session.snake().body().len(), 3);
    }

    #[test]
    fn turns_are_applied_before_the_move() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));

        session.tick([Input::Turn(Up)]);
        assert_eq!(session.snake().head(), Cell::new(5, 4));

        session.tick([Input::Turn(Left), Input::Turn(Down)]);
        assert_eq!(session.snake().head(), Cell::new(5, 5));
    }

    #[test]
    fn collision_freezes_until_restart() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));
        session.score = 3;
        session.snake = Snake::from_cells(session.grid, &cells(&[(5, 5), (5, 4), (6, 4), (6, 5), (6, 6)]), Down);

        session.tick([Input::Turn(Right)]);
        assert!(session.is_game_over());
        assert_eq!(session.snake().state(), SnakeState::Dead);

        let frozen = session.snapshot();
        session.tick([Input::Turn(Up), Input::Pause]);
        assert_eq!(session.snapshot(), frozen);

        session.tick([Input::Restart]);
        assert!(!session.is_game_over());
        assert_eq!(session.score(), 0);
        assert!(session.snake().is_alive());
        assert!(!session.snake().contains(session.food().cell()));
        assert_eq!(session.snake().head(), Cell::new(5, 5));
        assert_eq!(session.snake().body().len(), 1);
    }

    #[test]
    fn restart_is_ignored_while_alive() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));
        session.score = 5;

        session.tick([Input::Restart]);
        assert_eq!(session.score(), 5);
        assert_eq!(session.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn pause_holds_the_snake() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));

        session.tick([Input::Pause]);
        session.tick(None);
        assert!(session.is_paused());
        assert_eq!(session.snake().head(), Cell::new(5, 5));

        session.tick([Input::Pause]);
        assert!(!session.is_paused());
        assert_eq!(session.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn quit_stops_processing() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.food = Food::at(Cell::new(0, 0));

        assert_eq!(session.tick([Input::Quit, Input::Turn(Up)]), TickFlow::Quit);
        assert_eq!(session.snake().head(), Cell::new(5, 5));
        assert_eq!(session.snake().pending_direction(), None);
    }

    #[test]
    fn filling_the_board_wins() {
        let mut session = Session::new(config(2, 1)).unwrap();
        assert_eq!(session.snake().head(), Cell::new(1, 0));
        assert_eq!(session.food().cell(), Cell::new(0, 0));

        session.tick(None);
        assert_eq!(session.score(), 1);
        assert_eq!(session.food().cell(), Cell::new(1, 0));
        assert!(!session.is_game_over());

        session.tick(None);
        assert_eq!(session.score(), 2);
        let snapshot = session.snapshot();
        assert!(snapshot.game_over);
        assert!(snapshot.won);
    }

    #[test]
    fn snapshot_lists_head_first_then_food() {
        let mut session = Session::new(config(10, 10)).unwrap();
        session.snake = Snake::from_cells(session.grid, &cells(&[(5, 5), (4, 5), (3, 5)]), Right);
        session.food = Food::at(Cell::new(0, 0));

        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.renderables,
            vec![
                Renderable::SnakeSegment { cell: Cell::new(5, 5), head: true },
                Renderable::SnakeSegment { cell: Cell::new(4, 5), head: false },
                Renderable::SnakeSegment { cell: Cell::new(3, 5), head: false },
                Renderable::FoodItem { cell: Cell::new(0, 0) },
            ]
        );
        assert_eq!(snapshot.direction, Right);
        assert_eq!(snapshot.score, 0);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn random_play_keeps_invariants() {
        let cfg = Config { growth_per_food: 3, ..config(8, 6) };
        let mut session = Session::new(cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let dirs = [Up, Down, Left, Right];

        for _ in 0..5_000 {
            let mut inputs = Vec::new();
            if rng.gen_bool(0.3) {
                inputs.push(Input::Turn(dirs[rng.gen_range(0..dirs.len())]));
            }
            if session.is_game_over() {
                inputs.push(Input::Restart);
            }
            session.tick(inputs);

            let body = session.snake().body();
            if session.snake().is_alive() {
                let unique: HashSet<Cell> = body.iter().copied().collect();
                assert_eq!(unique.len(), body.len());
            }
            assert!(body.len() <= session.snake().length());
            if !session.is_game_over() {
                assert!(!session.snake().contains(session.food().cell()));
            }
        }
    }
}
