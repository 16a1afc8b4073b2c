use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::grid::{Cell, Direction, Grid};
use MoveOutcome::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnakeState {
    Alive,
    Dead,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Continued { new_head: Cell, vacated: Option<Cell> },
    Collided,
}

/// The player's snake. `body` is kept head-first and holds no duplicate cells
/// while the snake is alive.
#[derive(Clone, Debug)]
pub struct Snake {
    grid: Grid,
    body: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
    length: usize,
    growth_credit: usize,
    initial_length: usize,
    state: SnakeState,
}

impl Snake {
    pub const START_DIRECTION: Direction = Direction::Right;

    /// Creates a snake at the grid's center. A starting length above one is
    /// grown out of the center cell over the first moves.
    pub fn new(grid: Grid, initial_length: usize) -> Self {
        let mut snake = Snake {
            grid,
            body: VecDeque::new(),
            direction: Self::START_DIRECTION,
            pending_direction: None,
            length: 0,
            growth_credit: 0,
            initial_length: initial_length.max(1),
            state: SnakeState::Alive,
        };
        snake.reset();
        snake
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Target segment count, including segments still owed by growth credit.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn growth_credit(&self) -> usize {
        self.growth_credit
    }

    pub fn state(&self) -> SnakeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == SnakeState::Alive
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    /// Buffers a turn for the next move. A turn that would put the head onto
    /// the second segment is dropped and leaves any earlier buffered turn alone.
    pub fn turn(&mut self, requested: Direction) -> bool {
        if self.body.len() > 1 && self.grid.wrap(self.head(), requested) == self.body[1] {
            debug!("Rejected turn {:?} while heading {:?}", requested, self.direction);
            return false;
        }

        self.pending_direction = Some(requested);
        true
    }

    pub fn move_step(&mut self) -> MoveOutcome {
        if !self.is_alive() {
            return Collided;
        }

        if let Some(dir) = self.pending_direction.take() {
            self.direction = dir;
        }

        let new_head = self.grid.wrap(self.head(), self.direction);
        let growing = self.growth_credit > 0;

        // The tail only blocks the head when it is not about to move away
        let blocking = if growing { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(blocking).any(|&cell| cell == new_head) {
            debug!("Snake of length {} ran into itself at {:?}", self.body.len(), new_head);
            self.state = SnakeState::Dead;
            return Collided;
        }

        self.body.push_front(new_head);

        let vacated = if growing {
            self.growth_credit -= 1;
            None
        } else {
            self.body.pop_back()
        };

        trace!("Head moved to {:?}, vacated {:?}", new_head, vacated);
        Continued { new_head, vacated }
    }

    pub fn grow(&mut self, amount: usize) {
        let amount = amount.max(1);
        self.growth_credit += amount;
        self.length += amount;
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(self.grid.center());
        self.direction = Self::START_DIRECTION;
        self.pending_direction = None;
        self.length = self.initial_length;
        self.growth_credit = self.initial_length - 1;
        self.state = SnakeState::Alive;
    }

    #[cfg(test)]
    pub(crate) fn from_cells(grid: Grid, cells: &[Cell], direction: Direction) -> Self {
        Snake {
            grid,
            body: cells.iter().copied().collect(),
            direction,
            pending_direction: None,
            length: cells.len(),
            growth_credit: 0,
            initial_length: 1,
            state: SnakeState::Alive,
        }
    }
}
