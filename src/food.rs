use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::error::GameError;
use crate::grid::{Cell, Grid};

/// The single food item on the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    cell: Cell,
}

impl Food {
    pub fn spawn<R: Rng>(grid: &Grid, occupied: &HashSet<Cell>, rng: &mut R) -> Result<Self, GameError> {
        place(grid, occupied, rng).map(|cell| Food { cell })
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    #[cfg(test)]
    pub(crate) fn at(cell: Cell) -> Self {
        Food { cell }
    }

    pub fn relocate<R: Rng>(&mut self, grid: &Grid, occupied: &HashSet<Cell>, rng: &mut R) -> Result<Cell, GameError> {
        self.cell = place(grid, occupied, rng)?;
        Ok(self.cell)
    }
}

/// Picks a random cell outside `occupied` by rejection sampling. Fails instead
/// of spinning forever once every cell of the grid is taken.
pub fn place<R: Rng>(grid: &Grid, occupied: &HashSet<Cell>, rng: &mut R) -> Result<Cell, GameError> {
    let capacity = grid.capacity();
    let taken = occupied.iter().filter(|cell| grid.contains(**cell)).count();
    if taken >= capacity {
        return Err(GameError::FoodPlacementExhausted { occupied: taken, capacity });
    }

    let mut attempts = 1;
    loop {
        let cell = grid.random_cell(rng);
        if !occupied.contains(&cell) {
            debug!("Placed food at {:?} after {} attempt(s)", cell, attempts);
            return Ok(cell);
        }
        attempts += 1;
    }
}
