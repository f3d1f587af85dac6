#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised trail-bounded walk that derives a single rider's path.
//!
//! The walker starts at the rider's start cell and repeatedly steps onto one
//! of the orthogonal neighbours of its current cell until it reaches the goal.
//! A neighbour is a candidate when it is the goal, when it is free, or when
//! the rider itself vacated it long enough ago that it has left the trail
//! window. Blocked cells and every other rider's markers are never entered.
//! When the goal is adjacent it is always taken; otherwise a single candidate
//! is taken directly and multiple candidates are chosen between uniformly.

use rand::{seq::SliceRandom, Rng};
use time_riders_core::{
    Cell, Coordinate, GenerationConfig, GenerationError, Grid, Rider, RiderId,
};

/// Walk configuration shared by every rider in a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walker {
    trail_length: usize,
    max_steps: usize,
}

impl Walker {
    /// Creates a walker with an explicit trail length and move budget.
    #[must_use]
    pub const fn new(trail_length: usize, max_steps: usize) -> Self {
        Self {
            trail_length,
            max_steps,
        }
    }

    /// Creates a walker using the trail length and step limit of the config.
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.trail_length, config.max_steps())
    }

    /// Walks the rider from its start to its goal over the grid snapshot.
    ///
    /// The snapshot is not modified. The returned path carries a copy of the
    /// snapshot in which every free cell the walk passed through is blocked.
    pub fn walk<R>(&self, grid: &Grid, rider: Rider, rng: &mut R) -> Result<Path, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let goal = rider.goal();
        let _ = grid.get(rider.start())?;
        let _ = grid.get(goal)?;

        let mut state = WalkState::from_grid(grid, rider.id());
        let mut path_grid = grid.clone();
        let mut blocked = Vec::new();
        let mut steps = vec![rider.start()];
        let mut current = rider.start();
        let mut moves = 0;

        while current != goal {
            if moves >= self.max_steps {
                return Err(GenerationError::StepLimitExceeded {
                    rider: rider.id(),
                    limit: self.max_steps,
                });
            }

            let next = self
                .next_cell(grid, &state, current, goal, moves, rng)
                .ok_or(GenerationError::Unsolvable { rider: rider.id() })?;

            moves += 1;
            state.mark_visited(grid, current, moves);
            if path_grid.get(current)?.is_free() {
                path_grid.set(current, Cell::Blocked)?;
                blocked.push(current);
            }

            current = next;
            steps.push(current);
        }

        Ok(Path {
            rider: rider.id(),
            steps,
            blocked,
            grid: path_grid,
        })
    }

    fn next_cell<R>(
        &self,
        grid: &Grid,
        state: &WalkState,
        current: Coordinate,
        goal: Coordinate,
        moves: usize,
        rng: &mut R,
    ) -> Option<Coordinate>
    where
        R: Rng + ?Sized,
    {
        let mut candidates = Vec::with_capacity(4);

        for neighbor in grid.neighbors(current) {
            if neighbor == goal {
                return Some(goal);
            }

            if state.is_enterable(grid, neighbor, moves, self.trail_length) {
                candidates.push(neighbor);
            }
        }

        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => candidates.choose(rng).copied(),
        }
    }
}

/// Realised walk of a single rider from its start to its goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    rider: RiderId,
    steps: Vec<Coordinate>,
    blocked: Vec<Coordinate>,
    grid: Grid,
}

impl Path {
    /// Rider that walked the path.
    #[must_use]
    pub const fn rider(&self) -> RiderId {
        self.rider
    }

    /// Every cell occupied by the walk in order, from start to goal inclusive.
    #[must_use]
    pub fn steps(&self) -> &[Coordinate] {
        &self.steps
    }

    /// Number of moves the walk took.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Distinct cells the walk turned from free to blocked, in first-visit order.
    #[must_use]
    pub fn blocked_cells(&self) -> &[Coordinate] {
        &self.blocked
    }

    /// Snapshot copy with the walked cells blocked.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Per-cell view used while a single rider walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkCell {
    /// Free in the snapshot and not yet vacated by the rider.
    Open,
    /// Blocked in the snapshot or reserved by another rider.
    Obstacle,
    /// Vacated by the rider on the given move.
    VisitedAt(usize),
}

#[derive(Debug)]
struct WalkState {
    cells: Vec<WalkCell>,
}

impl WalkState {
    fn from_grid(grid: &Grid, rider: RiderId) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| match cell {
                Cell::Free => WalkCell::Open,
                Cell::Start(owner) | Cell::Goal(owner) if *owner == rider => WalkCell::Open,
                Cell::Blocked | Cell::Start(_) | Cell::Goal(_) => WalkCell::Obstacle,
            })
            .collect();
        Self { cells }
    }

    fn mark_visited(&mut self, grid: &Grid, coordinate: Coordinate, moves: usize) {
        if let Some(slot) = grid
            .try_index(coordinate)
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = WalkCell::VisitedAt(moves);
        }
    }

    /// A cell vacated on move `s` stays in the trail while `moves - s < trail_length`.
    fn is_enterable(
        &self,
        grid: &Grid,
        coordinate: Coordinate,
        moves: usize,
        trail_length: usize,
    ) -> bool {
        let Some(cell) = grid
            .try_index(coordinate)
            .and_then(|index| self.cells.get(index))
        else {
            return false;
        };

        match *cell {
            WalkCell::Open => true,
            WalkCell::Obstacle => false,
            WalkCell::VisitedAt(visited) => moves.saturating_sub(visited) >= trail_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacated_cells_age_out_of_trail() {
        let grid = Grid::new(3, 1);
        let rider = RiderId::new(0);
        let cell = Coordinate::new(1, 0);
        let mut state = WalkState::from_grid(&grid, rider);

        state.mark_visited(&grid, cell, 4);

        assert!(!state.is_enterable(&grid, cell, 4, 2));
        assert!(!state.is_enterable(&grid, cell, 5, 2));
        assert!(state.is_enterable(&grid, cell, 6, 2));
        assert!(state.is_enterable(&grid, cell, 4, 0));
    }

    #[test]
    fn foreign_markers_are_obstacles() {
        let mut grid = Grid::new(3, 1);
        let own = RiderId::new(0);
        let other = RiderId::new(1);
        grid.set(Coordinate::new(0, 0), Cell::Start(own))
            .expect("in bounds");
        grid.set(Coordinate::new(1, 0), Cell::Goal(other))
            .expect("in bounds");
        grid.set(Coordinate::new(2, 0), Cell::Blocked)
            .expect("in bounds");

        let state = WalkState::from_grid(&grid, own);

        assert_eq!(
            state.cells,
            vec![WalkCell::Open, WalkCell::Obstacle, WalkCell::Obstacle]
        );
    }

    #[test]
    fn out_of_bounds_neighbours_are_not_enterable() {
        let grid = Grid::new(2, 2);
        let state = WalkState::from_grid(&grid, RiderId::new(0));

        assert!(!state.is_enterable(&grid, Coordinate::new(2, 0), 0, 0));
    }
}
