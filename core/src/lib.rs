#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the time rider environment generator.
//!
//! This crate defines the data that flows between the generator stages. The
//! sampler places [`Cell::Start`] and [`Cell::Goal`] markers onto a fresh
//! [`Grid`], the walker derives one path per rider from a grid snapshot, and
//! the assembler merges those paths back into the shared grid as
//! [`Cell::Blocked`] cells. Nothing in here draws random numbers; randomness is
//! owned by the systems that consume these types.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of riders a single environment may host.
///
/// Riders are rendered as single ASCII letters, which caps the count at the
/// size of the alphabet.
pub const MAX_RIDERS: usize = 26;

/// Largest number of cells a generated grid may contain.
pub const MAX_CELLS: u64 = 1 << 24;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are ordered row-major: first by `y`, then by `x`. Grid
/// iteration uses the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    x: u32,
    y: u32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the coordinate.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the coordinate.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier assigned to a time rider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RiderId(u8);

impl RiderId {
    /// Creates a new rider identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Identifier as an index into rider-ordered collections.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rider {}", self.0)
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Traversable and unoccupied.
    #[default]
    Free,
    /// Impassable for every rider that walks after the cell was blocked.
    Blocked,
    /// Start cell reserved for the rider.
    Start(RiderId),
    /// Goal cell reserved for the rider.
    Goal(RiderId),
}

impl Cell {
    /// Reports whether the cell is free.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }

    /// Reports whether the cell is blocked.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Rider owning the marker stored in the cell, if any.
    #[must_use]
    pub const fn rider(&self) -> Option<RiderId> {
        match self {
            Self::Start(rider) | Self::Goal(rider) => Some(*rider),
            Self::Free | Self::Blocked => None,
        }
    }
}

/// Start and goal assignment for a single rider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rider {
    id: RiderId,
    start: Coordinate,
    goal: Coordinate,
}

impl Rider {
    /// Creates a new rider description.
    #[must_use]
    pub const fn new(id: RiderId, start: Coordinate, goal: Coordinate) -> Self {
        Self { id, start, goal }
    }

    /// Identifier of the rider.
    #[must_use]
    pub const fn id(&self) -> RiderId {
        self.id
    }

    /// Cell the rider departs from.
    #[must_use]
    pub const fn start(&self) -> Coordinate {
        self.start
    }

    /// Cell the rider must reach.
    #[must_use]
    pub const fn goal(&self) -> Coordinate {
        self.goal
    }
}

/// Dense row-major grid of cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell free.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Cell::Free; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x < self.width && coordinate.y < self.height
    }

    /// Row-major offset of the coordinate, if it lies within the grid.
    #[must_use]
    pub fn try_index(&self, coordinate: Coordinate) -> Option<usize> {
        if !self.contains(coordinate) {
            return None;
        }

        let row = usize::try_from(coordinate.y).ok()?;
        let column = usize::try_from(coordinate.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Retrieves the cell stored at the coordinate.
    pub fn get(&self, coordinate: Coordinate) -> Result<Cell, GridError> {
        self.try_index(coordinate)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or_else(|| self.out_of_bounds(coordinate))
    }

    /// Stores a cell at the coordinate.
    pub fn set(&mut self, coordinate: Coordinate, cell: Cell) -> Result<(), GridError> {
        let error = self.out_of_bounds(coordinate);
        let slot = self
            .try_index(coordinate)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(error)?;
        *slot = cell;
        Ok(())
    }

    /// Dense cells stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates every coordinate of the grid in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }

    /// Iterates every coordinate together with its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, Cell)> + '_ {
        self.coordinates().zip(self.cells.iter().copied())
    }

    /// First coordinate, in row-major order, holding the provided cell value.
    #[must_use]
    pub fn find(&self, cell: Cell) -> Option<Coordinate> {
        self.iter()
            .find(|(_, candidate)| *candidate == cell)
            .map(|(coordinate, _)| coordinate)
    }

    /// Reconstructs a rider's start and goal from the grid markers.
    #[must_use]
    pub fn rider(&self, id: RiderId) -> Option<Rider> {
        let start = self.find(Cell::Start(id))?;
        let goal = self.find(Cell::Goal(id))?;
        Some(Rider::new(id, start, goal))
    }

    /// Number of cells satisfying the predicate.
    #[must_use]
    pub fn count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(Cell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(**cell)).count()
    }

    /// In-bounds orthogonal neighbours of the coordinate.
    ///
    /// Neighbours are yielded up, right, down, then left.
    pub fn neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> {
        let mut candidates = [None; 4];
        let mut count = 0;

        if let Some(y) = coordinate.y.checked_sub(1) {
            candidates[count] = Some(Coordinate::new(coordinate.x, y));
            count += 1;
        }

        if let Some(x) = coordinate.x.checked_add(1) {
            if x < self.width {
                candidates[count] = Some(Coordinate::new(x, coordinate.y));
                count += 1;
            }
        }

        if let Some(y) = coordinate.y.checked_add(1) {
            if y < self.height {
                candidates[count] = Some(Coordinate::new(coordinate.x, y));
                count += 1;
            }
        }

        if let Some(x) = coordinate.x.checked_sub(1) {
            candidates[count] = Some(Coordinate::new(x, coordinate.y));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }

    fn out_of_bounds(&self, coordinate: Coordinate) -> GridError {
        GridError::OutOfBounds {
            coordinate,
            width: self.width,
            height: self.height,
        }
    }
}

/// Errors produced by grid accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid bounds.
    #[error("coordinate {coordinate} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Coordinate that was accessed.
        coordinate: Coordinate,
        /// Width of the accessed grid.
        width: u32,
        /// Height of the accessed grid.
        height: u32,
    },
}

/// Parameters controlling a single environment generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Number of riders that require a start, a goal, and a path.
    pub num_riders: usize,
    /// Number of recently vacated cells a rider cannot step back onto.
    pub trail_length: usize,
    /// Multiple of the grid area bounding how many moves one walk may take.
    pub max_steps_factor: u32,
}

impl GenerationConfig {
    /// Creates a configuration with the default step limit factor.
    #[must_use]
    pub const fn new(width: u32, height: u32, num_riders: usize, trail_length: usize) -> Self {
        Self {
            width,
            height,
            num_riders,
            trail_length,
            max_steps_factor: DEFAULT_MAX_STEPS_FACTOR,
        }
    }

    /// Replaces the step limit factor.
    #[must_use]
    pub const fn with_max_steps_factor(mut self, factor: u32) -> Self {
        self.max_steps_factor = factor;
        self
    }

    /// Total number of cells in the configured grid.
    #[must_use]
    pub fn area(&self) -> usize {
        let area = u64::from(self.width) * u64::from(self.height);
        usize::try_from(area).unwrap_or(usize::MAX)
    }

    /// Largest number of moves a single rider walk may take.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        let factor = usize::try_from(self.max_steps_factor).unwrap_or(usize::MAX);
        self.area().saturating_mul(factor)
    }

    /// Checks the configuration for values no seed could ever satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        let cells = u64::from(self.width) * u64::from(self.height);
        if cells > MAX_CELLS {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_CELLS,
            });
        }

        if self.num_riders == 0 {
            return Err(ConfigError::NoRiders);
        }

        if self.num_riders > MAX_RIDERS {
            return Err(ConfigError::TooManyRiders {
                requested: self.num_riders,
                max: MAX_RIDERS,
            });
        }

        if self.max_steps_factor == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }

        Ok(())
    }
}

const DEFAULT_MAX_STEPS_FACTOR: u32 = 4;

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(10, 10, 2, 3)
    }
}

/// Reasons a generation configuration is rejected before any attempt runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// At least one rider is required.
    #[error("an environment requires at least one rider")]
    NoRiders,
    /// More riders were requested than the letter encoding can represent.
    #[error("{requested} riders requested but at most {max} are supported")]
    TooManyRiders {
        /// Number of riders requested.
        requested: usize,
        /// Largest supported rider count.
        max: usize,
    },
    /// The grid has no cells.
    #[error("grid dimensions {width}x{height} contain no cells")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The grid has more cells than a generator run may allocate.
    #[error("grid dimensions {width}x{height} exceed the limit of {max} cells")]
    GridTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest supported cell count.
        max: u64,
    },
    /// A zero step factor would forbid every move.
    #[error("max_steps_factor must be at least 1")]
    ZeroStepLimit,
}

/// Failures surfaced by the generator stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A grid access fell outside the grid.
    #[error(transparent)]
    OutOfBounds(#[from] GridError),
    /// The grid cannot hold a distinct start and goal for every rider.
    #[error("{requested} distinct coordinates requested but the grid only has {available} cells")]
    CapacityExceeded {
        /// Number of distinct coordinates required.
        requested: usize,
        /// Number of cells in the grid.
        available: usize,
    },
    /// The walk ran out of candidate cells before reaching the goal.
    #[error("{rider} has no candidate cells left before reaching its goal")]
    Unsolvable {
        /// Rider whose walk failed.
        rider: RiderId,
    },
    /// The walk exceeded its move budget before reaching the goal.
    #[error("{rider} did not reach its goal within {limit} moves")]
    StepLimitExceeded {
        /// Rider whose walk failed.
        rider: RiderId,
        /// Move budget that was exhausted.
        limit: usize,
    },
    /// The configuration can never produce an environment.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl GenerationError {
    /// Reports whether retrying with a different seed may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Unsolvable { .. } | Self::StepLimitExceeded { .. }
        )
    }
}
