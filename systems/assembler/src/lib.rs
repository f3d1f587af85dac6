#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Environment assembler that turns a configuration and a seed into a grid.
//!
//! Assembly runs the coordinate sampler once, then walks every rider in
//! identifier order against the grid as it stands after the previous riders'
//! paths were merged. The first rider that cannot reach its goal aborts the
//! whole attempt; no earlier work is kept and no backtracking is attempted.

mod batch;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use time_riders_core::{Cell, GenerationConfig, GenerationError, Grid, Rider};
use time_riders_system_sampler::CoordinateSampler;
use time_riders_system_walker::{Path, Walker};
use tracing::{debug, info};

pub use batch::{generate_batch, BatchEntry, BatchReport};

/// Fully merged grid together with the path each rider walked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    grid: Grid,
    paths: Vec<Path>,
}

impl Environment {
    /// Final grid with every rider's path blocked.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Paths ordered by rider identifier.
    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Riders reconstructed from the start and goal markers of the grid.
    #[must_use]
    pub fn riders(&self) -> Vec<Rider> {
        self.paths
            .iter()
            .filter_map(|path| self.grid.rider(path.rider()))
            .collect()
    }

    /// Consumes the environment, yielding the final grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Produces environments for a single validated configuration.
#[derive(Clone, Copy, Debug)]
pub struct EnvironmentAssembler {
    sampler: CoordinateSampler,
    walker: Walker,
}

impl EnvironmentAssembler {
    /// Creates an assembler after rejecting configurations no seed can satisfy.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            sampler: CoordinateSampler::new(config.width, config.height, config.num_riders),
            walker: Walker::from_config(&config),
        })
    }

    /// Generates an environment from a seed.
    ///
    /// The same configuration and seed always produce the same result.
    pub fn generate(&self, seed: u64) -> Result<Environment, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        debug!(seed, "generating environment");
        self.assemble(&mut rng)
    }

    /// Generates an environment drawing every random decision from `rng`.
    pub fn assemble<R>(&self, rng: &mut R) -> Result<Environment, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let placement = self.sampler.place(rng)?;
        let placed = placement.riders().to_vec();
        let mut grid = placement.into_grid();
        let mut paths = Vec::with_capacity(placed.len());

        for placed_rider in placed {
            let id = placed_rider.id();
            let rider = grid.rider(id).unwrap_or(placed_rider);

            let path = match self.walker.walk(&grid, rider, rng) {
                Ok(path) => path,
                Err(error) => {
                    debug!(rider = id.get(), %error, "rider walk failed");
                    return Err(error);
                }
            };
            debug!(
                rider = id.get(),
                moves = path.moves(),
                blocked = path.blocked_cells().len(),
                "rider reached goal"
            );

            merge_path(&mut grid, &path)?;
            paths.push(path);
        }

        info!(
            width = grid.width(),
            height = grid.height(),
            riders = paths.len(),
            blocked = grid.count(|cell| cell.is_blocked()),
            "environment generated"
        );

        Ok(Environment { grid, paths })
    }
}

/// Generates a single environment for the configuration and seed.
pub fn generate(config: GenerationConfig, seed: u64) -> Result<Environment, GenerationError> {
    EnvironmentAssembler::new(config)?.generate(seed)
}

/// Blocks every cell of `grid` that the path blocked.
///
/// Only cells that are free in `grid` change; rider markers and cells blocked
/// earlier keep their values.
pub fn merge_path(grid: &mut Grid, path: &Path) -> Result<(), GenerationError> {
    for &coordinate in path.blocked_cells() {
        if grid.get(coordinate)?.is_free() {
            grid.set(coordinate, Cell::Blocked)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time_riders_core::{ConfigError, Coordinate, RiderId};

    use super::*;

    #[test]
    fn merge_keeps_markers_and_existing_obstacles() {
        let rider = RiderId::new(0);
        let mut snapshot = Grid::new(4, 1);
        snapshot
            .set(Coordinate::new(0, 0), Cell::Start(rider))
            .expect("in bounds");
        snapshot
            .set(Coordinate::new(3, 0), Cell::Goal(rider))
            .expect("in bounds");

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let path = Walker::new(4, 16)
            .walk(
                &snapshot,
                Rider::new(rider, Coordinate::new(0, 0), Coordinate::new(3, 0)),
                &mut rng,
            )
            .expect("straight corridor");

        let mut shared = snapshot.clone();
        shared
            .set(Coordinate::new(2, 0), Cell::Goal(RiderId::new(1)))
            .expect("in bounds");
        merge_path(&mut shared, &path).expect("same dimensions");

        assert_eq!(shared.get(Coordinate::new(0, 0)), Ok(Cell::Start(rider)));
        assert_eq!(shared.get(Coordinate::new(1, 0)), Ok(Cell::Blocked));
        assert_eq!(
            shared.get(Coordinate::new(2, 0)),
            Ok(Cell::Goal(RiderId::new(1)))
        );
        assert_eq!(shared.get(Coordinate::new(3, 0)), Ok(Cell::Goal(rider)));
    }

    #[test]
    fn merge_rejects_paths_from_larger_grids() {
        let rider = RiderId::new(0);
        let mut snapshot = Grid::new(3, 1);
        snapshot
            .set(Coordinate::new(0, 0), Cell::Start(rider))
            .expect("in bounds");
        snapshot
            .set(Coordinate::new(2, 0), Cell::Goal(rider))
            .expect("in bounds");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let path = Walker::new(3, 12)
            .walk(
                &snapshot,
                Rider::new(rider, Coordinate::new(0, 0), Coordinate::new(2, 0)),
                &mut rng,
            )
            .expect("straight corridor");

        let mut smaller = Grid::new(1, 1);
        assert!(matches!(
            merge_path(&mut smaller, &path),
            Err(GenerationError::OutOfBounds(_))
        ));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = GenerationConfig::new(4, 4, 0, 2);
        assert!(matches!(
            EnvironmentAssembler::new(config),
            Err(GenerationError::InvalidConfig(ConfigError::NoRiders))
        ));
    }
}
