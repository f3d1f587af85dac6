#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Coordinate sampler that reserves start and goal cells for every rider.

use rand::{seq::SliceRandom, Rng};
use time_riders_core::{
    Cell, ConfigError, Coordinate, GenerationError, Grid, Rider, RiderId, MAX_RIDERS,
};

/// Fresh grid populated with start and goal markers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    grid: Grid,
    riders: Vec<Rider>,
}

impl Placement {
    /// Grid holding exactly one start and one goal marker per rider.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Riders ordered by identifier.
    #[must_use]
    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    /// Consumes the placement, yielding the populated grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Draws distinct start and goal coordinates for a fixed rider count.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateSampler {
    width: u32,
    height: u32,
    num_riders: usize,
}

impl CoordinateSampler {
    /// Creates a sampler for the provided grid dimensions and rider count.
    #[must_use]
    pub const fn new(width: u32, height: u32, num_riders: usize) -> Self {
        Self {
            width,
            height,
            num_riders,
        }
    }

    /// Places every rider's start and goal on a fresh grid.
    ///
    /// All coordinates are shuffled and the first `2 × num_riders` are kept.
    /// Rider `i` receives the `i`-th coordinate as its goal and the
    /// `num_riders + i`-th as its start. Capacity is checked before any draw.
    pub fn place<R>(&self, rng: &mut R) -> Result<Placement, GenerationError>
    where
        R: Rng + ?Sized,
    {
        if self.num_riders > MAX_RIDERS {
            return Err(GenerationError::InvalidConfig(ConfigError::TooManyRiders {
                requested: self.num_riders,
                max: MAX_RIDERS,
            }));
        }

        let mut grid = Grid::new(self.width, self.height);
        let requested = self.num_riders.saturating_mul(2);
        let available = grid.area();
        if requested > available {
            return Err(GenerationError::CapacityExceeded {
                requested,
                available,
            });
        }

        let mut coordinates: Vec<Coordinate> = grid.coordinates().collect();
        coordinates.shuffle(rng);

        let (goals, rest) = coordinates.split_at(self.num_riders);
        let starts = &rest[..self.num_riders];

        let mut riders = Vec::with_capacity(self.num_riders);
        for (index, (&goal, &start)) in goals.iter().zip(starts).enumerate() {
            let id = rider_id(index)?;
            grid.set(goal, Cell::Goal(id))?;
            grid.set(start, Cell::Start(id))?;
            riders.push(Rider::new(id, start, goal));
        }

        Ok(Placement { grid, riders })
    }
}

fn rider_id(index: usize) -> Result<RiderId, GenerationError> {
    u8::try_from(index).map(RiderId::new).map_err(|_| {
        GenerationError::InvalidConfig(ConfigError::TooManyRiders {
            requested: index + 1,
            max: MAX_RIDERS,
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn places_one_start_and_goal_per_rider() {
        let sampler = CoordinateSampler::new(6, 5, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let placement = sampler.place(&mut rng).expect("grid has capacity");
        let grid = placement.grid();

        assert_eq!(grid.count(|cell| !cell.is_free()), 8);
        for rider in placement.riders() {
            assert_ne!(rider.start(), rider.goal());
            assert_eq!(grid.get(rider.start()), Ok(Cell::Start(rider.id())));
            assert_eq!(grid.get(rider.goal()), Ok(Cell::Goal(rider.id())));
            assert_eq!(grid.rider(rider.id()), Some(*rider));
        }

        let distinct: HashSet<_> = placement
            .riders()
            .iter()
            .flat_map(|rider| [rider.start(), rider.goal()])
            .collect();
        assert_eq!(distinct.len(), 8, "coordinates must never repeat");
    }

    #[test]
    fn fills_grid_exactly_at_capacity() {
        let sampler = CoordinateSampler::new(2, 2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let placement = sampler.place(&mut rng).expect("four cells fit two riders");
        assert_eq!(placement.grid().count(|cell| cell.is_free()), 0);
    }

    #[test]
    fn rejects_more_coordinates_than_cells() {
        let sampler = CoordinateSampler::new(2, 2, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(
            sampler.place(&mut rng),
            Err(GenerationError::CapacityExceeded {
                requested: 6,
                available: 4,
            })
        );
    }

    #[test]
    fn same_seed_produces_same_placement() {
        let sampler = CoordinateSampler::new(10, 10, 5);
        let first = sampler
            .place(&mut ChaCha8Rng::seed_from_u64(42))
            .expect("placement succeeds");
        let second = sampler
            .place(&mut ChaCha8Rng::seed_from_u64(42))
            .expect("placement succeeds");

        assert_eq!(first, second);
    }
}
