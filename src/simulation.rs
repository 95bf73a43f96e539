use crate::error::DlaError;
use crate::geometry::launch_boundary;
use crate::grid::Grid;
use crate::settings::SimulationSettings;
use crate::walk::{WalkOutcome, Walker};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// DLA simulation state: the grid, its settings, and the random source driving walks
pub struct DlaSimulation<R: Rng = StdRng> {
    grid: Grid,
    settings: SimulationSettings,
    /// Particles deposited by this simulation (the initial seed is not counted)
    particles_stuck: usize,
    rng: R,
}

impl DlaSimulation<StdRng> {
    /// Fresh `size`x`size` grid with sticking probability `k`
    #[allow(dead_code)]
    pub fn new(size: usize, k: f64) -> Result<Self, DlaError> {
        Self::with_settings(
            size,
            SimulationSettings {
                stickiness: k,
                ..Default::default()
            },
        )
    }

    pub fn with_settings(size: usize, settings: SimulationSettings) -> Result<Self, DlaError> {
        Self::from_grid(Grid::new(size)?, settings)
    }

    /// Resume from an existing grid, e.g. one loaded from disk
    pub fn from_grid(grid: Grid, settings: SimulationSettings) -> Result<Self, DlaError> {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        DlaSimulation::with_rng(grid, settings, rng)
    }
}

impl<R: Rng> DlaSimulation<R> {
    /// Build around a caller-supplied random source
    pub fn with_rng(grid: Grid, settings: SimulationSettings, rng: R) -> Result<Self, DlaError> {
        settings.validate()?;
        Ok(Self {
            grid,
            settings,
            particles_stuck: 0,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn particles_stuck(&self) -> usize {
        self.particles_stuck
    }

    /// Adjust stickiness for subsequent depositions
    pub fn adjust_stickiness(&mut self, delta: f64) {
        self.settings.adjust_stickiness(delta);
    }

    /// Start over from a single center seed on a grid of the same size
    pub fn reset(&mut self) -> Result<(), DlaError> {
        self.grid = Grid::new(self.grid.size())?;
        self.particles_stuck = 0;
        Ok(())
    }

    /// Deposit `n` particles one after another.
    ///
    /// Stops at the first failure; particles deposited before it stay on the grid.
    pub fn deposit_particles(&mut self, n: usize) -> Result<usize, DlaError> {
        for i in 0..n {
            self.deposit_particle()?;

            let done = i + 1;
            if self.settings.progress_interval > 0 && done % self.settings.progress_interval == 0 {
                let extent = self.grid.extent();
                info!(
                    "Deposited {}/{} particles (radius {}, center {:?})",
                    done, n, extent.radius, extent.center
                );
            }
        }
        Ok(n)
    }

    /// Run one walker to completion and write its position to the grid
    pub fn deposit_particle(&mut self) -> Result<WalkOutcome, DlaError> {
        // The extent is fixed for the whole walk, so one boundary serves every re-seed.
        let launch = launch_boundary(&self.grid, self.settings.annulus_margin)?;
        let outcome = Walker::new(&self.grid, &launch, &self.settings, &mut self.rng)?.run(&mut self.rng)?;

        self.grid.deposit(outcome.position)?;
        self.particles_stuck += 1;
        debug!(
            "Particle {} stuck at {:?} after {} steps, {} contacts, {} re-seeds (radius now {})",
            self.particles_stuck,
            outcome.position,
            outcome.stats.steps,
            outcome.stats.contacts,
            outcome.stats.reseeds,
            self.grid.extent().radius
        );
        Ok(outcome)
    }

    /// Total unoccupied in-grid Moore neighbours over all occupied cells
    pub fn surface_area(&self) -> usize {
        self.grid
            .occupied_cells()
            .map(|(x, y)| {
                let (total, occupied) = self.grid.neighbor_counts(x, y);
                total - occupied
            })
            .sum()
    }

    /// Total occupied Moore neighbours over all occupied cells
    pub fn neighbour_count(&self) -> usize {
        self.grid
            .occupied_cells()
            .map(|(x, y)| self.grid.neighbor_counts(x, y).1)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_circle;

    fn seeded(size: usize, k: f64, seed: u64) -> DlaSimulation {
        DlaSimulation::with_settings(
            size,
            SimulationSettings {
                stickiness: k,
                rng_seed: Some(seed),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_simulation_state() {
        let sim = DlaSimulation::new(20, 0.5).unwrap();
        let grid = sim.grid();
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.occupied_cells().collect::<Vec<_>>(), vec![(10, 10)]);
        assert_eq!(grid.extent().radius, 0);
        assert_eq!(grid.extent().x_bounds, (10, 10));
        assert_eq!(grid.extent().y_bounds, (10, 10));
        assert_eq!(sim.particles_stuck(), 0);
    }

    #[test]
    fn test_invalid_stickiness_rejected() {
        assert!(matches!(DlaSimulation::new(20, 0.0), Err(DlaError::InvalidConfig(_))));
        assert!(DlaSimulation::new(20, 1.2).is_err());
        assert!(DlaSimulation::new(0, 1.0).is_err());
    }

    #[test]
    fn test_isolated_cell_diagnostics() {
        let sim = DlaSimulation::new(21, 1.0).unwrap();
        assert_eq!(sim.surface_area(), 8);
        assert_eq!(sim.neighbour_count(), 0);
    }

    #[test]
    fn test_pair_and_corner_diagnostics() {
        let mut cells = vec![false; 25];
        cells[2 * 5 + 2] = true;
        cells[2 * 5 + 3] = true;
        cells[0] = true;
        let grid = Grid::from_cells(5, cells).unwrap();
        let sim = DlaSimulation::with_rng(grid, SimulationSettings::default(), StdRng::seed_from_u64(0)).unwrap();

        // Pair: 7 free neighbours each. Corner cell: 3 in-grid neighbours, all free.
        assert_eq!(sim.surface_area(), 7 + 7 + 3);
        assert_eq!(sim.neighbour_count(), 2);
    }

    #[test]
    fn test_single_deposit_on_small_grid() {
        let mut sim = seeded(21, 1.0, 42);
        let ring = bounding_circle((10, 10), 0, 21, 10);

        assert_eq!(sim.deposit_particles(1).unwrap(), 1);

        let cells: Vec<_> = sim.grid().occupied_cells().collect();
        assert_eq!(cells.len(), 2);
        assert!(cells.contains(&(10, 10)));
        let new = cells.into_iter().find(|&p| p != (10, 10)).unwrap();
        assert!(new.0.abs_diff(10) <= 1 && new.1.abs_diff(10) <= 1);
        assert!(ring.contains(&new));
        assert_eq!(sim.particles_stuck(), 1);
    }

    #[test]
    fn test_grid_too_small_surfaces_error() {
        let mut sim = DlaSimulation::new(5, 1.0).unwrap();
        let err = sim.deposit_particles(1).unwrap_err();
        assert!(matches!(err, DlaError::AnnulusOutOfBounds { size: 5, .. }));
        assert_eq!(sim.grid().occupied_count(), 1);
        assert_eq!(sim.particles_stuck(), 0);
    }

    #[test]
    fn test_growth_keeps_radius_invariant() {
        let mut sim = seeded(101, 1.0, 9);
        let mut last_radius = 0;
        for _ in 0..150 {
            let outcome = sim.deposit_particle().unwrap();
            let grid = sim.grid();
            let ext = grid.extent();

            let (x, y) = outcome.position;
            assert!(grid.occupied(x, y).unwrap());
            assert!(ext.x_bounds.0 <= x && x <= ext.x_bounds.1);
            assert!(ext.y_bounds.0 <= y && y <= ext.y_bounds.1);

            let dx = (ext.x_bounds.1 - ext.center.0) as i64;
            let dy = (ext.y_bounds.1 - ext.center.1) as i64;
            let r = ext.radius as i64;
            assert!(dx * dx + dy * dy < r * r);
            assert!((r - 1) * (r - 1) <= dx * dx + dy * dy);
            assert!(ext.radius >= last_radius);
            last_radius = ext.radius;
        }
        assert_eq!(sim.grid().occupied_count(), 151);
    }

    #[test]
    fn test_cluster_stays_connected() {
        let mut sim = seeded(81, 0.7, 3);
        sim.deposit_particles(120).unwrap();
        let grid = sim.grid();
        for (x, y) in grid.occupied_cells() {
            assert!(grid.neighbor_counts(x, y).1 > 0, "({x}, {y}) is detached");
        }
        assert!(sim.neighbour_count() >= 2 * 120);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = seeded(61, 0.5, 77);
        let mut b = seeded(61, 0.5, 77);
        a.deposit_particles(40).unwrap();
        b.deposit_particles(40).unwrap();
        assert!(a.grid().occupied_cells().eq(b.grid().occupied_cells()));
    }

    #[test]
    fn test_resume_from_grid() {
        let mut sim = seeded(61, 1.0, 5);
        sim.deposit_particles(25).unwrap();
        let cells: Vec<bool> = sim.grid().rows().flatten().copied().collect();

        let grid = Grid::from_cells(61, cells).unwrap();
        assert_eq!(grid.extent(), sim.grid().extent());
        let mut resumed = DlaSimulation::with_rng(grid, sim.settings().clone(), StdRng::seed_from_u64(6)).unwrap();
        resumed.deposit_particles(10).unwrap();
        assert_eq!(resumed.grid().occupied_count(), 36);
    }

    #[test]
    fn test_reset_restores_single_seed() {
        let mut sim = seeded(41, 1.0, 1);
        sim.deposit_particles(10).unwrap();
        sim.reset().unwrap();
        assert_eq!(sim.grid().occupied_count(), 1);
        assert_eq!(sim.grid().extent().radius, 0);
        assert_eq!(sim.particles_stuck(), 0);
    }
}
