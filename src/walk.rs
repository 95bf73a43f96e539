use crate::error::DlaError;
use crate::grid::{Grid, Point};
use crate::settings::SimulationSettings;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Lifecycle of one particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Freshly sampled from the launch boundary
    Seeded(Point),
    Walking(Point),
    /// Terminal: attached to the cluster at this position
    Stuck(Point),
    /// Drifted past the escape radius (or hit the step cap); re-seeds next
    Escaped(Point),
}

/// Counters for one particle, across all of its launches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Moves taken
    pub steps: usize,
    /// Steps that began next to the cluster (each one a sticking draw)
    pub contacts: usize,
    pub reseeds: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOutcome {
    pub position: Point,
    pub stats: WalkStats,
}

/// Random walker over a borrowed grid; never writes occupancy
pub struct Walker<'a> {
    grid: &'a Grid,
    launch: &'a [Point],
    stickiness: f64,
    escape_radius_sq: i64,
    max_steps: Option<usize>,
    state: WalkState,
    steps_since_seed: usize,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    /// Seed a walker on a point drawn uniformly from `launch`
    pub fn new<R: Rng>(
        grid: &'a Grid,
        launch: &'a [Point],
        settings: &SimulationSettings,
        rng: &mut R,
    ) -> Result<Self, DlaError> {
        Ok(Self {
            grid,
            launch,
            stickiness: settings.stickiness,
            escape_radius_sq: settings.escape_radius_sq(grid.extent().radius),
            max_steps: settings.max_walk_steps,
            state: WalkState::Seeded(sample_launch_point(grid, launch, rng)?),
            steps_since_seed: 0,
            stats: WalkStats::default(),
        })
    }

    #[allow(dead_code)]
    pub fn state(&self) -> WalkState {
        self.state
    }

    #[allow(dead_code)]
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Advance the state machine by one transition
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Result<WalkState, DlaError> {
        self.state = match self.state {
            WalkState::Seeded(p) => {
                self.steps_since_seed = 0;
                WalkState::Walking(p)
            }
            WalkState::Escaped(p) => {
                debug!("Walker escaped at {:?}, re-seeding", p);
                self.stats.reseeds += 1;
                WalkState::Seeded(sample_launch_point(self.grid, self.launch, rng)?)
            }
            WalkState::Walking(p) => self.walk_step(p, rng)?,
            stuck @ WalkState::Stuck(_) => stuck,
        };
        Ok(self.state)
    }

    /// Stick check first, then move, then escape check on the new position
    fn walk_step<R: Rng>(&mut self, (x, y): Point, rng: &mut R) -> Result<WalkState, DlaError> {
        let mut free = [(0usize, 0usize); 8];
        let mut n_free = 0;
        let mut touching = false;
        for (nx, ny) in self.grid.moore_neighbors(x, y) {
            if self.grid.occupied(nx, ny)? {
                touching = true;
            } else {
                free[n_free] = (nx, ny);
                n_free += 1;
            }
        }

        if touching {
            self.stats.contacts += 1;
            if rng.gen::<f64>() < self.stickiness {
                return Ok(WalkState::Stuck((x, y)));
            }
        }

        let Some(&next) = free[..n_free].choose(rng) else {
            warn!("{}; resampling", DlaError::NoLegalMove { x, y });
            return Ok(WalkState::Walking((x, y)));
        };
        self.stats.steps += 1;
        self.steps_since_seed += 1;

        if self.escaped(next) || self.max_steps.is_some_and(|cap| self.steps_since_seed >= cap) {
            Ok(WalkState::Escaped(next))
        } else {
            Ok(WalkState::Walking(next))
        }
    }

    fn escaped(&self, (x, y): Point) -> bool {
        let (cx, cy) = self.grid.extent().center;
        let dx = x as i64 - cx as i64;
        let dy = y as i64 - cy as i64;
        dx * dx + dy * dy > self.escape_radius_sq
    }

    /// Walk until the particle sticks
    pub fn run<R: Rng>(mut self, rng: &mut R) -> Result<WalkOutcome, DlaError> {
        loop {
            if let WalkState::Stuck(position) = self.advance(rng)? {
                return Ok(WalkOutcome {
                    position,
                    stats: self.stats,
                });
            }
        }
    }
}

fn sample_launch_point<R: Rng>(grid: &Grid, launch: &[Point], rng: &mut R) -> Result<Point, DlaError> {
    launch.choose(rng).copied().ok_or_else(|| {
        let extent = grid.extent();
        DlaError::AnnulusOutOfBounds {
            center: extent.center,
            radius: extent.radius,
            size: grid.size(),
        }
    })
}
