use crate::simulation::DlaSimulation;
use log::error;

/// State for the live terminal view
pub struct App {
    pub simulation: DlaSimulation,
    /// Particles to deposit before the run is complete
    pub target_particles: usize,
    /// Depositions per frame
    pub steps_per_frame: usize,
    pub paused: bool,
    pub show_help: bool,
    /// Last fatal error from the engine; halts the run until reset
    pub halted: Option<String>,
}

impl App {
    pub fn new(simulation: DlaSimulation, target_particles: usize, steps_per_frame: usize) -> Self {
        Self {
            simulation,
            target_particles,
            steps_per_frame: steps_per_frame.clamp(1, 500),
            paused: false,
            show_help: false,
            halted: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.simulation.particles_stuck() >= self.target_particles
    }

    /// Progress as a ratio (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        (self.simulation.particles_stuck() as f32 / self.target_particles.max(1) as f32).min(1.0)
    }

    /// Run simulation steps for current frame
    pub fn tick(&mut self) {
        if self.paused || self.halted.is_some() || self.is_complete() {
            return;
        }
        let remaining = self.target_particles - self.simulation.particles_stuck();
        if let Err(e) = self.simulation.deposit_particles(self.steps_per_frame.min(remaining)) {
            error!("Simulation halted after {} particles: {}", self.simulation.particles_stuck(), e);
            self.halted = Some(e.to_string());
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Reset simulation to a single seed
    pub fn reset(&mut self) {
        self.halted = self.simulation.reset().err().map(|e| e.to_string());
        self.paused = false;
    }

    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame * 2).min(500);
    }

    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame / 2).max(1);
    }

    pub fn adjust_stickiness(&mut self, delta: f64) {
        self.simulation.adjust_stickiness(delta);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
