mod app;
mod braille;
mod config;
mod error;
mod geometry;
mod grid;
mod render;
mod settings;
mod simulation;
mod storage;
mod ui;
mod walk;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use simulation::DlaSimulation;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "dla-aggregate")]
#[command(about = "On-lattice Diffusion-Limited Aggregation")]
struct Args {
    /// JSON config file (defaults to <config dir>/dla-aggregate/config.json when present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and continue
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,

    /// Grid side length
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Number of particles to deposit
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Sticking probability per step next to the cluster (0-1]
    #[arg(short = 'k', long)]
    stickiness: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Extra columns swept around the launch circle
    #[arg(long = "annulus-margin")]
    annulus_margin: Option<usize>,

    /// Slack beyond the cluster radius before a walker is re-seeded
    #[arg(long = "escape-margin")]
    escape_margin: Option<usize>,

    /// Re-seed a walker after this many steps
    #[arg(long = "max-walk-steps")]
    max_walk_steps: Option<usize>,

    /// Resume from a saved grid instead of a fresh seed
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the final grid to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Render the final grid to an image (PNG)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Pixels per grid cell in the rendered image
    #[arg(long, default_value = "2")]
    scale: u32,

    /// Watch the cluster grow in the terminal
    #[arg(short = 'w', long)]
    watch: bool,

    /// Depositions per frame in watch mode (1-500)
    #[arg(long, default_value = "5")]
    speed: usize,
}

impl Args {
    /// Config file contents overlaid with any values given on the command line
    fn resolve_config(&self) -> Result<AppConfig, error::DlaError> {
        let path = self
            .config
            .clone()
            .or_else(|| AppConfig::default_path().filter(|p| p.exists()));
        let mut config = match path {
            Some(path) => {
                info!("Using config {}", path.display());
                AppConfig::load_from_file(&path)?
            }
            None => AppConfig::default(),
        };

        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(particles) = self.particles {
            config.particles = particles;
        }
        let settings = &mut config.settings;
        if let Some(k) = self.stickiness {
            settings.stickiness = k;
        }
        if self.seed.is_some() {
            settings.rng_seed = self.seed;
        }
        if let Some(margin) = self.annulus_margin {
            settings.annulus_margin = margin;
        }
        if let Some(margin) = self.escape_margin {
            settings.escape_margin = margin;
        }
        if self.max_walk_steps.is_some() {
            settings.max_walk_steps = self.max_walk_steps;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Log lines would tear the alternate screen, so watch mode stays quiet unless RUST_LOG asks otherwise
    let default_filter = if args.watch { "off" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = args.resolve_config()?;
    if let Some(path) = &args.export_config {
        config.save_to_file(path)?;
        info!("Exported config to {}", path.display());
    }

    let mut sim = match &args.load {
        Some(path) => {
            let grid = storage::load_grid(path)?;
            if grid.size() != config.size {
                warn!("Loaded grid is {0}x{0}; ignoring configured size {1}", grid.size(), config.size);
            }
            DlaSimulation::from_grid(grid, config.settings.clone())?
        }
        None => DlaSimulation::with_settings(config.size, config.settings.clone())?,
    };

    if args.watch {
        let mut app = App::new(sim, config.particles, args.speed);
        run_watch(&mut app)?;
        sim = app.simulation;
    } else {
        let start = Instant::now();
        info!(
            "Depositing {} particles on a {1}x{1} grid (k = {2})",
            config.particles,
            sim.grid().size(),
            config.settings.stickiness
        );
        let result = sim.deposit_particles(config.particles);
        info!(
            "Deposited {} particles in {:.2} s",
            sim.particles_stuck(),
            start.elapsed().as_secs_f64()
        );
        if let Err(e) = result {
            // Keep what was grown so far before reporting the failure
            save_outputs(&args, &sim)?;
            return Err(e.into());
        }
    }

    let extent = sim.grid().extent();
    println!("occupied cells : {}", sim.grid().occupied_count());
    println!("radius         : {}", extent.radius);
    println!("center         : {:?}", extent.center);
    println!("surface area   : {}", sim.surface_area());
    println!("neighbour count: {}", sim.neighbour_count());

    save_outputs(&args, &sim)?;
    Ok(())
}

fn save_outputs(args: &Args, sim: &DlaSimulation) -> Result<(), error::DlaError> {
    if let Some(path) = &args.save {
        storage::save_grid(sim.grid(), path)?;
    }
    if let Some(path) = &args.image {
        render::save_png(sim.grid(), path, args.scale)?;
    }
    Ok(())
}

fn run_watch(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_speed(),
                    KeyCode::Up => app.adjust_stickiness(0.05),
                    KeyCode::Down => app.adjust_stickiness(-0.05),
                    KeyCode::Esc if app.show_help => app.toggle_help(),
                    _ => {}
                }
            }
        }

        app.tick();
    }
}
