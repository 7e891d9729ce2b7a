//! Simulation driver: owns the live particle set and the run state.
//!
//! The driver does not own a clock. Something external (a [`TickTimer`],
//! a GUI timer, a test loop) calls [`Simulation::tick`] at a fixed cadence
//! until it reports [`RunState::Idle`].
//!
//! [`TickTimer`]: crate::time::TickTimer

use crate::params::SimParams;
use crate::particle::Particle;
use crate::render::CanvasConfig;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Whether ticks are being driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// The particle simulation.
///
/// ```ignore
/// let mut sim = Simulation::new().with_seed(1);
/// sim.start(SimParams::default());
/// while sim.tick() == RunState::Running {
///     draw(sim.particles());
/// }
/// ```
#[derive(Debug)]
pub struct Simulation {
    canvas: CanvasConfig,
    particles: Vec<Particle>,
    state: RunState,
    params: Option<SimParams>,
    ticks: u64,
    rng: SmallRng,
}

impl Simulation {
    /// Create an idle simulation on the default canvas.
    pub fn new() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            particles: Vec::new(),
            state: RunState::Idle,
            params: None,
            ticks: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Set the canvas particles are spawned over.
    pub fn with_canvas(mut self, canvas: CanvasConfig) -> Self {
        self.canvas = canvas;
        self
    }

    /// Seed the spawn RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Discard the current set and spawn a fresh one.
    pub fn start(&mut self, params: SimParams) {
        self.particles.clear();
        self.particles.reserve(params.num_particles as usize);
        for _ in 0..params.num_particles {
            let particle = Particle::spawn(&params, &self.canvas, &mut self.rng);
            self.particles.push(particle);
        }
        info!(
            particles = self.particles.len(),
            life = params.life,
            "simulation started"
        );
        self.params = Some(params);
        self.ticks = 0;
        self.state = RunState::Running;
    }

    /// Advance every live particle once and drop the dead ones.
    ///
    /// Returns the run state after the tick. Does nothing while idle.
    pub fn tick(&mut self) -> RunState {
        if self.state == RunState::Idle {
            return self.state;
        }

        for particle in &mut self.particles {
            particle.advance();
        }
        self.particles.retain(|p| !p.is_dead());
        self.ticks += 1;
        debug!(tick = self.ticks, alive = self.particles.len(), "tick");

        if self.particles.is_empty() {
            info!(ticks = self.ticks, "all particles expired");
            self.state = RunState::Idle;
        }
        self.state
    }

    /// Stop immediately, discarding any remaining particles.
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            info!(remaining = self.particles.len(), ticks = self.ticks, "simulation stopped");
        }
        self.particles.clear();
        self.state = RunState::Idle;
    }

    /// Live particles, for rendering.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Ticks since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Parameters of the current or last run.
    pub fn params(&self) -> Option<&SimParams> {
        self.params.as_ref()
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
