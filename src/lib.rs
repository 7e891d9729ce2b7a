//! # pgen - Particle Generator
//!
//! A small 2D particle system. A batch of particles is emitted over a canvas,
//! advanced once per tick with Euler integration, faded by remaining life and
//! removed when dead. Runs can be exported as PNG snapshots, JSON parameter
//! files and animated GIFs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pgen::prelude::*;
//!
//! let mut session = Session::default().with_params(SimParams {
//!     num_particles: 300,
//!     gravity: 0.2,
//!     life: 120,
//!     ..Default::default()
//! });
//!
//! session.record_gif()?;
//! session.run_to_idle(None);
//! session.save_image("last.png")?;
//! session.finish_gif("run.gif")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A [`Particle`] is spawned from [`SimParams`] with a random size, canvas
//! position, velocity and (depending on the color mode) color. Every tick:
//!
//! ```text
//! vy += gravity
//! x += vx; y += vy
//! life -= 1
//! alpha = clamp(0, 255, floor(255 * life / 100))
//! ```
//!
//! ### Driving a run
//!
//! [`Simulation`] owns the live set and is either [`RunState::Idle`] or
//! [`RunState::Running`]. It has no clock: call [`Simulation::tick`] at a
//! fixed cadence (see [`time::TickTimer`]) until it goes idle.
//!
//! ### Rendering and export
//!
//! [`Rasterizer`] draws the live set into an RGBA frame. [`export`] writes
//! PNG and GIF files. [`Session`] ties everything together for a front end.
//!
//! | Operation | Entry point |
//! |-----------|-------------|
//! | Start / stop | [`Session::start`], [`Session::stop`] |
//! | Advance | [`Session::step`], [`Session::run_to_idle`] |
//! | Parameters | [`Session::save_params`], [`Session::load_params`] |
//! | PNG | [`Session::save_image`] |
//! | GIF | [`Session::record_gif`], [`Session::finish_gif`] |

pub mod error;
pub mod export;
pub mod params;
mod particle;
mod render;
mod session;
mod simulation;
pub mod time;

pub use error::{Error, ExportError, ParamsError, Result};
pub use export::GifRecorder;
pub use glam::Vec2;
pub use params::{ColorMode, Direction, SimParams};
pub use particle::{alpha_for_life, Particle, ALPHA_DIVISOR};
pub use render::{CanvasConfig, Rasterizer};
pub use session::Session;
pub use simulation::{RunState, Simulation};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pgen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, ExportError, ParamsError};
    pub use crate::export::GifRecorder;
    pub use crate::params::{ColorMode, Direction, SimParams};
    pub use crate::particle::Particle;
    pub use crate::render::{CanvasConfig, Rasterizer};
    pub use crate::session::Session;
    pub use crate::simulation::{RunState, Simulation};
    pub use crate::time::TickTimer;
    pub use crate::Vec2;
}
