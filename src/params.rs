//! Simulation parameters and the JSON parameter file.
//!
//! [`SimParams`] is the immutable snapshot handed to
//! [`Simulation::start`](crate::Simulation::start). It can be saved to and
//! loaded from a flat JSON document:
//!
//! ```json
//! {
//!     "num_particles": 100,
//!     "gravity": 1.0,
//!     "life": 100,
//!     "fade": 0.5,
//!     "vx_min": -5.0,
//!     "vx_max": 5.0,
//!     "vy_min": -5.0,
//!     "vy_max": 5.0,
//!     "wind": 0.0,
//!     "size_min": 2,
//!     "size_max": 5,
//!     "direction": "Random",
//!     "color": [255, 255, 255],
//!     "multicolor": false,
//!     "reset_color": false
//! }
//! ```
//!
//! Every key except `multicolor` and `reset_color` is required. Values are
//! not range checked.

use crate::error::ParamsError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Keys that must be present in a parameter file.
pub const REQUIRED_KEYS: &[&str] = &[
    "num_particles",
    "gravity",
    "life",
    "fade",
    "vx_min",
    "vx_max",
    "vy_min",
    "vy_max",
    "wind",
    "size_min",
    "size_max",
    "direction",
    "color",
];

/// Direction bias selected for emission.
///
/// Stored on every particle and persisted, but velocity sampling always uses
/// the full configured ranges.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Random,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Random => "Random",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["Random", "Up", "Down", "Left", "Right"]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How particle colors are chosen at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Every particle uses the same color.
    Fixed([u8; 3]),
    /// Each particle gets its own random RGB color.
    Random,
    /// Every particle is white.
    White,
}

/// Complete set of tunable emission and physics parameters.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SimParams {
    pub num_particles: u32,
    /// Added to `vy` every tick.
    pub gravity: f32,
    /// Initial life in ticks.
    pub life: i32,
    /// Carried onto particles, not used by the alpha decay.
    pub fade: f32,
    pub vx_min: f32,
    pub vx_max: f32,
    pub vy_min: f32,
    pub vy_max: f32,
    /// Constant offset added to every sampled `vx`.
    pub wind: f32,
    pub size_min: u32,
    pub size_max: u32,
    pub direction: Direction,
    pub color: [u8; 3],
    /// Optional in the file, defaults to `false`.
    pub multicolor: bool,
    /// Optional in the file, defaults to `false`.
    pub reset_color: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            num_particles: 100,
            gravity: 1.0,
            life: 100,
            fade: 0.5,
            vx_min: -5.0,
            vx_max: 5.0,
            vy_min: -5.0,
            vy_max: 5.0,
            wind: 0.0,
            size_min: 2,
            size_max: 5,
            direction: Direction::Random,
            color: [255, 255, 255],
            multicolor: false,
            reset_color: false,
        }
    }
}

impl SimParams {
    /// Resolve the color mode. `multicolor` takes precedence over `reset_color`.
    pub fn color_mode(&self) -> ColorMode {
        if self.multicolor {
            ColorMode::Random
        } else if self.reset_color {
            ColorMode::White
        } else {
            ColorMode::Fixed(self.color)
        }
    }

    /// Serialize to the pretty-printed parameter file format.
    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a parameter file document.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Save the parameters to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load parameters from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace `self` with the contents of a parameter file.
    ///
    /// On error `self` is left untouched.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        *self = Self::load(path)?;
        Ok(())
    }
}

impl TryFrom<Value> for SimParams {
    type Error = ParamsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ParamsError::MalformedValue {
                field: "<document>".into(),
                reason: "expected a JSON object".into(),
            });
        };

        if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !map.contains_key(**k)) {
            return Err(ParamsError::MissingField((*missing).to_string()));
        }

        Ok(Self {
            num_particles: field(&map, "num_particles")?,
            gravity: field(&map, "gravity")?,
            life: field(&map, "life")?,
            fade: field(&map, "fade")?,
            vx_min: field(&map, "vx_min")?,
            vx_max: field(&map, "vx_max")?,
            vy_min: field(&map, "vy_min")?,
            vy_max: field(&map, "vy_max")?,
            wind: field(&map, "wind")?,
            size_min: field(&map, "size_min")?,
            size_max: field(&map, "size_max")?,
            direction: field(&map, "direction")?,
            color: field(&map, "color")?,
            multicolor: optional_field(&map, "multicolor")?.unwrap_or(false),
            reset_color: optional_field(&map, "reset_color")?.unwrap_or(false),
        })
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Result<T, ParamsError> {
    optional_field(map, key)?.ok_or_else(|| ParamsError::MissingField(key.to_string()))
}

fn optional_field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<T>, ParamsError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ParamsError::MalformedValue {
                field: key.to_string(),
                reason: e.to_string(),
            }),
    }
}
