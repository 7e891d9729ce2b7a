//! An interactive session: current parameters, the driver, the last rendered
//! frame and an optional GIF recording.
//!
//! This is the layer a front end talks to. Every fallible operation returns
//! an [`Error`] for the front end to report; none of them disturbs the
//! running simulation.

use crate::error::{Error, ExportError, Result};
use crate::export::{save_png, GifRecorder};
use crate::params::SimParams;
use crate::render::{CanvasConfig, Rasterizer};
use crate::simulation::{RunState, Simulation};
use image::RgbaImage;
use std::path::Path;
use tracing::{info, warn};

/// Front-end state for one canvas.
///
/// Holds the parameters being edited, the simulation they start, the last
/// rendered frame and an optional GIF recording. Parameter edits only take
/// effect on the next [`start`](Self::start).
#[derive(Debug)]
pub struct Session {
    params: SimParams,
    simulation: Simulation,
    rasterizer: Rasterizer,
    frame: Option<RgbaImage>,
    /// `Some` while a recording is in progress.
    recorder: Option<GifRecorder>,
    recorder_capacity: usize,
}

impl Session {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            params: SimParams::default(),
            simulation: Simulation::new().with_canvas(canvas),
            rasterizer: Rasterizer::new(canvas),
            frame: None,
            recorder: None,
            recorder_capacity: crate::export::GIF_FRAME_COUNT,
        }
    }

    /// Seed the spawn RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation = Simulation::new()
            .with_canvas(*self.rasterizer.canvas())
            .with_seed(seed);
        self
    }

    /// Number of frames per GIF recording.
    pub fn with_recording_length(mut self, frames: usize) -> Self {
        self.recorder_capacity = frames;
        self
    }

    pub fn with_params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Edit the parameters. Takes effect on the next [`start`](Self::start).
    pub fn params_mut(&mut self) -> &mut SimParams {
        &mut self.params
    }

    pub fn save_params(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.params.save(path)?;
        info!(path = %path.display(), "parameters saved");
        Ok(())
    }

    /// Load parameters. The current parameters are kept if loading fails.
    pub fn load_params(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Err(e) = self.params.reload(path) {
            warn!(path = %path.display(), error = %e, "failed to load parameters");
            return Err(e.into());
        }
        info!(path = %path.display(), "parameters loaded");
        Ok(())
    }

    // ========================================================================
    // Run control
    // ========================================================================

    /// Start a fresh run from a snapshot of the current parameters.
    pub fn start(&mut self) {
        self.simulation.start(self.params.clone());
    }

    pub fn stop(&mut self) {
        self.simulation.stop();
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// Tick once, render the result and feed the recorder.
    ///
    /// Returns the run state after the tick. Does nothing while idle.
    pub fn step(&mut self) -> RunState {
        if !self.simulation.is_running() {
            return RunState::Idle;
        }

        let state = self.simulation.tick();
        let frame = self.rasterizer.render(self.simulation.particles());

        if let Some(recorder) = self.recorder.as_mut().filter(|r| !r.is_full()) {
            recorder.capture(frame.clone());
            if recorder.is_full() {
                info!(frames = recorder.len(), "recording complete");
            }
        }

        self.frame = Some(frame);
        state
    }

    /// Step until idle or until `max_ticks` ticks have run. Returns the
    /// number of ticks taken.
    pub fn run_to_idle(&mut self, max_ticks: Option<u64>) -> u64 {
        let mut ticks = 0;
        while self.simulation.is_running() {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            self.step();
            ticks += 1;
        }
        ticks
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Most recently rendered frame.
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Save the last rendered frame as PNG.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<()> {
        let frame = self.frame.as_ref().ok_or(ExportError::NoActiveFrame)?;
        save_png(frame, path)?;
        Ok(())
    }

    /// Begin recording and restart the simulation.
    pub fn record_gif(&mut self) -> Result<()> {
        if self.recorder.is_some() {
            return Err(ExportError::AlreadyRecording.into());
        }
        self.recorder = Some(GifRecorder::with_capacity(self.recorder_capacity));
        info!(frames = self.recorder_capacity, "recording started");
        self.start();
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Whether the recording has captured all of its frames.
    pub fn recording_complete(&self) -> bool {
        self.recorder.as_ref().is_some_and(|r| r.is_full())
    }

    /// Frames captured so far by the current recording.
    pub fn recorded_frames(&self) -> usize {
        self.recorder.as_ref().map_or(0, |r| r.len())
    }

    /// End the recording and write it out. Returns the number of frames
    /// written.
    pub fn finish_gif(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let recorder = self.recorder.take().ok_or(ExportError::NoActiveFrame)?;
        recorder.save(path).map_err(Error::from)
    }

    /// End the recording without writing anything.
    pub fn cancel_recording(&mut self) {
        if self.recorder.take().is_some() {
            info!("recording discarded");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_canvas() -> CanvasConfig {
        CanvasConfig {
            width: 32,
            height: 24,
            ..Default::default()
        }
    }

    fn session(num: u32, life: i32) -> Session {
        Session::new(tiny_canvas()).with_seed(5).with_params(SimParams {
            num_particles: num,
            life,
            ..Default::default()
        })
    }

    #[test]
    fn test_step_renders_frame() {
        let mut s = session(5, 10);
        assert!(s.frame().is_none());
        s.start();
        assert_eq!(s.step(), RunState::Running);
        assert_eq!(s.frame().unwrap().dimensions(), (32, 24));
    }

    #[test]
    fn test_step_while_idle_keeps_frame() {
        let mut s = session(5, 10);
        assert_eq!(s.step(), RunState::Idle);
        assert!(s.frame().is_none());
    }

    #[test]
    fn test_run_to_idle() {
        let mut s = session(5, 12);
        s.start();
        assert_eq!(s.run_to_idle(None), 12);
        assert!(!s.is_running());
    }

    #[test]
    fn test_run_to_idle_respects_cap() {
        let mut s = session(5, 500);
        s.start();
        assert_eq!(s.run_to_idle(Some(7)), 7);
        assert!(s.is_running());
        assert_eq!(s.simulation().ticks(), 7);
    }

    #[test]
    fn test_params_changes_apply_on_next_start() {
        let mut s = session(5, 50);
        s.start();
        s.params_mut().num_particles = 9;
        assert_eq!(s.simulation().particles().len(), 5);
        s.start();
        assert_eq!(s.simulation().particles().len(), 9);
    }

    #[test]
    fn test_record_gif_collects_frames() {
        let mut s = session(3, 100).with_recording_length(4);
        s.record_gif().unwrap();
        assert!(s.is_running());
        assert!(s.is_recording());
        for _ in 0..6 {
            s.step();
        }
        assert!(s.recording_complete());
        assert_eq!(s.recorded_frames(), 4);
    }

    #[test]
    fn test_full_recording_stops_capturing() {
        let mut s = session(3, 100).with_recording_length(2);
        s.record_gif().unwrap();
        s.step();
        s.step();
        assert!(s.recording_complete());

        s.step();
        s.step();
        assert_eq!(s.recorded_frames(), 2);
        assert_eq!(s.simulation().ticks(), 4);
        assert!(s.frame().is_some());
    }

    #[test]
    fn test_session_debug() {
        let mut s = session(2, 10);
        s.start();
        let text = format!("{:?}", s);
        assert!(text.starts_with("Session"));
        assert!(text.contains("recorder_capacity"));
    }

    #[test]
    fn test_record_twice_fails() {
        let mut s = session(3, 100);
        s.record_gif().unwrap();
        assert!(matches!(
            s.record_gif(),
            Err(Error::Export(ExportError::AlreadyRecording))
        ));
        s.cancel_recording();
        assert!(!s.is_recording());
        assert!(s.record_gif().is_ok());
    }

    #[test]
    fn test_finish_without_recording_fails() {
        let mut s = session(3, 100);
        let dir = tempfile::tempdir().unwrap();
        assert!(s.finish_gif(dir.path().join("x.gif")).is_err());
    }
}
