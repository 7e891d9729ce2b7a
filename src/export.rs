//! PNG and animated GIF export.
//!
//! # Recording
//!
//! [`GifRecorder`] is fed synchronously after each tick with an owned copy of
//! the rendered frame, so it never races with the next tick. It stops
//! accepting frames once [`GIF_FRAME_COUNT`] have been captured.

use crate::error::ExportError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, RgbaImage};
use std::fs;
use std::path::Path;
use tracing::info;

/// Frames per recording (~5 s at 60 Hz).
pub const GIF_FRAME_COUNT: usize = 300;

/// Display time of each GIF frame (1/60 s).
pub fn gif_frame_delay() -> Delay {
    Delay::from_numer_denom_ms(1000, 60)
}

/// Write a single frame as PNG.
pub fn save_png(frame: &RgbaImage, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    frame.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), "image saved");
    Ok(())
}

/// Write frames as an endlessly looping animated GIF.
pub fn write_gif<'a, I>(frames: I, path: impl AsRef<Path>, delay: Delay) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a RgbaImage>,
{
    let path = path.as_ref();
    let mut frames = frames.into_iter().peekable();
    if frames.peek().is_none() {
        return Err(ExportError::NoActiveFrame);
    }

    // The trailer is only emitted when the encoder drops, so encode into
    // memory and let the single file write report any I/O failure.
    let mut bytes = Vec::new();
    let mut written = 0;
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite)?;
        for frame in frames {
            encoder.encode_frame(Frame::from_parts(frame.clone(), 0, 0, delay))?;
            written += 1;
        }
    }
    fs::write(path, &bytes)?;
    info!(path = %path.display(), frames = written, "gif saved");
    Ok(written)
}

/// Fixed-length frame buffer for GIF export.
#[derive(Debug)]
pub struct GifRecorder {
    capacity: usize,
    frames: Vec<RgbaImage>,
}

impl GifRecorder {
    /// Recorder holding [`GIF_FRAME_COUNT`] frames.
    pub fn new() -> Self {
        Self::with_capacity(GIF_FRAME_COUNT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Store a frame. Returns `false` once the recorder is full and the frame
    /// was dropped.
    pub fn capture(&mut self, frame: RgbaImage) -> bool {
        if self.is_full() {
            return false;
        }
        self.frames.push(frame);
        true
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Encode the captured frames to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, ExportError> {
        write_gif(&self.frames, path, gif_frame_delay())
    }
}

impl Default for GifRecorder {
    fn default() -> Self {
        Self::new()
    }
}
