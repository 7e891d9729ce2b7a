//! CPU rasterization of the live particle set.
//!
//! Each particle is drawn as a filled ellipse inscribed in the square whose
//! top-left corner is the truncated particle position and whose side is the
//! particle size. Colors are blended source-over using the particle alpha
//! onto an opaque background.

use crate::particle::Particle;
use image::{Rgba, RgbaImage};

/// Canvas dimensions and background color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            background: [25, 25, 25],
        }
    }
}

/// Draws particles into RGBA frames.
#[derive(Clone, Debug, Default)]
pub struct Rasterizer {
    canvas: CanvasConfig,
}

impl Rasterizer {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Render a fresh frame.
    pub fn render(&self, particles: &[Particle]) -> RgbaImage {
        let [r, g, b] = self.canvas.background;
        let mut frame = RgbaImage::from_pixel(self.canvas.width, self.canvas.height, Rgba([r, g, b, 255]));
        for particle in particles {
            draw_particle(&mut frame, particle);
        }
        frame
    }
}

fn draw_particle(frame: &mut RgbaImage, particle: &Particle) {
    if particle.size == 0 || particle.alpha == 0 {
        return;
    }

    // Truncation toward zero, matching integer pixel placement.
    let left = particle.position.x as i64;
    let top = particle.position.y as i64;
    let size = particle.size as i64;
    let radius = particle.size as f32 / 2.0;
    let center_x = left as f32 + radius;
    let center_y = top as f32 + radius;

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + size).min(frame.width() as i64);
    let y1 = (top + size).min(frame.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let r_sq = radius * radius;
    for py in y0..y1 {
        let dy = py as f32 + 0.5 - center_y;
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - center_x;
            if dx * dx + dy * dy <= r_sq {
                let dst = frame.get_pixel_mut(px as u32, py as u32);
                blend_over(dst, particle.rgba());
            }
        }
    }
}

/// Source-over blend onto an opaque destination.
fn blend_over(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let a = src[3] as u32;
    let inv = 255 - a;
    for c in 0..3 {
        dst.0[c] = ((src[c] as u32 * a + dst.0[c] as u32 * inv + 127) / 255) as u8;
    }
    dst.0[3] = 255;
}
