//! Frame orchestration: turns a [`RenderConfig`] into a buffer of iteration
//! counts by dispatching the escape-time kernel over every pixel.

use std::time::Instant;

use log::{debug, info};
use shared::Params;

use crate::config::RenderConfig;
use crate::error::RenderError;

mod cpu;
#[cfg(feature = "gpu")]
mod gpu;

pub use cpu::CpuBackend;
#[cfg(feature = "gpu")]
pub use gpu::GpuBackend;

/// Something that can run the kernel over a whole frame.
///
/// `dispatch` must write every slot of `out` exactly once and must not
/// return before all of them are written.
pub trait Backend {
    fn name(&self) -> &'static str;

    fn dispatch(&mut self, params: &Params, block_size: u32, out: &mut [u32])
        -> Result<(), RenderError>;
}

/// Iteration counts for one frame, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    counts: Vec<u32>,
}

impl PixelBuffer {
    #[cfg(test)]
    pub(crate) fn from_counts(width: u32, height: u32, counts: Vec<u32>) -> Self {
        assert_eq!(counts.len(), width as usize * height as usize);
        Self {
            width,
            height,
            counts,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // `max(1)` keeps `chunks` happy for the empty default buffer.
        self.counts.chunks(self.width.max(1) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.counts.get((y * self.width + x) as usize).copied()
    }

    /// Resizes for a `width * height` frame. A changed pixel count drops the
    /// old allocation entirely so nothing from the previous frame survives.
    fn reshape(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let pixels = width as usize * height as usize;
        if pixels != self.counts.len() {
            debug!(
                "reallocating pixel buffer: {} -> {} pixels",
                self.counts.len(),
                pixels
            );
            let mut counts = Vec::new();
            counts
                .try_reserve_exact(pixels)
                .map_err(|_| RenderError::OutOfMemory {
                    pixels: pixels as u64,
                })?;
            counts.resize(pixels, 0);
            self.counts = counts;
        }
        self.width = width;
        self.height = height;
        Ok(())
    }
}

/// Owns a backend and the buffer it renders into. The buffer is reused
/// across frames of the same size.
pub struct Renderer {
    backend: Box<dyn Backend>,
    buffer: PixelBuffer,
}

impl Renderer {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            buffer: PixelBuffer::default(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Renders one frame and blocks until every pixel is computed.
    ///
    /// On error the buffer contents are unspecified; render again with a
    /// smaller frame.
    pub fn render(&mut self, config: &RenderConfig) -> Result<&PixelBuffer, RenderError> {
        let params = config.params();
        debug!(
            "rendering {}x{} on {}: begin={:?} span={:?} max_iter={}",
            params.width,
            params.height,
            self.backend.name(),
            params.begin,
            params.span,
            params.max_iter
        );

        self.buffer.reshape(config.width(), config.height())?;

        let start = Instant::now();
        self.backend
            .dispatch(&params, config.block_size(), &mut self.buffer.counts)?;

        let interior = self
            .buffer
            .counts
            .iter()
            .filter(|&&count| count >= params.max_iter)
            .count();
        info!(
            "rendered {} pixels in {:?} ({} interior)",
            params.pixels,
            start.elapsed(),
            interior
        );

        Ok(&self.buffer)
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

/// Renders `config` on a fresh CPU renderer and hands back the buffer.
pub fn render_frame(config: &RenderConfig) -> Result<PixelBuffer, RenderError> {
    let mut renderer = Renderer::new(Box::new(CpuBackend::new(None)?));
    renderer.render(config)?;
    Ok(renderer.into_buffer())
}
