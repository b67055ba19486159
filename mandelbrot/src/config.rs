//! Immutable render configuration and the viewport geometry derived from it.

use shared::{Complex, Params};

use crate::error::ConfigError;
use crate::palette::Palette;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const DEFAULT_ZOOM: i32 = 1;
pub const DEFAULT_DELTA: i32 = 1;
pub const DEFAULT_MAX_ITER: u32 = 10_000;
pub const DEFAULT_BLOCK_SIZE: u32 = 256;
pub const DEFAULT_CENTER: Complex = Complex::new(-0.7, 0.0);

/// Extent of the plane covered by the larger image dimension at zoom 1.
pub const BASE_EXTENT: f64 = 2.7;
/// Height of a terminal cell relative to its width.
pub const CELL_ASPECT: f64 = 4. / 3.;

/// The plane rectangle a frame covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub begin: Complex,
    pub span: Complex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Complex,
    pub zoom: i32,
    /// Pan, in pixels, applied after scaling.
    pub delta_x: i32,
    pub delta_y: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            delta_x: DEFAULT_DELTA,
            delta_y: DEFAULT_DELTA,
        }
    }
}

impl Viewport {
    /// Scales uniformly by the larger dimension, so a frame never shows less
    /// than `BASE_EXTENT / zoom` along either axis. The imaginary axis points
    /// up: row 0 is the top of the image.
    pub fn frame(&self, width: u32, height: u32) -> Frame {
        let (w, h) = (width as f64, height as f64);
        let step = BASE_EXTENT / (self.zoom as f64 * w.max(h));
        let span = Complex::new(step * w, -step * CELL_ASPECT * h);

        let pan = Complex::new(
            self.delta_x as f64 * span.re / w,
            self.delta_y as f64 * span.im / h,
        );
        let center = self.center + pan;

        Frame {
            begin: center - span.scale(0.5),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    width: u32,
    height: u32,
    viewport: Viewport,
    max_iter: u32,
    block_size: u32,
    palette: Palette,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> u32 {
        self.width * self.height
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Kernel parameters for this configuration. Pure: equal configs give equal params.
    pub fn params(&self) -> Params {
        let Frame { begin, span } = self.viewport.frame(self.width, self.height);
        Params::new(self.width, self.height, self.max_iter, begin, span)
    }

    /// A builder seeded with this configuration, for deriving a variant.
    pub fn to_builder(&self) -> RenderConfigBuilder {
        RenderConfigBuilder {
            width: self.width,
            height: self.height,
            viewport: self.viewport,
            max_iter: self.max_iter,
            block_size: self.block_size,
            palette: Ok(self.palette.clone()),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            viewport: Viewport::default(),
            max_iter: DEFAULT_MAX_ITER,
            block_size: DEFAULT_BLOCK_SIZE,
            palette: Palette::default(),
        }
    }
}

/// Collects settings and validates them all at once in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RenderConfigBuilder {
    width: u32,
    height: u32,
    viewport: Viewport,
    max_iter: u32,
    block_size: u32,
    palette: Result<Palette, ConfigError>,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        RenderConfig::default().to_builder()
    }
}

impl RenderConfigBuilder {
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn zoom(mut self, zoom: i32) -> Self {
        self.viewport.zoom = zoom;
        self
    }

    pub fn delta_x(mut self, delta_x: i32) -> Self {
        self.viewport.delta_x = delta_x;
        self
    }

    pub fn delta_y(mut self, delta_y: i32) -> Self {
        self.viewport.delta_y = delta_y;
        self
    }

    pub fn center(mut self, center: Complex) -> Self {
        self.viewport.center = center;
        self
    }

    pub fn max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Ok(palette);
        self
    }

    /// A short palette is held as an error and reported by `build`.
    pub fn custom_palette(mut self, colours: impl Into<Vec<u8>>) -> Self {
        self.palette = Palette::new(colours);
        self
    }

    pub fn full_colours(self) -> Self {
        self.palette(Palette::full_colours())
    }

    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::TooManyPixels {
                width: self.width,
                height: self.height,
            });
        }
        if self.viewport.zoom == 0 {
            return Err(ConfigError::ZeroZoom);
        }
        if self.max_iter == 0 {
            return Err(ConfigError::ZeroMaxIter);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }

        Ok(RenderConfig {
            width: self.width,
            height: self.height,
            viewport: self.viewport,
            max_iter: self.max_iter,
            block_size: self.block_size,
            palette: self.palette?,
        })
    }
}
