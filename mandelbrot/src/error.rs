use thiserror::Error;

/// Rejected configuration. Raised once when a `RenderConfig` is built,
/// never from inside a render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width must be greater than zero")]
    ZeroWidth,
    #[error("height must be greater than zero")]
    ZeroHeight,
    #[error("zoom must be non-zero")]
    ZeroZoom,
    #[error("iteration limit must be greater than zero")]
    ZeroMaxIter,
    #[error("block size must be greater than zero")]
    ZeroBlockSize,
    #[error("{width}x{height} pixels do not fit a 32-bit pixel index")]
    TooManyPixels { width: u32, height: u32 },
    #[error("palette has {len} colours, at least {min} are required")]
    PaletteTooShort { len: usize, min: usize },
    #[error("invalid palette entry {0:?}, expected a byte in decimal or 0x hex")]
    InvalidPaletteEntry(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("out of memory allocating the buffer for {pixels} pixels")]
    OutOfMemory { pixels: u64 },
    #[error("failed to build the worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[cfg(feature = "gpu")]
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[cfg(feature = "gpu")]
    #[error("failed to open the GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
    #[cfg(feature = "gpu")]
    #[error("failed to read results back from the GPU")]
    BufferMap(#[from] wgpu::BufferAsyncError),
}
