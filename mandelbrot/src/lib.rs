//! Escape-time Mandelbrot rendering for ANSI terminals.
//!
//! The kernel lives in the `shader` crate and runs either on a rayon pool or,
//! with the `gpu` feature, as a rust-gpu compute shader through wgpu.

pub mod cli;
pub mod config;
pub mod error;
pub mod palette;
pub mod present;
pub mod render;

pub use config::{RenderConfig, Viewport};
pub use palette::Palette;
pub use render::{render_frame, PixelBuffer, Renderer};
