use clap::{Parser, ValueEnum};
use shared::Complex;

use crate::config::{
    RenderConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CENTER, DEFAULT_DELTA, DEFAULT_HEIGHT,
    DEFAULT_MAX_ITER, DEFAULT_WIDTH, DEFAULT_ZOOM,
};
use crate::error::ConfigError;
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Cpu,
    /// Needs the `gpu` cargo feature.
    Gpu,
}

/// Render the Mandelbrot set as ANSI 256-colour text.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Columns
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Rows
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Zoom divisor, must be non-zero
    #[arg(short, long, default_value_t = DEFAULT_ZOOM, allow_negative_numbers = true)]
    pub zoom: i32,

    /// Horizontal pan in pixels
    #[arg(long, default_value_t = DEFAULT_DELTA, allow_negative_numbers = true)]
    pub delta_x: i32,

    /// Vertical pan in pixels
    #[arg(long, default_value_t = DEFAULT_DELTA, allow_negative_numbers = true)]
    pub delta_y: i32,

    /// Real part of the viewport centre
    #[arg(long, default_value_t = DEFAULT_CENTER.re, allow_negative_numbers = true)]
    pub center_re: f64,

    /// Imaginary part of the viewport centre
    #[arg(long, default_value_t = DEFAULT_CENTER.im, allow_negative_numbers = true)]
    pub center_im: f64,

    /// Iteration limit
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITER)]
    pub max_iter: u32,

    /// Pixels per parallel block
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u32,

    /// Comma separated colour bytes (decimal or 0x hex), at least 8
    #[arg(long, value_parser = parse_palette, conflicts_with = "full_colours")]
    pub palette: Option<Palette>,

    /// Use every colour of the 256-colour table
    #[arg(long)]
    pub full_colours: bool,

    #[arg(long, value_enum, default_value_t = BackendKind::Cpu)]
    pub backend: BackendKind,

    /// Worker threads for the cpu backend
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

fn parse_palette(s: &str) -> Result<Palette, ConfigError> {
    s.parse()
}

impl Args {
    pub fn to_config(&self) -> Result<RenderConfig, ConfigError> {
        let mut builder = RenderConfig::builder()
            .width(self.width)
            .height(self.height)
            .zoom(self.zoom)
            .delta_x(self.delta_x)
            .delta_y(self.delta_y)
            .center(Complex::new(self.center_re, self.center_im))
            .max_iter(self.max_iter)
            .block_size(self.block_size);

        if let Some(palette) = &self.palette {
            builder = builder.palette(palette.clone());
        } else if self.full_colours {
            builder = builder.full_colours();
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("mandelbrot").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_the_config_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.backend, BackendKind::Cpu);
        assert_eq!(args.threads, None);
        assert_eq!(args.to_config().unwrap(), RenderConfig::default());
    }

    #[test]
    fn flags_reach_the_config() {
        let args = parse(&[
            "-W", "80", "-H", "24", "-z", "4", "--delta-x", "-3", "--delta-y", "2",
            "--center-re", "-0.75", "--center-im", "0.1", "-m", "500", "-b", "64",
            "--palette", "16,17,18,19,20,21,22,0x17",
        ])
        .unwrap();
        let config = args.to_config().unwrap();

        assert_eq!((config.width(), config.height()), (80, 24));
        assert_eq!(config.viewport().zoom, 4);
        assert_eq!(config.viewport().delta_x, -3);
        assert_eq!(config.viewport().delta_y, 2);
        assert_eq!(config.viewport().center, Complex::new(-0.75, 0.1));
        assert_eq!(config.max_iter(), 500);
        assert_eq!(config.block_size(), 64);
        assert_eq!(config.palette().colours(), &[16, 17, 18, 19, 20, 21, 22, 23]);
    }

    #[test]
    fn full_colours_flag() {
        let config = parse(&["--full-colours"]).unwrap().to_config().unwrap();
        assert_eq!(config.palette().len(), 256);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(parse(&["--palette", "1,2,3"]).is_err());
        assert!(parse(&["--palette", "1,2,3,4,5,6,7,8", "--full-colours"]).is_err());
        assert_eq!(
            parse(&["-z", "0"]).unwrap().to_config(),
            Err(ConfigError::ZeroZoom)
        );
        assert_eq!(
            parse(&["-W", "0"]).unwrap().to_config(),
            Err(ConfigError::ZeroWidth)
        );
    }
}
