use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mandelbrot::cli::{Args, BackendKind};
use mandelbrot::present;
use mandelbrot::render::{Backend, CpuBackend, Renderer};

fn main() -> Result<()> {
    // Quiet unless asked: stdout carries the image.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();
    let config = args.to_config().context("invalid render configuration")?;

    let mut renderer = Renderer::new(backend(&args)?);
    info!(
        "{}x{} frame, max_iter={}, backend={}",
        config.width(),
        config.height(),
        config.max_iter(),
        renderer.backend_name()
    );

    let frame = renderer.render(&config).context("render failed")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    present::write_frame(&mut out, frame, config.palette(), config.max_iter())
        .context("failed to write frame to stdout")?;

    Ok(())
}

fn backend(args: &Args) -> Result<Box<dyn Backend>> {
    match args.backend {
        BackendKind::Cpu => Ok(Box::new(
            CpuBackend::new(args.threads).context("failed to start cpu workers")?,
        )),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(
            mandelbrot::render::GpuBackend::new().context("failed to initialise the gpu")?,
        )),
        #[cfg(not(feature = "gpu"))]
        BackendKind::Gpu => anyhow::bail!("this build has no gpu backend, rebuild with `--features gpu`"),
    }
}
