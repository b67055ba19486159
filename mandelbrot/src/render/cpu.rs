use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use shared::Params;

use super::Backend;
use crate::error::RenderError;

/// Runs the kernel on a rayon pool, one task per block of pixels.
pub struct CpuBackend {
    pool: ThreadPool,
}

impl CpuBackend {
    /// `threads: None` lets rayon pick (usually one per core).
    pub fn new(threads: Option<usize>) -> Result<Self, RenderError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("mandelbrot-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        Ok(Self {
            pool: builder.build()?,
        })
    }
}

impl Backend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn dispatch(
        &mut self,
        params: &Params,
        block_size: u32,
        out: &mut [u32],
    ) -> Result<(), RenderError> {
        let block_size = block_size.max(1) as usize;
        let pixels = out.len().min(params.pixels as usize);

        self.pool.install(|| {
            out[..pixels]
                .par_chunks_mut(block_size)
                .enumerate()
                .for_each(|(block, slots)| {
                    let first = block * block_size;
                    for (offset, slot) in slots.iter_mut().enumerate() {
                        *slot = shader::render_pixel((first + offset) as u32, params);
                    }
                });
        });

        Ok(())
    }
}
