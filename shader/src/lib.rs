#![cfg_attr(target_arch = "spirv", no_std)]
#![deny(warnings)]

use shared::{Complex, Params};

#[cfg(target_arch = "spirv")]
use spirv_std::{glam::UVec3, macros::spirv};

/// Squared escape radius: `|z| > 2` iff `|z|^2 > 4`.
const ESCAPE_RADIUS_SQR: f64 = 4.;

#[cfg(target_arch = "spirv")]
#[spirv(compute(threads(256)))]
pub fn main_cs(
    #[spirv(global_invocation_id)] id: UVec3,
    #[spirv(push_constant)] params: &Params,
    #[spirv(storage_buffer, descriptor_set = 0, binding = 0)] out: &mut [u32],
) {
    let p = id.y * params.dispatch_width + id.x;
    if p >= params.pixels {
        return;
    }

    out[p as usize] = render_pixel(p, params);
}

/// Maps flat pixel index `p` to the centre of its cell in `[begin, begin + span]`.
pub fn pixel_coord(p: u32, params: &Params) -> Complex {
    let px = (p % params.width) as f64;
    let py = (p / params.width) as f64;

    Complex::new(
        params.begin.re + (px + 0.5) * params.span.re / params.width as f64,
        params.begin.im + (py + 0.5) * params.span.im / params.height as f64,
    )
}

/// Number of `z = z^2 + c` steps taken before `|z|` leaves radius 2,
/// or `max_iter` if it never does.
pub fn escape_time(c: Complex, max_iter: u32) -> u32 {
    let mut z = Complex::ZERO;
    let mut n = 0;

    while n < max_iter && z.norm_sqr() <= ESCAPE_RADIUS_SQR {
        z = z.square() + c;
        n += 1;
    }

    n
}

pub fn render_pixel(p: u32, params: &Params) -> u32 {
    escape_time(pixel_coord(p, params), params.max_iter)
}
