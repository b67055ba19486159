#![cfg_attr(not(test), no_std)]

use core::ops::{Add, Mul, Sub};

pub use bytemuck;

/// Invocations per workgroup of the compute entry point. Must match the
/// `threads(..)` attribute on `shader::main_cs`.
pub const WORKGROUP_SIZE: u32 = 256;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn square(self) -> Self {
        Self::new(self.re * self.re - self.im * self.im, 2. * self.re * self.im)
    }

    /// `|z|^2`, compared against the squared escape radius instead of taking a root.
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.re * factor, self.im * factor)
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Everything the kernel needs for one frame. Pushed verbatim as push constants.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Params {
    pub width: u32,
    pub height: u32,
    pub max_iter: u32,
    pub pixels: u32,
    /// Invocations per dispatch row; only read by the compute entry point.
    pub dispatch_width: u32,
    _pad0: u32,
    pub begin: Complex,
    pub span: Complex,
}

impl Params {
    pub fn new(width: u32, height: u32, max_iter: u32, begin: Complex, span: Complex) -> Self {
        let pixels = width * height;
        Self {
            width,
            height,
            max_iter,
            pixels,
            dispatch_width: pixels,
            _pad0: 0,
            begin,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(-3.0, 0.5);

        assert_eq!(a + b, Complex::new(-2.0, 2.5));
        assert_eq!(a - b, Complex::new(4.0, 1.5));
        assert_eq!(a * b, Complex::new(-4.0, -5.5));
        assert_eq!(a.square(), a * a);
        assert_eq!(a.norm_sqr(), 5.0);
        assert_eq!(a.scale(2.0), Complex::new(2.0, 4.0));
    }

    #[test]
    fn params_layout_has_no_padding_holes() {
        assert_eq!(core::mem::size_of::<Params>(), 6 * 4 + 2 * 16);
        let params = Params::new(4, 3, 10, Complex::ZERO, Complex::new(1.0, -1.0));
        assert_eq!(params.pixels, 12);
        assert_eq!(params.dispatch_width, 12);
    }
}
