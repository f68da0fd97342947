//! Pixel interpolation methods for image transformations.
//!
//! Resampling kernels used by the geometric warps: nearest neighbor for
//! speed, bilinear for smooth results.

mod bilinear;

/// Grid generation utilities for image warping.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;

pub use interpolate::interpolate_pixel;
pub use interpolate::InterpolationMode;
