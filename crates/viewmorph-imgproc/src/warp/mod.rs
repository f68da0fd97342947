//! Geometric image transformations using affine and perspective warps.
//!
//! Both warps resample by inverse mapping: the given matrix maps source
//! coordinates to destination coordinates and is inverted internally, so a
//! destination pixel looks up its color in the source image. Destination
//! pixels whose source position falls outside the image keep their
//! background value.

mod affine;
mod perspective;

pub use affine::{invert_affine_transform, warp_affine};
pub use perspective::{warp_perspective, WarpError};
