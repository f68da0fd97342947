#![deny(missing_docs)]
//! Projective geometry and triangulation kernels for the viewmorph pipeline.
//!
//! - [`linalg`] - dense 3×3 routines and homogeneous point transforms
//! - [`homography`] - exact 4-point and least-squares n-point solves
//! - [`rectification`] - pre-warp homographies from a fundamental matrix
//! - [`triangulation`] - deterministic Delaunay triangulation

/// A 3×3 matrix as nested row-major arrays.
pub type Mat3 = [[f64; 3]; 3];

/// A 2×3 affine transform as nested row-major arrays.
pub type Affine2 = [[f64; 3]; 2];

mod error;
pub use error::GeometryError;

/// dense 3x3 linear algebra on plain arrays.
pub mod linalg;

/// homography estimation from point correspondences.
pub mod homography;

/// epipolar rectification from a fundamental matrix.
pub mod rectification;

/// Delaunay triangulation of planar point sets.
pub mod triangulation;
