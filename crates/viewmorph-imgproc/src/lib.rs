#![deny(missing_docs)]
//! Resampling and rasterization kernels for the viewmorph pipeline.

/// utilities to draw masks on images.
pub mod draw;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
