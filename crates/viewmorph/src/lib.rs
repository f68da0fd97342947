#![deny(missing_docs)]
//! View interpolation morphing between two face images.
//!
//! Given two images and corresponding landmark points on each, [`morph`]
//! produces an intermediate image blending shape and appearance at a chosen
//! fraction. The pipeline is a strict linear sequence:
//!
//! 1. [`framer`] - rectify both images into a common perspective (pre-warp)
//! 2. [`geometry::triangulation`](viewmorph_geometry::triangulation) -
//!    triangulate the rectified landmark set once, reuse the index triples
//! 3. [`compositor`] - piecewise-affine warp and blend, triangle by triangle
//! 4. [`rectify`] - post-warp the composite back to the original frame
//!
//! ```no_run
//! use viewmorph::{morph, MorphConfig};
//! use viewmorph_image::{Image, ImageSize};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let size = ImageSize { width: 100, height: 100 };
//! let image_1 = Image::<f32, 3>::from_size_val(size, 0.2)?;
//! let image_2 = Image::<f32, 3>::from_size_val(size, 0.8)?;
//! let points_1 = vec![[30.0, 30.0], [70.0, 30.0], [50.0, 70.0], [50.0, 45.0]];
//! let points_2 = vec![[28.0, 32.0], [72.0, 31.0], [50.0, 72.0], [49.0, 46.0]];
//!
//! let out = morph(&image_1, &points_1, &image_2, &points_2, &MorphConfig::default())?;
//! assert_eq!(out.image.size(), size);
//! # Ok(())
//! # }
//! ```

/// the per-triangle warp, blend and mask compositing stage.
pub mod compositor;

/// error taxonomy of the morph pipeline.
pub mod error;

/// framing homographies and canvas fitting (pre-warp).
pub mod framer;

/// the public entry point.
pub mod morph;

/// landmark synthesis, augmentation and blending.
pub mod points;

/// the post-warp back to the source frame.
pub mod rectify;

pub use crate::error::MorphError;
pub use crate::framer::{Framing, FramingMode};
pub use crate::morph::{morph, MorphConfig, MorphOutput};
