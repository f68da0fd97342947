#![deny(missing_docs)]
//! Image container types for the viewmorph pipeline.

/// image representation for the morphing pipeline.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
