use viewmorph_geometry::GeometryError;
use viewmorph_image::ImageError;
use viewmorph_imgproc::warp::WarpError;

/// Errors produced by the morph pipeline.
///
/// Every variant indicates an unrecoverable geometric degeneracy in the
/// input data; the pipeline aborts without producing partial output and the
/// caller is expected to supply corrected landmarks or images.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MorphError {
    /// A framing, per-triangle or post-warp transform is singular.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// A homogeneous point mapped to (near) zero homogeneous coordinate.
    #[error("point maps to infinity: homogeneous coordinate {0} is near zero")]
    PointAtInfinity(f64),

    /// The landmark set cannot be triangulated.
    #[error("degenerate triangulation input: {0}")]
    DegenerateTriangulation(&'static str),

    /// A triangle in the per-triangle affine solve has (near) zero area.
    #[error("collinear triangle vertices in affine solve")]
    CollinearTriangle,

    /// The two landmark sets differ in length.
    #[error("correspondence mismatch: expected {expected} points, got {got}")]
    CorrespondenceMismatch {
        /// Length of the first landmark set.
        expected: usize,
        /// Length of the second landmark set.
        got: usize,
    },

    /// An image container error.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl From<GeometryError> for MorphError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::Singular => Self::DegenerateGeometry("singular transform matrix"),
            GeometryError::BadInput(msg) => Self::DegenerateGeometry(msg),
            GeometryError::PointAtInfinity(w) => Self::PointAtInfinity(w),
            GeometryError::DegenerateTriangulation(msg) => Self::DegenerateTriangulation(msg),
            GeometryError::CollinearTriangle => Self::CollinearTriangle,
        }
    }
}

impl From<WarpError> for MorphError {
    fn from(e: WarpError) -> Self {
        match e {
            WarpError::SingularMatrix => Self::DegenerateGeometry("singular warp matrix"),
        }
    }
}
