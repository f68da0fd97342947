/// Errors produced by the geometry kernels.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// A matrix required to be invertible is singular or non-finite.
    #[error("singular or non-finite transform matrix")]
    Singular,

    /// A homogeneous point mapped to (near) zero homogeneous coordinate.
    #[error("point maps to infinity: homogeneous coordinate {0} is near zero")]
    PointAtInfinity(f64),

    /// The input point set cannot be triangulated.
    #[error("degenerate triangulation input: {0}")]
    DegenerateTriangulation(&'static str),

    /// A triangle has (near) zero area.
    #[error("collinear triangle vertices")]
    CollinearTriangle,

    /// The input does not satisfy the operation's preconditions.
    #[error("bad input: {0}")]
    BadInput(&'static str),
}
