use crate::{GeometryError, Mat3};

/// Homogeneous coordinates below this magnitude are treated as at infinity.
pub const W_EPS: f64 = 1e-12;

/// Computes the determinant of a 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// The 3x3 identity matrix.
pub fn identity_mat33() -> Mat3 {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// Multiplies two 3x3 matrices.
pub fn mat33_mul_mat33(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Multiplies a 3x3 matrix by a homogeneous 3-vector.
pub fn mat33_mul_vec3(m: &Mat3, v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Inverts a 3x3 matrix via its adjugate.
///
/// # Errors
///
/// Returns [`GeometryError::Singular`] when the determinant vanishes or the
/// matrix contains non-finite entries.
#[rustfmt::skip]
pub fn inverse_mat33(m: &Mat3) -> Result<Mat3, GeometryError> {
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular);
    }

    let det = det_mat33(m);
    if det.abs() < 1e-12 {
        return Err(GeometryError::Singular);
    }
    let inv_det = 1.0 / det;

    Ok([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

/// Scales a 3x3 matrix so its largest-magnitude entry is one.
pub fn normalize_mat33_inplace(m: &mut Mat3) {
    let max = m
        .iter()
        .flatten()
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max > 0.0 {
        for row in m.iter_mut() {
            for v in row.iter_mut() {
                *v /= max;
            }
        }
    }
}

/// Transforms a single homogeneous point and renormalizes it to `w = 1`.
///
/// # Errors
///
/// Returns [`GeometryError::PointAtInfinity`] when the transformed
/// homogeneous coordinate is near zero.
pub fn transform_homogeneous(m: &Mat3, p: &[f64; 3]) -> Result<[f64; 3], GeometryError> {
    let q = mat33_mul_vec3(m, p);
    if q[2].abs() < W_EPS {
        return Err(GeometryError::PointAtInfinity(q[2]));
    }
    Ok([q[0] / q[2], q[1] / q[2], 1.0])
}

/// Transforms a set of homogeneous points, renormalizing each to `w = 1`.
///
/// # Errors
///
/// Returns [`GeometryError::PointAtInfinity`] on the first point whose
/// transformed homogeneous coordinate is near zero.
pub fn apply_perspective(m: &Mat3, points: &[[f64; 3]]) -> Result<Vec<[f64; 3]>, GeometryError> {
    points.iter().map(|p| transform_homogeneous(m, p)).collect()
}

/// Twice the signed area of triangle (a, b, c).
pub fn signed_area2(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}
