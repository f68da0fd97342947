use crate::homography::affine_lstsq;
use crate::linalg;
use crate::{GeometryError, Mat3};

/// Computes a pair of rectifying homographies from a fundamental matrix.
///
/// The fundamental matrix convention is `x2^T F x1 = 0`. Each image gets a
/// homography sending its epipole to infinity (principal point to the
/// origin, epipole rotated onto the +x axis, projective `-1/f` factor), and
/// image 1 is additionally aligned to image 2 by a least-squares affine fit
/// over the supplied landmark correspondences.
///
/// * `f` - The fundamental matrix relating the two point sets.
/// * `pts_1` - Homogeneous landmarks of image 1.
/// * `pts_2` - Corresponding homogeneous landmarks of image 2.
/// * `principal` - The principal point used to anchor the rectification.
///
/// Returns the forward maps `(w_1, w_2)`: warping image *i* by `w_i` places
/// it in the shared rectified frame.
///
/// # Errors
///
/// Returns [`GeometryError::Singular`] when an epipole coincides with the
/// principal point or a produced map is non-invertible, and propagates
/// [`GeometryError::PointAtInfinity`] from the landmark transforms.
pub fn rectify_from_fundamental(
    f: &Mat3,
    pts_1: &[[f64; 3]],
    pts_2: &[[f64; 3]],
    principal: [f64; 2],
) -> Result<(Mat3, Mat3), GeometryError> {
    if pts_1.len() != pts_2.len() || pts_1.len() < 3 {
        return Err(GeometryError::BadInput(
            "need at least 3 correspondences of equal length",
        ));
    }

    let (e_1, e_2) = epipoles(f);

    let w_1_raw = epipole_to_infinity(&e_1, principal)?;
    let w_2 = epipole_to_infinity(&e_2, principal)?;

    // align image 1 to image 2 in the rectified frame with an affine fit
    let q_1 = linalg::apply_perspective(&w_1_raw, pts_1)?;
    let q_2 = linalg::apply_perspective(&w_2, pts_2)?;
    let q_1_xy: Vec<[f64; 2]> = q_1.iter().map(|p| [p[0], p[1]]).collect();
    let q_2_xy: Vec<[f64; 2]> = q_2.iter().map(|p| [p[0], p[1]]).collect();
    let align = affine_lstsq(&q_1_xy, &q_2_xy)?;

    let align_h: Mat3 = [align[0], align[1], [0.0, 0.0, 1.0]];
    let w_1 = linalg::mat33_mul_mat33(&align_h, &w_1_raw);

    // both maps must stay invertible for the framing step
    linalg::inverse_mat33(&w_1)?;
    linalg::inverse_mat33(&w_2)?;

    Ok((w_1, w_2))
}

/// Extracts the epipoles of `F` as homogeneous points: `F e_1 = 0` and
/// `e_2^T F = 0`.
fn epipoles(f: &Mat3) -> ([f64; 3], [f64; 3]) {
    let mat = faer::mat![
        [f[0][0], f[0][1], f[0][2]],
        [f[1][0], f[1][1], f[1][2]],
        [f[2][0], f[2][1], f[2][2]],
    ];
    let svd = mat.svd();
    let v = svd.v().col(2);
    let u = svd.u().col(2);
    ([v[0], v[1], v[2]], [u[0], u[1], u[2]])
}

/// Builds the homography sending the given epipole to infinity along +x.
fn epipole_to_infinity(e: &[f64; 3], principal: [f64; 2]) -> Result<Mat3, GeometryError> {
    let (cx, cy) = (principal[0], principal[1]);
    let t: Mat3 = [[1.0, 0.0, -cx], [0.0, 1.0, -cy], [0.0, 0.0, 1.0]];

    // direction from the origin towards the translated epipole
    let (dx, dy, finite) = if e[2].abs() > linalg::W_EPS {
        (e[0] / e[2] - cx, e[1] / e[2] - cy, true)
    } else {
        (e[0], e[1], false)
    };

    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1e-9 {
        // epipole at the principal point: no rotation can move it to infinity
        return Err(GeometryError::Singular);
    }

    let (cos_phi, sin_phi) = (dx / dist, dy / dist);
    let rot: Mat3 = [
        [cos_phi, sin_phi, 0.0],
        [-sin_phi, cos_phi, 0.0],
        [0.0, 0.0, 1.0],
    ];

    // the projective factor is the identity when the epipole is already at infinity
    let proj: Mat3 = if finite {
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0 / dist, 0.0, 1.0]]
    } else {
        linalg::identity_mat33()
    };

    Ok(linalg::mat33_mul_mat33(
        &proj,
        &linalg::mat33_mul_mat33(&rot, &t),
    ))
}
