use faer::prelude::{SpSolver, SpSolverLstsq};

use crate::linalg;
use crate::{Affine2, GeometryError, Mat3};

/// Computes the exact perspective transform from four 2d point correspondences.
///
/// Solves the 8-unknown linear system with `h[2][2]` pinned to one; four
/// correspondences determine the transform exactly.
///
/// * `src` - The source 2d points with shape (4, 2).
/// * `dst` - The destination 2d points with shape (4, 2).
///
/// # Errors
///
/// Returns [`GeometryError::Singular`] when the correspondence is degenerate
/// (collinear or duplicated points).
pub fn perspective_from_4pt(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Mat3, GeometryError> {
    // construct matrix A
    let mut mat_a = faer::Mat::<f64>::zeros(8, 9);
    for i in 0..4 {
        let (s, d) = (src[i], dst[i]);
        mat_a.write(2 * i, 0, s[0]);
        mat_a.write(2 * i, 1, s[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -d[0] * s[0]);
        mat_a.write(2 * i, 7, -d[0] * s[1]);
        mat_a.write(2 * i, 8, -d[0]);

        mat_a.write(2 * i + 1, 3, s[0]);
        mat_a.write(2 * i + 1, 4, s[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -d[1] * s[0]);
        mat_a.write(2 * i + 1, 7, -d[1] * s[1]);
        mat_a.write(2 * i + 1, 8, -d[1]);
    }

    // solve the 8x8 system against the pinned column
    let h_mat = mat_a
        .submatrix(0, 0, 8, 8)
        .partial_piv_lu()
        .solve(-mat_a.submatrix(0, 8, 8, 1));
    let h = h_mat.col(0);

    let homo: Mat3 = [
        [h[0], h[1], h[2]],
        [h[3], h[4], h[5]],
        [h[6], h[7], 1.0],
    ];

    if homo.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular);
    }
    if linalg::det_mat33(&homo).abs() < 1e-10 {
        return Err(GeometryError::Singular);
    }

    Ok(homo)
}

/// Estimate a homography from n >= 4 point correspondences using the
/// Hartley-normalized DLT.
///
/// Returns `H` such that `dst ~ H src` in homogeneous coordinates, in the
/// least-squares sense when the correspondence is over-determined.
///
/// # Errors
///
/// Returns [`GeometryError::BadInput`] for fewer than 4 correspondences or
/// mismatched lengths, and [`GeometryError::Singular`] for degenerate
/// configurations.
pub fn estimate_homography(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<Mat3, GeometryError> {
    let n = src.len();
    if n < 4 || dst.len() != n {
        return Err(GeometryError::BadInput(
            "need at least 4 correspondences of equal length",
        ));
    }

    // Normalize points with similarity transforms to zero mean, avg sqrt(2) distance
    let (src_n, t_src) = normalize_points_2d(src);
    let (dst_n, t_dst) = normalize_points_2d(dst);

    // Build design matrix A (2n x 9) for dst x (H src) = 0, zero-padded to at
    // least 9 rows so the SVD is well-shaped for n = 4.
    let rows = (2 * n).max(9);
    let mut a = faer::Mat::<f64>::zeros(rows, 9);
    for i in 0..n {
        let (x, y) = (src_n[i][0], src_n[i][1]);
        let (u, v) = (dst_n[i][0], dst_n[i][1]);

        a.write(2 * i, 0, -x);
        a.write(2 * i, 1, -y);
        a.write(2 * i, 2, -1.0);
        a.write(2 * i, 6, u * x);
        a.write(2 * i, 7, u * y);
        a.write(2 * i, 8, u);

        a.write(2 * i + 1, 3, -x);
        a.write(2 * i + 1, 4, -y);
        a.write(2 * i + 1, 5, -1.0);
        a.write(2 * i + 1, 6, v * x);
        a.write(2 * i + 1, 7, v * y);
        a.write(2 * i + 1, 8, v);
    }

    // Solve A h = 0 via SVD: the singular vector of the smallest singular value
    let svd = a.svd();
    let h = svd.v().col(8);

    let h_n: Mat3 = [
        [h[0], h[1], h[2]],
        [h[3], h[4], h[5]],
        [h[6], h[7], h[8]],
    ];

    // Denormalize: H = T_dst^-1 * H_n * T_src
    let t_dst_inv = linalg::inverse_mat33(&t_dst)?;
    let mut homo = linalg::mat33_mul_mat33(&t_dst_inv, &linalg::mat33_mul_mat33(&h_n, &t_src));

    // normalize such that H[2][2] = 1 when possible
    let scale = homo[2][2];
    if scale.abs() > f64::EPSILON {
        for row in homo.iter_mut() {
            for v in row.iter_mut() {
                *v /= scale;
            }
        }
    }

    if homo.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular);
    }
    let mut check = homo;
    linalg::normalize_mat33_inplace(&mut check);
    if linalg::det_mat33(&check).abs() < 1e-10 {
        return Err(GeometryError::Singular);
    }

    Ok(homo)
}

/// Computes the exact 2d affine transform from three point correspondences.
///
/// * `src` - The source triangle vertices.
/// * `dst` - The destination triangle vertices.
///
/// # Errors
///
/// Returns [`GeometryError::CollinearTriangle`] when either triangle has
/// (near) zero area.
pub fn affine_from_3pt(src: &[[f64; 2]; 3], dst: &[[f64; 2]; 3]) -> Result<Affine2, GeometryError> {
    if linalg::signed_area2(src[0], src[1], src[2]).abs() < 1e-9
        || linalg::signed_area2(dst[0], dst[1], dst[2]).abs() < 1e-9
    {
        return Err(GeometryError::CollinearTriangle);
    }

    let mut mat_a = faer::Mat::<f64>::zeros(6, 6);
    let mut mat_b = faer::Mat::<f64>::zeros(6, 1);
    for i in 0..3 {
        let (s, d) = (src[i], dst[i]);
        mat_a.write(2 * i, 0, s[0]);
        mat_a.write(2 * i, 1, s[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i + 1, 3, s[0]);
        mat_a.write(2 * i + 1, 4, s[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_b.write(2 * i, 0, d[0]);
        mat_b.write(2 * i + 1, 0, d[1]);
    }

    let params = mat_a.partial_piv_lu().solve(mat_b);
    let aff = params.col(0);

    let affine: Affine2 = [[aff[0], aff[1], aff[2]], [aff[3], aff[4], aff[5]]];
    if affine.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::CollinearTriangle);
    }

    Ok(affine)
}

/// Fits a 2d affine transform to n >= 3 point correspondences in the
/// least-squares sense.
///
/// # Errors
///
/// Returns [`GeometryError::BadInput`] for fewer than 3 correspondences or
/// mismatched lengths, and [`GeometryError::Singular`] when the fit is
/// degenerate.
pub fn affine_lstsq(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<Affine2, GeometryError> {
    let n = src.len();
    if n < 3 || dst.len() != n {
        return Err(GeometryError::BadInput(
            "need at least 3 correspondences of equal length",
        ));
    }

    let mut mat_a = faer::Mat::<f64>::zeros(2 * n, 6);
    let mut mat_b = faer::Mat::<f64>::zeros(2 * n, 1);
    for i in 0..n {
        let (s, d) = (src[i], dst[i]);
        mat_a.write(2 * i, 0, s[0]);
        mat_a.write(2 * i, 1, s[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i + 1, 3, s[0]);
        mat_a.write(2 * i + 1, 4, s[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_b.write(2 * i, 0, d[0]);
        mat_b.write(2 * i + 1, 0, d[1]);
    }

    let params = mat_a.qr().solve_lstsq(mat_b);
    let aff = params.col(0);

    let affine: Affine2 = [[aff[0], aff[1], aff[2]], [aff[3], aff[4], aff[5]]];
    if affine.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular);
    }

    Ok(affine)
}

fn normalize_points_2d(x: &[[f64; 2]]) -> (Vec<[f64; 2]>, Mat3) {
    let n = x.len();
    let (mut mx, mut my) = (0.0, 0.0);
    for p in x {
        mx += p[0];
        my += p[1];
    }
    mx /= n as f64;
    my /= n as f64;

    let mut mean_dist = 0.0;
    for p in x {
        let dx = p[0] - mx;
        let dy = p[1] - my;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n as f64;
    let scale = if mean_dist > 0.0 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let mut xn = Vec::with_capacity(n);
    for p in x {
        xn.push([(p[0] - mx) * scale, (p[1] - my) * scale]);
    }

    // Similarity transform T = [[s,0,-s*mx],[0,s,-s*my],[0,0,1]]
    let t: Mat3 = [
        [scale, 0.0, -scale * mx],
        [0.0, scale, -scale * my],
        [0.0, 0.0, 1.0],
    ];
    (xn, t)
}
