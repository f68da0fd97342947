use viewmorph_geometry::homography::estimate_homography;
use viewmorph_geometry::rectification::rectify_from_fundamental;
use viewmorph_geometry::{linalg, Mat3};
use viewmorph_image::ImageSize;

use crate::error::MorphError;
use crate::points;

/// How the pair of framing homographies is derived.
#[derive(Clone, Debug, PartialEq)]
pub enum FramingMode {
    /// Image 2 is mapped onto image 1 with a least-squares homography fit
    /// over the point correspondences; image 1 stays fixed.
    Direct,
    /// Both images are rectified from a fundamental matrix (convention
    /// `x2^T F x1 = 0`) by sending each epipole to infinity.
    Calibrated(Mat3),
}

/// A pair of framing homographies and the canvas that contains both
/// warped images.
///
/// `warp_1` and `warp_2` are forward maps from each source image into the
/// shared canvas, with the canvas translation already folded in.
#[derive(Clone, Debug)]
pub struct Framing {
    /// Forward map of image 1 into the canvas.
    pub warp_1: Mat3,
    /// Forward map of image 2 into the canvas.
    pub warp_2: Mat3,
    /// Size of the canvas holding both warped images.
    pub canvas: ImageSize,
}

/// Derives the framing homographies and fits a canvas around both
/// warped images.
///
/// The raw rectifying maps are translated so every warped frame corner has
/// non-negative coordinates, and the canvas is the bounding box of all
/// eight warped corners.
///
/// # Errors
///
/// Returns [`MorphError::DegenerateGeometry`] when a framing map is
/// singular or the warped corners collapse to an empty canvas, and
/// [`MorphError::PointAtInfinity`] when a frame corner maps to infinity.
pub fn compute_framing(
    mode: &FramingMode,
    size_1: ImageSize,
    size_2: ImageSize,
    pts_1: &[[f64; 3]],
    pts_2: &[[f64; 3]],
) -> Result<Framing, MorphError> {
    let (raw_1, raw_2) = match mode {
        FramingMode::Direct => {
            let src = points::dehomogenize(pts_2);
            let dst = points::dehomogenize(pts_1);
            (linalg::identity_mat33(), estimate_homography(&src, &dst)?)
        }
        FramingMode::Calibrated(f) => {
            let principal = [size_1.width as f64 / 2.0, size_1.height as f64 / 2.0];
            rectify_from_fundamental(f, pts_1, pts_2, principal)?
        }
    };

    // bounding box of both warped frames
    let corners_1 = points::frame_points(size_1);
    let corners_2 = points::frame_points(size_2);
    let mapped_1 = linalg::apply_perspective(&raw_1, &corners_1)?;
    let mapped_2 = linalg::apply_perspective(&raw_2, &corners_2)?;

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in mapped_1.iter().chain(mapped_2.iter()) {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }

    // absorb sub-pixel estimation noise before rounding up
    let width = (max_x - min_x - 1e-6).ceil();
    let height = (max_y - min_y - 1e-6).ceil();
    if !(width >= 1.0 && height >= 1.0) || !width.is_finite() || !height.is_finite() {
        return Err(MorphError::DegenerateGeometry(
            "framing collapses the canvas",
        ));
    }

    let shift: Mat3 = [[1.0, 0.0, -min_x], [0.0, 1.0, -min_y], [0.0, 0.0, 1.0]];
    let warp_1 = linalg::mat33_mul_mat33(&shift, &raw_1);
    let warp_2 = linalg::mat33_mul_mat33(&shift, &raw_2);

    Ok(Framing {
        warp_1,
        warp_2,
        canvas: ImageSize {
            width: width as usize,
            height: height as usize,
        },
    })
}

pub(crate) fn mat3_to_f32(m: &Mat3) -> [f32; 9] {
    [
        m[0][0] as f32,
        m[0][1] as f32,
        m[0][2] as f32,
        m[1][0] as f32,
        m[1][1] as f32,
        m[1][2] as f32,
        m[2][0] as f32,
        m[2][1] as f32,
        m[2][2] as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_landmarks(offset: f64) -> Vec<[f64; 3]> {
        vec![
            [10.0 + offset, 10.0, 1.0],
            [40.0 + offset, 12.0, 1.0],
            [42.0 + offset, 38.0, 1.0],
            [12.0 + offset, 40.0, 1.0],
            [25.0 + offset, 25.0, 1.0],
        ]
    }

    #[test]
    fn direct_framing_identity_pair() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 50,
            height: 50,
        };
        let pts = square_landmarks(0.0);
        let framing = compute_framing(&FramingMode::Direct, size, size, &pts, &pts)?;

        // identical landmarks: both maps reduce to the identity and the
        // canvas matches the source frame
        assert_eq!(framing.canvas, size);
        for (i, row) in framing.warp_1.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-6, "warp_1[{i}][{j}] = {v}");
            }
        }
        Ok(())
    }

    #[test]
    fn framing_keeps_warped_corners_on_canvas() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 50,
            height: 50,
        };
        let pts_1 = square_landmarks(0.0);
        let pts_2 = square_landmarks(7.0);
        let framing = compute_framing(&FramingMode::Direct, size, size, &pts_1, &pts_2)?;

        let (w, h) = (framing.canvas.width as f64, framing.canvas.height as f64);
        let corners_1 = linalg::apply_perspective(&framing.warp_1, &points::frame_points(size))
            .map_err(MorphError::from)?;
        let corners_2 = linalg::apply_perspective(&framing.warp_2, &points::frame_points(size))
            .map_err(MorphError::from)?;
        for p in corners_1.iter().chain(corners_2.iter()) {
            assert!(p[0] >= -1e-6 && p[0] <= w + 1.0, "x = {}", p[0]);
            assert!(p[1] >= -1e-6 && p[1] <= h + 1.0, "y = {}", p[1]);
        }
        Ok(())
    }

    #[test]
    fn direct_framing_translation_grows_canvas() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 50,
            height: 50,
        };
        let pts_1 = square_landmarks(0.0);
        let pts_2 = square_landmarks(5.0);
        let framing = compute_framing(&FramingMode::Direct, size, size, &pts_1, &pts_2)?;

        // image 2 shifts left by 5 to land on image 1, so the union of the
        // two frames is wider than either source
        assert!(framing.canvas.width > size.width);
        assert_eq!(framing.canvas.height, size.height);
        Ok(())
    }
}
