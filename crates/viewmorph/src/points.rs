use viewmorph_image::ImageSize;

/// Synthesizes the four frame corner points of an image as homogeneous
/// coordinates, in top-left, top-right, bottom-left, bottom-right order.
///
/// The corners anchor the triangulation to the full frame and later pin the
/// post-warp: the last four points of every augmented landmark set are the
/// frame corners.
pub fn frame_points(size: ImageSize) -> [[f64; 3]; 4] {
    let (w, h) = (size.width as f64, size.height as f64);
    [
        [0.0, 0.0, 1.0],
        [w, 0.0, 1.0],
        [0.0, h, 1.0],
        [w, h, 1.0],
    ]
}

/// Lifts 2D landmarks to homogeneous coordinates with `w = 1`.
pub fn homogenize(points: &[[f64; 2]]) -> Vec<[f64; 3]> {
    points.iter().map(|p| [p[0], p[1], 1.0]).collect()
}

/// Appends the frame corners to a homogeneous landmark set.
pub fn augment_with_frame(points: &[[f64; 3]], frame: &[[f64; 3]; 4]) -> Vec<[f64; 3]> {
    let mut out = points.to_vec();
    out.extend_from_slice(frame);
    out
}

/// Blends two homogeneous point sets: `s * p_1 + (1 - s) * p_2`.
///
/// Both sets must be normalized (`w = 1`) so the blend stays affine.
/// `fraction = 1.0` reproduces the first set.
pub fn blend(pts_1: &[[f64; 3]], pts_2: &[[f64; 3]], fraction: f64) -> Vec<[f64; 3]> {
    pts_1
        .iter()
        .zip(pts_2.iter())
        .map(|(p_1, p_2)| {
            [
                fraction * p_1[0] + (1.0 - fraction) * p_2[0],
                fraction * p_1[1] + (1.0 - fraction) * p_2[1],
                fraction * p_1[2] + (1.0 - fraction) * p_2[2],
            ]
        })
        .collect()
}

/// Drops the homogeneous coordinate of a point set.
pub fn dehomogenize(points: &[[f64; 3]]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p[0], p[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_points_order() {
        let f = frame_points(ImageSize {
            width: 4,
            height: 3,
        });
        assert_eq!(f[0], [0.0, 0.0, 1.0]);
        assert_eq!(f[1], [4.0, 0.0, 1.0]);
        assert_eq!(f[2], [0.0, 3.0, 1.0]);
        assert_eq!(f[3], [4.0, 3.0, 1.0]);
    }

    #[test]
    fn blend_endpoints() {
        let a = [[1.0, 2.0, 1.0]];
        let b = [[5.0, 6.0, 1.0]];
        assert_eq!(blend(&a, &b, 1.0), vec![[1.0, 2.0, 1.0]]);
        assert_eq!(blend(&a, &b, 0.0), vec![[5.0, 6.0, 1.0]]);
        assert_eq!(blend(&a, &b, 0.5), vec![[3.0, 4.0, 1.0]]);
    }

    #[test]
    fn augment_appends_in_order() {
        let frame = frame_points(ImageSize {
            width: 2,
            height: 2,
        });
        let pts = homogenize(&[[1.0, 1.0]]);
        let aug = augment_with_frame(&pts, &frame);
        assert_eq!(aug.len(), 5);
        assert_eq!(aug[0], [1.0, 1.0, 1.0]);
        assert_eq!(aug[4], [2.0, 2.0, 1.0]);
    }
}
