use viewmorph_geometry::linalg::apply_perspective;
use viewmorph_geometry::triangulation::delaunay;
use viewmorph_image::Image;
use viewmorph_imgproc::interpolation::InterpolationMode;
use viewmorph_imgproc::warp::warp_perspective;

use crate::compositor;
use crate::error::MorphError;
use crate::framer::{self, mat3_to_f32, FramingMode};
use crate::points;

/// Configuration of a morph invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphConfig {
    /// Blend fraction `s`: `1.0` reproduces image 1, `0.0` image 2. Values
    /// outside `[0, 1]` extrapolate.
    pub fraction: f64,
    /// Whether to rectify both images into a shared perspective before
    /// blending. Without it the blend is a plain cross-dissolve of shapes.
    pub prewarp: bool,
    /// How the framing homographies are derived when `prewarp` is on.
    pub framing: FramingMode,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            fraction: 0.5,
            prewarp: true,
            framing: FramingMode::Direct,
        }
    }
}

/// The result of a morph: the output image at image-1 size and the
/// coverage mask at canvas size.
#[derive(Clone, Debug)]
pub struct MorphOutput<const C: usize> {
    /// The morphed image, post-warped back to the image-1 frame.
    pub image: Image<f32, C>,
    /// The compositor's coverage mask: 255 where a triangle painted the
    /// canvas, 0 elsewhere.
    pub coverage: Image<u8, 1>,
}

/// Morphs two images with corresponding landmark sets at the configured
/// blend fraction.
///
/// The landmark sets must be the same length and ordered so that
/// `points_1[i]` and `points_2[i]` mark the same feature. The four frame
/// corners of image 1 are appended to both sets, the (optionally framed)
/// image-1 landmarks are Delaunay-triangulated once, and the triangle index
/// triples are reused against the image-2 and blended sets so the three
/// triangulations correspond.
///
/// # Errors
///
/// Returns [`MorphError::CorrespondenceMismatch`] for unequal landmark
/// sets, and propagates the geometric degeneracies of the individual
/// stages; no partial output is produced.
pub fn morph<const C: usize>(
    image_1: &Image<f32, C>,
    points_1: &[[f64; 2]],
    image_2: &Image<f32, C>,
    points_2: &[[f64; 2]],
    config: &MorphConfig,
) -> Result<MorphOutput<C>, MorphError> {
    if points_1.len() != points_2.len() {
        return Err(MorphError::CorrespondenceMismatch {
            expected: points_1.len(),
            got: points_2.len(),
        });
    }
    if points_1.len() < 3 {
        return Err(MorphError::DegenerateTriangulation(
            "need at least 3 landmark correspondences",
        ));
    }

    let landmark_count = points_1.len();
    let frame = points::frame_points(image_1.size());
    let mut pts_1 = points::augment_with_frame(&points::homogenize(points_1), &frame);
    let mut pts_2 = points::augment_with_frame(&points::homogenize(points_2), &frame);

    // pre-warp both images and landmark sets into the shared canvas
    let (framed_1, framed_2) = if config.prewarp {
        let framing = framer::compute_framing(
            &config.framing,
            image_1.size(),
            image_2.size(),
            &pts_1,
            &pts_2,
        )?;
        log::debug!("framing canvas: {}", framing.canvas);

        let mut framed_1 = Image::from_size_val(framing.canvas, 0.0f32)?;
        let mut framed_2 = Image::from_size_val(framing.canvas, 0.0f32)?;
        warp_perspective(
            image_1,
            &mut framed_1,
            &mat3_to_f32(&framing.warp_1),
            InterpolationMode::Bilinear,
        )?;
        warp_perspective(
            image_2,
            &mut framed_2,
            &mat3_to_f32(&framing.warp_2),
            InterpolationMode::Bilinear,
        )?;

        pts_1 = apply_perspective(&framing.warp_1, &pts_1)?;
        pts_2 = apply_perspective(&framing.warp_2, &pts_2)?;
        (framed_1, framed_2)
    } else {
        (image_1.clone(), image_2.clone())
    };

    // triangulate the framed image-1 landmarks once; the index triples are
    // reused against pts_2 and the blended set
    let triangles = delaunay(&points::dehomogenize(&pts_1))?;
    log::debug!(
        "triangulated {} landmarks into {} triangles",
        pts_1.len(),
        triangles.len()
    );

    let pts_s = points::blend(&pts_1, &pts_2, config.fraction);

    let composite = compositor::composite(
        &framed_1,
        &framed_2,
        &pts_1,
        &pts_2,
        &pts_s,
        &triangles,
        landmark_count,
        config.fraction,
    )?;

    // the last four blended points are the frame corners; sending them back
    // onto the image-1 frame undoes the framing
    let blended_corners = [
        [pts_s[landmark_count][0], pts_s[landmark_count][1]],
        [pts_s[landmark_count + 1][0], pts_s[landmark_count + 1][1]],
        [pts_s[landmark_count + 2][0], pts_s[landmark_count + 2][1]],
        [pts_s[landmark_count + 3][0], pts_s[landmark_count + 3][1]],
    ];
    let frame_corners = [
        [frame[0][0], frame[0][1]],
        [frame[1][0], frame[1][1]],
        [frame[2][0], frame[2][1]],
        [frame[3][0], frame[3][1]],
    ];
    let image = crate::rectify::postwarp(
        &composite.image,
        &blended_corners,
        &frame_corners,
        image_1.size(),
    )?;

    Ok(MorphOutput {
        image,
        coverage: composite.coverage,
    })
}
